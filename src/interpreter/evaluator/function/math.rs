use ordered_float::OrderedFloat;

use crate::{
    error::RuntimeError,
    interpreter::{
        evaluator::{
            core::EvalResult,
            function::core::{Arity, Builtin},
            utils::{finite, invalid_argument, to_integer, to_real},
        },
        value::{complex::ComplexNumber, core::Value},
    },
    util::num::f64_to_i64_exact,
};

builtin_table! {
    "absoluto"  => { arity: Arity::Exact(1), func: Builtin::Pure(abs) },
    "raiz"      => { arity: Arity::Exact(1), func: Builtin::Pure(sqrt) },
    "potencia"  => { arity: Arity::Exact(2), func: Builtin::Pure(pow) },
    "redondear" => { arity: Arity::OneOf(&[1, 2]), func: Builtin::Pure(round) },
    "piso"      => { arity: Arity::Exact(1), func: Builtin::Pure(floor) },
    "techo"     => { arity: Arity::Exact(1), func: Builtin::Pure(ceil) },
    "maximo"    => { arity: Arity::AtLeast(1), func: Builtin::Pure(max) },
    "minimo"    => { arity: Arity::AtLeast(1), func: Builtin::Pure(min) },
    "seno"      => { arity: Arity::Exact(1), func: Builtin::Pure(sin) },
    "coseno"    => { arity: Arity::Exact(1), func: Builtin::Pure(cos) },
    "logaritmo" => { arity: Arity::OneOf(&[1, 2]), func: Builtin::Pure(log) },
}

/// Computes the absolute value. Integers stay integers; the modulus of a
/// complex number is a real.
///
/// # Example
/// ```
/// use nepa::interpreter::{
///     evaluator::function::math::abs,
///     value::{complex::ComplexNumber, core::Value},
/// };
///
/// assert_eq!(abs(&[Value::Integer(-4)], 1).unwrap(), Value::Integer(4));
/// assert_eq!(abs(&[Value::Complex(ComplexNumber::new(3.0, 4.0))], 1).unwrap(), Value::Real(5.0));
/// assert!(abs(&[Value::Integer(i64::MIN)], 1).is_err());
/// ```
pub fn abs(args: &[Value], line: usize) -> EvalResult<Value> {
    match &args[0] {
        Value::Integer(i) => i.checked_abs()
                              .map(Value::Integer)
                              .ok_or(RuntimeError::Overflow { line }),
        Value::Complex(c) => finite("absoluto", c.modulus(), line),
        Value::Decimal(d) => Ok(Value::Decimal(d.abs())),
        other => finite("absoluto", to_real(other, line)?.abs(), line),
    }
}

/// Computes the square root. A complex argument yields a complex root; a
/// negative real is rejected.
///
/// # Example
/// ```
/// use nepa::interpreter::{
///     evaluator::function::math::sqrt,
///     value::{complex::ComplexNumber, core::Value},
/// };
///
/// assert_eq!(sqrt(&[Value::Integer(9)], 1).unwrap(), Value::Real(3.0));
/// assert_eq!(sqrt(&[Value::Complex(ComplexNumber::new(-4.0, 0.0))], 1).unwrap(),
///            Value::Complex(ComplexNumber::new(0.0, 2.0)));
/// assert!(sqrt(&[Value::Integer(-1)], 1).is_err());
/// ```
pub fn sqrt(args: &[Value], line: usize) -> EvalResult<Value> {
    if let Value::Complex(c) = &args[0] {
        let root = c.principal_root();
        if !root.is_finite() {
            return Err(RuntimeError::NonFiniteResult { function: "raiz".to_string(),
                                                       line });
        }
        return Ok(Value::Complex(root));
    }
    finite("raiz", to_real(&args[0], line)?.sqrt(), line)
}

/// Raises `base` to `exponent`. Two integers with a non-negative exponent
/// produce an exact integer.
///
/// # Example
/// ```
/// use nepa::interpreter::{evaluator::function::math::pow, value::core::Value};
///
/// assert_eq!(pow(&[Value::Integer(2), Value::Integer(10)], 1).unwrap(), Value::Integer(1024));
/// assert_eq!(pow(&[Value::Integer(4), Value::Real(0.5)], 1).unwrap(), Value::Real(2.0));
/// assert!(pow(&[Value::Integer(2), Value::Integer(64)], 1).is_err());
/// ```
pub fn pow(args: &[Value], line: usize) -> EvalResult<Value> {
    if let (Value::Integer(base), Value::Integer(exponent)) = (&args[0], &args[1])
       && *exponent >= 0
    {
        let exponent = u32::try_from(*exponent).map_err(|_| RuntimeError::Overflow { line })?;
        return base.checked_pow(exponent)
                   .map(Value::Integer)
                   .ok_or(RuntimeError::Overflow { line });
    }
    if let Value::Complex(base) = &args[0] {
        let exponent = to_integer(&args[1], line)?;
        return complex_pow(*base, exponent, line);
    }
    let base = to_real(&args[0], line)?;
    let exponent = to_real(&args[1], line)?;
    finite("potencia", base.powf(exponent), line)
}

fn complex_pow(base: ComplexNumber, exponent: i64, line: usize) -> EvalResult<Value> {
    let mut result = ComplexNumber::from(1.0);
    for _ in 0..exponent.unsigned_abs() {
        result = result * base;
        if !result.is_finite() {
            return Err(RuntimeError::Overflow { line });
        }
    }
    if exponent < 0 {
        result = ComplexNumber::from(1.0).checked_div(result)
                                         .ok_or(RuntimeError::DivisionByZero { line })?;
    }
    Ok(Value::Complex(result))
}

/// Rounds half away from zero. Without digits the result is an integer.
///
/// # Example
/// ```
/// use nepa::interpreter::{evaluator::function::math::round, value::core::Value};
///
/// assert_eq!(round(&[Value::Real(2.5)], 1).unwrap(), Value::Integer(3));
/// assert_eq!(round(&[Value::Real(3.14159), Value::Integer(2)], 1).unwrap(), Value::Real(3.14));
/// ```
pub fn round(args: &[Value], line: usize) -> EvalResult<Value> {
    let value = to_real(&args[0], line)?;
    let Some(digits) = args.get(1) else {
        return to_exact_integer(value.round(), line);
    };
    let digits = to_integer(digits, line)?;
    let digits = i32::try_from(digits).ok()
                                      .filter(|d| (0..=15).contains(d))
                                      .ok_or_else(|| {
                                          invalid_argument("redondear",
                                                           "los dígitos deben estar entre 0 y 15",
                                                           line)
                                      })?;
    let scale = 10_f64.powi(digits);
    finite("redondear", (value * scale).round() / scale, line)
}

/// Rounds down to an integer.
pub fn floor(args: &[Value], line: usize) -> EvalResult<Value> {
    to_exact_integer(to_real(&args[0], line)?.floor(), line)
}

/// Rounds up to an integer.
pub fn ceil(args: &[Value], line: usize) -> EvalResult<Value> {
    to_exact_integer(to_real(&args[0], line)?.ceil(), line)
}

fn to_exact_integer(value: f64, line: usize) -> EvalResult<Value> {
    f64_to_i64_exact(value).map(Value::Integer)
                           .ok_or(RuntimeError::Overflow { line })
}

/// The largest argument, or the largest element of a single list argument.
///
/// # Example
/// ```
/// use nepa::interpreter::{evaluator::function::math::max, value::core::Value};
///
/// let args = [Value::Integer(3), Value::Real(7.5), Value::Integer(-2)];
/// assert_eq!(max(&args, 1).unwrap(), Value::Real(7.5));
///
/// let list = Value::List(vec![Value::Integer(4), Value::Integer(9)]);
/// assert_eq!(max(&[list], 1).unwrap(), Value::Integer(9));
/// ```
pub fn max(args: &[Value], line: usize) -> EvalResult<Value> {
    extreme("maximo", args, line, true)
}

/// The smallest argument, or the smallest element of a single list argument.
pub fn min(args: &[Value], line: usize) -> EvalResult<Value> {
    extreme("minimo", args, line, false)
}

fn extreme(name: &str, args: &[Value], line: usize, largest: bool) -> EvalResult<Value> {
    let items = match args {
        [Value::List(items)] => items.as_slice(),
        _ => args,
    };

    let mut best: Option<(OrderedFloat<f64>, &Value)> = None;
    for item in items {
        let key = OrderedFloat(to_real(item, line)?);
        let better = best.is_none_or(|(current, _)| if largest { key > current } else { key < current });
        if better {
            best = Some((key, item));
        }
    }
    best.map(|(_, item)| item.clone())
        .ok_or_else(|| invalid_argument(name, "la lista está vacía", line))
}

/// The sine of an angle in radians.
pub fn sin(args: &[Value], line: usize) -> EvalResult<Value> {
    finite("seno", to_real(&args[0], line)?.sin(), line)
}

/// The cosine of an angle in radians.
pub fn cos(args: &[Value], line: usize) -> EvalResult<Value> {
    finite("coseno", to_real(&args[0], line)?.cos(), line)
}

/// Computes `logaritmo(x)`, the natural logarithm, or `logaritmo(x, base)`.
///
/// # Example
/// ```
/// use nepa::interpreter::{evaluator::function::math::log, value::core::Value};
///
/// let Value::Real(bits) = log(&[Value::Integer(8), Value::Integer(2)], 1).unwrap() else {
///     panic!("se esperaba un real");
/// };
/// assert!((bits - 3.0).abs() < 1e-12);
/// assert!(log(&[Value::Integer(0)], 1).is_err());
/// ```
pub fn log(args: &[Value], line: usize) -> EvalResult<Value> {
    let value = to_real(&args[0], line)?;
    let result = match args.get(1) {
        Some(base) => value.log(to_real(base, line)?),
        None => value.ln(),
    };
    finite("logaritmo", result, line)
}
