use crate::{
    ast::BinaryOperator,
    error::RuntimeError,
    interpreter::{
        evaluator::{
            core::{Context, EvalResult},
            utils::to_real,
        },
        value::{complex::ComplexNumber, core::Value},
    },
    util::num::f64_to_i64_truncating,
};

impl Context {
    /// Evaluates `+ - * / %`.
    ///
    /// Result kinds:
    /// - `+` concatenates display forms when either side is text, and joins
    ///   two lists.
    /// - A complex operand makes the operation complex.
    /// - Two integer-kinded operands (entero, bit, booleano) give an integer
    ///   for `+ - *` while the exact result fits; otherwise a real.
    /// - A decimal operand keeps the result decimal.
    /// - `/` gives a real and `%` an integer after truncating both sides;
    ///   integer-kinded sides are used as they are.
    ///   A zero divisor is an error for both.
    ///
    /// # Example
    /// ```
    /// use nepa::{
    ///     ast::BinaryOperator,
    ///     interpreter::{evaluator::core::Context, value::core::Value},
    /// };
    ///
    /// let q = Context::eval_arithmetic(BinaryOperator::Div, &Value::Integer(10), &Value::Integer(3), 1).unwrap();
    /// assert_eq!(q.to_string(), "3.333333333333333");
    ///
    /// let r = Context::eval_arithmetic(BinaryOperator::Mod, &Value::Real(7.9), &Value::Integer(2), 1).unwrap();
    /// assert_eq!(r, Value::Integer(1));
    ///
    /// assert!(Context::eval_arithmetic(BinaryOperator::Div, &Value::Integer(10), &Value::Integer(0), 1).is_err());
    /// assert!(Context::eval_arithmetic(BinaryOperator::Mod, &Value::Integer(10), &Value::Integer(0), 1).is_err());
    /// ```
    pub fn eval_arithmetic(op: BinaryOperator,
                           left: &Value,
                           right: &Value,
                           line: usize)
                           -> EvalResult<Value> {
        if op == BinaryOperator::Add {
            if left.is_text() || right.is_text() {
                return Ok(Value::String(left.text_form() + &right.text_form()));
            }
            if let (Value::List(a), Value::List(b)) = (left, right) {
                return Ok(Value::List(a.iter().chain(b).cloned().collect()));
            }
        }

        if matches!(left, Value::Complex(_)) || matches!(right, Value::Complex(_)) {
            return Self::eval_complex(op, left, right, line);
        }

        if op == BinaryOperator::Mod {
            return Self::eval_modulo(left, right, line);
        }

        if op != BinaryOperator::Div
           && let (Some(x), Some(y)) = (left.as_integer(), right.as_integer())
        {
            let exact = match op {
                BinaryOperator::Add => x.checked_add(y),
                BinaryOperator::Sub => x.checked_sub(y),
                _ => x.checked_mul(y),
            };
            if let Some(result) = exact {
                return Ok(Value::Integer(result));
            }
        }

        let a = to_real(left, line)?;
        let b = to_real(right, line)?;

        let result = match op {
            BinaryOperator::Add => a + b,
            BinaryOperator::Sub => a - b,
            BinaryOperator::Mul => a * b,
            BinaryOperator::Div => {
                if b == 0.0 {
                    return Err(RuntimeError::DivisionByZero { line });
                }
                a / b
            },
            other => return Err(RuntimeError::mismatch(format!("'{other}' no es aritmético"), line)),
        };
        if !result.is_finite() {
            return Err(RuntimeError::Overflow { line });
        }

        if matches!(left, Value::Decimal(_)) || matches!(right, Value::Decimal(_)) {
            Ok(Value::Decimal(result))
        } else {
            Ok(Value::Real(result))
        }
    }

    fn eval_modulo(left: &Value, right: &Value, line: usize) -> EvalResult<Value> {
        let truncate = |value: &Value| -> EvalResult<i64> {
            if let Some(i) = value.as_integer() {
                return Ok(i);
            }
            f64_to_i64_truncating(to_real(value, line)?).ok_or(RuntimeError::Overflow { line })
        };
        let a = truncate(left)?;
        let b = truncate(right)?;
        if b == 0 {
            return Err(RuntimeError::DivisionByZero { line });
        }
        a.checked_rem(b).map(Value::Integer).ok_or(RuntimeError::Overflow { line })
    }

    fn eval_complex(op: BinaryOperator, left: &Value, right: &Value, line: usize) -> EvalResult<Value> {
        let a = complex_of(left, line)?;
        let b = complex_of(right, line)?;
        let result = match op {
            BinaryOperator::Add => a + b,
            BinaryOperator::Sub => a - b,
            BinaryOperator::Mul => a * b,
            BinaryOperator::Div => a.checked_div(b).ok_or(RuntimeError::DivisionByZero { line })?,
            other => {
                return Err(RuntimeError::mismatch(format!("'{other}' no está definido para complejos"),
                                                  line));
            },
        };
        if !result.is_finite() {
            return Err(RuntimeError::Overflow { line });
        }
        Ok(Value::Complex(result))
    }
}

fn complex_of(value: &Value, line: usize) -> EvalResult<ComplexNumber> {
    match value {
        Value::Complex(c) => Ok(*c),
        other => to_real(other, line).map(ComplexNumber::from),
    }
}

