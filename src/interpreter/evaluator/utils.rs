use crate::{
    error::RuntimeError,
    interpreter::{evaluator::core::EvalResult, value::core::Value},
};

/// Converts to a real through the shared numeric coercion.
///
/// # Example
/// ```
/// use nepa::interpreter::{evaluator::utils::to_real, value::core::Value};
///
/// assert_eq!(to_real(&Value::String("1.5".into()), 1).unwrap(), 1.5);
/// assert!(to_real(&Value::List(vec![]), 1).is_err());
/// ```
pub fn to_real(value: &Value, line: usize) -> EvalResult<f64> {
    value.to_real().map_err(|e| RuntimeError::conversion(e, line))
}

/// Converts to an integer, truncating reals.
pub fn to_integer(value: &Value, line: usize) -> EvalResult<i64> {
    value.to_integer().map_err(|e| RuntimeError::conversion(e, line))
}

/// Builds an `InvalidArgument` error for builtin `name`.
pub fn invalid_argument(name: &str, details: impl Into<String>, line: usize) -> RuntimeError {
    RuntimeError::InvalidArgument { name: name.to_string(),
                                    details: details.into(),
                                    line }
}

/// Borrows argument `index` of builtin `name` as text.
///
/// # Example
/// ```
/// use nepa::interpreter::{evaluator::utils::text_argument, value::core::Value};
///
/// let args = [Value::String("hola".into()), Value::Integer(1)];
/// assert_eq!(text_argument("dividir", &args, 0, 1).unwrap(), "hola");
/// assert!(text_argument("dividir", &args, 1, 1).is_err());
/// ```
pub fn text_argument<'a>(name: &str, args: &'a [Value], index: usize, line: usize) -> EvalResult<&'a str> {
    match args.get(index) {
        Some(value) => value.as_str().ok_or_else(|| {
                                         invalid_argument(name,
                                                          format!("se esperaba un texto, se recibió {}",
                                                                  value.type_name()),
                                                          line)
                                     }),
        None => Err(invalid_argument(name, format!("falta el argumento {}", index + 1), line)),
    }
}

/// Wraps a math result, rejecting NaN and infinities.
///
/// # Example
/// ```
/// use nepa::interpreter::{evaluator::utils::finite, value::core::Value};
///
/// assert_eq!(finite("raiz", 2.0, 1).unwrap(), Value::Real(2.0));
/// assert!(finite("raiz", f64::NAN, 1).is_err());
/// assert!(finite("logaritmo", f64::NEG_INFINITY, 1).is_err());
/// ```
pub fn finite(function: &str, value: f64, line: usize) -> EvalResult<Value> {
    if value.is_finite() {
        Ok(Value::Real(value))
    } else {
        Err(RuntimeError::NonFiniteResult { function: function.to_string(),
                                            line })
    }
}
