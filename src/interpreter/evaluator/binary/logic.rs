use crate::{
    ast::BinaryOperator,
    error::RuntimeError,
    interpreter::{
        evaluator::core::{Context, EvalResult},
        value::core::Value,
    },
};

impl Context {
    /// Evaluates a logical operation between two boolean values.
    ///
    /// Both operands must already be booleans; nothing is coerced.
    ///
    /// # Example
    /// ```
    /// use nepa::{
    ///     ast::BinaryOperator,
    ///     interpreter::{evaluator::core::Context, value::core::Value},
    /// };
    ///
    /// let a = Value::Boolean(true);
    /// let b = Value::Boolean(false);
    /// assert_eq!(Context::eval_logic(BinaryOperator::Or, &a, &b, 1).unwrap(), Value::Boolean(true));
    /// assert!(Context::eval_logic(BinaryOperator::And, &a, &Value::Integer(1), 1).is_err());
    /// ```
    pub fn eval_logic(op: BinaryOperator, left: &Value, right: &Value, line: usize) -> EvalResult<Value> {
        let left = Self::expect_boolean(left, line)?;
        let right = Self::expect_boolean(right, line)?;
        match op {
            BinaryOperator::And => Ok(Value::Boolean(left && right)),
            BinaryOperator::Or => Ok(Value::Boolean(left || right)),
            other => Err(RuntimeError::mismatch(format!("'{other}' no es un operador lógico"), line)),
        }
    }

    pub(crate) fn expect_boolean(value: &Value, line: usize) -> EvalResult<bool> {
        match value {
            Value::Boolean(b) => Ok(*b),
            other => Err(RuntimeError::ExpectedBoolean { found: other.to_string(),
                                                         line }),
        }
    }
}
