use crate::{
    ast::UnaryOperator,
    error::RuntimeError,
    interpreter::{
        evaluator::{
            core::{Context, EvalResult},
            utils::to_real,
        },
        value::core::Value,
    },
};

impl Context {
    /// Evaluates a unary operation on a value.
    ///
    /// Supported operators:
    /// - `Negate`: integers stay integral, decimals stay decimal, complex
    ///   numbers negate both parts, everything else is negated as a real.
    /// - `Plus`: converts to a real (complex numbers are kept).
    /// - `Not`: boolean negation; the operand must already be a boolean.
    ///
    /// # Example
    /// ```
    /// use nepa::{
    ///     ast::UnaryOperator,
    ///     interpreter::{evaluator::core::Context, value::core::Value},
    /// };
    ///
    /// let v = Context::eval_unary(UnaryOperator::Negate, &Value::Integer(5), 1).unwrap();
    /// assert_eq!(v, Value::Integer(-5));
    ///
    /// let v = Context::eval_unary(UnaryOperator::Plus, &Value::String("2".into()), 1).unwrap();
    /// assert_eq!(v, Value::Real(2.0));
    ///
    /// let v = Context::eval_unary(UnaryOperator::Not, &Value::Boolean(false), 1).unwrap();
    /// assert_eq!(v, Value::Boolean(true));
    /// assert!(Context::eval_unary(UnaryOperator::Not, &Value::Integer(0), 1).is_err());
    /// ```
    pub fn eval_unary(op: UnaryOperator, value: &Value, line: usize) -> EvalResult<Value> {
        match op {
            UnaryOperator::Negate => match value {
                Value::Integer(n) => n.checked_neg()
                                      .map(Value::Integer)
                                      .ok_or(RuntimeError::Overflow { line }),
                Value::Bit(b) | Value::Boolean(b) => Ok(Value::Integer(-i64::from(*b))),
                Value::Decimal(d) => Ok(Value::Decimal(-d)),
                Value::Complex(c) => Ok(Value::Complex(-*c)),
                other => Ok(Value::Real(-to_real(other, line)?)),
            },
            UnaryOperator::Plus => match value {
                Value::Complex(c) => Ok(Value::Complex(*c)),
                other => Ok(Value::Real(to_real(other, line)?)),
            },
            UnaryOperator::Not => match value {
                Value::Boolean(b) => Ok(Value::Boolean(!b)),
                other => Err(RuntimeError::ExpectedBoolean { found: other.to_string(),
                                                             line }),
            },
        }
    }
}
