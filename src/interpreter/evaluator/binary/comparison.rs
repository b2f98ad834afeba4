use std::cmp::Ordering;

use crate::{
    ast::BinaryOperator,
    error::RuntimeError,
    interpreter::{
        evaluator::core::{Context, EvalResult},
        value::core::{Value, parse_numeric},
    },
};

impl Context {
    /// Evaluates a comparison of the form `Value <Operator> Value`.
    ///
    /// `==` and `!=` use structural equality without coercion. Ordering
    /// compares two integer-kinded values exactly as integers, two numeric
    /// texts as numbers and other text pairs lexicographically. Characters,
    /// dates, times and durations compare with their own kind; everything
    /// else is compared after conversion to real.
    ///
    /// # Example
    /// ```
    /// use nepa::{
    ///     ast::BinaryOperator,
    ///     interpreter::{evaluator::core::Context, value::core::Value},
    /// };
    ///
    /// let less = Context::eval_comparison(BinaryOperator::Less, &Value::Real(3.0), &Value::Integer(5), 1);
    /// assert_eq!(less.unwrap(), Value::Boolean(true));
    ///
    /// let equal = Context::eval_comparison(BinaryOperator::Equal, &Value::Real(1.0), &Value::Integer(1), 1);
    /// assert_eq!(equal.unwrap(), Value::Boolean(false));
    ///
    /// let text = Context::eval_comparison(BinaryOperator::Greater,
    ///                                     &Value::String("10".into()),
    ///                                     &Value::String("9".into()),
    ///                                     1);
    /// assert_eq!(text.unwrap(), Value::Boolean(true));
    /// ```
    pub fn eval_comparison(op: BinaryOperator,
                           left: &Value,
                           right: &Value,
                           line: usize)
                           -> EvalResult<Value> {
        use BinaryOperator::{Equal, Greater, GreaterEqual, Less, LessEqual, NotEqual};

        let ordering = match op {
            Equal => return Ok(Value::Boolean(left == right)),
            NotEqual => return Ok(Value::Boolean(left != right)),
            _ => Self::order(left, right, line)?,
        };
        let result = match op {
            Less => ordering == Ordering::Less,
            Greater => ordering == Ordering::Greater,
            LessEqual => ordering != Ordering::Greater,
            GreaterEqual => ordering != Ordering::Less,
            other => return Err(RuntimeError::mismatch(format!("'{other}' no es una comparación"), line)),
        };
        Ok(Value::Boolean(result))
    }

    fn order(left: &Value, right: &Value, line: usize) -> EvalResult<Ordering> {
        let incomparable = || {
            RuntimeError::mismatch(format!("no se puede comparar {} con {}",
                                           left.type_name(),
                                           right.type_name()),
                                   line)
        };

        if let (Some(a), Some(b)) = (left.as_integer(), right.as_integer()) {
            return Ok(a.cmp(&b));
        }

        match (left, right) {
            (Value::Character(a), Value::Character(b)) => return Ok(a.cmp(b)),
            (Value::Date(a), Value::Date(b)) => return Ok(a.cmp(b)),
            (Value::Time(a), Value::Time(b)) => return Ok(a.cmp(b)),
            (Value::Duration(a), Value::Duration(b)) => return Ok(a.cmp(b)),
            _ => {},
        }

        if let (Some(a), Some(b)) = (left.as_str(), right.as_str()) {
            return Ok(match (parse_numeric(a.trim()), parse_numeric(b.trim())) {
                          (Some(x), Some(y)) => x.partial_cmp(&y).ok_or_else(incomparable)?,
                          _ => a.cmp(b),
                      });
        }

        let a = left.to_real().map_err(|_| incomparable())?;
        let b = right.to_real().map_err(|_| incomparable())?;
        a.partial_cmp(&b).ok_or_else(incomparable)
    }
}
