use crate::{
    ast::{BinaryOperator, Expr},
    interpreter::{
        evaluator::core::{Context, EvalResult},
        value::core::Value,
    },
};

impl Context {
    /// Evaluates a binary expression.
    ///
    /// `&&` and `||` stop after the left operand when it decides the result;
    /// every other operator evaluates both sides left to right.
    pub(crate) fn eval_binary_expr(&mut self,
                                   left: &Expr,
                                   op: BinaryOperator,
                                   right: &Expr,
                                   line: usize)
                                   -> EvalResult<Value> {
        let left = self.eval(left)?;
        if matches!(op, BinaryOperator::And | BinaryOperator::Or) {
            let decided = Self::expect_boolean(&left, line)?;
            if decided == (op == BinaryOperator::Or) {
                return Ok(Value::Boolean(decided));
            }
            let right = self.eval(right)?;
            return Ok(Value::Boolean(Self::expect_boolean(&right, line)?));
        }
        let right = self.eval(right)?;
        Self::eval_binary(op, &left, &right, line)
    }

    /// Evaluates a binary operation between two values.
    ///
    /// This function routes the operation to specialized handlers depending on
    /// the operator: arithmetic to `eval_arithmetic`, equality and ordering to
    /// `eval_comparison`, logical operators to `eval_logic`.
    ///
    /// # Example
    /// ```
    /// use nepa::{
    ///     ast::BinaryOperator,
    ///     interpreter::{evaluator::core::Context, value::core::Value},
    /// };
    ///
    /// let sum = Context::eval_binary(BinaryOperator::Add, &Value::Integer(3), &Value::Integer(4), 1);
    /// assert_eq!(sum.unwrap(), Value::Integer(7));
    ///
    /// let text = Context::eval_binary(BinaryOperator::Add,
    ///                                 &Value::String("n = ".into()),
    ///                                 &Value::Integer(4),
    ///                                 1);
    /// assert_eq!(text.unwrap(), Value::String("n = 4".into()));
    /// ```
    pub fn eval_binary(op: BinaryOperator, left: &Value, right: &Value, line: usize) -> EvalResult<Value> {
        use BinaryOperator::{
            Add, And, Div, Equal, Greater, GreaterEqual, Less, LessEqual, Mod, Mul, NotEqual, Or, Sub,
        };

        match op {
            Add | Sub | Mul | Div | Mod => Self::eval_arithmetic(op, left, right, line),
            Less | Greater | LessEqual | GreaterEqual | Equal | NotEqual => {
                Self::eval_comparison(op, left, right, line)
            },
            And | Or => Self::eval_logic(op, left, right, line),
        }
    }
}
