use tracing::trace;

use crate::{
    ast::{Block, Expr, ForSource},
    error::RuntimeError,
    interpreter::{
        evaluator::core::{Context, EvalResult, Flow},
        value::core::Value,
    },
    util::num::f64_to_i64_exact,
};

impl Context {
    /// Executes a `para` loop.
    ///
    /// Two forms are supported:
    ///
    /// 1. **Range form:** `para i desde a hasta b [incremento c]`. The start is
    ///    evaluated once; the end and the increment are evaluated again before
    ///    every pass, so a loop may chase a bound the body changes. Without an
    ///    increment the direction is fixed on the first pass (`-1` when the
    ///    start is above the end, `+1` otherwise). The loop stops once the
    ///    counter passes the freshly evaluated end. An increment of zero is
    ///    an error raised before the body runs.
    ///
    /// 2. **Collection form:** `para x en fuente`. Texts yield their
    ///    characters, lists their elements, matrices their rows and
    ///    dictionaries their keys only. Objects that can be iterated are
    ///    pulled one value at a time; the iterator is released on every exit
    ///    path. Any other value runs the body once with that value.
    ///
    /// `rompe` ends the loop and `regresa` propagates out of it. An
    /// `ejecutar` in the body runs through the context's invoker and the
    /// iteration carries on.
    ///
    /// # Example
    /// ```
    /// use std::sync::Arc;
    ///
    /// use nepa::interpreter::{
    ///     evaluator::{
    ///         core::{Context, Runtime},
    ///         function::print::PrintHandler,
    ///     },
    ///     parser::block::parse_program,
    /// };
    ///
    /// let output = PrintHandler::buffer();
    /// let runtime = Arc::new(Runtime::new(output.clone()));
    /// let mut context = Context::new(runtime, Default::default());
    /// let (program, _) = parse_program("para i desde 3 hasta 1:\n    imprimir i\n", &[]);
    /// context.exec_statements(&program.statements).unwrap();
    /// assert_eq!(output.lines(), ["3", "2", "1"]);
    /// ```
    pub fn eval_for(&mut self,
                    variable: &str,
                    source: &ForSource,
                    body: &Block,
                    line: usize)
                    -> EvalResult<Flow> {
        self.in_loop(|context| match source {
                ForSource::Range { start, end, step } => {
                    context.eval_range(variable, start, end, step.as_ref(), body, line)
                },
                ForSource::Collection(expr) => context.eval_collection(variable, expr, body, line),
            })
    }

    fn eval_range(&mut self,
                  variable: &str,
                  start: &Expr,
                  end: &Expr,
                  step: Option<&Expr>,
                  body: &Block,
                  line: usize)
                  -> EvalResult<Flow> {
        let start = self.eval(start)?;
        let mut current = range_bound(&start, "inicio", line)?;
        let integral_start = start.is_integer_kind();
        let mut direction = None;

        loop {
            let end = range_bound(&self.eval(end)?, "fin", line)?;
            let (step, integral_step) = match step {
                Some(expr) => {
                    let value = self.eval(expr)?;
                    (range_bound(&value, "incremento", line)?, value.is_integer_kind())
                },
                None => (*direction.get_or_insert(if current > end { -1.0 } else { 1.0 }), true),
            };
            if step == 0.0 {
                return Err(RuntimeError::ZeroStep { line });
            }
            if (step > 0.0 && current > end) || (step < 0.0 && current < end) {
                return Ok(Flow::Continue);
            }

            trace!(variable, current, end, step, "range pass");
            let value = match f64_to_i64_exact(current) {
                Some(integer) if integral_start && integral_step => Value::Integer(integer),
                _ => Value::Real(current),
            };
            self.bind_loop_variable(variable, value);

            match self.exec_block(body)? {
                Flow::Continue => {},
                Flow::Break => return Ok(Flow::Continue),
                other => return Ok(other),
            }
            current += step;
        }
    }

    fn eval_collection(&mut self,
                       variable: &str,
                       expr: &Expr,
                       body: &Block,
                       line: usize)
                       -> EvalResult<Flow> {
        let source = self.eval(expr)?;
        let source = self.deref_if_pointer(source, line)?;

        let items: Vec<Value> = match source {
            Value::Text(text) | Value::String(text) => text.chars().map(Value::Character).collect(),
            Value::List(items) => items,
            Value::Matrix(rows) => rows.into_iter().map(Value::List).collect(),
            Value::Dictionary(entries) => entries.into_keys().map(Value::String).collect(),
            Value::Object(Some(object)) => match object.iterate() {
                Some(opened) => {
                    let mut iterator = opened.map_err(|source| RuntimeError::Io { path: object.describe(),
                                                                                   source,
                                                                                   line })?;
                    while let Some(item) =
                        iterator.pull()
                                .map_err(|source| RuntimeError::Io { path: object.describe(),
                                                                     source,
                                                                     line })?
                    {
                        trace!(variable, "external iterator pass");
                        self.bind_loop_variable(variable, item);
                        match self.exec_block(body)? {
                            Flow::Continue => {},
                            Flow::Break => break,
                            other => return Ok(other),
                        }
                    }
                    return Ok(Flow::Continue);
                },
                None => vec![Value::Object(Some(object))],
            },
            single => vec![single],
        };

        for item in items {
            trace!(variable, "collection pass");
            self.bind_loop_variable(variable, item);
            match self.exec_block(body)? {
                Flow::Continue => {},
                Flow::Break => break,
                other => return Ok(other),
            }
        }
        Ok(Flow::Continue)
    }

    /// Binds the loop variable without coercion: an existing local binding
    /// is overwritten, otherwise the variable lives in the enclosing scope.
    fn bind_loop_variable(&mut self, name: &str, value: Value) {
        match self.local_mut(name) {
            Some(slot) => *slot = value,
            None => self.define_local(name, value),
        }
    }
}

fn range_bound(value: &Value, which: &str, line: usize) -> EvalResult<f64> {
    value.to_real()
         .map_err(|e| RuntimeError::InvalidRangeBound { details: format!("{which}: {e}"),
                                                        line })
}
