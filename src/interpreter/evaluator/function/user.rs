use std::{collections::HashMap, mem};

use tracing::debug;

use crate::{
    ast::{FunctionDef, ReturnKind},
    error::RuntimeError,
    interpreter::{
        evaluator::core::{Context, EvalResult, Flow, MAX_CALL_DEPTH},
        value::core::{Kind, Value},
    },
};

impl Context {
    /// Calls a user-defined function.
    ///
    /// The body runs in a fresh frame holding only the parameters; globals,
    /// constants and the registry stay visible. The result is coerced into
    /// the function's inferred return kind, and a body that ends without
    /// `regresa` returns `0`.
    ///
    /// # Errors
    /// - `RecursionLimit` past [`MAX_CALL_DEPTH`] nested calls.
    /// - `ArgumentCountMismatch` when the argument count differs from the
    ///   parameter count.
    /// - `NestedInvocation` when the body reaches `ejecutar`.
    pub fn call_user_defined_function(&mut self,
                                      def: &FunctionDef,
                                      args: Vec<Value>,
                                      line: usize)
                                      -> EvalResult<Value> {
        if self.call_depth >= MAX_CALL_DEPTH {
            return Err(RuntimeError::RecursionLimit { limit: MAX_CALL_DEPTH,
                                                      line });
        }
        if args.len() != def.params.len() {
            return Err(RuntimeError::ArgumentCountMismatch { name: def.name.clone(),
                                                             expected: def.params.len().to_string(),
                                                             found: args.len(),
                                                             line });
        }

        let mut frame = HashMap::with_capacity(args.len());
        for (param, arg) in def.params.iter().zip(args) {
            let value = match &param.type_name {
                Some(type_name) => self.runtime
                                       .registry
                                       .construct(type_name, &param.name, Some(&arg))
                                       .map_err(|e| RuntimeError::registry(e, line))?,
                None => arg,
            };
            frame.insert(param.name.clone(), value);
        }

        debug!(function = %def.name, depth = self.call_depth + 1, "call");
        let saved_scopes = mem::replace(&mut self.scope_stack, vec![frame]);
        let saved_loops = mem::take(&mut self.loop_depth);
        self.call_depth += 1;
        let flow = self.exec_statements(&def.body.statements);
        self.call_depth -= 1;
        self.loop_depth = saved_loops;
        self.scope_stack = saved_scopes;

        match flow? {
            Flow::Return(value) => coerce_return(def.return_kind, value, line),
            Flow::Continue | Flow::Break => Ok(Value::Integer(0)),
            Flow::Invoke(_) => Err(RuntimeError::NestedInvocation { line }),
        }
    }
}

fn coerce_return(kind: ReturnKind, value: Value, line: usize) -> EvalResult<Value> {
    let target = match kind {
        ReturnKind::Integer => Kind::Integer,
        ReturnKind::Real => Kind::Real,
        ReturnKind::Text => Kind::String,
        ReturnKind::List => Kind::List,
        ReturnKind::Matrix => Kind::Matrix,
        ReturnKind::Dynamic => return Ok(value),
    };
    if value.kind() == target {
        return Ok(value);
    }
    Value::coerce_into(target, &value).map_err(|e| RuntimeError::conversion(e, line))
}
