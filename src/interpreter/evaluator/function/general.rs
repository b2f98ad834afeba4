use crate::{
    error::RuntimeError,
    interpreter::{
        evaluator::{
            core::{Context, EvalResult},
            function::core::{Arity, Builtin},
            utils::{invalid_argument, text_argument},
        },
        value::core::Value,
    },
};

builtin_table! {
    "tipo"     => { arity: Arity::Exact(1), func: Builtin::Pure(type_of) },
    "longitud" => { arity: Arity::Exact(1), func: Builtin::Pure(length) },
    "afirmar"  => { arity: Arity::Exact(1), func: Builtin::Pure(assert) },
    "a_json"   => { arity: Arity::Exact(1), func: Builtin::Pure(to_json) },
    "existe"   => { arity: Arity::Exact(1), func: Builtin::Contextual(exists) },
    "eliminar" => { arity: Arity::Exact(1), func: Builtin::Contextual(delete) },
}

/// `tipo(x)`: the runtime type name of `x`.
///
/// # Example
/// ```
/// use nepa::interpreter::{evaluator::function::general::type_of, value::core::Value};
///
/// assert_eq!(type_of(&[Value::Real(1.5)], 1).unwrap(), Value::String("real".into()));
/// ```
pub fn type_of(args: &[Value], _line: usize) -> EvalResult<Value> {
    Ok(Value::String(args[0].type_name().to_string()))
}

/// `longitud(x)`: characters of a text, elements of a list, rows of a
/// matrix or entries of a dictionary.
///
/// # Example
/// ```
/// use nepa::interpreter::{evaluator::function::general::length, value::core::Value};
///
/// assert_eq!(length(&[Value::String("año".into())], 1).unwrap(), Value::Integer(3));
/// assert!(length(&[Value::Integer(7)], 1).is_err());
/// ```
pub fn length(args: &[Value], line: usize) -> EvalResult<Value> {
    let len = match &args[0] {
        Value::Text(text) | Value::String(text) => text.chars().count(),
        Value::List(items) => items.len(),
        Value::Matrix(rows) => rows.len(),
        Value::Dictionary(entries) => entries.len(),
        other => {
            return Err(invalid_argument("longitud",
                                        format!("un valor {} no tiene longitud", other.type_name()),
                                        line));
        },
    };
    i64::try_from(len).map(Value::Integer)
                      .map_err(|_| RuntimeError::Overflow { line })
}

/// `afirmar(condicion)`: fails unless the condition is true.
pub fn assert(args: &[Value], line: usize) -> EvalResult<Value> {
    let holds = args[0].to_boolean()
                       .map_err(|e| RuntimeError::conversion(e, line))?;
    if holds {
        Ok(Value::Boolean(true))
    } else {
        Err(RuntimeError::AssertionFailed { line })
    }
}

/// `a_json(x)`: the JSON text of `x`.
///
/// # Example
/// ```
/// use nepa::interpreter::{evaluator::function::general::to_json, value::core::Value};
///
/// let list = Value::List(vec![Value::Integer(1), Value::String("a".into())]);
/// assert_eq!(to_json(&[list], 1).unwrap(), Value::String(r#"[1,"a"]"#.into()));
/// ```
pub fn to_json(args: &[Value], line: usize) -> EvalResult<Value> {
    serde_json::to_string(&args[0].to_json()).map(Value::String)
                                             .map_err(|e| invalid_argument("a_json", e.to_string(), line))
}

/// `existe("nombre")`: whether a binding with that name is visible.
pub fn exists(context: &mut Context, args: &[Value], line: usize) -> EvalResult<Value> {
    let name = text_argument("existe", args, 0, line)?;
    Ok(Value::Boolean(context.lookup(name).is_some() || context.functions.contains_key(name)))
}

/// `eliminar("nombre")`: removes a variable from the innermost scope that
/// holds it, the globals or the registry, and returns its last value.
pub fn delete(context: &mut Context, args: &[Value], line: usize) -> EvalResult<Value> {
    let name = text_argument("eliminar", args, 0, line)?;
    if context.constants.contains_key(name) {
        return Err(RuntimeError::AssignmentToConstant { name: name.to_string(),
                                                        line });
    }

    let local = context.scope_stack
                       .iter_mut()
                       .rev()
                       .find_map(|scope| scope.remove(name));
    // Top-level variables are mirrored in the registry; drop both copies.
    let registered = context.runtime.registry.delete(name).ok();
    let global = context.globals.write().remove(name);

    local.or(registered)
         .or(global)
         .ok_or_else(|| RuntimeError::UnknownIdentifier { name: name.to_string(),
                                                          line })
}
