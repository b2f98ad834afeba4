use crate::interpreter::{
    evaluator::{
        core::EvalResult,
        function::core::{Arity, Builtin},
        utils::{invalid_argument, text_argument},
    },
    value::core::Value,
};

builtin_table! {
    "mayusculas" => { arity: Arity::Exact(1), func: Builtin::Pure(upper) },
    "minusculas" => { arity: Arity::Exact(1), func: Builtin::Pure(lower) },
    "recortar"   => { arity: Arity::Exact(1), func: Builtin::Pure(trim) },
    "dividir"    => { arity: Arity::OneOf(&[1, 2]), func: Builtin::Pure(split) },
}

/// Rebuilds a result of the same text kind as `original`.
fn same_kind(original: &Value, text: String) -> Value {
    match original {
        Value::Text(_) => Value::Text(text),
        _ => Value::String(text),
    }
}

/// `mayusculas(t)`. A character stays a character when it maps to one.
///
/// # Example
/// ```
/// use nepa::interpreter::{evaluator::function::text::upper, value::core::Value};
///
/// assert_eq!(upper(&[Value::String("ñandú".into())], 1).unwrap(), Value::String("ÑANDÚ".into()));
/// assert_eq!(upper(&[Value::Character('a')], 1).unwrap(), Value::Character('A'));
/// ```
pub fn upper(args: &[Value], line: usize) -> EvalResult<Value> {
    if let Value::Character(c) = args[0] {
        let mut mapped = c.to_uppercase();
        return Ok(match (mapped.next(), mapped.next()) {
                      (Some(single), None) => Value::Character(single),
                      _ => Value::String(c.to_uppercase().collect()),
                  });
    }
    let text = text_argument("mayusculas", args, 0, line)?;
    Ok(same_kind(&args[0], text.to_uppercase()))
}

/// `minusculas(t)`.
pub fn lower(args: &[Value], line: usize) -> EvalResult<Value> {
    if let Value::Character(c) = args[0] {
        let mut mapped = c.to_lowercase();
        return Ok(match (mapped.next(), mapped.next()) {
                      (Some(single), None) => Value::Character(single),
                      _ => Value::String(c.to_lowercase().collect()),
                  });
    }
    let text = text_argument("minusculas", args, 0, line)?;
    Ok(same_kind(&args[0], text.to_lowercase()))
}

/// `recortar(t)`: without leading and trailing whitespace.
pub fn trim(args: &[Value], line: usize) -> EvalResult<Value> {
    let text = text_argument("recortar", args, 0, line)?;
    Ok(same_kind(&args[0], text.trim().to_string()))
}

/// `dividir(t[, separador])`: a list of pieces. Without a separator the text
/// splits on runs of whitespace.
///
/// # Example
/// ```
/// use nepa::interpreter::{evaluator::function::text::split, value::core::Value};
///
/// let pieces = split(&[Value::String("a,b,,c".into()), Value::String(",".into())], 1).unwrap();
/// assert_eq!(pieces.to_string(), r#"["a", "b", "", "c"]"#);
///
/// let words = split(&[Value::String("  uno   dos ".into())], 1).unwrap();
/// assert_eq!(words.to_string(), r#"["uno", "dos"]"#);
/// ```
pub fn split(args: &[Value], line: usize) -> EvalResult<Value> {
    let text = text_argument("dividir", args, 0, line)?;
    let pieces: Vec<Value> = match args.get(1) {
        None => text.split_whitespace().map(|piece| Value::String(piece.to_string())).collect(),
        Some(separator) => {
            let separator = separator.text_form();
            if separator.is_empty() {
                return Err(invalid_argument("dividir", "el separador no puede estar vacío", line));
            }
            text.split(separator.as_str()).map(|piece| Value::String(piece.to_string())).collect()
        },
    };
    Ok(Value::List(pieces))
}
