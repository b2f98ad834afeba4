use std::collections::BTreeMap;

use crate::{
    interpreter::value::core::{Value, parse_numeric},
    util::split::{is_balanced, split_top_level},
};

/// Parses literal text into a value.
///
/// The attempts run in a fixed order: boolean words, `nulo`, integer, real,
/// quoted text, bracketed list (elements parsed recursively), braced
/// dictionary, and finally the raw text itself as a `cadena`. The order
/// matters: `"123"` with quotes is text while `123` is an integer.
///
/// Used for command-line program arguments, for declaration initializers that
/// are not expressions, and by list/matrix coercion from text.
///
/// # Example
/// ```
/// use nepa::interpreter::value::{core::Value, literal::parse_valor};
///
/// assert_eq!(parse_valor("verdadero"), Value::Boolean(true));
/// assert_eq!(parse_valor("123"), Value::Integer(123));
/// assert_eq!(parse_valor("\"123\""), Value::String("123".into()));
/// assert_eq!(parse_valor("2.5"), Value::Real(2.5));
/// assert_eq!(parse_valor("[1, [2, 3]]"),
///            Value::List(vec![Value::Integer(1),
///                             Value::List(vec![Value::Integer(2), Value::Integer(3)])]));
/// assert_eq!(parse_valor("hola mundo"), Value::String("hola mundo".into()));
/// ```
#[must_use]
pub fn parse_valor(text: &str) -> Value {
    let text = text.trim();

    match text {
        "verdadero" | "true" => return Value::Boolean(true),
        "falso" | "false" => return Value::Boolean(false),
        "nulo" => return Value::Object(None),
        _ => {},
    }

    if let Ok(integer) = text.parse::<i64>() {
        return Value::Integer(integer);
    }
    if let Some(real) = parse_numeric(text) {
        return Value::Real(real);
    }
    if let Some(content) = quoted_literal(text) {
        return Value::String(content);
    }
    if let Some(inner) = enclosed(text, '[', ']') {
        return Value::List(split_top_level(inner, ",").into_iter().map(parse_valor).collect());
    }
    if let Some(inner) = enclosed(text, '{', '}')
       && let Some(entries) = parse_entries(inner)
    {
        return Value::Dictionary(entries);
    }

    Value::String(text.to_string())
}

/// Returns the unescaped content of a single `"..."` literal spanning all of
/// `text`, or `None` if `text` is anything else.
fn quoted_literal(text: &str) -> Option<String> {
    let inner = text.strip_prefix('"')?.strip_suffix('"')?;
    let mut content = String::new();
    let mut chars = inner.chars();

    while let Some(ch) = chars.next() {
        match ch {
            '"' => return None,
            '\\' => match chars.next()? {
                'n' => content.push('\n'),
                't' => content.push('\t'),
                other => content.push(other),
            },
            _ => content.push(ch),
        }
    }
    Some(content)
}

fn enclosed(text: &str, open: char, close: char) -> Option<&str> {
    let inner = text.strip_prefix(open)?.strip_suffix(close)?;
    is_balanced(text).then_some(inner)
}

fn parse_entries(inner: &str) -> Option<BTreeMap<String, Value>> {
    let mut entries = BTreeMap::new();
    for entry in split_top_level(inner, ",") {
        let [key, value] = split_top_level(entry, ":")[..] else {
            return None;
        };
        entries.insert(parse_valor(key).text_form(), parse_valor(value));
    }
    Some(entries)
}
