use ordered_float::OrderedFloat;

use crate::{
    error::RuntimeError,
    interpreter::{
        evaluator::{
            core::EvalResult,
            function::core::{Arity, Builtin},
            utils::{invalid_argument, to_integer},
        },
        value::core::Value,
    },
};

builtin_table! {
    "agregar"  => { arity: Arity::AtLeast(2), func: Builtin::Pure(append) },
    "claves"   => { arity: Arity::Exact(1), func: Builtin::Pure(keys) },
    "valores"  => { arity: Arity::Exact(1), func: Builtin::Pure(values) },
    "contiene" => { arity: Arity::Exact(2), func: Builtin::Pure(contains) },
    "ordenar"  => { arity: Arity::Exact(1), func: Builtin::Pure(sort) },
    "rango"    => { arity: Arity::OneOf(&[1, 2, 3]), func: Builtin::Pure(range) },
}

/// Upper bound on the length of a list built by `rango`.
const MAX_RANGE_LEN: usize = 1 << 24;

/// `agregar(lista, x, ...)`: the list with the values appended.
///
/// Called on a variable, the variable itself is updated.
///
/// # Example
/// ```
/// use nepa::interpreter::{evaluator::function::collections::append, value::core::Value};
///
/// let list = Value::List(vec![Value::Integer(1)]);
/// assert_eq!(append(&[list, Value::Integer(2)], 1).unwrap(),
///            Value::List(vec![Value::Integer(1), Value::Integer(2)]));
/// ```
pub fn append(args: &[Value], line: usize) -> EvalResult<Value> {
    match &args[0] {
        Value::List(items) => {
            let mut items = items.clone();
            items.extend_from_slice(&args[1..]);
            Ok(Value::List(items))
        },
        other => Err(invalid_argument("agregar",
                                      format!("se esperaba una lista, se recibió {}", other.type_name()),
                                      line)),
    }
}

/// `claves(diccionario)`: the keys, sorted.
pub fn keys(args: &[Value], line: usize) -> EvalResult<Value> {
    match &args[0] {
        Value::Dictionary(entries) => Ok(Value::List(entries.keys().cloned().map(Value::String).collect())),
        other => Err(expected_dictionary("claves", other, line)),
    }
}

/// `valores(diccionario)`: the values, in key order.
pub fn values(args: &[Value], line: usize) -> EvalResult<Value> {
    match &args[0] {
        Value::Dictionary(entries) => Ok(Value::List(entries.values().cloned().collect())),
        other => Err(expected_dictionary("valores", other, line)),
    }
}

/// `contiene(coleccion, x)`: list membership, dictionary key or substring.
///
/// # Example
/// ```
/// use nepa::interpreter::{evaluator::function::collections::contains, value::core::Value};
///
/// let text = Value::String("murciélago".into());
/// assert_eq!(contains(&[text, Value::String("cié".into())], 1).unwrap(), Value::Boolean(true));
///
/// let list = Value::List(vec![Value::Integer(1)]);
/// assert_eq!(contains(&[list, Value::Real(1.0)], 1).unwrap(), Value::Boolean(false));
/// ```
pub fn contains(args: &[Value], line: usize) -> EvalResult<Value> {
    let needle = &args[1];
    let found = match &args[0] {
        Value::List(items) => items.contains(needle),
        Value::Dictionary(entries) => entries.contains_key(&needle.text_form()),
        Value::Text(text) | Value::String(text) => text.contains(&needle.text_form()),
        other => {
            return Err(invalid_argument("contiene",
                                        format!("un valor {} no es una colección", other.type_name()),
                                        line));
        },
    };
    Ok(Value::Boolean(found))
}

/// `ordenar(lista)`: a sorted copy.
///
/// Lists of numbers sort numerically with a total order on reals; any
/// other list sorts by the text form of its elements. The sort is stable.
///
/// # Example
/// ```
/// use nepa::interpreter::{evaluator::function::collections::sort, value::core::Value};
///
/// let list = Value::List(vec![Value::Real(2.5), Value::Integer(-1), Value::Integer(2)]);
/// assert_eq!(sort(&[list], 1).unwrap().to_string(), "[-1, 2, 2.5]");
/// ```
pub fn sort(args: &[Value], line: usize) -> EvalResult<Value> {
    let Value::List(items) = &args[0] else {
        return Err(invalid_argument("ordenar",
                                    format!("se esperaba una lista, se recibió {}", args[0].type_name()),
                                    line));
    };

    let mut items = items.clone();
    let numeric: Option<Vec<OrderedFloat<f64>>> = items.iter()
                                                       .map(|item| match item {
                                                           Value::Integer(_)
                                                           | Value::Real(_)
                                                           | Value::Decimal(_)
                                                           | Value::Bit(_)
                                                           | Value::Boolean(_) => {
                                                               item.to_real().ok().map(OrderedFloat)
                                                           },
                                                           _ => None,
                                                       })
                                                       .collect();
    match numeric {
        Some(sort_keys) => {
            let mut keyed: Vec<(OrderedFloat<f64>, Value)> = sort_keys.into_iter().zip(items).collect();
            keyed.sort_by_key(|(key, _)| *key);
            items = keyed.into_iter().map(|(_, item)| item).collect();
        },
        None => items.sort_by_cached_key(Value::text_form),
    }
    Ok(Value::List(items))
}

/// `rango(fin)`, `rango(inicio, fin)` or `rango(inicio, fin, paso)`: the
/// integers from `inicio` (default `0`) up to, not including, `fin`.
///
/// # Example
/// ```
/// use nepa::interpreter::{evaluator::function::collections::range, value::core::Value};
///
/// assert_eq!(range(&[Value::Integer(3)], 1).unwrap().to_string(), "[0, 1, 2]");
/// assert_eq!(range(&[Value::Integer(5), Value::Integer(0), Value::Integer(-2)], 1).unwrap()
///                                                                                 .to_string(),
///            "[5, 3, 1]");
/// assert!(range(&[Value::Integer(0), Value::Integer(3), Value::Integer(0)], 1).is_err());
/// ```
pub fn range(args: &[Value], line: usize) -> EvalResult<Value> {
    let bounds = args.iter()
                     .map(|arg| to_integer(arg, line))
                     .collect::<EvalResult<Vec<i64>>>()?;
    let (start, end, step) = match bounds.as_slice() {
        [end] => (0, *end, 1),
        [start, end] => (*start, *end, 1),
        [start, end, step] => (*start, *end, *step),
        _ => return Err(invalid_argument("rango", "se esperaban de 1 a 3 argumentos", line)),
    };
    if step == 0 {
        return Err(invalid_argument("rango", "el incremento no puede ser cero", line));
    }

    let mut items = Vec::new();
    let mut current = start;
    while (step > 0 && current < end) || (step < 0 && current > end) {
        if items.len() >= MAX_RANGE_LEN {
            return Err(invalid_argument("rango", "el rango es demasiado grande", line));
        }
        items.push(Value::Integer(current));
        current = match current.checked_add(step) {
            Some(next) => next,
            None => break,
        };
    }
    Ok(Value::List(items))
}

fn expected_dictionary(name: &str, found: &Value, line: usize) -> RuntimeError {
    invalid_argument(name,
                     format!("se esperaba un diccionario, se recibió {}", found.type_name()),
                     line)
}
