use crate::{
    ast::{Accessor, AssignTarget, Expr},
    error::RuntimeError,
    interpreter::{
        evaluator::core::{Context, EvalResult},
        value::core::Value,
    },
    util::num::checked_index,
};

/// One evaluated step of an assignment path.
#[derive(Debug, Clone, PartialEq)]
pub enum Key {
    /// `[expresion]`, already evaluated.
    Index(Value),
    /// `.campo`
    Field(String),
}

impl Context {
    /// Reads `target[index]`.
    ///
    /// Lists yield elements, matrices rows, texts characters and
    /// dictionaries the value under the index's text form. Positions are
    /// 0-based.
    ///
    /// # Example
    /// ```
    /// use nepa::interpreter::{evaluator::core::Context, value::core::Value};
    ///
    /// let list = Value::List(vec![Value::Integer(10), Value::Integer(20)]);
    /// assert_eq!(Context::index_value(&list, &Value::Integer(1), 1).unwrap(), Value::Integer(20));
    /// assert!(Context::index_value(&list, &Value::Integer(2), 1).is_err());
    ///
    /// let text = Value::String("hola".into());
    /// assert_eq!(Context::index_value(&text, &Value::Integer(0), 1).unwrap(), Value::Character('h'));
    /// ```
    pub fn index_value(target: &Value, index: &Value, line: usize) -> EvalResult<Value> {
        match target {
            Value::List(items) => Ok(items[position(index, items.len(), line)?].clone()),
            Value::Matrix(rows) => Ok(Value::List(rows[position(index, rows.len(), line)?].clone())),
            Value::Text(text) | Value::String(text) => {
                let chars: Vec<char> = text.chars().collect();
                Ok(Value::Character(chars[position(index, chars.len(), line)?]))
            },
            Value::Dictionary(entries) => {
                let key = index.text_form();
                entries.get(&key)
                       .cloned()
                       .ok_or(RuntimeError::KeyNotFound { key, line })
            },
            other => Err(RuntimeError::NotIndexable { found: other.type_name().to_string(),
                                                      line }),
        }
    }

    /// Reads `target.field`, a dictionary key lookup.
    pub fn field_value(target: &Value, field: &str, line: usize) -> EvalResult<Value> {
        match target {
            Value::Dictionary(entries) => {
                entries.get(field)
                       .cloned()
                       .ok_or_else(|| RuntimeError::KeyNotFound { key: field.to_string(),
                                                                  line })
            },
            other => Err(RuntimeError::NotIndexable { found: other.type_name().to_string(),
                                                      line }),
        }
    }

    /// Evaluates the index expressions of an assignment path.
    pub(crate) fn eval_accessors(&mut self, steps: &[Accessor]) -> EvalResult<Vec<Key>> {
        steps.iter()
             .map(|step| match step {
                 Accessor::Index(expr) => self.eval(expr).map(Key::Index),
                 Accessor::Field(name) => Ok(Key::Field(name.clone())),
             })
             .collect()
    }

    /// Writes `value` at the end of `keys` inside `container`.
    ///
    /// Intermediate steps must exist; the last step may add a new dictionary
    /// key but never grows a list.
    ///
    /// # Example
    /// ```
    /// use nepa::interpreter::{
    ///     evaluator::{access::Key, core::Context},
    ///     value::core::Value,
    /// };
    ///
    /// let mut matrix = Value::Matrix(vec![vec![Value::Integer(1), Value::Integer(2)]]);
    /// Context::store_at(&mut matrix,
    ///                   &[Key::Index(Value::Integer(0)), Key::Index(Value::Integer(1))],
    ///                   Value::Integer(5),
    ///                   1).unwrap();
    /// assert_eq!(matrix.to_string(), "[[1, 5]]");
    /// ```
    pub fn store_at(container: &mut Value, keys: &[Key], value: Value, line: usize) -> EvalResult<()> {
        let Some((key, rest)) = keys.split_first() else {
            *container = value;
            return Ok(());
        };

        match (container, key) {
            (Value::List(items), Key::Index(index)) => {
                let slot = position(index, items.len(), line)?;
                Self::store_at(&mut items[slot], rest, value, line)
            },
            (Value::Matrix(rows), Key::Index(index)) => {
                let row = position(index, rows.len(), line)?;
                match rest.split_first() {
                    None => match value {
                        Value::List(cells) if cells.len() == rows[row].len() => {
                            rows[row] = cells;
                            Ok(())
                        },
                        other => Err(RuntimeError::mismatch(format!("'{other}' no es una fila válida"), line)),
                    },
                    Some((Key::Index(column), tail)) => {
                        let cells = &mut rows[row];
                        let column = position(column, cells.len(), line)?;
                        Self::store_at(&mut cells[column], tail, value, line)
                    },
                    Some((Key::Field(_), _)) => {
                        Err(RuntimeError::NotIndexable { found: "fila de matriz".to_string(),
                                                         line })
                    },
                }
            },
            (Value::Dictionary(entries), key) => {
                let name = match key {
                    Key::Index(index) => index.text_form(),
                    Key::Field(field) => field.clone(),
                };
                if rest.is_empty() {
                    entries.insert(name, value);
                    return Ok(());
                }
                let slot = entries.get_mut(&name)
                                  .ok_or(RuntimeError::KeyNotFound { key: name, line })?;
                Self::store_at(slot, rest, value, line)
            },
            (other, _) => Err(RuntimeError::NotIndexable { found: other.type_name().to_string(),
                                                           line }),
        }
    }
}

/// The assignment target an expression denotes, if it denotes a place.
pub(crate) fn place_of(expr: &Expr) -> Option<AssignTarget> {
    let mut steps = Vec::new();
    let mut current = expr;
    loop {
        match current {
            Expr::Variable { name, .. } => {
                if steps.is_empty() {
                    return Some(AssignTarget::Variable(name.clone()));
                }
                steps.reverse();
                return Some(AssignTarget::Path { root: name.clone(),
                                                 steps });
            },
            Expr::Index { target, index, .. } => {
                steps.push(Accessor::Index((**index).clone()));
                current = target;
            },
            Expr::Field { target, field, .. } => {
                steps.push(Accessor::Field(field.clone()));
                current = target;
            },
            _ => return None,
        }
    }
}

fn position(index: &Value, len: usize, line: usize) -> EvalResult<usize> {
    let index = index.to_integer()
                     .map_err(|e| RuntimeError::conversion(e, line))?;
    checked_index(index, len).ok_or(RuntimeError::IndexOutOfBounds { index, len, line })
}
