use std::collections::BTreeMap;

use crate::{
    error::ConversionError,
    interpreter::value::{
        complex::ComplexNumber,
        core::{Kind, Pointer, TEXT_CAPACITY, Value, parse_boolean_word},
        literal::parse_valor,
        temporal::{Date, Duration, TimeOfDay},
    },
};

impl Value {
    /// The value a declaration without initializer starts with.
    ///
    /// # Example
    /// ```
    /// use nepa::interpreter::value::core::{Kind, Value};
    ///
    /// assert_eq!(Value::default_of(Kind::Integer), Value::Integer(0));
    /// assert_eq!(Value::default_of(Kind::Text), Value::Text(String::new()));
    /// assert!(Value::default_of(Kind::Pointer).is_null());
    /// ```
    #[must_use]
    pub fn default_of(kind: Kind) -> Self {
        match kind {
            Kind::Bit => Self::Bit(false),
            Kind::Boolean => Self::Boolean(false),
            Kind::Integer => Self::Integer(0),
            Kind::Real => Self::Real(0.0),
            Kind::Decimal => Self::Decimal(0.0),
            Kind::Character => Self::Character(' '),
            Kind::Text => Self::Text(String::new()),
            Kind::String => Self::String(String::new()),
            Kind::Complex => Self::Complex(ComplexNumber::new(0.0, 0.0)),
            Kind::Date => Self::Date(Date { year:  1970,
                                            month: 1,
                                            day:   1,
                                            time:  None, }),
            Kind::Time => Self::Time(TimeOfDay { hour:   0,
                                                 minute: 0,
                                                 second: 0, }),
            Kind::Duration => Self::Duration(Duration::default()),
            Kind::List => Self::List(Vec::new()),
            Kind::Matrix => Self::Matrix(Vec::new()),
            Kind::Dictionary => Self::Dictionary(BTreeMap::new()),
            Kind::Object => Self::Object(None),
            Kind::Pointer => Self::Pointer(Pointer::Null),
        }
    }

    /// Builds a value of `kind`, optionally coerced from `initial`.
    pub fn construct(kind: Kind, initial: Option<&Self>) -> Result<Self, ConversionError> {
        match initial {
            Some(source) => Self::coerce_into(kind, source),
            None => Ok(Self::default_of(kind)),
        }
    }

    /// Replaces this value with `source` coerced into this value's kind.
    ///
    /// The kind never changes: when the coercion policy of the current kind
    /// rejects `source`, the value is left untouched and the error returned.
    ///
    /// # Example
    /// ```
    /// use nepa::interpreter::value::core::Value;
    ///
    /// let mut flag = Value::Bit(false);
    /// flag.assign_from_any(&Value::String("verdadero".into())).unwrap();
    /// assert_eq!(flag, Value::Bit(true));
    /// assert!(flag.assign_from_any(&Value::Integer(7)).is_err());
    /// assert_eq!(flag, Value::Bit(true));
    /// ```
    pub fn assign_from_any(&mut self, source: &Self) -> Result<(), ConversionError> {
        *self = Self::coerce_into(self.kind(), source)?;
        Ok(())
    }

    /// Coerces `source` into `kind` following that kind's policy.
    pub fn coerce_into(kind: Kind, source: &Self) -> Result<Self, ConversionError> {
        let reject = |hint: &str| ConversionError::new(source.to_string(), kind.name(), hint);

        match kind {
            Kind::Bit | Kind::Boolean => {
                let flag = match source {
                    Self::Bit(b) | Self::Boolean(b) => Some(*b),
                    Self::Integer(0) => Some(false),
                    Self::Integer(1) => Some(true),
                    Self::Text(s) | Self::String(s) => parse_boolean_word(s),
                    _ => None,
                };
                let flag = flag.ok_or_else(|| reject("solo acepta 0, 1, verdadero o falso"))?;
                Ok(if kind == Kind::Bit { Self::Bit(flag) } else { Self::Boolean(flag) })
            },
            Kind::Integer => source.to_integer().map(Self::Integer),
            Kind::Real => source.to_real().map(Self::Real),
            Kind::Decimal => source.to_real().map(Self::Decimal),
            Kind::Character => match source {
                Self::Character(c) => Ok(Self::Character(*c)),
                Self::Text(s) | Self::String(s) => {
                    let mut chars = s.chars();
                    match (chars.next(), chars.next()) {
                        (Some(c), None) => Ok(Self::Character(c)),
                        _ => Err(reject("se esperaba exactamente un carácter")),
                    }
                },
                _ => Err(reject("se esperaba exactamente un carácter")),
            },
            Kind::Text => {
                let text = source.text_form();
                if text.chars().count() > TEXT_CAPACITY {
                    return Err(ConversionError::new(format!("{}...",
                                                            text.chars().take(20).collect::<String>()),
                                                    kind.name(),
                                                    format!("admite hasta {TEXT_CAPACITY} caracteres")));
                }
                Ok(Self::Text(text))
            },
            Kind::String => Ok(Self::String(source.text_form())),
            Kind::Complex => match source {
                Self::Complex(c) => Ok(Self::Complex(*c)),
                Self::Text(s) | Self::String(s) => s.parse().map(Self::Complex),
                other => other.to_real()
                              .map(|real| Self::Complex(ComplexNumber::from(real)))
                              .map_err(|_| reject("use la forma a+bi")),
            },
            Kind::Date => match source {
                Self::Date(d) => Ok(Self::Date(*d)),
                Self::Text(s) | Self::String(s) => s.trim().parse().map(Self::Date),
                _ => Err(reject("use el formato AAAA-MM-DD")),
            },
            Kind::Time => match source {
                Self::Time(t) => Ok(Self::Time(*t)),
                Self::Date(Date { time: Some(time), .. }) => Ok(Self::Time(*time)),
                Self::Text(s) | Self::String(s) => s.trim().parse().map(Self::Time),
                _ => Err(reject("use el formato HH:MM:SS")),
            },
            Kind::Duration => match source {
                Self::Duration(d) => Ok(Self::Duration(*d)),
                Self::Integer(seconds) => Ok(Self::Duration(Duration::from_seconds(*seconds))),
                Self::Text(s) | Self::String(s) => s.parse().map(Self::Duration),
                _ => Err(reject("use unidades h, m y s, por ejemplo 2h30m")),
            },
            Kind::List => match source {
                Self::List(items) => Ok(Self::List(items.clone())),
                Self::Matrix(rows) => Ok(Self::List(rows.iter().cloned().map(Self::List).collect())),
                Self::Text(s) | Self::String(s) => match parse_valor(s) {
                    list @ Self::List(_) => Ok(list),
                    _ => Err(reject("se esperaba una lista [a, b, ...]")),
                },
                _ => Err(reject("se esperaba una lista [a, b, ...]")),
            },
            Kind::Matrix => {
                let rows = match source {
                    Self::Matrix(rows) => rows.clone(),
                    Self::List(items) => list_rows(items).ok_or_else(|| {
                                                             reject("se esperaba una lista de filas")
                                                         })?,
                    Self::Text(s) | Self::String(s) => match parse_valor(s) {
                        Self::List(items) => list_rows(&items).ok_or_else(|| {
                                                                  reject("se esperaba una lista de filas")
                                                              })?,
                        _ => return Err(reject("se esperaba [[a, b], [c, d]]")),
                    },
                    _ => return Err(reject("se esperaba [[a, b], [c, d]]")),
                };
                validate_matrix(&rows).map_err(|hint| reject(hint))?;
                Ok(Self::Matrix(rows))
            },
            Kind::Dictionary => match source {
                Self::Dictionary(entries) => Ok(Self::Dictionary(entries.clone())),
                _ => Err(reject("solo acepta un diccionario")),
            },
            Kind::Object => match source {
                Self::Object(object) => Ok(Self::Object(object.clone())),
                Self::Pointer(Pointer::Null) => Ok(Self::Object(None)),
                _ => Err(reject("solo acepta un objeto o nulo")),
            },
            Kind::Pointer => match source {
                Self::Pointer(pointer) => Ok(Self::Pointer(pointer.clone())),
                Self::Object(None) => Ok(Self::Pointer(Pointer::Null)),
                _ => Err(reject("use &variable o nulo")),
            },
        }
    }
}

fn list_rows(items: &[Value]) -> Option<Vec<Vec<Value>>> {
    items.iter()
         .map(|item| match item {
             Value::List(row) => Some(row.clone()),
             _ => None,
         })
         .collect()
}

/// Checks that rows are equally long and hold only numeric values.
fn validate_matrix(rows: &[Vec<Value>]) -> Result<(), &'static str> {
    let width = rows.first().map_or(0, Vec::len);
    if rows.iter().any(|row| row.len() != width) {
        return Err("todas las filas deben tener la misma longitud");
    }
    let numeric = rows.iter().flatten().all(|cell| {
                                           matches!(cell,
                                                    Value::Integer(_)
                                                    | Value::Real(_)
                                                    | Value::Decimal(_)
                                                    | Value::Bit(_)
                                                    | Value::Complex(_))
                                       });
    if numeric { Ok(()) } else { Err("los elementos deben ser numéricos") }
}
