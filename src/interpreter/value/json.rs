use serde_json::{Map, Number, Value as Json, json};

use crate::interpreter::value::{
    complex::ComplexNumber,
    core::{Pointer, Value},
};

impl Value {
    /// Serializes the value into JSON.
    ///
    /// Bits become `0`/`1`, non-finite reals become `null`, dates, times and
    /// durations become their display strings, complex numbers become
    /// `{"real": .., "imaginario": ..}` and pointers `{"puntero": ..}`.
    /// Objects serialize as their description; `nulo` as `null`.
    ///
    /// # Example
    /// ```
    /// use nepa::interpreter::value::{complex::ComplexNumber, core::Value};
    /// use serde_json::json;
    ///
    /// let list = Value::List(vec![Value::Integer(1), Value::String("a".into())]);
    /// assert_eq!(list.to_json(), json!([1, "a"]));
    /// assert_eq!(Value::Complex(ComplexNumber::new(1.0, -2.0)).to_json(),
    ///            json!({"real": 1.0, "imaginario": -2.0}));
    /// ```
    #[must_use]
    pub fn to_json(&self) -> Json {
        match self {
            Self::Bit(b) => json!(u8::from(*b)),
            Self::Boolean(b) => Json::Bool(*b),
            Self::Integer(i) => json!(i),
            Self::Real(r) | Self::Decimal(r) => Number::from_f64(*r).map_or(Json::Null, Json::Number),
            Self::Character(c) => Json::String(c.to_string()),
            Self::Text(s) | Self::String(s) => Json::String(s.clone()),
            Self::Complex(c) => json!({ "real": c.real, "imaginario": c.imaginary }),
            Self::Date(_) | Self::Time(_) | Self::Duration(_) => Json::String(self.to_string()),
            Self::List(items) => Json::Array(items.iter().map(Self::to_json).collect()),
            Self::Matrix(rows) => {
                Json::Array(rows.iter()
                                .map(|row| Json::Array(row.iter().map(Self::to_json).collect()))
                                .collect())
            },
            Self::Dictionary(entries) => Json::Object(entries.iter()
                                                             .map(|(k, v)| (k.clone(), v.to_json()))
                                                             .collect()),
            Self::Object(Some(object)) => Json::String(object.describe()),
            Self::Object(None) | Self::Pointer(Pointer::Null) => Json::Null,
            Self::Pointer(Pointer::Named(name)) => json!({ "puntero": name }),
            Self::Pointer(Pointer::Value(value)) => json!({ "puntero": value.to_json() }),
        }
    }

    /// Builds a value from JSON.
    ///
    /// Numbers that fit `i64` become integers, other numbers reals, strings
    /// become `cadena`, arrays lists and objects dictionaries, except an
    /// object with exactly the keys `real` and `imaginario`, which becomes a
    /// complex number. `null` is `nulo`.
    ///
    /// # Example
    /// ```
    /// use nepa::interpreter::value::core::Value;
    /// use serde_json::json;
    ///
    /// assert_eq!(Value::from_json(&json!(3)), Value::Integer(3));
    /// assert_eq!(Value::from_json(&json!([true, 2.5])),
    ///            Value::List(vec![Value::Boolean(true), Value::Real(2.5)]));
    /// assert!(Value::from_json(&json!(null)).is_null());
    /// ```
    #[must_use]
    pub fn from_json(json: &Json) -> Self {
        match json {
            Json::Null => Self::Object(None),
            Json::Bool(b) => Self::Boolean(*b),
            Json::Number(n) => n.as_i64()
                                .map(Self::Integer)
                                .or_else(|| n.as_f64().map(Self::Real))
                                .unwrap_or(Self::Object(None)),
            Json::String(s) => Self::String(s.clone()),
            Json::Array(items) => Self::List(items.iter().map(Self::from_json).collect()),
            Json::Object(map) => match complex_from_map(map) {
                Some(complex) => Self::Complex(complex),
                None => Self::Dictionary(map.iter()
                                            .map(|(k, v)| (k.clone(), Self::from_json(v)))
                                            .collect()),
            },
        }
    }
}

fn complex_from_map(map: &Map<String, Json>) -> Option<ComplexNumber> {
    if map.len() != 2 {
        return None;
    }
    let real = map.get("real")?.as_f64()?;
    let imaginary = map.get("imaginario")?.as_f64()?;
    Some(ComplexNumber::new(real, imaginary))
}
