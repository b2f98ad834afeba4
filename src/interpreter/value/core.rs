use std::{collections::BTreeMap, fmt, sync::Arc};

use crate::{
    error::ConversionError,
    interpreter::value::{
        complex::ComplexNumber,
        object::OpaqueObject,
        temporal::{Date, Duration, TimeOfDay},
    },
    util::num::{f64_to_i64_truncating, format_decimal, format_real, i64_to_f64_widening},
};

/// Maximum number of characters a `texto` value may hold.
pub const TEXT_CAPACITY: usize = 255;

/// The kind tag of a [`Value`].
///
/// Every kind has one canonical type name used in declarations, casts,
/// `tipo()` and `tipo.metodo` dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    /// `bit`
    Bit,
    /// `booleano`
    Boolean,
    /// `entero`
    Integer,
    /// `real`
    Real,
    /// `decimal`
    Decimal,
    /// `caracter`
    Character,
    /// `texto`
    Text,
    /// `cadena`
    String,
    /// `complejo`
    Complex,
    /// `fecha`
    Date,
    /// `hora`
    Time,
    /// `tiempo`
    Duration,
    /// `lista`
    List,
    /// `matriz`
    Matrix,
    /// `diccionario`
    Dictionary,
    /// `objeto`
    Object,
    /// `puntero`
    Pointer,
}

impl Kind {
    /// All kinds, in declaration order.
    pub const ALL: [Self; 17] = [Self::Bit,
                                 Self::Boolean,
                                 Self::Integer,
                                 Self::Real,
                                 Self::Decimal,
                                 Self::Character,
                                 Self::Text,
                                 Self::String,
                                 Self::Complex,
                                 Self::Date,
                                 Self::Time,
                                 Self::Duration,
                                 Self::List,
                                 Self::Matrix,
                                 Self::Dictionary,
                                 Self::Object,
                                 Self::Pointer];

    /// The canonical type name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Bit => "bit",
            Self::Boolean => "booleano",
            Self::Integer => "entero",
            Self::Real => "real",
            Self::Decimal => "decimal",
            Self::Character => "caracter",
            Self::Text => "texto",
            Self::String => "cadena",
            Self::Complex => "complejo",
            Self::Date => "fecha",
            Self::Time => "hora",
            Self::Duration => "tiempo",
            Self::List => "lista",
            Self::Matrix => "matriz",
            Self::Dictionary => "diccionario",
            Self::Object => "objeto",
            Self::Pointer => "puntero",
        }
    }

    /// Resolves a type name. `estructura` is an alias of `diccionario`.
    ///
    /// # Example
    /// ```
    /// use nepa::interpreter::value::core::Kind;
    ///
    /// assert_eq!(Kind::from_name("entero"), Some(Kind::Integer));
    /// assert_eq!(Kind::from_name("estructura"), Some(Kind::Dictionary));
    /// assert_eq!(Kind::from_name("numero"), None);
    /// ```
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        if name == "estructura" {
            return Some(Self::Dictionary);
        }
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }
}

/// The target of a pointer.
///
/// A pointer never owns a named pointee: it names it, and dereferencing reads
/// the current value through the execution context.
#[derive(Debug, Clone, PartialEq)]
pub enum Pointer {
    /// Points at a binding by name.
    Named(String),
    /// Points at a temporary value produced by `&(expresion)`.
    Value(Box<Value>),
    /// Points nowhere.
    Null,
}

/// Represents a runtime value in the interpreter.
///
/// The set of variants is closed; each one carries the capability set
/// `type_name`, `kind`, display, `to_boolean`, `to_integer`, `to_real` and
/// `assign_from_any`.
#[derive(Debug, Clone)]
pub enum Value {
    /// A bit, displayed as `0` or `1`.
    Bit(bool),
    /// A boolean.
    Boolean(bool),
    /// A 64-bit signed integer.
    Integer(i64),
    /// A 64-bit float.
    Real(f64),
    /// A float displayed with two fraction digits.
    Decimal(f64),
    /// A single code point.
    Character(char),
    /// Text limited to [`TEXT_CAPACITY`] characters.
    Text(String),
    /// Unbounded text; string literals and concatenations produce this.
    String(String),
    /// A complex number.
    Complex(ComplexNumber),
    /// A calendar date, optionally with a time.
    Date(Date),
    /// A time of day.
    Time(TimeOfDay),
    /// A span of seconds.
    Duration(Duration),
    /// A 0-indexed heterogeneous sequence.
    List(Vec<Value>),
    /// A rectangular 2-D array of numeric values.
    Matrix(Vec<Vec<Value>>),
    /// A string-keyed mapping.
    Dictionary(BTreeMap<String, Value>),
    /// An opaque payload; `None` is `nulo`.
    Object(Option<Arc<dyn OpaqueObject>>),
    /// A pointer.
    Pointer(Pointer),
}

impl PartialEq for Value {
    /// Structural equality without numeric coercion. `texto` and `cadena`
    /// compare by content, and a null pointer equals `nulo`.
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Bit(a), Self::Bit(b)) | (Self::Boolean(a), Self::Boolean(b)) => a == b,
            (Self::Integer(a), Self::Integer(b)) => a == b,
            (Self::Real(a), Self::Real(b)) | (Self::Decimal(a), Self::Decimal(b)) => a == b,
            (Self::Character(a), Self::Character(b)) => a == b,
            (Self::Text(a) | Self::String(a), Self::Text(b) | Self::String(b)) => a == b,
            (Self::Complex(a), Self::Complex(b)) => a == b,
            (Self::Date(a), Self::Date(b)) => a == b,
            (Self::Time(a), Self::Time(b)) => a == b,
            (Self::Duration(a), Self::Duration(b)) => a == b,
            (Self::List(a), Self::List(b)) => a == b,
            (Self::Matrix(a), Self::Matrix(b)) => a == b,
            (Self::Dictionary(a), Self::Dictionary(b)) => a == b,
            (Self::Object(a), Self::Object(b)) => match (a, b) {
                (None, None) => true,
                (Some(a), Some(b)) => Arc::ptr_eq(a, b),
                _ => false,
            },
            (Self::Pointer(a), Self::Pointer(b)) => a == b,
            (Self::Pointer(Pointer::Null), Self::Object(None))
            | (Self::Object(None), Self::Pointer(Pointer::Null)) => true,
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bit(b) => write!(f, "{}", u8::from(*b)),
            Self::Boolean(true) => write!(f, "verdadero"),
            Self::Boolean(false) => write!(f, "falso"),
            Self::Integer(i) => write!(f, "{i}"),
            Self::Real(r) => write!(f, "{}", format_real(*r)),
            Self::Decimal(d) => write!(f, "{}", format_decimal(*d)),
            Self::Character(c) => write!(f, "{c}"),
            Self::Text(s) | Self::String(s) => write!(f, "{s}"),
            Self::Complex(c) => write!(f, "{c}"),
            Self::Date(d) => write!(f, "{d}"),
            Self::Time(t) => write!(f, "{t}"),
            Self::Duration(d) => write!(f, "{d}"),
            Self::List(items) => write_sequence(f, items),
            Self::Matrix(rows) => {
                write!(f, "[")?;
                for (i, row) in rows.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write_sequence(f, row)?;
                }
                write!(f, "]")
            },
            Self::Dictionary(entries) => {
                write!(f, "{{")?;
                for (i, (key, value)) in entries.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "\"{key}\": ")?;
                    write_nested(f, value)?;
                }
                write!(f, "}}")
            },
            Self::Object(Some(object)) => write!(f, "{}", object.describe()),
            Self::Object(None) | Self::Pointer(Pointer::Null) => write!(f, "nulo"),
            Self::Pointer(Pointer::Named(name)) => write!(f, "&{name}"),
            Self::Pointer(Pointer::Value(value)) => {
                write!(f, "&(")?;
                write_nested(f, value)?;
                write!(f, ")")
            },
        }
    }
}

fn write_sequence(f: &mut fmt::Formatter<'_>, items: &[Value]) -> fmt::Result {
    write!(f, "[")?;
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write_nested(f, item)?;
    }
    write!(f, "]")
}

/// Text inside collections is quoted so the display form parses back.
fn write_nested(f: &mut fmt::Formatter<'_>, value: &Value) -> fmt::Result {
    match value {
        Value::Text(s) | Value::String(s) => write!(f, "\"{}\"", s.replace('"', "\\\"")),
        Value::Character(c) => write!(f, "'{c}'"),
        other => write!(f, "{other}"),
    }
}

impl Value {
    /// The kind tag of this value.
    #[must_use]
    pub const fn kind(&self) -> Kind {
        match self {
            Self::Bit(_) => Kind::Bit,
            Self::Boolean(_) => Kind::Boolean,
            Self::Integer(_) => Kind::Integer,
            Self::Real(_) => Kind::Real,
            Self::Decimal(_) => Kind::Decimal,
            Self::Character(_) => Kind::Character,
            Self::Text(_) => Kind::Text,
            Self::String(_) => Kind::String,
            Self::Complex(_) => Kind::Complex,
            Self::Date(_) => Kind::Date,
            Self::Time(_) => Kind::Time,
            Self::Duration(_) => Kind::Duration,
            Self::List(_) => Kind::List,
            Self::Matrix(_) => Kind::Matrix,
            Self::Dictionary(_) => Kind::Dictionary,
            Self::Object(_) => Kind::Object,
            Self::Pointer(_) => Kind::Pointer,
        }
    }

    /// The runtime type name. Objects report their own name.
    ///
    /// # Example
    /// ```
    /// use nepa::interpreter::value::core::Value;
    ///
    /// assert_eq!(Value::Integer(1).type_name(), "entero");
    /// assert_eq!(Value::String("a".into()).type_name(), "cadena");
    /// assert_eq!(Value::Object(None).type_name(), "objeto");
    /// ```
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Object(Some(object)) => object.type_name(),
            other => other.kind().name(),
        }
    }

    /// `nulo`, or a pointer to nothing.
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Object(None) | Self::Pointer(Pointer::Null))
    }

    /// Integer-kinded values narrow arithmetic results back to integers.
    #[must_use]
    pub const fn is_integer_kind(&self) -> bool {
        matches!(self, Self::Integer(_) | Self::Bit(_) | Self::Boolean(_))
    }

    /// The exact integer behind an integer-kinded value.
    ///
    /// # Example
    /// ```
    /// use nepa::interpreter::value::core::Value;
    ///
    /// assert_eq!(Value::Integer(9_007_199_254_740_993).as_integer(), Some(9_007_199_254_740_993));
    /// assert_eq!(Value::Bit(true).as_integer(), Some(1));
    /// assert_eq!(Value::Real(1.0).as_integer(), None);
    /// ```
    #[must_use]
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(i) => Some(*i),
            Self::Bit(b) | Self::Boolean(b) => Some(i64::from(*b)),
            _ => None,
        }
    }

    /// Text-like values make `+` concatenate.
    #[must_use]
    pub const fn is_text(&self) -> bool {
        matches!(self, Self::Text(_) | Self::String(_) | Self::Character(_))
    }

    /// Borrows the content of a `texto` or `cadena`.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) | Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// The plain text form: the content of texts, the display form otherwise.
    #[must_use]
    pub fn text_form(&self) -> String {
        self.as_str().map_or_else(|| self.to_string(), str::to_string)
    }

    /// Converts to a boolean.
    ///
    /// Booleans and bits convert directly, numbers are true when non-zero,
    /// texts accept `verdadero`/`falso`/`true`/`false`/`1`/`0`, null values
    /// are false and live objects or pointers are true.
    ///
    /// # Example
    /// ```
    /// use nepa::interpreter::value::core::Value;
    ///
    /// assert_eq!(Value::Integer(3).to_boolean(), Ok(true));
    /// assert_eq!(Value::String("falso".into()).to_boolean(), Ok(false));
    /// assert!(Value::List(vec![]).to_boolean().is_err());
    /// ```
    pub fn to_boolean(&self) -> Result<bool, ConversionError> {
        match self {
            Self::Boolean(b) | Self::Bit(b) => Ok(*b),
            Self::Integer(i) => Ok(*i != 0),
            Self::Real(r) | Self::Decimal(r) => Ok(*r != 0.0),
            Self::Text(s) | Self::String(s) => parse_boolean_word(s).ok_or_else(|| {
                ConversionError::new(s.as_str(), "booleano", "use verdadero o falso")
            }),
            Self::Object(None) | Self::Pointer(Pointer::Null) => Ok(false),
            Self::Object(Some(_)) | Self::Pointer(_) => Ok(true),
            other => Err(ConversionError::new(other.to_string(),
                                              "booleano",
                                              format!("un valor {} no es lógico",
                                                      other.type_name()))),
        }
    }

    /// Converts to an integer, truncating reals towards zero.
    ///
    /// # Example
    /// ```
    /// use nepa::interpreter::value::core::Value;
    ///
    /// assert_eq!(Value::Real(3.9).to_integer(), Ok(3));
    /// assert_eq!(Value::String(" 42 ".into()).to_integer(), Ok(42));
    /// assert_eq!(Value::Boolean(true).to_integer(), Ok(1));
    /// assert!(Value::String("hola".into()).to_integer().is_err());
    /// ```
    pub fn to_integer(&self) -> Result<i64, ConversionError> {
        let fail = || {
            ConversionError::new(self.to_string(),
                                 "entero",
                                 "se esperaba un número entero representable")
        };
        match self {
            Self::Integer(i) => Ok(*i),
            Self::Bit(b) | Self::Boolean(b) => Ok(i64::from(*b)),
            Self::Real(r) | Self::Decimal(r) => f64_to_i64_truncating(*r).ok_or_else(fail),
            Self::Duration(d) => Ok(d.seconds),
            Self::Text(s) | Self::String(s) => {
                let trimmed = s.trim();
                trimmed.parse::<i64>()
                       .ok()
                       .or_else(|| parse_numeric(trimmed).and_then(f64_to_i64_truncating))
                       .ok_or_else(fail)
            },
            _ => Err(fail()),
        }
    }

    /// Converts to a real. This is the single numeric coercion shared by all
    /// arithmetic.
    ///
    /// Succeeds for integers, reals, decimals, bits, booleans and numeric
    /// texts; fails with a typed error for everything else.
    ///
    /// # Example
    /// ```
    /// use nepa::interpreter::value::core::Value;
    ///
    /// assert_eq!(Value::Integer(2).to_real(), Ok(2.0));
    /// assert!(Value::Integer(i64::MAX).to_real().is_ok());
    /// assert_eq!(Value::String("2.5".into()).to_real(), Ok(2.5));
    /// assert_eq!(Value::Boolean(false).to_real(), Ok(0.0));
    /// assert!(Value::List(vec![]).to_real().is_err());
    /// assert!(Value::String("inf".into()).to_real().is_err());
    /// ```
    pub fn to_real(&self) -> Result<f64, ConversionError> {
        let fail = || {
            ConversionError::new(self.to_string(),
                                 "real",
                                 format!("un valor {} no es numérico", self.type_name()))
        };
        match self {
            Self::Integer(i) => Ok(i64_to_f64_widening(*i)),
            Self::Real(r) | Self::Decimal(r) => Ok(*r),
            Self::Bit(b) | Self::Boolean(b) => Ok(if *b { 1.0 } else { 0.0 }),
            Self::Text(s) | Self::String(s) => parse_numeric(s.trim()).ok_or_else(fail),
            _ => Err(fail()),
        }
    }
}

/// Parses a finite decimal number, rejecting `inf`/`NaN` spellings.
pub(crate) fn parse_numeric(text: &str) -> Option<f64> {
    if !text.chars().any(|c| c.is_ascii_digit())
       || text.chars().any(|c| c.is_ascii_alphabetic() && c != 'e' && c != 'E')
    {
        return None;
    }
    text.parse::<f64>().ok().filter(|r| r.is_finite())
}

/// Reads the boolean spellings accepted by conversions.
pub(crate) fn parse_boolean_word(text: &str) -> Option<bool> {
    match text.trim() {
        "verdadero" | "true" | "1" => Some(true),
        "falso" | "false" | "0" => Some(false),
        _ => None,
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Real(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<ComplexNumber> for Value {
    fn from(value: ComplexNumber) -> Self {
        Self::Complex(value)
    }
}
