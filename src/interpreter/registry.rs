use std::collections::{BTreeMap, HashMap};

use parking_lot::RwLock;

use crate::{
    ast::TypeSpec,
    error::{ConversionError, RegistryError},
    interpreter::value::core::{Kind, Value},
};

/// Builds a value of one type from a variable name and an optional initial
/// value.
pub type Constructor = fn(&str, Option<&Value>) -> Result<Value, ConversionError>;

/// Defines the base type constructors by generating a static table.
///
/// Each entry maps a type name to a closure that constructs the matching
/// [`Kind`] through [`Value::construct`].
macro_rules! base_types {
    ($($name:literal => $kind:expr),* $(,)?) => {
        /// The constructors every registry starts with.
        pub static BASE_TYPES: &[(&str, Constructor)] = &[
            $(
                ($name, |_name: &str, initial: Option<&Value>| Value::construct($kind, initial)),
            )*
        ];
    };
}

base_types! {
    "bit"         => Kind::Bit,
    "booleano"    => Kind::Boolean,
    "cadena"      => Kind::String,
    "caracter"    => Kind::Character,
    "complejo"    => Kind::Complex,
    "decimal"     => Kind::Decimal,
    "diccionario" => Kind::Dictionary,
    "entero"      => Kind::Integer,
    "estructura"  => Kind::Dictionary,
    "fecha"       => Kind::Date,
    "hora"        => Kind::Time,
    "lista"       => Kind::List,
    "matriz"      => Kind::Matrix,
    "objeto"      => Kind::Object,
    "puntero"     => Kind::Pointer,
    "real"        => Kind::Real,
    "texto"       => Kind::Text,
    "tiempo"      => Kind::Duration,
}

/// The variable registry: a symbol table plus a table of per-type
/// constructors.
///
/// Both tables sit behind readers-writer locks, so lookups run concurrently
/// while registration and mutation are exclusive. All methods take `&self`;
/// the registry is shared through an `Arc`.
#[derive(Debug, Default)]
pub struct Registry {
    symbols:      RwLock<HashMap<String, Value>>,
    constructors: RwLock<HashMap<String, Constructor>>,
}

impl Registry {
    /// Creates a registry with no symbols and no constructors.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry with the constructors from [`BASE_TYPES`].
    ///
    /// # Example
    /// ```
    /// use nepa::interpreter::registry::Registry;
    ///
    /// let registry = Registry::with_builtin_types();
    /// assert!(registry.has_type("entero"));
    /// assert!(registry.has_type("estructura"));
    /// assert!(!registry.has_type("numero"));
    /// ```
    #[must_use]
    pub fn with_builtin_types() -> Self {
        let registry = Self::new();
        for (name, constructor) in BASE_TYPES {
            registry.register_type(name, *constructor);
        }
        registry
    }

    /// Registers (or replaces) the constructor for `type_name`.
    pub fn register_type(&self, type_name: &str, constructor: Constructor) {
        self.constructors.write().insert(type_name.to_string(), constructor);
    }

    /// All registered type names, sorted.
    #[must_use]
    pub fn type_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.constructors.read().keys().cloned().collect();
        names.sort();
        names
    }

    /// Returns `true` if a constructor is registered for `type_name`.
    #[must_use]
    pub fn has_type(&self, type_name: &str) -> bool {
        self.constructors.read().contains_key(type_name)
    }

    /// Runs the constructor for `type_name` without touching the symbol
    /// table.
    pub fn construct(&self,
                     type_name: &str,
                     name: &str,
                     initial: Option<&Value>)
                     -> Result<Value, RegistryError> {
        let missing = || RegistryError::NoSuchConstructor { type_name: type_name.to_string() };
        let constructor = self.constructors.read().get(type_name).copied().ok_or_else(missing)?;
        Ok(constructor(name, initial)?)
    }

    /// Constructs a value for a full declaration type.
    ///
    /// A container marker builds the container from `initial` and then
    /// coerces its elements into the base type: list elements, dictionary
    /// values, and matrix cells when the base type is numeric. Pointers and
    /// objects keep their payload as is.
    ///
    /// # Example
    /// ```
    /// use nepa::{
    ///     ast::TypeSpec,
    ///     interpreter::{registry::Registry, value::core::Value},
    /// };
    ///
    /// let registry = Registry::with_builtin_types();
    /// let spec = TypeSpec { markers: vec!["lista".into()],
    ///                       dims:    0,
    ///                       base:    "real".into(), };
    /// let list = Value::List(vec![Value::Integer(1), Value::String("2.5".into())]);
    /// let value = registry.construct_typed(&spec, "xs", Some(&list)).unwrap();
    /// assert_eq!(value, Value::List(vec![Value::Real(1.0), Value::Real(2.5)]));
    /// ```
    pub fn construct_typed(&self,
                           spec: &TypeSpec,
                           name: &str,
                           initial: Option<&Value>)
                           -> Result<Value, RegistryError> {
        let Some(container) = spec.container() else {
            return self.construct(&spec.base, name, initial);
        };
        if !self.has_type(&spec.base) {
            return Err(RegistryError::NoSuchConstructor { type_name: spec.base.clone() });
        }
        let value = Value::construct(container, initial)?;
        let Some(element) = Kind::from_name(&spec.base).filter(|kind| *kind != container) else {
            return Ok(value);
        };

        let coerce = |item: &Value| Value::coerce_into(element, item);
        Ok(match value {
            Value::List(items) => Value::List(items.iter().map(coerce).collect::<Result<_, _>>()?),
            Value::Dictionary(entries) => {
                Value::Dictionary(entries.iter()
                                         .map(|(k, v)| coerce(v).map(|v| (k.clone(), v)))
                                         .collect::<Result<_, _>>()?)
            },
            Value::Matrix(rows) if is_numeric(element) => {
                Value::Matrix(rows.iter()
                                  .map(|row| row.iter().map(coerce).collect::<Result<_, _>>())
                                  .collect::<Result<_, _>>()?)
            },
            other => other,
        })
    }

    /// Creates a new symbol of `type_name`.
    ///
    /// # Errors
    /// `AlreadyExists` if the name is taken, `NoSuchConstructor` if the type
    /// is unknown, or the constructor's own conversion error.
    ///
    /// # Example
    /// ```
    /// use nepa::{
    ///     error::RegistryError,
    ///     interpreter::{registry::Registry, value::core::Value},
    /// };
    ///
    /// let registry = Registry::with_builtin_types();
    /// registry.create("entero", "x", Some(&Value::Integer(0))).unwrap();
    /// assert!(matches!(registry.create("entero", "x", Some(&Value::Integer(0))),
    ///                  Err(RegistryError::AlreadyExists { .. })));
    /// ```
    pub fn create(&self,
                  type_name: &str,
                  name: &str,
                  initial: Option<&Value>)
                  -> Result<Value, RegistryError> {
        self.ensure_free(name)?;
        let value = self.construct(type_name, name, initial)?;
        self.insert(name, value.clone())?;
        Ok(value)
    }

    /// Inserts an already constructed value under a new name.
    pub fn insert(&self, name: &str, value: Value) -> Result<(), RegistryError> {
        let mut symbols = self.symbols.write();
        if symbols.contains_key(name) {
            return Err(RegistryError::AlreadyExists { name: name.to_string() });
        }
        symbols.insert(name.to_string(), value);
        Ok(())
    }

    /// Assigns `value` to an existing symbol, coercing it into the symbol's
    /// current kind. The kind never changes.
    ///
    /// # Example
    /// ```
    /// use nepa::{
    ///     error::RegistryError,
    ///     interpreter::{registry::Registry, value::core::Value},
    /// };
    ///
    /// let registry = Registry::with_builtin_types();
    /// assert!(matches!(registry.modify("y", &Value::Integer(1)),
    ///                  Err(RegistryError::NotFound { .. })));
    ///
    /// registry.create("entero", "n", None).unwrap();
    /// let stored = registry.modify("n", &Value::String("42".into())).unwrap();
    /// assert_eq!(stored, Value::Integer(42));
    /// ```
    pub fn modify(&self, name: &str, value: &Value) -> Result<Value, RegistryError> {
        let mut symbols = self.symbols.write();
        let entry = symbols.get_mut(name)
                           .ok_or_else(|| RegistryError::NotFound { name: name.to_string() })?;
        entry.assign_from_any(value)?;
        Ok(entry.clone())
    }

    /// Replaces a symbol's value without coercion.
    pub fn replace(&self, name: &str, value: Value) -> Result<(), RegistryError> {
        let mut symbols = self.symbols.write();
        let entry = symbols.get_mut(name)
                           .ok_or_else(|| RegistryError::NotFound { name: name.to_string() })?;
        *entry = value;
        Ok(())
    }

    /// Returns a copy of a symbol's value.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Value> {
        self.symbols.read().get(name).cloned()
    }

    /// Returns `true` if `name` is bound.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.symbols.read().contains_key(name)
    }

    /// Removes a symbol and returns its last value.
    pub fn delete(&self, name: &str) -> Result<Value, RegistryError> {
        self.symbols
            .write()
            .remove(name)
            .ok_or_else(|| RegistryError::NotFound { name: name.to_string() })
    }

    /// A sorted copy of every symbol.
    #[must_use]
    pub fn snapshot(&self) -> BTreeMap<String, Value> {
        self.symbols
            .read()
            .iter()
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect()
    }

    fn ensure_free(&self, name: &str) -> Result<(), RegistryError> {
        if self.contains(name) {
            return Err(RegistryError::AlreadyExists { name: name.to_string() });
        }
        Ok(())
    }
}

const fn is_numeric(kind: Kind) -> bool {
    matches!(kind, Kind::Integer | Kind::Real | Kind::Decimal | Kind::Complex | Kind::Bit)
}
