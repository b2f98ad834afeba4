use thiserror::Error;

/// A failed best-effort coercion of a value into a concrete type.
///
/// Carries the display form of the value that could not be converted, the
/// name of the target type and a human-readable hint describing what the
/// target type accepts.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("no se puede convertir '{value}' a {target}: {hint}")]
pub struct ConversionError {
    /// Display form of the rejected value.
    pub value:  String,
    /// Name of the type the value was being converted into.
    pub target: &'static str,
    /// Usage hint for the target type.
    pub hint:   String,
}

impl ConversionError {
    /// Builds a conversion error.
    ///
    /// # Example
    /// ```
    /// use nepa::error::ConversionError;
    ///
    /// let err = ConversionError::new("7", "bit", "solo acepta 0 o 1");
    /// assert_eq!(err.to_string(), "no se puede convertir '7' a bit: solo acepta 0 o 1");
    /// ```
    pub fn new(value: impl Into<String>, target: &'static str, hint: impl Into<String>) -> Self {
        Self { value: value.into(),
               target,
               hint: hint.into() }
    }
}

/// Errors raised by the variable registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// A variable with that name is already registered.
    #[error("la variable '{name}' ya existe")]
    AlreadyExists {
        /// The variable name.
        name: String,
    },
    /// No variable with that name is registered.
    #[error("la variable '{name}' no existe")]
    NotFound {
        /// The variable name.
        name: String,
    },
    /// No constructor is registered for that type name.
    #[error("no hay constructor para el tipo '{type_name}'")]
    NoSuchConstructor {
        /// The requested type name.
        type_name: String,
    },
    /// The constructor or the assignment rejected the value.
    #[error(transparent)]
    Conversion(#[from] ConversionError),
}
