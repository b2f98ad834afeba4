/// Parsing errors.
///
/// Defines all error types that can occur during tokenizing and parsing of
/// source code. Parse errors are collected per line instead of aborting the
/// whole file.
pub mod parse_error;
/// Registry and coercion errors.
///
/// Errors raised by the variable registry (duplicate or missing names, unknown
/// types) and by the per-type coercion policies.
pub mod registry_error;
/// Runtime errors.
///
/// Contains all error types that can be raised during evaluation, such as
/// unknown identifiers, division by zero, type mismatches or loop guards.
pub mod runtime_error;

use std::path::PathBuf;

pub use parse_error::{ParseError, ParseErrors};
pub use registry_error::{ConversionError, RegistryError};
pub use runtime_error::RuntimeError;
use thiserror::Error;

/// Top-level error returned by the program driver.
#[derive(Debug, Error)]
pub enum Error {
    /// The source has parse errors and tolerant mode is off.
    #[error("{0}")]
    Parse(ParseErrors),
    /// Evaluation failed.
    #[error("{0}")]
    Runtime(#[source] RuntimeError),
    /// A program file could not be read.
    #[error("no se pudo leer '{}': {source}", path.display())]
    Io {
        /// The file path.
        path:   PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },
    /// The configuration file is missing or malformed.
    #[error("configuración inválida en '{}': {details}", path.display())]
    Config {
        /// The configuration path.
        path:    PathBuf,
        /// What went wrong.
        details: String,
    },
    /// A sub-program could not be located.
    #[error("no se encontró el subprograma '{0}'")]
    ProgramNotFound(String),
    /// Sub-program invocations nested too deeply.
    #[error("se excedió la profundidad máxima de subprogramas ({limit})")]
    InvocationDepth {
        /// The configured limit.
        limit: usize,
    },
}

impl From<ParseErrors> for Error {
    fn from(errors: ParseErrors) -> Self {
        Self::Parse(errors)
    }
}

impl From<RuntimeError> for Error {
    /// A failed sub-program surfaces as its own error, however deeply the
    /// `ejecutar` was nested.
    fn from(error: RuntimeError) -> Self {
        match error {
            RuntimeError::SubProgram { source, .. } => *source,
            other => Self::Runtime(other),
        }
    }
}
