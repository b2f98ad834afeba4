use thiserror::Error;

use crate::error::{ConversionError, RegistryError};

/// Represents all errors that can occur during evaluation.
///
/// Evaluation errors abort the enclosing block and propagate to the caller of
/// the statement dispatcher; there is no partial recovery.
#[derive(Debug, Error)]
pub enum RuntimeError {
    /// An identifier that resolves to no constant, local, global or registry
    /// entry.
    #[error("línea {line}: identificador desconocido '{name}'")]
    UnknownIdentifier {
        /// The identifier.
        name: String,
        /// The source line where the error occurred.
        line: usize,
    },
    /// A call statement whose callee is neither a user nor a builtin
    /// function.
    #[error("línea {line}: instrucción no reconocida '{name}'")]
    UnrecognizedInstruction {
        /// The callee name.
        name: String,
        /// The source line where the error occurred.
        line: usize,
    },
    /// A call expression whose callee is unknown.
    #[error("línea {line}: función desconocida '{name}'")]
    UnknownFunction {
        /// The function name (or `tipo.metodo` key).
        name: String,
        /// The source line where the error occurred.
        line: usize,
    },
    /// Division or modulo by zero.
    #[error("línea {line}: división por cero")]
    DivisionByZero {
        /// The source line where the error occurred.
        line: usize,
    },
    /// Operand kinds do not fit the operator.
    #[error("línea {line}: tipos incompatibles: {details}")]
    TypeMismatch {
        /// Details about the mismatch.
        details: String,
        /// The source line where the error occurred.
        line:    usize,
    },
    /// A boolean value was required.
    #[error("línea {line}: se esperaba un booleano, se encontró '{found}'")]
    ExpectedBoolean {
        /// Display form of the value found.
        found: String,
        /// The source line where the error occurred.
        line:  usize,
    },
    /// Dereferencing something that is not a pointer.
    #[error("línea {line}: '{found}' no es un puntero")]
    NotAPointer {
        /// Display form of the value found.
        found: String,
        /// The source line where the error occurred.
        line:  usize,
    },
    /// Dereferencing a null pointer.
    #[error("línea {line}: puntero nulo")]
    NullPointer {
        /// The source line where the error occurred.
        line: usize,
    },
    /// A library function produced NaN or an infinity.
    #[error("línea {line}: '{function}' produjo un resultado no finito")]
    NonFiniteResult {
        /// The function name.
        function: String,
        /// The source line where the error occurred.
        line:     usize,
    },
    /// A range loop whose step evaluated to zero.
    #[error("línea {line}: el incremento del ciclo 'para' es cero")]
    ZeroStep {
        /// The source line where the error occurred.
        line: usize,
    },
    /// A range loop bound or step that is not numeric.
    #[error("línea {line}: límite de rango inválido: {details}")]
    InvalidRangeBound {
        /// Details about the bound.
        details: String,
        /// The source line where the error occurred.
        line:    usize,
    },
    /// A registry failure (duplicate, missing, unknown type, conversion).
    #[error("línea {line}: {source}")]
    Registry {
        /// The underlying registry error.
        #[source]
        source: RegistryError,
        /// The source line where the error occurred.
        line:   usize,
    },
    /// A value could not be coerced.
    #[error("línea {line}: {source}")]
    Conversion {
        /// The underlying conversion error.
        #[source]
        source: ConversionError,
        /// The source line where the error occurred.
        line:   usize,
    },
    /// Declaring a constant twice.
    #[error("línea {line}: la constante '{name}' ya fue declarada")]
    ConstantRedefinition {
        /// The constant name.
        name: String,
        /// The source line where the error occurred.
        line: usize,
    },
    /// Assigning to a constant.
    #[error("línea {line}: no se puede asignar a la constante '{name}'")]
    AssignmentToConstant {
        /// The constant name.
        name: String,
        /// The source line where the error occurred.
        line: usize,
    },
    /// Defining a function twice.
    #[error("línea {line}: la función '{name}' ya está definida")]
    FunctionAlreadyDefined {
        /// The function name.
        name: String,
        /// The source line where the error occurred.
        line: usize,
    },
    /// Defining a function whose name clashes with a builtin.
    #[error("línea {line}: no se puede redefinir la función integrada '{name}'")]
    BuiltinRedefinition {
        /// The function name.
        name: String,
        /// The source line where the error occurred.
        line: usize,
    },
    /// Wrong number of arguments.
    #[error("línea {line}: '{name}' esperaba {expected} argumento(s), recibió {found}")]
    ArgumentCountMismatch {
        /// The function name.
        name:     String,
        /// Human-readable expected arity.
        expected: String,
        /// The number of arguments supplied.
        found:    usize,
        /// The source line where the error occurred.
        line:     usize,
    },
    /// An invalid argument value.
    #[error("línea {line}: argumento inválido para '{name}': {details}")]
    InvalidArgument {
        /// The function name.
        name:    String,
        /// Details about the argument.
        details: String,
        /// The source line where the error occurred.
        line:    usize,
    },
    /// Indexing outside a sequence.
    #[error("línea {line}: índice {index} fuera de rango (longitud {len})")]
    IndexOutOfBounds {
        /// The requested index.
        index: i64,
        /// The sequence length.
        len:   usize,
        /// The source line where the error occurred.
        line:  usize,
    },
    /// Missing dictionary key.
    #[error("línea {line}: la clave '{key}' no existe")]
    KeyNotFound {
        /// The missing key.
        key:  String,
        /// The source line where the error occurred.
        line: usize,
    },
    /// Indexing a value that cannot be indexed.
    #[error("línea {line}: '{found}' no se puede indexar")]
    NotIndexable {
        /// Display form of the value.
        found: String,
        /// The source line where the error occurred.
        line:  usize,
    },
    /// `rompe` outside any loop.
    #[error("línea {line}: 'rompe' fuera de un ciclo")]
    BreakOutsideLoop {
        /// The source line where the error occurred.
        line: usize,
    },
    /// `ejecutar` inside a function body.
    #[error("línea {line}: 'ejecutar' no está permitido dentro de una función")]
    NestedInvocation {
        /// The source line where the error occurred.
        line: usize,
    },
    /// A sub-program started from a loop or a conditional failed.
    ///
    /// The driver reports the sub-program's own error in its place.
    #[error("{source}")]
    SubProgram {
        /// The sub-program's error.
        source: Box<crate::error::Error>,
        /// The line of the `ejecutar` statement.
        line:   usize,
    },
    /// Function call nesting exceeded the limit.
    #[error("línea {line}: se excedió la profundidad máxima de llamadas ({limit})")]
    RecursionLimit {
        /// The configured limit.
        limit: usize,
        /// The source line where the error occurred.
        line:  usize,
    },
    /// `afirmar` received a false condition.
    #[error("línea {line}: la afirmación falló")]
    AssertionFailed {
        /// The source line where the error occurred.
        line: usize,
    },
    /// Integer arithmetic overflowed.
    #[error("línea {line}: desbordamiento aritmético")]
    Overflow {
        /// The source line where the error occurred.
        line: usize,
    },
    /// An I/O failure from a library function.
    #[error("línea {line}: error de E/S en '{path}': {source}")]
    Io {
        /// The path involved.
        path:   String,
        /// The underlying error.
        #[source]
        source: std::io::Error,
        /// The source line where the error occurred.
        line:   usize,
    },
}

impl RuntimeError {
    /// Wraps a registry error with its line.
    #[must_use]
    pub const fn registry(source: RegistryError, line: usize) -> Self {
        Self::Registry { source, line }
    }

    /// Wraps a conversion error with its line.
    #[must_use]
    pub const fn conversion(source: ConversionError, line: usize) -> Self {
        Self::Conversion { source, line }
    }

    /// Builds a [`RuntimeError::TypeMismatch`].
    pub fn mismatch(details: impl Into<String>, line: usize) -> Self {
        Self::TypeMismatch { details: details.into(),
                             line }
    }
}
