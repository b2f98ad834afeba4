use std::fmt;

use thiserror::Error;

/// Represents all errors that can occur during tokenizing or parsing.
///
/// Every variant carries the source line it was found on. The parser is
/// locally fault-tolerant: a malformed line is turned into an inert error
/// node and the error itself is collected, so sibling lines keep parsing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// Indentation is not a multiple of four columns (or contains tabs).
    #[error("línea {line}: sangría irregular de {width} columnas (debe ser múltiplo de 4)")]
    IrregularIndentation {
        /// The measured indentation width.
        width: usize,
        /// The source line where the error occurred.
        line:  usize,
    },
    /// A line is indented deeper than its enclosing block allows.
    #[error("línea {line}: sangría inesperada (nivel {found}, se esperaba {expected})")]
    UnexpectedIndentation {
        /// The indentation level that was allowed at this point.
        expected: usize,
        /// The indentation level actually found.
        found:    usize,
        /// The source line where the error occurred.
        line:     usize,
    },
    /// A string literal is missing its closing quote.
    #[error("línea {line}: literal de texto sin cerrar")]
    UnterminatedLiteral {
        /// The source line where the error occurred.
        line: usize,
    },
    /// A character the tokenizer does not recognize.
    #[error("línea {line}: carácter desconocido '{text}'")]
    UnknownCharacter {
        /// The unrecognized slice.
        text: String,
        /// The source line where the error occurred.
        line: usize,
    },
    /// A declaration whose shape does not match
    /// `variable <tipo> <nombre>[, ...] [:= <expr>]`.
    #[error("línea {line}: declaración mal formada: {details}")]
    MalformedDeclaration {
        /// What exactly is wrong.
        details: String,
        /// The source line where the error occurred.
        line:    usize,
    },
    /// A type token that matches no registered type.
    #[error("línea {line}: tipo desconocido '{name}'")]
    UnknownType {
        /// The offending type token.
        name: String,
        /// The source line where the error occurred.
        line: usize,
    },
    /// Found an unexpected token while parsing.
    #[error("línea {line}: símbolo inesperado {token}")]
    UnexpectedToken {
        /// A description of the token encountered.
        token: String,
        /// The source line where the error occurred.
        line:  usize,
    },
    /// Reached the end of the line while more input was required.
    #[error("línea {line}: fin de línea inesperado")]
    UnexpectedEndOfLine {
        /// The source line where the error occurred.
        line: usize,
    },
    /// A block header is missing its trailing `:`.
    #[error("línea {line}: se esperaba ':' al final de '{header}'")]
    ExpectedColon {
        /// The header keyword.
        header: String,
        /// The source line where the error occurred.
        line:   usize,
    },
    /// A block header is not followed by any indented statement.
    #[error("línea {line}: el bloque de '{header}' está vacío")]
    EmptyBlock {
        /// The header keyword.
        header: String,
        /// The source line where the error occurred.
        line:   usize,
    },
    /// A `pero_si` or `si_no` that does not follow a `si_es`.
    #[error("línea {line}: '{keyword}' sin un 'si_es' previo")]
    OrphanBranch {
        /// The branch keyword.
        keyword: String,
        /// The source line where the error occurred.
        line:    usize,
    },
    /// A numeric literal that does not fit its type.
    #[error("línea {line}: literal numérico demasiado grande")]
    LiteralTooLarge {
        /// The source line where the error occurred.
        line: usize,
    },
}

impl ParseError {
    /// Returns the line number the error refers to.
    #[must_use]
    pub const fn line(&self) -> usize {
        match self {
            Self::IrregularIndentation { line, .. }
            | Self::UnexpectedIndentation { line, .. }
            | Self::UnterminatedLiteral { line }
            | Self::UnknownCharacter { line, .. }
            | Self::MalformedDeclaration { line, .. }
            | Self::UnknownType { line, .. }
            | Self::UnexpectedToken { line, .. }
            | Self::UnexpectedEndOfLine { line }
            | Self::ExpectedColon { line, .. }
            | Self::EmptyBlock { line, .. }
            | Self::OrphanBranch { line, .. }
            | Self::LiteralTooLarge { line } => *line,
        }
    }
}

/// All parse errors collected from one source file, in line order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseErrors(pub Vec<ParseError>);

impl ParseErrors {
    /// Returns `true` when no error was collected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of collected errors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterates over the collected errors.
    pub fn iter(&self) -> std::slice::Iter<'_, ParseError> {
        self.0.iter()
    }
}

impl fmt::Display for ParseErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, error) in self.0.iter().enumerate() {
            if index > 0 {
                writeln!(f)?;
            }
            write!(f, "{error}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ParseErrors {}
