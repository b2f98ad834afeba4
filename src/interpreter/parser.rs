/// Entry points for expression parsing.
///
/// Defines the result type shared by the parser and the functions that turn
/// a run of lexemes into a single expression.
pub mod core;

/// Binary operator precedence levels.
///
/// One function per level, from `||` down to `* / %`, all left-associative.
pub mod binary;

/// Prefix operators, casts, primaries and postfix access.
pub mod unary;

/// Block structure.
///
/// Groups lines into nested blocks following the indentation tokens, attaches
/// `pero_si`/`si_no` branches and collects every parse error of a program.
pub mod block;

/// Line-level statement parsing.
pub(crate) mod statement;

/// Variable, global and constant declarations with their type specs.
pub(crate) mod declaration;

/// Helpers shared by the parser modules.
mod utils;
