/// The evaluator module executes the syntax tree.
///
/// The evaluator walks the tree statement by statement through a handler
/// table, evaluates expressions with implicit numeric coercion, follows
/// pointers and drives every kind of loop. It is the core execution engine
/// of the interpreter.
///
/// # Responsibilities
/// - Executes statements through handlers keyed by node kind.
/// - Resolves identifiers across constants, scopes, globals and the
///   registry.
/// - Reports runtime errors such as division by zero or type mismatches.
pub mod evaluator;
/// The lexer module tokenizes source code for further parsing.
///
/// The lexer reads raw source text and produces a stream of tokens, each
/// tagged with its line and byte span, including the synthetic indentation
/// tokens that delimit blocks.
///
/// # Responsibilities
/// - Converts the input character stream into tokens with source location.
/// - Tracks indentation and emits `Indent`/`Dedent` markers.
/// - Reports lexical errors for unrecognized input.
pub mod lexer;
/// The parser module builds the syntax tree from tokens.
///
/// The parser groups lines into indentation blocks, recognizes statement
/// forms and builds expression trees with operator precedence. Lines that
/// fail become inert error nodes so one run reports every problem.
pub mod parser;
/// The variable registry: the process-wide symbol table and the per-type
/// constructors used by declarations and casts.
pub mod registry;
/// The value module defines the runtime data model.
///
/// This module declares every value kind the language manipulates, their
/// display forms, literal parsing, JSON mapping and the per-kind coercion
/// policies.
///
/// # Responsibilities
/// - Defines the `Value` enum and its `Kind` tags.
/// - Implements conversions to boolean, integer and real.
/// - Implements assignment coercion without changing a value's kind.
pub mod value;
