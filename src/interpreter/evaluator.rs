/// Binary operator evaluation logic.
///
/// Handles arithmetic with its result-kind rules, comparisons and the strict
/// boolean operators.
pub mod binary;

/// Unary operator evaluation logic.
///
/// Implements negation, the real-coercing plus and boolean NOT.
pub mod unary;

/// Core evaluation logic and context management.
///
/// Contains the runtime context, identifier resolution, pointer handling and
/// the expression dispatcher.
pub mod core;

/// Statement execution.
///
/// The handler table keyed by node kind, the built-in handlers, blocks and
/// assignment targets.
pub mod statement;

/// Evaluation of `para` loops.
///
/// Supports range and collection loops, including pull-based iteration over
/// external objects.
pub mod for_loop;

/// Indexed and keyed access, for reading and for assignment.
pub mod access;

/// Utility functions for evaluation.
///
/// Provides argument checks and conversions shared by the builtins.
pub mod utils;

/// Function evaluation.
///
/// Handles user-defined and built-in function calls, argument checking, and
/// return value computation.
pub mod function;
