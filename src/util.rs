/// Numeric conversion and formatting helpers.
///
/// This module provides safe functions for converting between integer and
/// floating-point types without silent data loss, and the canonical display
/// formats for reals and decimals.
pub mod num;
/// Balance-aware text splitting.
///
/// Splits text on a separator only where the separator sits at nesting depth
/// zero and outside quoted literals. Shared by list, matrix, dictionary and
/// structure literal parsing.
pub mod split;
