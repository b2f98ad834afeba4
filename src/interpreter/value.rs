/// Coercion policies.
///
/// Every kind decides for itself what it accepts on assignment. This module
/// holds the default values per kind, `construct` and `assign_from_any`.
pub mod coerce;
/// Complex number support.
///
/// Defines the `ComplexNumber` type used for arithmetic with real and imaginary
/// parts, its `a+bi` text form and the basic arithmetic operators.
pub mod complex;
/// The `Value` enum, its `Kind` tag and the shared conversions.
pub mod core;
/// JSON mapping for values, used by `a_json` and by configuration variables.
pub mod json;
/// The literal parser used for program arguments and non-expression
/// initializers.
pub mod literal;
/// Opaque objects and the external-iterator capability.
pub mod object;
/// Calendar dates, times of day and durations.
pub mod temporal;
