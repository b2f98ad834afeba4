/// Defines a library table of builtin functions.
///
/// Each entry provides:
/// - a string name,
/// - an arity specification,
/// - the [`Builtin`](core::Builtin) implementing it.
///
/// The macro produces a static `TABLE` that the bootstrap in [`core`]
/// registers, so every library lists its functions in one place.
macro_rules! builtin_table {
    (
        $(
            $name:literal => {
                arity: $arity:expr,
                func: $func:expr $(,)?
            }
        ),* $(,)?
    ) => {
        pub(crate) static TABLE: &[(&str, crate::interpreter::evaluator::function::core::Arity,
                                    crate::interpreter::evaluator::function::core::Builtin)] = &[
            $(
                ($name, $arity, $func),
            )*
        ];
    };
}

/// The builtin registry, arity checks and call dispatch.
pub mod core;

/// Calls to user-defined functions.
pub mod user;

/// The `imprimir` builtin and the output sinks behind it.
pub mod print;

/// General builtins: `tipo`, `longitud`, `afirmar`, `a_json`, `existe`,
/// `eliminar`.
pub mod general;

/// `convertir_<tipo>` conversions through the registry constructors.
pub mod convert;

/// List and dictionary builtins.
pub mod collections;

/// Text builtins.
pub mod text;

/// File access.
pub mod io;

/// The math library. Results that are not finite are errors.
pub mod math;
