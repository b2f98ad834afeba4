use crate::{
    error::RuntimeError,
    interpreter::{
        evaluator::{
            core::{Context, EvalResult},
            function::core::{Arity, Builtin, FunctionRegistry},
        },
        registry::BASE_TYPES,
        value::core::Value,
    },
};

/// Registers `convertir_<tipo>` for every base type.
///
/// # Example
/// ```
/// use nepa::interpreter::evaluator::function::{convert::register_conversions, core::FunctionRegistry};
///
/// let mut functions = FunctionRegistry::default();
/// register_conversions(&mut functions);
/// assert!(functions.contains("convertir_fecha"));
/// assert!(functions.contains("convertir_estructura"));
/// ```
pub fn register_conversions(functions: &mut FunctionRegistry) {
    for (type_name, _) in BASE_TYPES {
        functions.register(&format!("convertir_{type_name}"),
                           Arity::Exact(1),
                           Builtin::Conversion(type_name));
    }
}

/// Runs the registry constructor of `type_name` on the single argument.
///
/// Going through the registry means a constructor replaced with
/// `Registry::register_type` also changes what the cast does.
pub fn convert(context: &Context, type_name: &str, args: &[Value], line: usize) -> EvalResult<Value> {
    context.runtime
           .registry
           .construct(type_name, "", args.first())
           .map_err(|e| RuntimeError::registry(e, line))
}
