use std::{collections::HashMap, fmt};

use tracing::trace;

use crate::{
    ast::{AssignTarget, Expr},
    error::RuntimeError,
    interpreter::{
        evaluator::{
            access::place_of,
            core::{Context, EvalResult},
            function::{collections, convert, general, io, math, print, text},
        },
        value::core::{Pointer, Value},
    },
};

/// A builtin that only needs its arguments and the line number.
pub type PureFn = fn(&[Value], usize) -> EvalResult<Value>;

/// A builtin that also needs the execution context.
pub type ContextFn = fn(&mut Context, &[Value], usize) -> EvalResult<Value>;

/// Specifies the allowed number of arguments for a builtin.
///
/// - `Exact(n)` means the builtin must receive exactly `n` arguments.
/// - `OneOf(slice)` means the builtin accepts any arity listed in `slice`.
/// - `AtLeast(n)` means `n` or more.
/// - `Any` accepts every count, including none.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Exact(usize),
    OneOf(&'static [usize]),
    AtLeast(usize),
    Any,
}

impl Arity {
    /// Tests whether the given argument count satisfies this arity constraint.
    ///
    /// # Example
    /// ```
    /// use nepa::interpreter::evaluator::function::core::Arity;
    ///
    /// assert!(Arity::OneOf(&[1, 2]).check(2));
    /// assert!(!Arity::Exact(1).check(0));
    /// assert!(Arity::AtLeast(1).check(5));
    /// ```
    #[must_use]
    pub fn check(&self, n: usize) -> bool {
        match self {
            Self::Exact(m) => n == *m,
            Self::OneOf(arr) => arr.contains(&n),
            Self::AtLeast(m) => n >= *m,
            Self::Any => true,
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact(n) => write!(f, "{n}"),
            Self::OneOf(options) => {
                let options: Vec<String> = options.iter().map(ToString::to_string).collect();
                write!(f, "{}", options.join(" o "))
            },
            Self::AtLeast(n) => write!(f, "al menos {n}"),
            Self::Any => write!(f, "cualquier cantidad de"),
        }
    }
}

/// How a builtin is implemented.
#[derive(Debug, Clone, Copy)]
pub enum Builtin {
    /// Needs only its arguments.
    Pure(PureFn),
    /// Needs the context (output, registry, bindings).
    Contextual(ContextFn),
    /// `convertir_<tipo>`: runs the registry constructor of the named type.
    Conversion(&'static str),
}

/// A registered builtin.
#[derive(Debug, Clone, Copy)]
pub struct BuiltinDef {
    /// Accepted argument counts.
    pub arity:   Arity,
    /// Implementation.
    pub builtin: Builtin,
}

/// Builtins that update the place their first argument was read from.
const MUTATORS: &[&str] = &["agregar"];

/// Methods registered as `<tipo>.<metodo>` aliases of the builtin with the
/// same name; the receiver becomes the first argument.
const METHODS: &[(&str, &[&str])] = &[("longitud", &["texto", "cadena", "lista", "matriz", "diccionario"]),
                                      ("mayusculas", &["texto", "cadena", "caracter"]),
                                      ("minusculas", &["texto", "cadena", "caracter"]),
                                      ("recortar", &["texto", "cadena"]),
                                      ("dividir", &["texto", "cadena"]),
                                      ("contiene", &["texto", "cadena", "lista", "diccionario"]),
                                      ("agregar", &["lista"]),
                                      ("ordenar", &["lista"]),
                                      ("claves", &["diccionario"]),
                                      ("valores", &["diccionario"]),
                                      ("a_json", &["lista", "diccionario", "matriz"])];

/// The table of builtin functions and methods.
///
/// Populated by [`FunctionRegistry::bootstrap`], which lists every library
/// module explicitly; nothing registers itself on load.
#[derive(Debug, Clone, Default)]
pub struct FunctionRegistry {
    entries: HashMap<String, BuiltinDef>,
}

impl FunctionRegistry {
    /// Registers every builtin library, the conversions and the methods.
    ///
    /// # Example
    /// ```
    /// use nepa::interpreter::evaluator::function::core::FunctionRegistry;
    ///
    /// let functions = FunctionRegistry::bootstrap();
    /// assert!(functions.contains("imprimir"));
    /// assert!(functions.contains("convertir_entero"));
    /// assert!(functions.contains("lista.agregar"));
    /// assert!(!functions.contains("print"));
    /// ```
    #[must_use]
    pub fn bootstrap() -> Self {
        let mut registry = Self::default();
        for table in [print::TABLE,
                      general::TABLE,
                      collections::TABLE,
                      text::TABLE,
                      io::TABLE,
                      math::TABLE]
        {
            for (name, arity, builtin) in table {
                registry.register(name, *arity, *builtin);
            }
        }
        convert::register_conversions(&mut registry);
        for (function, types) in METHODS {
            if let Some(def) = registry.get(function) {
                for type_name in *types {
                    registry.register(&format!("{type_name}.{function}"), def.arity, def.builtin);
                }
            }
        }
        registry
    }

    /// Adds or replaces a builtin.
    pub fn register(&mut self, name: &str, arity: Arity, builtin: Builtin) {
        self.entries.insert(name.to_string(), BuiltinDef { arity, builtin });
    }

    /// Looks a builtin up by exact name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<BuiltinDef> {
        self.entries.get(name).copied()
    }

    /// Returns `true` if `name` is a builtin.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Every builtin name, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl Context {
    /// Calls a function by name.
    ///
    /// User functions are looked up by their exact name, builtins by the
    /// lowercase name. Returns `Ok(None)` when neither exists so the caller
    /// can pick the error.
    ///
    /// # Errors
    /// `ArgumentCountMismatch` when the arity does not match, or whatever
    /// the function itself raises.
    pub fn call_function(&mut self, name: &str, args: Vec<Value>, line: usize) -> EvalResult<Option<Value>> {
        if let Some(def) = self.functions.get(name).cloned() {
            return self.call_user_defined_function(&def, args, line).map(Some);
        }

        let Some(def) = self.runtime.functions.get(&name.to_lowercase()) else {
            return Ok(None);
        };
        if !def.arity.check(args.len()) {
            return Err(RuntimeError::ArgumentCountMismatch { name: name.to_string(),
                                                             expected: def.arity.to_string(),
                                                             found: args.len(),
                                                             line });
        }
        trace!(name, arguments = args.len(), "builtin call");
        let result = match def.builtin {
            Builtin::Pure(func) => func(&args, line)?,
            Builtin::Contextual(func) => func(self, &args, line)?,
            Builtin::Conversion(type_name) => convert::convert(self, type_name, &args, line)?,
        };
        Ok(Some(result))
    }

    /// Evaluates a call written as `nombre(args)` or in command form.
    ///
    /// An unknown name is an `UnrecognizedInstruction` for call statements
    /// and an `UnknownFunction` inside expressions.
    pub(crate) fn eval_call(&mut self,
                            name: &str,
                            arguments: &[Expr],
                            line: usize,
                            statement: bool)
                            -> EvalResult<Value> {
        let values = arguments.iter()
                              .map(|argument| self.eval(argument))
                              .collect::<EvalResult<Vec<_>>>()?;
        let result = self.call_function(name, values, line)?.ok_or_else(|| {
                                                                  if statement {
                                                                      RuntimeError::UnrecognizedInstruction { name: name.to_string(),
                                                                                                              line }
                                                                  } else {
                                                                      RuntimeError::UnknownFunction { name: name.to_string(),
                                                                                                      line }
                                                                  }
                                                              })?;
        if MUTATORS.contains(&name.to_lowercase().as_str())
           && let Some(target) = arguments.first().and_then(place_of)
        {
            self.assign(&target, &result, line)?;
        }
        Ok(result)
    }

    /// Evaluates `receptor.metodo(args)` through the `<tipo>.<metodo>`
    /// builtin of the receiver's runtime type.
    pub(crate) fn eval_method_call(&mut self,
                                   receiver: &Expr,
                                   method: &str,
                                   arguments: &[Expr],
                                   line: usize)
                                   -> EvalResult<Value> {
        let value = self.eval(receiver)?;
        let place = match &value {
            Value::Pointer(Pointer::Named(name)) => Some(AssignTarget::Variable(name.clone())),
            _ => place_of(receiver),
        };
        let value = self.deref_if_pointer(value, line)?;
        let key = format!("{}.{method}", value.type_name());

        let mut values = Vec::with_capacity(arguments.len() + 1);
        values.push(value);
        for argument in arguments {
            values.push(self.eval(argument)?);
        }

        let result = self.call_function(&key, values, line)?
                         .ok_or_else(|| RuntimeError::UnknownFunction { name: key.clone(),
                                                                        line })?;
        if MUTATORS.contains(&method)
           && let Some(target) = place
        {
            self.assign(&target, &result, line)?;
        }
        Ok(result)
    }
}
