use std::{collections::HashMap, fmt, sync::Arc};

use parking_lot::RwLock;
use tracing::trace;

use crate::{
    ast::{Expr, FunctionDef},
    error::RuntimeError,
    interpreter::{
        evaluator::{
            function::{core::FunctionRegistry, print::SharedPrintHandler},
            statement::HandlerTable,
        },
        registry::Registry,
        value::{
            core::{Pointer, Value},
            literal::parse_valor,
        },
    },
};

/// Result type used by the evaluator.
///
/// All evaluation functions return either a value of type `T` or a
/// `RuntimeError` describing the failure.
pub type EvalResult<T> = Result<T, RuntimeError>;

/// Maximum nesting of user function calls.
pub const MAX_CALL_DEPTH: usize = 256;

/// Global bindings shared by every program of one run.
pub type SharedGlobals = Arc<RwLock<HashMap<String, Value>>>;

/// How a statement or block finished.
#[derive(Debug, Clone, PartialEq)]
pub enum Flow {
    /// Fell through; the next statement runs.
    Continue,
    /// `rompe`: leave the nearest loop.
    Break,
    /// `regresa`: leave the current function with a value.
    Return(Value),
    /// `ejecutar` with no [`Invoker`] installed: whoever runs the block must
    /// run another program first.
    Invoke(Invocation),
}

/// A request to run another program, raised by `ejecutar`.
#[derive(Debug, Clone, PartialEq)]
pub struct Invocation {
    /// Path as written, resolved by the driver.
    pub path:      String,
    /// Positional arguments, bound to `argumentos` in the callee.
    pub arguments: Vec<Value>,
    /// Line of the `ejecutar` statement.
    pub line:      usize,
}

/// Runs the sub-program an `ejecutar` asks for.
///
/// When a context has an invoker, an `ejecutar` inside a loop or a
/// conditional is serviced on the spot and the block goes on with its next
/// statement.
pub trait Invoker: fmt::Debug {
    /// Runs `invocation` to completion.
    fn invoke(&self, invocation: Invocation) -> EvalResult<()>;
}

/// Everything a context needs that outlives a single program: the variable
/// registry, the builtin table, the statement handlers and the output sink.
///
/// A runtime is assembled once, by an explicit bootstrap, and shared by the
/// contexts of every program and sub-program of a run.
#[derive(Debug)]
pub struct Runtime {
    /// Process-wide symbol and constructor tables.
    pub registry:  Arc<Registry>,
    /// Builtin functions and methods.
    pub functions: FunctionRegistry,
    /// Statement handlers keyed by node kind.
    pub handlers:  HandlerTable,
    /// Where program output goes.
    pub output:    SharedPrintHandler,
}

impl Runtime {
    /// Builds a runtime with every builtin type, function and handler.
    #[must_use]
    pub fn new(output: SharedPrintHandler) -> Self {
        Self { registry: Arc::new(Registry::with_builtin_types()),
               functions: FunctionRegistry::bootstrap(),
               handlers: HandlerTable::with_builtin_handlers(),
               output }
    }
}

/// Stores the execution state of one program.
///
/// Identifiers resolve in the order constants, local scopes (innermost
/// first), shared globals and finally the registry.
///
/// ## Usage
///
/// A `Context` is created per program. The driver feeds it top-level
/// statements one at a time through
/// [`Context::exec_statement`](crate::interpreter::evaluator::core::Context::exec_statement)
/// and services a returned [`Flow::Invoke`] between two of them. Nested
/// blocks hand their invocations to the context's [`Invoker`].
#[derive(Debug)]
pub struct Context {
    /// Local scopes; the first is the frame of the program or function.
    pub scope_stack:       Vec<HashMap<String, Value>>,
    /// Bindings shared with every other program of the run.
    pub globals:           SharedGlobals,
    /// Write-once bindings.
    pub constants:         HashMap<String, Value>,
    /// User functions defined so far.
    pub functions:         HashMap<String, Arc<FunctionDef>>,
    /// Shared runtime services.
    pub runtime:           Arc<Runtime>,
    /// Services `ejecutar` inside nested blocks.
    pub invoker:           Option<Arc<dyn Invoker>>,
    pub(crate) call_depth: usize,
    pub(crate) loop_depth: usize,
}

impl Context {
    /// Creates a context for one program.
    #[must_use]
    pub fn new(runtime: Arc<Runtime>, globals: SharedGlobals) -> Self {
        Self { scope_stack: vec![HashMap::new()],
               globals,
               constants: HashMap::new(),
               functions: HashMap::new(),
               runtime,
               invoker: None,
               call_depth: 0,
               loop_depth: 0 }
    }

    /// Returns `true` while a user function body is running.
    #[must_use]
    pub const fn in_function(&self) -> bool {
        self.call_depth > 0
    }

    /// Evaluates an expression.
    ///
    /// # Example
    /// ```
    /// use std::sync::Arc;
    ///
    /// use nepa::{
    ///     ast::Expr,
    ///     interpreter::{
    ///         evaluator::{
    ///             core::{Context, Runtime},
    ///             function::print::PrintHandler,
    ///         },
    ///         value::core::Value,
    ///     },
    /// };
    ///
    /// let runtime = Arc::new(Runtime::new(PrintHandler::silent()));
    /// let mut context = Context::new(runtime, Default::default());
    /// let list = Expr::List { elements: vec![Expr::Literal { value: Value::Integer(1),
    ///                                                        line:  1, }],
    ///                         line:     1, };
    /// assert_eq!(context.eval(&list).unwrap(), Value::List(vec![Value::Integer(1)]));
    /// ```
    pub fn eval(&mut self, expr: &Expr) -> EvalResult<Value> {
        trace!(line = expr.line_number(), "eval");
        match expr {
            Expr::Literal { value, .. } => Ok(value.clone()),
            Expr::Variable { name, line } => self.lookup(name).ok_or_else(|| {
                                                 RuntimeError::UnknownIdentifier { name: name.clone(),
                                                                                   line: *line, }
                                             }),
            Expr::Unary { op, expr, line } => {
                let value = self.eval(expr)?;
                Self::eval_unary(*op, &value, *line)
            },
            Expr::Binary { left,
                           op,
                           right,
                           line, } => self.eval_binary_expr(left, *op, right, *line),
            Expr::Call { name,
                         arguments,
                         line, } => self.eval_call(name, arguments, *line, false),
            Expr::MethodCall { receiver,
                               method,
                               arguments,
                               line, } => self.eval_method_call(receiver, method, arguments, *line),
            Expr::Index { target, index, line } => {
                let target = self.eval(target)?;
                let index = self.eval(index)?;
                let target = self.deref_if_pointer(target, *line)?;
                Self::index_value(&target, &index, *line)
            },
            Expr::Field { target, field, line } => {
                let target = self.eval(target)?;
                let target = self.deref_if_pointer(target, *line)?;
                Self::field_value(&target, field, *line)
            },
            Expr::Reference { expr, line } => self.eval_reference(expr, *line),
            Expr::Deref { expr, line } => {
                let value = self.eval(expr)?;
                self.deref(&value, *line)
            },
            Expr::Cast { type_name,
                         pointer,
                         expr,
                         line, } => self.eval_cast(type_name, *pointer, expr, *line),
            Expr::List { elements, .. } => {
                elements.iter().map(|e| self.eval(e)).collect::<EvalResult<_>>().map(Value::List)
            },
            Expr::Dict { entries, .. } => {
                let mut map = std::collections::BTreeMap::new();
                for (key, value) in entries {
                    let key = self.eval(key)?.text_form();
                    let value = self.eval(value)?;
                    map.insert(key, value);
                }
                Ok(Value::Dictionary(map))
            },
            Expr::Raw { text, .. } => Ok(parse_valor(text)),
        }
    }

    /// Evaluates a declaration initializer.
    ///
    /// A bare identifier that names nothing is taken as literal text, so
    /// `variable texto t := hola` stores `"hola"`.
    pub fn eval_initializer(&mut self, expr: &Expr) -> EvalResult<Value> {
        match expr {
            Expr::Variable { name, .. } if self.lookup(name).is_none() => Ok(Value::String(name.clone())),
            other => self.eval(other),
        }
    }

    /// Resolves an identifier: constants, then local scopes, then globals,
    /// then the registry.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<Value> {
        if let Some(value) = self.constants.get(name) {
            return Some(value.clone());
        }
        if let Some(value) = self.scope_stack.iter().rev().find_map(|scope| scope.get(name)) {
            return Some(value.clone());
        }
        if let Some(value) = self.globals.read().get(name) {
            return Some(value.clone());
        }
        self.runtime.registry.get(name)
    }

    /// Opens a new innermost scope.
    pub fn push_scope(&mut self) {
        self.scope_stack.push(HashMap::new());
    }

    /// Closes the innermost scope. The frame scope is never removed.
    pub fn pop_scope(&mut self) {
        if self.scope_stack.len() > 1 {
            self.scope_stack.pop();
        }
    }

    /// Binds `name` in the innermost scope, shadowing outer bindings.
    pub fn define_local(&mut self, name: &str, value: Value) {
        if let Some(scope) = self.scope_stack.last_mut() {
            scope.insert(name.to_string(), value);
        }
    }

    /// The nearest local slot holding `name`.
    pub(crate) fn local_mut(&mut self, name: &str) -> Option<&mut Value> {
        self.scope_stack.iter_mut().rev().find_map(|scope| scope.get_mut(name))
    }

    /// Dereferences a pointer value.
    ///
    /// # Errors
    /// `NullPointer` for a null pointer, `NotAPointer` for anything that is
    /// not a pointer, `UnknownIdentifier` when the pointee no longer exists.
    pub fn deref(&self, value: &Value, line: usize) -> EvalResult<Value> {
        match value {
            Value::Pointer(Pointer::Named(name)) => {
                self.lookup(name).ok_or_else(|| RuntimeError::UnknownIdentifier { name: name.clone(),
                                                                                   line })
            },
            Value::Pointer(Pointer::Value(inner)) => Ok((**inner).clone()),
            Value::Pointer(Pointer::Null) | Value::Object(None) => Err(RuntimeError::NullPointer { line }),
            other => Err(RuntimeError::NotAPointer { found: other.to_string(),
                                                     line }),
        }
    }

    /// Follows pointers until a non-pointer value is reached.
    pub(crate) fn deref_if_pointer(&self, value: Value, line: usize) -> EvalResult<Value> {
        let mut current = value;
        for _ in 0..MAX_CALL_DEPTH {
            if !matches!(current, Value::Pointer(_)) {
                return Ok(current);
            }
            current = self.deref(&current, line)?;
        }
        Err(RuntimeError::mismatch("cadena de punteros demasiado larga", line))
    }

    /// `&x` names the binding `x`; `&(expresion)` points at a temporary.
    fn eval_reference(&mut self, expr: &Expr, line: usize) -> EvalResult<Value> {
        if let Expr::Variable { name, .. } = expr {
            if self.lookup(name).is_none() {
                return Err(RuntimeError::UnknownIdentifier { name: name.clone(),
                                                             line });
            }
            return Ok(Value::Pointer(Pointer::Named(name.clone())));
        }
        let value = self.eval(expr)?;
        Ok(Value::Pointer(Pointer::Value(Box::new(value))))
    }

    /// Casts go through the `convertir_<tipo>` builtin of the target type.
    fn eval_cast(&mut self, type_name: &str, pointer: bool, expr: &Expr, line: usize) -> EvalResult<Value> {
        let value = self.eval(expr)?;
        let value = if pointer { self.deref_if_pointer(value, line)? } else { value };
        let converted = self.call_function(&format!("convertir_{type_name}"), vec![value], line)?
                            .ok_or_else(|| RuntimeError::UnknownFunction { name: format!("convertir_{type_name}"),
                                                                           line })?;
        Ok(if pointer {
               Value::Pointer(Pointer::Value(Box::new(converted)))
           } else {
               converted
           })
    }
}
