use std::{collections::HashMap, fmt, sync::Arc};

use tracing::debug;

use crate::{
    ast::{AssignTarget, Block, DeclarationScope, Expr, Statement, TypeSpec},
    error::{RegistryError, RuntimeError},
    interpreter::{
        evaluator::core::{Context, EvalResult, Flow, Invocation},
        registry::Registry,
        value::core::{Pointer, Value},
    },
};

/// A statement handler. Handlers receive the statement they were registered
/// for and report how control continues.
pub type Handler = fn(&mut Context, &Statement) -> EvalResult<Flow>;

/// Statement handlers keyed by node kind name (`declarar`, `si_es`, ...).
///
/// The built-in set covers every kind the parser produces; embedders may
/// replace any of them or add handlers before the runtime is shared.
///
/// # Example
/// ```
/// use nepa::interpreter::evaluator::{core::Flow, statement::HandlerTable};
///
/// let mut table = HandlerTable::with_builtin_handlers();
/// assert!(table.get("mientras").is_some());
/// table.register("error", |_, _| Ok(Flow::Continue));
/// assert!(table.get("desconocido").is_none());
/// ```
#[derive(Clone, Default)]
pub struct HandlerTable {
    handlers: HashMap<String, Handler>,
}

impl fmt::Debug for HandlerTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut kinds: Vec<_> = self.handlers.keys().collect();
        kinds.sort();
        f.debug_struct("HandlerTable").field("kinds", &kinds).finish()
    }
}

impl HandlerTable {
    /// The table with every built-in statement kind.
    #[must_use]
    pub fn with_builtin_handlers() -> Self {
        let mut table = Self::default();
        for (kind, handler) in [("declarar", declare as Handler),
                                ("global", declare),
                                ("constante", declare),
                                ("asignar", assign),
                                ("si_es", conditional),
                                ("mientras", while_loop),
                                ("para", for_loop),
                                ("funcion", define_function),
                                ("regresa", return_value),
                                ("rompe", break_loop),
                                ("bloque", block),
                                ("llamada", call),
                                ("ejecutar", invoke),
                                ("expresion", expression),
                                ("error", inert)]
        {
            table.register(kind, handler);
        }
        table
    }

    /// Adds or replaces the handler for `kind`.
    pub fn register(&mut self, kind: &str, handler: Handler) {
        self.handlers.insert(kind.to_string(), handler);
    }

    /// The handler for `kind`, if any.
    #[must_use]
    pub fn get(&self, kind: &str) -> Option<Handler> {
        self.handlers.get(kind).copied()
    }
}

impl Context {
    /// Executes one statement through the handler table.
    pub fn exec_statement(&mut self, statement: &Statement) -> EvalResult<Flow> {
        let kind = statement.kind();
        let line = statement.line_number();
        debug!(kind, line, "statement");
        let handler = self.runtime
                          .handlers
                          .get(kind)
                          .ok_or_else(|| RuntimeError::UnrecognizedInstruction { name: kind.to_string(),
                                                                                 line })?;
        handler(self, statement)
    }

    /// Executes statements in order, stopping at the first one that does not
    /// fall through.
    ///
    /// An invocation goes to the context's invoker, if any, and execution
    /// resumes with the next statement.
    pub fn exec_statements(&mut self, statements: &[Statement]) -> EvalResult<Flow> {
        for statement in statements {
            match self.exec_statement(statement)? {
                Flow::Continue => {},
                Flow::Invoke(invocation) => match &self.invoker {
                    Some(invoker) => invoker.invoke(invocation)?,
                    None => return Ok(Flow::Invoke(invocation)),
                },
                other => return Ok(other),
            }
        }
        Ok(Flow::Continue)
    }

    /// Executes a nested block in its own scope.
    pub fn exec_block(&mut self, block: &Block) -> EvalResult<Flow> {
        self.push_scope();
        let flow = self.exec_statements(&block.statements);
        self.pop_scope();
        flow
    }

    /// Runs `body` with the loop depth raised, restoring it on every exit.
    pub(crate) fn in_loop<T>(&mut self, body: impl FnOnce(&mut Self) -> EvalResult<T>) -> EvalResult<T> {
        self.loop_depth += 1;
        let result = body(self);
        self.loop_depth -= 1;
        result
    }

    /// Evaluates a condition; it must convert to a boolean.
    pub(crate) fn condition(&mut self, expr: &Expr) -> EvalResult<bool> {
        let value = self.eval(expr)?;
        value.to_boolean()
             .map_err(|_| RuntimeError::ExpectedBoolean { found: value.to_string(),
                                                          line:  expr.line_number(), })
    }

    /// Builds the value of one declared name.
    fn declared_value(&self,
                      type_spec: Option<&TypeSpec>,
                      name: &str,
                      initial: Option<&Value>,
                      line: usize)
                      -> EvalResult<Value> {
        match type_spec {
            Some(spec) => self.runtime
                              .registry
                              .construct_typed(spec, name, initial)
                              .map_err(|e| RuntimeError::registry(e, line)),
            None => Ok(initial.cloned().unwrap_or(Value::Object(None))),
        }
    }

    /// Assigns to a plain name.
    ///
    /// The nearest local binding is updated first, then a global, then a
    /// registry symbol; the stored value keeps its kind. An unbound name
    /// becomes a new binding in the current frame.
    pub fn assign_variable(&mut self, name: &str, value: &Value, line: usize) -> EvalResult<()> {
        if self.constants.contains_key(name) {
            return Err(RuntimeError::AssignmentToConstant { name: name.to_string(),
                                                            line });
        }
        let top_level = !self.in_function();
        if let Some(slot) = self.local_mut(name) {
            slot.assign_from_any(value)
                .map_err(|e| RuntimeError::conversion(e, line))?;
            let stored = slot.clone();
            if top_level && self.runtime.registry.contains(name) {
                self.runtime
                    .registry
                    .replace(name, stored)
                    .map_err(|e| RuntimeError::registry(e, line))?;
            }
            return Ok(());
        }
        if let Some(slot) = self.globals.write().get_mut(name) {
            return slot.assign_from_any(value)
                       .map_err(|e| RuntimeError::conversion(e, line));
        }
        if self.runtime.registry.contains(name) {
            self.runtime
                .registry
                .modify(name, value)
                .map_err(|e| RuntimeError::registry(e, line))?;
            return Ok(());
        }
        if let Some(frame) = self.scope_stack.first_mut() {
            frame.insert(name.to_string(), value.clone());
        }
        Ok(())
    }

    /// Assigns to any target: a name, an indexed or keyed path, or the
    /// binding a pointer names.
    pub fn assign(&mut self, target: &AssignTarget, value: &Value, line: usize) -> EvalResult<()> {
        match target {
            AssignTarget::Variable(name) => self.assign_variable(name, value, line),
            AssignTarget::Path { root, steps } => {
                if self.constants.contains_key(root) {
                    return Err(RuntimeError::AssignmentToConstant { name: root.clone(),
                                                                    line });
                }
                let mut current = self.lookup(root)
                                      .ok_or_else(|| RuntimeError::UnknownIdentifier { name: root.clone(),
                                                                                       line })?;
                let keys = self.eval_accessors(steps)?;
                Self::store_at(&mut current, &keys, value.clone(), line)?;
                self.assign_variable(root, &current, line)
            },
            AssignTarget::Deref(expr) => match self.eval(expr)? {
                Value::Pointer(Pointer::Named(name)) => {
                    self.assign_variable(&name, value, line)
                },
                pointer if pointer.is_null() => Err(RuntimeError::NullPointer { line }),
                Value::Pointer(_) => Err(RuntimeError::mismatch("el puntero no apunta a una variable", line)),
                other => Err(RuntimeError::NotAPointer { found: other.to_string(),
                                                         line }),
            },
        }
    }
}

fn mismatched(statement: &Statement) -> RuntimeError {
    RuntimeError::UnrecognizedInstruction { name: statement.kind().to_string(),
                                            line: statement.line_number(), }
}

/// `variable`, `global` and `constante`.
///
/// At program level a `variable` is created (or re-created) in the registry
/// and mirrored into the local scope; inside a function it is local only.
fn declare(context: &mut Context, statement: &Statement) -> EvalResult<Flow> {
    let Statement::Declaration { scope,
                                 type_spec,
                                 names,
                                 value,
                                 line, } = statement
    else {
        return Err(mismatched(statement));
    };
    let line = *line;
    let initial = value.as_ref().map(|expr| context.eval_initializer(expr)).transpose()?;

    for name in names {
        let value = context.declared_value(type_spec.as_ref(), name, initial.as_ref(), line)?;
        match scope {
            DeclarationScope::Variable => {
                let value = if context.in_function() {
                    value
                } else {
                    redeclare(&context.runtime.registry, name, value)
                        .map_err(|e| RuntimeError::registry(e, line))?
                };
                context.define_local(name, value);
            },
            DeclarationScope::Global => {
                context.globals.write().insert(name.clone(), value);
            },
            DeclarationScope::Constant => {
                if context.constants.contains_key(name) {
                    return Err(RuntimeError::ConstantRedefinition { name: name.clone(),
                                                                    line });
                }
                context.constants.insert(name.clone(), value);
            },
        }
    }
    Ok(Flow::Continue)
}

/// Creates a program-level symbol or updates an existing one.
///
/// Declaring a name again with the same kind modifies it in place; a
/// different kind rebinds the name to the new declaration.
fn redeclare(registry: &Registry, name: &str, value: Value) -> Result<Value, RegistryError> {
    match registry.get(name) {
        None => registry.insert(name, value.clone()).map(|()| value),
        Some(existing) if existing.kind() == value.kind() => registry.modify(name, &value),
        Some(_) => registry.replace(name, value.clone()).map(|()| value),
    }
}

fn assign(context: &mut Context, statement: &Statement) -> EvalResult<Flow> {
    let Statement::Assignment { target, value, line } = statement else {
        return Err(mismatched(statement));
    };
    let value = context.eval(value)?;
    context.assign(target, &value, *line)?;
    Ok(Flow::Continue)
}

fn conditional(context: &mut Context, statement: &Statement) -> EvalResult<Flow> {
    let Statement::Conditional { branches,
                                 otherwise,
                                 .. } = statement
    else {
        return Err(mismatched(statement));
    };
    for (condition, body) in branches {
        if context.condition(condition)? {
            return context.exec_block(body);
        }
    }
    otherwise.as_ref().map_or(Ok(Flow::Continue), |body| context.exec_block(body))
}

fn while_loop(context: &mut Context, statement: &Statement) -> EvalResult<Flow> {
    let Statement::While { condition, body, .. } = statement else {
        return Err(mismatched(statement));
    };
    context.in_loop(|context| {
               while context.condition(condition)? {
                   match context.exec_block(body)? {
                       Flow::Continue => {},
                       Flow::Break => break,
                       other => return Ok(other),
                   }
               }
               Ok(Flow::Continue)
           })
}

fn for_loop(context: &mut Context, statement: &Statement) -> EvalResult<Flow> {
    let Statement::For { variable,
                         source,
                         body,
                         line, } = statement
    else {
        return Err(mismatched(statement));
    };
    context.eval_for(variable, source, body, *line)
}

fn define_function(context: &mut Context, statement: &Statement) -> EvalResult<Flow> {
    let Statement::Function(def) = statement else {
        return Err(mismatched(statement));
    };
    if context.runtime.functions.contains(&def.name.to_lowercase()) {
        return Err(RuntimeError::BuiltinRedefinition { name: def.name.clone(),
                                                       line: def.line, });
    }
    if context.functions.contains_key(&def.name) {
        return Err(RuntimeError::FunctionAlreadyDefined { name: def.name.clone(),
                                                          line: def.line, });
    }
    context.functions.insert(def.name.clone(), Arc::new(def.clone()));
    Ok(Flow::Continue)
}

fn return_value(context: &mut Context, statement: &Statement) -> EvalResult<Flow> {
    let Statement::Return { value, .. } = statement else {
        return Err(mismatched(statement));
    };
    let value = match value {
        Some(expr) => context.eval(expr)?,
        None => Value::Integer(0),
    };
    Ok(Flow::Return(value))
}

fn break_loop(context: &mut Context, statement: &Statement) -> EvalResult<Flow> {
    if context.loop_depth == 0 {
        return Err(RuntimeError::BreakOutsideLoop { line: statement.line_number() });
    }
    Ok(Flow::Break)
}

fn block(context: &mut Context, statement: &Statement) -> EvalResult<Flow> {
    let Statement::Block(block) = statement else {
        return Err(mismatched(statement));
    };
    context.exec_block(block)
}

/// A call statement; an unknown name is an unrecognized instruction.
fn call(context: &mut Context, statement: &Statement) -> EvalResult<Flow> {
    let Statement::Call { name,
                          arguments,
                          line, } = statement
    else {
        return Err(mismatched(statement));
    };
    context.eval_call(name, arguments, *line, true)?;
    Ok(Flow::Continue)
}

fn invoke(context: &mut Context, statement: &Statement) -> EvalResult<Flow> {
    let Statement::Invoke { path,
                            arguments,
                            line, } = statement
    else {
        return Err(mismatched(statement));
    };
    if context.in_function() {
        return Err(RuntimeError::NestedInvocation { line: *line });
    }
    let path = context.eval_initializer(path)?.text_form();
    let arguments = arguments.iter()
                             .map(|argument| context.eval(argument))
                             .collect::<EvalResult<_>>()?;
    Ok(Flow::Invoke(Invocation { path,
                                 arguments,
                                 line: *line }))
}

/// A bare expression is evaluated and its value printed. Method calls are
/// run for their effect only.
fn expression(context: &mut Context, statement: &Statement) -> EvalResult<Flow> {
    let Statement::Expression { expr, .. } = statement else {
        return Err(mismatched(statement));
    };
    let value = context.eval(expr)?;
    if !matches!(expr, Expr::MethodCall { .. }) {
        context.runtime.output.print_line(&value.text_form());
    }
    Ok(Flow::Continue)
}

/// Lines that failed to parse do nothing when a program runs tolerantly.
fn inert(_: &mut Context, statement: &Statement) -> EvalResult<Flow> {
    if let Statement::Error { message, line } = statement {
        debug!(line, error = %message, "skipping line with parse error");
    }
    Ok(Flow::Continue)
}
