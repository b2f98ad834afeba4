//! # nepa
//!
//! nepa is an interpreter for a small, line-oriented scripting language with
//! Spanish keywords, indentation-structured blocks, a typed value model and
//! explicit pointers.
//!
//! A program runs through four stages: the [`interpreter::lexer`] turns text
//! into tokens, the [`interpreter::parser`] builds the syntax tree in
//! [`ast`], and the [`interpreter::evaluator`] executes it against the
//! values of [`interpreter::value`] and the shared
//! [`interpreter::registry`]. [`Interpreter`] ties the stages together and
//! services sub-program invocations.
//!
//! ```
//! use nepa::{Interpreter, config::Config, interpreter::evaluator::function::print::PrintHandler};
//!
//! let output = PrintHandler::buffer();
//! let interpreter = Interpreter::with_output(Config::default(), output.clone());
//! let bindings = interpreter.run_source("variable entero a := 2\na * 21\n", Vec::new())
//!                           .unwrap();
//! assert_eq!(output.lines(), vec!["42".to_string()]);
//! assert_eq!(bindings["a"], "2");
//! ```

#![warn(
    clippy::redundant_clone,
    clippy::needless_pass_by_value,
    clippy::similar_names,
    clippy::large_enum_variant,
    clippy::string_lit_as_bytes,
    clippy::match_same_arms,
    clippy::cargo,
    clippy::nursery,
    clippy::perf,
    clippy::style,
    clippy::suspicious,
    clippy::correctness,
    clippy::complexity,
    clippy::pedantic,
    //missing_docs,
)]
#![allow(clippy::missing_errors_doc)]

use std::{
    collections::{BTreeMap, HashMap},
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};

use tracing::{info, warn};

use crate::{
    ast::Block,
    config::Config,
    error::{Error, RuntimeError},
    interpreter::{
        evaluator::{
            core::{Context, EvalResult, Flow, Invocation, Invoker, Runtime, SharedGlobals},
            function::print::{PrintHandler, SharedPrintHandler},
        },
        parser::block::parse_program,
        value::core::Value,
    },
    messages::message,
};

/// Defines the structure of parsed code.
///
/// This module declares the expression and statement trees built by the
/// parser and walked by the evaluator. Every node carries its source line.
pub mod ast;
/// Interpreter settings loaded from a JSON file.
pub mod config;
/// Provides unified error types for parsing and evaluation.
///
/// This module defines all errors that can be raised while lexing, parsing,
/// coercing or evaluating code, and the top-level error of the driver.
///
/// # Responsibilities
/// - Defines error enums for every layer.
/// - Attaches line numbers and Spanish messages for the user.
pub mod error;
/// Orchestrates the entire process of code execution.
///
/// This module ties together lexing, parsing, evaluation, value
/// representations and the variable registry.
///
/// # Responsibilities
/// - Coordinates all core components: lexer, parser, evaluator and values.
/// - Provides the building blocks the driver in this crate assembles.
pub mod interpreter;
/// Installation of the `tracing` subscriber.
pub mod logging;
/// The numbered message catalog behind CLI and log texts.
pub mod messages;
/// General utilities for safe numeric conversion and helpers.
///
/// # Responsibilities
/// - Convert between `i64`, `usize` and `f64`, checking every narrowing.
/// - Format reals and decimals.
/// - Split literal text at top-level separators.
pub mod util;

/// Maximum nesting of `ejecutar` sub-program invocations.
pub const MAX_INVOCATION_DEPTH: usize = 16;

/// Name under which a program sees its positional arguments.
pub const ARGUMENTS: &str = "argumentos";

/// Bindings live at program end, by name, in display form.
pub type Bindings = BTreeMap<String, String>;

/// Runs programs against one runtime and one set of globals.
///
/// Sub-programs started with `ejecutar` share both with their caller, so
/// what one program leaves behind is visible to the programs run after it.
/// A sub-program runs to completion before the statement after its
/// `ejecutar`, at any nesting depth.
#[derive(Debug, Clone)]
pub struct Interpreter {
    runtime: Arc<Runtime>,
    globals: SharedGlobals,
    config:  Config,
}

impl Interpreter {
    /// An interpreter printing to standard output.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self::with_output(config, PrintHandler::stdout())
    }

    /// An interpreter printing through `output`.
    #[must_use]
    pub fn with_output(config: Config, output: SharedPrintHandler) -> Self {
        let globals = SharedGlobals::default();
        globals.write().extend(config.globals());
        Self { runtime: Arc::new(Runtime::new(output)),
               globals,
               config }
    }

    /// The runtime shared by every program of this interpreter.
    #[must_use]
    pub const fn runtime(&self) -> &Arc<Runtime> {
        &self.runtime
    }

    /// Runs program text. Sub-program paths resolve against the working
    /// directory and the configured `rutas`.
    pub fn run_source(&self, source: &str, arguments: Vec<Value>) -> Result<Bindings, Error> {
        let context = self.run_program(source, None, arguments, 0)?;
        Ok(visible_bindings(&context))
    }

    /// Reads and runs a program file.
    ///
    /// # Errors
    /// `Error::Io` when the file cannot be read, plus everything
    /// [`Interpreter::run_source`] reports.
    pub fn run_file(&self, path: &Path, arguments: Vec<Value>) -> Result<Bindings, Error> {
        let source = read_program(path)?;
        let context = self.run_program(&source, Some(path), arguments, 0)?;
        Ok(visible_bindings(&context))
    }

    fn parse(&self, source: &str, origin: &str) -> Result<Block, Error> {
        let (program, errors) = parse_program(source, &self.runtime.registry.type_names());
        if errors.is_empty() {
            return Ok(program);
        }
        if !self.config.tolerante {
            return Err(Error::Parse(errors));
        }
        warn!("{}", message(20, &[&errors.len().to_string()]));
        for error in errors.iter() {
            warn!(program = origin, "{error}");
        }
        Ok(program)
    }

    /// Runs one program and returns its finished context.
    fn run_program(&self,
                   source: &str,
                   origin: Option<&Path>,
                   arguments: Vec<Value>,
                   depth: usize)
                   -> Result<Context, Error> {
        let name = origin.map_or_else(|| "<texto>".to_string(), |path| path.display().to_string());
        info!("{}", message(10, &[&name]));
        let program = self.parse(source, &name)?;

        let mut context = Context::new(Arc::clone(&self.runtime), Arc::clone(&self.globals));
        context.invoker = Some(Arc::new(NestedInvoker { interpreter: self.clone(),
                                                        origin: origin.map(Path::to_path_buf),
                                                        depth }));
        context.define_local(ARGUMENTS, Value::List(arguments));

        for statement in &program.statements {
            match context.exec_statement(statement)? {
                Flow::Continue | Flow::Break => {},
                Flow::Return(_) => break,
                Flow::Invoke(invocation) => self.invoke(origin, invocation, depth)?,
            }
        }

        let count = context.scope_stack.first().map_or(0, HashMap::len) + context.constants.len();
        info!("{}", message(11, &[&name, &count.to_string()]));
        Ok(context)
    }

    /// Runs a sub-program and merges what it defined into the globals.
    fn invoke(&self, origin: Option<&Path>, invocation: Invocation, depth: usize) -> Result<(), Error> {
        if depth + 1 > MAX_INVOCATION_DEPTH {
            return Err(Error::InvocationDepth { limit: MAX_INVOCATION_DEPTH });
        }
        info!("{}", message(12, &[&invocation.path, &invocation.line.to_string()]));
        let path = self.resolve(origin, &invocation.path)
                       .ok_or_else(|| Error::ProgramNotFound(invocation.path.clone()))?;
        let source = read_program(&path)?;
        let child = self.run_program(&source, Some(&path), invocation.arguments, depth + 1)?;

        let own = program_bindings(&child).into_iter()
                                          .filter(|(name, _)| name != ARGUMENTS);
        self.globals.write().extend(own);
        Ok(())
    }

    /// Looks a sub-program up next to the invoking file, then in each of the
    /// configured `rutas`.
    fn resolve(&self, origin: Option<&Path>, requested: &str) -> Option<PathBuf> {
        let requested = Path::new(requested);
        if requested.is_absolute() {
            return requested.is_file().then(|| requested.to_path_buf());
        }
        let base = origin.and_then(Path::parent)
                         .map_or_else(PathBuf::new, Path::to_path_buf);
        std::iter::once(base).chain(self.config.rutas.iter().cloned())
                             .map(|dir| dir.join(requested))
                             .find(|candidate| candidate.is_file())
    }
}

/// Services `ejecutar` from the loops and conditionals of one program.
#[derive(Debug)]
struct NestedInvoker {
    interpreter: Interpreter,
    origin:      Option<PathBuf>,
    depth:       usize,
}

impl Invoker for NestedInvoker {
    fn invoke(&self, invocation: Invocation) -> EvalResult<()> {
        let line = invocation.line;
        self.interpreter
            .invoke(self.origin.as_deref(), invocation, self.depth)
            .map_err(|source| RuntimeError::SubProgram { source: Box::new(source),
                                                         line })
    }
}

fn read_program(path: &Path) -> Result<String, Error> {
    fs::read_to_string(path).map_err(|source| Error::Io { path: path.to_path_buf(),
                                                          source })
}

/// Bindings a program defined itself: its frame scope and its constants.
fn program_bindings(context: &Context) -> BTreeMap<String, Value> {
    let mut bindings = BTreeMap::new();
    if let Some(frame) = context.scope_stack.first() {
        bindings.extend(frame.iter().map(|(name, value)| (name.clone(), value.clone())));
    }
    bindings.extend(context.constants
                           .iter()
                           .map(|(name, value)| (name.clone(), value.clone())));
    bindings
}

/// Everything visible at program end: registry symbols, globals and the
/// program's own bindings, later sources shadowing earlier ones.
fn visible_bindings(context: &Context) -> Bindings {
    let mut bindings = context.runtime.registry.snapshot();
    bindings.extend(context.globals
                           .read()
                           .iter()
                           .map(|(name, value)| (name.clone(), value.clone())));
    bindings.extend(program_bindings(context));
    bindings.into_iter()
            .map(|(name, value)| (name, value.to_string()))
            .collect()
}
