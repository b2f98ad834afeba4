use std::sync::Arc;

use parking_lot::Mutex;

use crate::interpreter::{
    evaluator::{
        core::{Context, EvalResult},
        function::core::{Arity, Builtin},
    },
    value::core::Value,
};

/// Where program output goes.
///
/// The driver prints to standard output; tests and embedders capture lines
/// in a buffer or drop them.
#[derive(Debug)]
pub enum PrintHandler {
    /// Writes each line to standard output.
    Stdout,
    /// Keeps every line in memory.
    Buffer(Mutex<Vec<String>>),
    /// Discards output.
    Silent,
}

/// A print handler shared by every context of a run.
pub type SharedPrintHandler = Arc<PrintHandler>;

impl PrintHandler {
    /// A handler writing to standard output.
    #[must_use]
    pub fn stdout() -> SharedPrintHandler {
        Arc::new(Self::Stdout)
    }

    /// A handler capturing lines in memory.
    #[must_use]
    pub fn buffer() -> SharedPrintHandler {
        Arc::new(Self::Buffer(Mutex::new(Vec::new())))
    }

    /// A handler discarding everything.
    #[must_use]
    pub fn silent() -> SharedPrintHandler {
        Arc::new(Self::Silent)
    }

    /// Emits one line of output.
    pub fn print_line(&self, line: &str) {
        match self {
            Self::Stdout => println!("{line}"),
            Self::Buffer(lines) => lines.lock().push(line.to_string()),
            Self::Silent => {},
        }
    }

    /// A copy of the captured lines; empty unless buffering.
    ///
    /// # Example
    /// ```
    /// use nepa::interpreter::evaluator::function::print::PrintHandler;
    ///
    /// let output = PrintHandler::buffer();
    /// output.print_line("hola");
    /// assert_eq!(output.lines(), vec!["hola".to_string()]);
    /// assert!(PrintHandler::silent().lines().is_empty());
    /// ```
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        match self {
            Self::Buffer(lines) => lines.lock().clone(),
            Self::Stdout | Self::Silent => Vec::new(),
        }
    }

    /// Drains the captured lines.
    pub fn take(&self) -> Vec<String> {
        match self {
            Self::Buffer(lines) => std::mem::take(&mut *lines.lock()),
            Self::Stdout | Self::Silent => Vec::new(),
        }
    }
}

builtin_table! {
    "imprimir" => { arity: Arity::Any, func: Builtin::Contextual(print) },
}

/// Prints the text forms of its arguments separated by spaces and returns
/// `0`.
///
/// # Example
/// ```
/// use std::sync::Arc;
///
/// use nepa::interpreter::{
///     evaluator::{
///         core::{Context, Runtime},
///         function::print::{PrintHandler, print},
///     },
///     value::core::Value,
/// };
///
/// let output = PrintHandler::buffer();
/// let mut context = Context::new(Arc::new(Runtime::new(Arc::clone(&output))), Default::default());
/// print(&mut context, &[Value::String("x =".into()), Value::Real(2.5)], 1).unwrap();
/// assert_eq!(output.lines(), vec!["x = 2.5".to_string()]);
/// ```
pub fn print(context: &mut Context, args: &[Value], _line: usize) -> EvalResult<Value> {
    let text: Vec<String> = args.iter().map(Value::text_form).collect();
    context.runtime.output.print_line(&text.join(" "));
    Ok(Value::Integer(0))
}
