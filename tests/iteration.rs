use std::{
    io::{self, Write},
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
};

use nepa::{
    Interpreter,
    config::Config,
    error::{Error, RuntimeError},
    interpreter::{
        evaluator::{
            core::{Context, EvalResult, Flow, Runtime},
            function::print::PrintHandler,
        },
        parser::block::parse_program,
        value::{
            core::Value,
            object::{ExternalIterator, OpaqueObject},
        },
    },
};
use pretty_assertions::assert_eq;

fn run(src: &str) -> (Result<nepa::Bindings, Error>, Vec<String>) {
    let output = PrintHandler::buffer();
    let interpreter = Interpreter::with_output(Config::default(), Arc::clone(&output));
    let result = interpreter.run_source(src, Vec::new());
    (result, output.lines())
}

fn assert_prints(src: &str, expected: &[&str]) {
    let (result, lines) = run(src);
    if let Err(e) = result {
        panic!("Script failed: {e}\n{src}");
    }
    assert_eq!(lines, expected);
}

/// Yields the integers `1..=len` and counts how often its iterators are
/// released.
#[derive(Debug)]
struct Counter {
    len:      i64,
    released: Arc<AtomicUsize>,
}

struct Counting {
    next:     i64,
    len:      i64,
    released: Arc<AtomicUsize>,
}

impl OpaqueObject for Counter {
    fn type_name(&self) -> &'static str {
        "contador"
    }

    fn describe(&self) -> String {
        format!("<contador {}>", self.len)
    }

    fn iterate(&self) -> Option<io::Result<Box<dyn ExternalIterator>>> {
        Some(Ok(Box::new(Counting { next:     1,
                                    len:      self.len,
                                    released: Arc::clone(&self.released), })))
    }
}

impl ExternalIterator for Counting {
    fn pull(&mut self) -> io::Result<Option<Value>> {
        if self.next > self.len {
            return Ok(None);
        }
        self.next += 1;
        Ok(Some(Value::Integer(self.next - 1)))
    }
}

impl Drop for Counting {
    fn drop(&mut self) {
        self.released.fetch_add(1, Ordering::SeqCst);
    }
}

/// Runs `src` with a five-element `Counter` bound to `fuente`.
fn run_over_counter(src: &str) -> (EvalResult<Flow>, Vec<String>, usize) {
    let output = PrintHandler::buffer();
    let runtime = Arc::new(Runtime::new(Arc::clone(&output)));
    let (program, errors) = parse_program(src, &runtime.registry.type_names());
    assert!(errors.is_empty(), "unexpected parse errors: {errors:?}");

    let released = Arc::new(AtomicUsize::new(0));
    let mut context = Context::new(runtime, Default::default());
    context.define_local("fuente",
                         Value::Object(Some(Arc::new(Counter { len:      5,
                                                               released: Arc::clone(&released), }))));
    let flow = context.exec_statements(&program.statements);
    (flow, output.lines(), released.load(Ordering::SeqCst))
}

#[test]
fn text_yields_characters() {
    assert_prints("para c en \"hola\":\n    imprimir c\n", &["h", "o", "l", "a"]);
}

#[test]
fn dictionary_yields_sorted_keys_only() {
    assert_prints("variable diccionario d := {\"b\": 2, \"a\": 1}\npara k en d:\n    imprimir k\n",
                  &["a", "b"]);
}

#[test]
fn matrix_yields_rows() {
    assert_prints("variable matriz m := [[1, 2], [3, 4]]\npara fila en m:\n    imprimir fila\n",
                  &["[1, 2]", "[3, 4]"]);
}

#[test]
fn scalar_source_runs_once() {
    assert_prints("para x en 5:\n    imprimir x\n", &["5"]);
}

#[test]
fn rompe_leaves_only_the_innermost_loop() {
    assert_prints("para x en [1, 2, 3, 4]:\n    si_es x == 3:\n        rompe\n    imprimir x\n",
                  &["1", "2"]);

    let src = "para i desde 1 hasta 2:\n    \
                   para j desde 1 hasta 3:\n        \
                       si_es j == 2:\n            \
                           rompe\n        \
                       imprimir i * 10 + j\n";
    assert_prints(src, &["11", "21"]);
}

#[test]
fn real_increments_yield_reals() {
    assert_prints("para x desde 0 hasta 1 incremento 0.5:\n    imprimir x\n", &["0", "0.5", "1"]);
}

#[test]
fn non_numeric_bound_is_error() {
    let (result, lines) = run("para i desde \"a\" hasta 3:\n    imprimir i\n");
    assert!(matches!(result,
                     Err(Error::Runtime(RuntimeError::InvalidRangeBound { line: 1, .. }))));
    assert!(lines.is_empty());
}

#[test]
fn file_object_yields_lines() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "uno").unwrap();
    writeln!(file, "dos").unwrap();
    let path = file.path().display().to_string();

    assert_prints(&format!("para linea en abrir(\"{path}\"):\n    imprimir linea\n"),
                  &["uno", "dos"]);
    assert_prints(&format!("imprimir tipo(abrir(\"{path}\"))\n"), &["archivo"]);
}

#[test]
fn opening_a_missing_file_is_error() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("no_existe.txt").display().to_string();
    let (result, _) = run(&format!("abrir(\"{missing}\")\n"));
    assert!(matches!(result, Err(Error::Runtime(RuntimeError::Io { line: 1, .. }))));
}

#[test]
fn external_iterator_is_pulled_to_exhaustion() {
    let (flow, lines, released) = run_over_counter("para x en fuente:\n    imprimir x\n");
    assert_eq!(flow.unwrap(), Flow::Continue);
    assert_eq!(lines, vec!["1", "2", "3", "4", "5"]);
    assert_eq!(released, 1);
}

#[test]
fn external_iterator_is_released_on_break() {
    let src = "para x en fuente:\n    si_es x == 3:\n        rompe\n    imprimir x\n";
    let (flow, lines, released) = run_over_counter(src);
    assert_eq!(flow.unwrap(), Flow::Continue);
    assert_eq!(lines, vec!["1", "2"]);
    assert_eq!(released, 1);
}

#[test]
fn external_iterator_is_released_on_error() {
    let src = "para x en fuente:\n    si_es x == 2:\n        imprimir x / 0\n    imprimir x\n";
    let (flow, lines, released) = run_over_counter(src);
    assert!(matches!(flow, Err(RuntimeError::DivisionByZero { line: 3 })));
    assert_eq!(lines, vec!["1"]);
    assert_eq!(released, 1);
}

#[test]
fn every_loop_opens_a_fresh_iterator() {
    let src = "para x en fuente:\n    rompe\npara y en fuente:\n    imprimir y\n";
    let (flow, lines, released) = run_over_counter(src);
    assert!(flow.is_ok());
    assert_eq!(lines, vec!["1", "2", "3", "4", "5"]);
    assert_eq!(released, 2);
}
