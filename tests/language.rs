use std::sync::Arc;

use nepa::{
    Interpreter,
    config::Config,
    error::{Error, RuntimeError},
    interpreter::{
        evaluator::{
            core::{Context, Flow, Runtime},
            function::print::PrintHandler,
        },
        parser::block::parse_program,
    },
};
use pretty_assertions::assert_eq;

/// Runs `src` and returns the result together with everything printed.
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

fn assert_success(src: &str) {
    if let (Err(e), _) = run(src) {
        panic!("Script failed: {e}\n{src}");
    }
}

fn runtime_error(src: &str) -> RuntimeError {
    match run(src).0 {
        Err(Error::Runtime(e)) => e,
        Err(other) => panic!("expected a runtime error, got {other}"),
        Ok(_) => panic!("Script succeeded but was expected to fail:\n{src}"),
    }
}

#[test]
fn declaration_and_addition() {
    assert_prints("variable entero a := 2\nvariable entero b := 3\nimprimir a + b\n", &["5"]);
    assert_prints("variable entero a, b := 2\nb := 3\nimprimir a + b\n", &["5"]);
}

#[test]
fn pointer_dereference_and_write_through() {
    assert_prints("variable texto t := \"hola\"\nvariable puntero p := &t\nimprimir *p\n",
                  &["hola"]);
    assert_prints("variable entero x := 1\nvariable puntero p := &x\n*p = 7\nimprimir x\n",
                  &["7"]);
}

#[test]
fn range_loop_prints_in_order() {
    assert_prints("para i desde 1 hasta 3:\n    imprimir i\n", &["1", "2", "3"]);
}

#[test]
fn range_direction_is_detected() {
    let (result, lines) = run("para i desde 10 hasta 1:\n    imprimir i\n");
    assert!(result.is_ok());
    let expected: Vec<String> = (1..=10).rev().map(|i| i.to_string()).collect();
    assert_eq!(lines, expected);

    assert_prints("para i desde 0 hasta 6 incremento 2:\n    imprimir i\n",
                  &["0", "2", "4", "6"]);
}

#[test]
fn zero_step_fails_before_the_body_runs() {
    let (result, lines) = run("para i desde 1 hasta 10 incremento 0:\n    imprimir i\n");
    assert!(matches!(result, Err(Error::Runtime(RuntimeError::ZeroStep { .. }))));
    assert!(lines.is_empty());
}

#[test]
fn range_bounds_are_recomputed_each_pass() {
    let src = "variable entero limite := 3\n\
               para i desde 1 hasta limite:\n    \
                   si_es i == 1:\n        \
                       limite := 5\n    \
                   imprimir i\n";
    assert_prints(src, &["1", "2", "3", "4", "5"]);
}

#[test]
fn division_keeps_precision() {
    assert_prints("imprimir 10 / 3\n", &["3.333333333333333"]);
    assert_prints("imprimir 10 % 3\n", &["1"]);
    assert_prints("imprimir 7 * 6\n", &["42"]);
}

#[test]
fn division_by_zero_is_error() {
    assert!(matches!(runtime_error("imprimir 10 / 0\n"), RuntimeError::DivisionByZero { line: 1 }));
    assert!(matches!(runtime_error("imprimir 10 % 0\n"), RuntimeError::DivisionByZero { line: 1 }));
}

#[test]
fn integers_beyond_double_precision_stay_exact() {
    let src = "variable entero a := 9007199254740993\n\
               imprimir a + 1\n\
               imprimir a - 2\n\
               imprimir a * 1\n\
               imprimir a % 2\n\
               imprimir a > 9007199254740992\n\
               imprimir a <= 9007199254740992\n";
    assert_prints(src,
                  &["9007199254740994", "9007199254740991", "9007199254740993", "1", "verdadero", "falso"]);
}

#[test]
fn text_pairs_order_numerically_or_lexicographically() {
    assert_prints("imprimir \"10\" > \"9\"\nimprimir \"abc\" < \"abd\"\nimprimir \"10\" > \"9a\"\n",
                  &["verdadero", "verdadero", "falso"]);
}

#[test]
fn text_concatenation() {
    assert_prints("variable texto t := \"ho\"\nimprimir t + \"la\"\n", &["hola"]);
    assert_prints("imprimir \"n = \" + 3\n", &["n = 3"]);
}

#[test]
fn conditionals_pick_one_branch() {
    let src = "variable entero a := 1\n\
               si_es a > 1:\n    imprimir \"mayor\"\n\
               pero_si a == 1:\n    imprimir \"uno\"\n\
               si_no:\n    imprimir \"menor\"\n";
    assert_prints(src, &["uno"]);
}

#[test]
fn while_loop_with_break() {
    let src = "variable entero a := 0\n\
               mientras a < 10:\n    \
                   a := a + 1\n    \
                   si_es a == 5:\n        \
                       rompe\n\
               imprimir a\n";
    assert_prints(src, &["5"]);
}

#[test]
fn functions_return_values() {
    let src = "funcion suma(entero x, y):\n    regresa x + y\nimprimir suma(1, 2)\n";
    assert_prints(src, &["3"]);

    let src = "funcion fact(entero n):\n    \
                   si_es n <= 1:\n        \
                       regresa 1\n    \
                   regresa n * fact(n - 1)\n\
               imprimir fact(10)\n";
    assert_prints(src, &["3628800"]);
}

#[test]
fn function_without_return_yields_zero() {
    assert_prints("funcion nada():\n    variable entero x := 1\nimprimir nada()\n", &["0"]);
}

#[test]
fn real_return_kind_coerces_result() {
    let src = "funcion mitad(x):\n    si_es x == 0:\n        regresa 0.0\n    regresa x / 2\nimprimir mitad(4)\n";
    assert_prints(src, &["2"]);
    assert_prints("funcion f():\n    regresa 1.5\nimprimir tipo(f())\n", &["real"]);
}

#[test]
fn recursion_is_bounded() {
    // Debug builds need more than the default test-thread stack for the
    // full call depth.
    let error = std::thread::Builder::new().stack_size(64 * 1024 * 1024)
                                           .spawn(|| {
                                               runtime_error("funcion f(n):\n    regresa f(n + 1)\nf(0)\n")
                                           })
                                           .unwrap()
                                           .join()
                                           .unwrap();
    assert!(matches!(error, RuntimeError::RecursionLimit { limit: 256, .. }));
}

#[test]
fn collections_and_indexing() {
    assert_prints("variable lista xs := [1, 2, 3]\nxs[1] := 9\nimprimir xs\n", &["[1, 9, 3]"]);
    assert_prints("variable diccionario d := {\"a\": 1}\nd[\"b\"] = 2\nimprimir d\n",
                  &["{\"a\": 1, \"b\": 2}"]);
    assert_prints("variable matriz m := [[1, 2], [3, 4]]\nm[0][1] := 5\nimprimir m[0]\n",
                  &["[1, 5]"]);
    assert_prints("variable texto t := \"hola\"\nimprimir t[1]\n", &["o"]);
}

#[test]
fn index_out_of_bounds_is_error() {
    let error = runtime_error("variable lista xs := [1]\nimprimir xs[3]\n");
    assert!(matches!(error, RuntimeError::IndexOutOfBounds { index: 3, len: 1, line: 2 }));
}

#[test]
fn methods_dispatch_on_runtime_type() {
    assert_prints("variable texto t := \"hola\"\nimprimir t.longitud()\n", &["4"]);
    assert_prints("variable lista xs := [3]\nxs.agregar(4)\nimprimir xs\n", &["[3, 4]"]);
    assert_prints("imprimir mayusculas(\"abc\")\n", &["ABC"]);
}

#[test]
fn builtins_cover_the_library() {
    assert_prints("imprimir ordenar([3, 1, 2])\n", &["[1, 2, 3]"]);
    assert_prints("imprimir maximo(3, 9, 4)\n", &["9"]);
    assert_prints("imprimir raiz(16)\n", &["4"]);
    assert_prints("imprimir potencia(2, 8)\n", &["256"]);
    assert_prints("imprimir a_json({\"k\": [1, 2]})\n", &["{\"k\":[1,2]}"]);
    assert_prints("imprimir dividir(\"a b\")\n", &["[\"a\", \"b\"]"]);
    assert!(matches!(runtime_error("imprimir raiz(-1)\n"), RuntimeError::NonFiniteResult { .. }));
}

#[test]
fn casts_go_through_conversions() {
    assert_prints("imprimir (entero) \"42\" + 1\n", &["43"]);
    assert_prints("imprimir tipo((real) 3)\n", &["real"]);
}

#[test]
fn typed_variables_coerce_on_assignment() {
    assert_prints("variable entero n := 1\nn := \"7\"\nimprimir n + 1\n", &["8"]);
    let error = runtime_error("variable entero n := 1\nn := \"siete\"\n");
    assert!(matches!(error, RuntimeError::Conversion { line: 2, .. }));
}

#[test]
fn constants_are_write_once() {
    assert_prints("constante real PI := 3.5\nimprimir PI\n", &["3.5"]);
    let error = runtime_error("constante entero K := 1\nK := 2\n");
    assert!(matches!(error, RuntimeError::AssignmentToConstant { .. }));
}

#[test]
fn logical_operators_require_booleans() {
    assert_prints("imprimir 1 < 2 && 2 < 3\n", &["verdadero"]);
    assert!(matches!(runtime_error("imprimir 1 && verdadero\n"), RuntimeError::ExpectedBoolean { .. }));
}

#[test]
fn unknown_identifier_is_error() {
    let error = runtime_error("imprimir desconocido + 1\n");
    assert!(matches!(error, RuntimeError::UnknownIdentifier { ref name, line: 1 } if name == "desconocido"));
}

#[test]
fn unknown_instruction_is_error() {
    let error = runtime_error("hacer_algo 1, 2\n");
    assert!(matches!(error, RuntimeError::UnrecognizedInstruction { .. }));
}

#[test]
fn redefinition_of_builtin_function_is_error() {
    let error = runtime_error("funcion imprimir(x):\n    regresa x\n");
    assert!(matches!(error, RuntimeError::BuiltinRedefinition { .. }));
}

#[test]
fn assertion_builtin() {
    assert_success("variable entero x := 3\nafirmar(x == 3)\n");
    assert!(matches!(runtime_error("afirmar(1 == 2)\n"), RuntimeError::AssertionFailed { line: 1 }));
}

#[test]
fn parse_errors_stop_the_program_unless_tolerant() {
    let src = "imprimir 1\nvariable numero x\nimprimir 2\n";
    let (result, lines) = run(src);
    assert!(matches!(result, Err(Error::Parse(ref errors)) if errors.len() == 1));
    assert!(lines.is_empty());

    let output = PrintHandler::buffer();
    let config = Config { tolerante: true,
                          ..Config::default() };
    let interpreter = Interpreter::with_output(config, Arc::clone(&output));
    interpreter.run_source(src, Vec::new()).unwrap();
    assert_eq!(output.lines(), vec!["1", "2"]);
}

#[test]
fn redeclaration_updates_or_rebinds_the_symbol() {
    let src = "variable entero x := 1\n\
               variable entero x := 2\n\
               imprimir x + 1\n\
               variable texto x := \"hola\"\n\
               imprimir tipo(x)\n";
    let (result, lines) = run(src);
    let bindings = result.unwrap();
    assert_eq!(lines, vec!["3", "texto"]);
    assert_eq!(bindings["x"], "hola");
}

#[test]
fn bindings_are_reported_in_display_form() {
    let (result, _) = run("variable real r := 2\nvariable lista xs := [1, \"a\"]\n");
    let bindings = result.unwrap();
    assert_eq!(bindings["r"], "2");
    assert_eq!(bindings["xs"], "[1, \"a\"]");
}

#[test]
fn statement_handlers_can_be_replaced() {
    let output = PrintHandler::buffer();
    let mut runtime = Runtime::new(Arc::clone(&output));
    runtime.handlers.register("expresion", |context, _| {
                         context.runtime.output.print_line("silenciado");
                         Ok(Flow::Continue)
                     });
    let (program, _) = parse_program("1 + 1\nimprimir 2\n", &[]);
    let mut context = Context::new(Arc::new(runtime), Default::default());
    context.exec_statements(&program.statements).unwrap();
    assert_eq!(output.lines(), vec!["silenciado", "2"]);
}
