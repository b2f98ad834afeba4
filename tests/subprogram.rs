use std::{
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};

use nepa::{
    Interpreter, MAX_INVOCATION_DEPTH,
    config::Config,
    error::{Error, RuntimeError},
    interpreter::{evaluator::function::print::PrintHandler, value::literal::parse_valor},
};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

/// Writes `files` into a fresh directory.
fn workspace(files: &[(&str, &str)]) -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    for (name, source) in files {
        let path = dir.path().join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, source).unwrap();
    }
    dir
}

fn run_with(config: Config, path: &Path, arguments: &[&str]) -> (Result<nepa::Bindings, Error>, Vec<String>) {
    let output = PrintHandler::buffer();
    let interpreter = Interpreter::with_output(config, Arc::clone(&output));
    let arguments = arguments.iter().map(|text| parse_valor(text)).collect();
    let result = interpreter.run_file(path, arguments);
    (result, output.lines())
}

fn run(path: &Path) -> (Result<nepa::Bindings, Error>, Vec<String>) {
    run_with(Config::default(), path, &[])
}

#[test]
fn arguments_are_bound_and_bindings_merged() {
    let dir = workspace(&[("main.script",
                           "imprimir \"antes\"\n\
                            ejecutar \"hijo.script\", 5, \"dos\"\n\
                            imprimir resultado\n"),
                          ("hijo.script",
                           "variable entero resultado := argumentos[0] * 2\n\
                            imprimir argumentos[1]\n")]);
    let (result, lines) = run(&dir.path().join("main.script"));
    let bindings = result.unwrap();
    assert_eq!(lines, vec!["antes", "dos", "10"]);
    assert_eq!(bindings["resultado"], "10");
    assert_eq!(bindings["argumentos"], "[]");
}

#[test]
fn sub_program_sees_and_updates_globals() {
    let dir = workspace(&[("main.script",
                           "global entero contador := 1\n\
                            ejecutar \"inc.script\"\n\
                            ejecutar \"inc.script\"\n\
                            imprimir contador\n"),
                          ("inc.script", "contador := contador + 1\n")]);
    let (result, lines) = run(&dir.path().join("main.script"));
    assert!(result.is_ok());
    assert_eq!(lines, vec!["3"]);
}

#[test]
fn invocation_inside_a_loop_resumes_the_loop() {
    let dir = workspace(&[("main.script",
                           "para i desde 1 hasta 3:\n    \
                                ejecutar \"hijo.script\", i\n    \
                                imprimir i\n\
                            imprimir \"fin\"\n"),
                          ("hijo.script", "imprimir \"hijo \" + argumentos[0]\n")]);
    let (result, lines) = run(&dir.path().join("main.script"));
    assert!(result.is_ok());
    assert_eq!(lines, vec!["hijo 1", "1", "hijo 2", "2", "hijo 3", "3", "fin"]);
}

#[test]
fn invocation_inside_a_conditional_runs_the_rest_of_the_branch() {
    let dir = workspace(&[("main.script",
                           "global entero total := 0\n\
                            si_es verdadero:\n    \
                                ejecutar \"suma.script\"\n    \
                                imprimir total\n    \
                                ejecutar \"suma.script\"\n\
                            imprimir total\n"),
                          ("suma.script", "total := total + 5\n")]);
    let (result, lines) = run(&dir.path().join("main.script"));
    assert!(result.is_ok());
    assert_eq!(lines, vec!["5", "10"]);
}

#[test]
fn nested_invocation_failures_keep_their_own_error() {
    let dir = workspace(&[("main.script",
                           "mientras verdadero:\n    ejecutar \"malo.script\"\n    rompe\n"),
                          ("malo.script", "imprimir 1 / 0\n"),
                          ("falta.script", "para x en [1]:\n    ejecutar \"no_existe.script\"\n")]);
    let (result, _) = run(&dir.path().join("main.script"));
    assert!(matches!(result, Err(Error::Runtime(RuntimeError::DivisionByZero { line: 1 }))));

    let (result, _) = run(&dir.path().join("falta.script"));
    assert!(matches!(result, Err(Error::ProgramNotFound(ref path)) if path == "no_existe.script"));
}

#[test]
fn program_arguments_are_literals() {
    let dir = workspace(&[("main.script",
                           "imprimir longitud(argumentos[0])\nimprimir tipo(argumentos[1])\n")]);
    let (result, lines) = run_with(Config::default(),
                                   &dir.path().join("main.script"),
                                   &["[1, 2, 3]", "2.5"]);
    assert!(result.is_ok());
    assert_eq!(lines, vec!["3", "real"]);
}

#[test]
fn sub_programs_resolve_through_configured_paths() {
    let dir = workspace(&[("app/main.script", "ejecutar \"util.script\"\nimprimir valor\n"),
                          ("lib/util.script", "variable texto valor := \"desde lib\"\n")]);
    let config = Config { rutas: vec![dir.path().join("lib")],
                          ..Config::default() };
    let (result, lines) = run_with(config, &dir.path().join("app/main.script"), &[]);
    assert!(result.is_ok());
    assert_eq!(lines, vec!["desde lib"]);
}

#[test]
fn missing_sub_program_is_reported() {
    let dir = workspace(&[("main.script", "ejecutar \"falta.script\"\n")]);
    let (result, _) = run(&dir.path().join("main.script"));
    assert!(matches!(result, Err(Error::ProgramNotFound(ref path)) if path == "falta.script"));
}

#[test]
fn invocation_depth_is_limited() {
    let dir = workspace(&[("bucle.script", "ejecutar \"bucle.script\"\n")]);
    let (result, _) = run(&dir.path().join("bucle.script"));
    assert!(matches!(result, Err(Error::InvocationDepth { limit }) if limit == MAX_INVOCATION_DEPTH));
}

#[test]
fn invocation_inside_a_function_is_error() {
    let dir = workspace(&[("main.script", "funcion f():\n    ejecutar \"x.script\"\nf()\n"),
                          ("x.script", "imprimir 1\n")]);
    let (result, lines) = run(&dir.path().join("main.script"));
    assert!(matches!(result, Err(Error::Runtime(RuntimeError::NestedInvocation { line: 2 }))));
    assert!(lines.is_empty());
}

#[test]
fn errors_in_sub_programs_abort_the_run() {
    let dir = workspace(&[("main.script", "ejecutar \"malo.script\"\nimprimir \"nunca\"\n"),
                          ("malo.script", "imprimir 1 / 0\n")]);
    let (result, lines) = run(&dir.path().join("main.script"));
    assert!(matches!(result, Err(Error::Runtime(RuntimeError::DivisionByZero { line: 1 }))));
    assert!(lines.is_empty());
}

#[test]
fn unreadable_program_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let missing: PathBuf = dir.path().join("no_existe.script");
    let (result, _) = run(&missing);
    assert!(matches!(result, Err(Error::Io { ref path, .. }) if *path == missing));
}

#[test]
fn config_file_is_loaded_and_validated() {
    let dir = workspace(&[("ok.json", r#"{ "verbosidad": 2, "variables": { "saludo": "hola" } }"#),
                          ("ruidoso.json", r#"{ "verbosidad": 9 }"#),
                          ("extra.json", r#"{ "desconocido": 1 }"#),
                          ("main.script", "imprimir saludo\n")]);

    let config = Config::load(&dir.path().join("ok.json")).unwrap();
    assert_eq!(config.verbosidad, 2);
    let (result, lines) = run_with(config, &dir.path().join("main.script"), &[]);
    assert!(result.is_ok());
    assert_eq!(lines, vec!["hola"]);

    for name in ["ruidoso.json", "extra.json", "falta.json"] {
        let loaded = Config::load(&dir.path().join(name));
        assert!(matches!(loaded, Err(Error::Config { .. })), "{name} should be rejected");
    }
}
