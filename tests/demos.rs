use std::{fs, sync::Arc};

use nepa::{Interpreter, config::Config, interpreter::evaluator::function::print::PrintHandler};
use walkdir::WalkDir;

#[test]
fn demo_scripts_work() {
    let mut count = 0;

    for entry in WalkDir::new("demos").into_iter()
                                      .filter_map(Result::ok)
                                      .filter(|e| e.path().extension().is_some_and(|ext| ext == "script"))
    {
        let path = entry.path();
        count += 1;

        let output = PrintHandler::buffer();
        let interpreter = Interpreter::with_output(Config::default(), Arc::clone(&output));
        if let Err(e) = interpreter.run_file(path, Vec::new()) {
            panic!("Demo {path:?} failed:\n{e}");
        }

        let expected = path.with_extension("salida");
        if expected.is_file() {
            let expected =
                fs::read_to_string(&expected).unwrap_or_else(|e| panic!("Failed to read {expected:?}: {e}"));
            let expected: Vec<&str> = expected.lines().collect();
            assert_eq!(output.lines(), expected, "output of {path:?}");
        }
    }

    assert!(count > 0, "No demo scripts found in demos/");
}
