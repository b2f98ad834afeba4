use std::{fs, sync::Arc};

use crate::{
    error::RuntimeError,
    interpreter::{
        evaluator::{
            core::EvalResult,
            function::core::{Arity, Builtin},
            utils::{invalid_argument, text_argument},
        },
        value::{core::Value, object::FileObject},
    },
};

builtin_table! {
    "abrir" => { arity: Arity::Exact(1), func: Builtin::Pure(open) },
}

/// `abrir(ruta)`: a file object whose iteration yields the file's lines.
///
/// The file is checked here and opened again by every loop over the
/// object.
///
/// # Errors
/// `Io` when the path cannot be read, `InvalidArgument` for a directory.
pub fn open(args: &[Value], line: usize) -> EvalResult<Value> {
    let path = text_argument("abrir", args, 0, line)?;
    let metadata = fs::metadata(path).map_err(|source| RuntimeError::Io { path: path.to_string(),
                                                                          source,
                                                                          line })?;
    if metadata.is_dir() {
        return Err(invalid_argument("abrir", format!("'{path}' es un directorio"), line));
    }
    Ok(Value::Object(Some(Arc::new(FileObject::new(path)))))
}
