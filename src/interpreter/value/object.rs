use std::{
    fmt,
    fs::File,
    io::{self, BufRead, BufReader, Lines},
    path::{Path, PathBuf},
};

use crate::interpreter::value::core::Value;

/// An opaque payload carried by [`Value::Object`].
///
/// Objects have no structural guarantees; the interpreter only asks them for
/// a type name (used for `tipo.metodo` dispatch), a display form and,
/// optionally, an external iterator.
pub trait OpaqueObject: fmt::Debug + Send + Sync {
    /// Runtime type name, e.g. `archivo`.
    fn type_name(&self) -> &'static str;

    /// Text shown by `imprimir`.
    fn describe(&self) -> String;

    /// Opens a fresh pull-based iterator over the object's contents.
    ///
    /// Returns `None` when the object is not iterable. The iterator is owned
    /// by the loop that opened it and released when dropped.
    fn iterate(&self) -> Option<io::Result<Box<dyn ExternalIterator>>> {
        None
    }
}

/// A pull-based source of values, such as the lines of an open file.
pub trait ExternalIterator {
    /// Pulls the next value; `Ok(None)` signals exhaustion.
    fn pull(&mut self) -> io::Result<Option<Value>>;
}

/// A file handle returned by `abrir`. Iterating it yields its lines.
#[derive(Debug, Clone)]
pub struct FileObject {
    path: PathBuf,
}

impl FileObject {
    /// Creates a file object for `path` without opening it.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl OpaqueObject for FileObject {
    fn type_name(&self) -> &'static str {
        "archivo"
    }

    fn describe(&self) -> String {
        format!("<archivo {}>", self.path.display())
    }

    fn iterate(&self) -> Option<io::Result<Box<dyn ExternalIterator>>> {
        Some(File::open(&self.path).map(|file| {
                                       Box::new(FileLines { lines: BufReader::new(file).lines() })
                                       as Box<dyn ExternalIterator>
                                   }))
    }
}

struct FileLines {
    lines: Lines<BufReader<File>>,
}

impl ExternalIterator for FileLines {
    fn pull(&mut self) -> io::Result<Option<Value>> {
        self.lines.next().transpose().map(|line| line.map(Value::String))
    }
}
