//! Error conversion helpers for reading input files
//!
//! Both tree documents and event scripts are read the same way: an I/O step
//! that can fail with the OS error, then a deserialization step whose error is
//! reported against the file it came from.

use std::fmt::Display;
use std::io;
use std::path::Path;

use crate::application::{ApplicationError, ApplicationResult};

/// What an input file was expected to contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    Tree,
    Script,
}

pub trait IoResultExt<T> {
    /// Add path context to an I/O error.
    ///
    /// # Example
    /// ```ignore
    /// let content = fs::read_to_string(path).with_path_context("read tree", path)?;
    /// ```
    fn with_path_context(self, action: &str, path: &Path) -> ApplicationResult<T>;
}

impl<T> IoResultExt<T> for io::Result<T> {
    fn with_path_context(self, action: &str, path: &Path) -> ApplicationResult<T> {
        self.map_err(|e| ApplicationError::OperationFailed {
            context: format!("{}: {}", action, path.display()),
            source: Box::new(e),
        })
    }
}

pub trait ParseResultExt<T> {
    /// Turn a (de)serialization error into a document or script error for `path`.
    fn with_input_context(self, kind: InputKind, path: &Path) -> ApplicationResult<T>;
}

impl<T, E: Display> ParseResultExt<T> for Result<T, E> {
    fn with_input_context(self, kind: InputKind, path: &Path) -> ApplicationResult<T> {
        self.map_err(|e| {
            let path = path.to_path_buf();
            let message = e.to_string();
            match kind {
                InputKind::Tree => ApplicationError::Document { path, message },
                InputKind::Script => ApplicationError::Script { path, message },
            }
        })
    }
}
