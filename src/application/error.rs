//! Application-level errors (wraps domain errors)
//!
//! Drop rejections are not here: they are outcomes of a drag, returned as
//! `DropRejection` values, while these errors mean an input could not be used.

use std::path::PathBuf;
use thiserror::Error;

use crate::domain::DomainError;

#[derive(Error, Debug)]
pub enum ApplicationError {
    /// Tree construction failed (duplicate ids, bad band limits).
    #[error("{0}")]
    Domain(#[from] DomainError),

    #[error("config error: {message}")]
    Config { message: String },

    /// A tree document that does not deserialize.
    #[error("invalid tree document {path}: {message}")]
    Document { path: PathBuf, message: String },

    /// An event script that does not deserialize.
    #[error("invalid event script {path}: {message}")]
    Script { path: PathBuf, message: String },

    #[error("unsupported file format: {0} (expected .json or .toml)")]
    UnsupportedFormat(PathBuf),

    #[error("operation failed: {context}")]
    OperationFailed {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

pub type ApplicationResult<T> = Result<T, ApplicationError>;
