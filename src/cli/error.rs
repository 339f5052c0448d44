//! CLI-level errors (wraps application errors)

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::{DomainError, DropRejection};

/// CLI errors are the top-level error type.
/// These are what get displayed to the user.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Application(#[from] ApplicationError),

    #[error("drop rejected: {0}")]
    Rejected(#[from] DropRejection),

    #[error("invalid arguments: {0}")]
    InvalidArgs(String),
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

impl CliError {
    /// Get the appropriate exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::InvalidArgs(_) => crate::exitcode::USAGE,
            CliError::Rejected(_) => crate::exitcode::DATAERR,
            CliError::Application(e) => match e {
                ApplicationError::Config { .. } => crate::exitcode::CONFIG,
                ApplicationError::Domain(
                    DomainError::InvalidBand { .. } | DomainError::InvalidMargin(_),
                ) => crate::exitcode::CONFIG,
                ApplicationError::Domain(_)
                | ApplicationError::Document { .. }
                | ApplicationError::Script { .. } => crate::exitcode::DATAERR,
                ApplicationError::UnsupportedFormat(_) => crate::exitcode::USAGE,
                ApplicationError::OperationFailed { source, .. } => {
                    match source.downcast_ref::<std::io::Error>() {
                        Some(io) if io.kind() == std::io::ErrorKind::NotFound => {
                            crate::exitcode::NOINPUT
                        }
                        Some(_) => crate::exitcode::IOERR,
                        None => crate::exitcode::SOFTWARE,
                    }
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exitcode;

    #[test]
    fn given_rejection_when_mapping_exit_code_then_is_dataerr() {
        let err = CliError::from(DropRejection::NoActiveDrag);
        assert_eq!(err.exit_code(), exitcode::DATAERR);
        assert_eq!(err.to_string(), "drop rejected: no drag in progress");
    }

    #[test]
    fn given_missing_input_when_mapping_exit_code_then_is_noinput() {
        let err = CliError::from(ApplicationError::OperationFailed {
            context: "read tree: x.json".into(),
            source: Box::new(std::io::Error::from(std::io::ErrorKind::NotFound)),
        });
        assert_eq!(err.exit_code(), exitcode::NOINPUT);
    }

    #[test]
    fn given_bad_band_when_mapping_exit_code_then_is_config() {
        let err = CliError::from(ApplicationError::from(DomainError::InvalidBand {
            lower: 0.8,
            upper: 0.2,
        }));
        assert_eq!(err.exit_code(), exitcode::CONFIG);

        let err = CliError::from(ApplicationError::from(DomainError::InvalidMargin(-4.0)));
        assert_eq!(err.exit_code(), exitcode::CONFIG);
    }
}
