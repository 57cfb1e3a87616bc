//! CLI-level errors (wraps application errors)

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::DomainError;
use crate::infrastructure::InfraError;

/// CLI errors are the top-level error type.
/// These are what get displayed to the user.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Application(#[from] ApplicationError),

    #[error("{0}")]
    Usage(String),

    #[error("write output: {0}")]
    Output(#[source] std::io::Error),
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

impl CliError {
    /// Get the appropriate exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Usage(_) => crate::exitcode::USAGE,
            CliError::Output(_) => crate::exitcode::IOERR,
            CliError::Application(e) => match e {
                ApplicationError::Domain(DomainError::NotAProcess(_)) => crate::exitcode::NOINPUT,
                ApplicationError::Source(InfraError::Io { .. }) => crate::exitcode::IOERR,
                ApplicationError::Source(InfraError::PathTooLong { .. }) => {
                    crate::exitcode::SOFTWARE
                }
                ApplicationError::Config { .. } => crate::exitcode::CONFIG,
            },
        }
    }
}
