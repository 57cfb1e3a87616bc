//! Infrastructure-level errors
//!
//! A lookup that cannot be opened is not an error at this layer; it is
//! reported as `None`. `Io` covers a resource that opened but could not be
//! read, which the builder degrades. `PathTooLong` always aborts.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum InfraError {
    #[error("I/O error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("path exceeds {limit} bytes: {}", path.display())]
    PathTooLong { path: PathBuf, limit: usize },
}

impl InfraError {
    /// Create an I/O error with context.
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }
}

/// Result type for infrastructure layer operations.
pub type InfraResult<T> = Result<T, InfraError>;
