//! Domain-level errors (no external dependencies)

use thiserror::Error;

use crate::domain::entities::Pid;

/// Domain errors represent conditions under which no tree exists.
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("pid {0} is not an executing process")]
    NotAProcess(Pid),
}
