// ABOUTME: Error types for one-off task execution.
// ABOUTME: Wraps remote failures and adds launch-time validation errors.

use crate::error::ErrorKind;
use crate::orchestrator::{RemoteError, RemoteErrorKind};
use crate::types::RevisionError;

#[derive(Debug, thiserror::Error)]
pub enum OneshotError {
    #[error("COMMAND is required")]
    MissingCommand,

    #[error("task definition {0} has no containers")]
    NoContainers(String),

    #[error("service {service} not found in cluster {cluster}")]
    ServiceNotFound { cluster: String, service: String },

    #[error("RunTask reported neither a task nor a failure")]
    NoTask,

    #[error(transparent)]
    Revision(#[from] RevisionError),

    #[error(transparent)]
    Remote(#[from] RemoteError),
}

impl OneshotError {
    /// Returns the error kind for programmatic handling.
    pub fn kind(&self) -> ErrorKind {
        match self {
            OneshotError::MissingCommand
            | OneshotError::NoContainers(_)
            | OneshotError::Revision(_) => ErrorKind::Validation,
            OneshotError::ServiceNotFound { .. } => ErrorKind::NotFound,
            OneshotError::NoTask => ErrorKind::Remote,
            OneshotError::Remote(e) if e.kind() == RemoteErrorKind::NotFound => {
                ErrorKind::NotFound
            }
            OneshotError::Remote(_) => ErrorKind::Remote,
        }
    }
}
