// ABOUTME: Application-wide error types for shipctl.
// ABOUTME: Uses thiserror for ergonomic error handling.

use thiserror::Error;

use crate::config::ConfigError;
use crate::deploy::DeployError;
use crate::history::{HistoryError, UnknownBackend};
use crate::oneshot::OneshotError;
use crate::orchestrator::{RemoteError, RemoteErrorKind};
use crate::types::NameError;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Deploy(#[from] DeployError),

    #[error(transparent)]
    History(#[from] HistoryError),

    #[error(transparent)]
    Oneshot(#[from] OneshotError),

    #[error(transparent)]
    Remote(#[from] RemoteError),

    #[error("invalid {field}: {source}")]
    InvalidName {
        field: &'static str,
        #[source]
        source: NameError,
    },

    #[error(transparent)]
    Backend(#[from] UnknownBackend),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Broad failure categories, stable across the error enums.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad input: flags, names, image references, revisions.
    Validation,
    /// Missing or unreadable configuration, including the AWS region.
    Configuration,
    /// A service, task definition, image, or history record does not exist.
    NotFound,
    /// The target is busy or the change collides with recorded state.
    Conflict,
    /// A remote API call failed.
    Remote,
    /// A precondition of the workflow does not hold.
    Guard,
}

impl Error {
    /// Returns the error kind for programmatic handling.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Config(e) => e.kind(),
            Error::Deploy(e) => e.kind(),
            Error::History(e) => e.kind(),
            Error::Oneshot(e) => e.kind(),
            Error::Remote(e) if e.kind() == RemoteErrorKind::NotFound => ErrorKind::NotFound,
            Error::Remote(_) => ErrorKind::Remote,
            Error::InvalidName { .. } | Error::Backend(_) => ErrorKind::Validation,
            Error::Io(_) => ErrorKind::Configuration,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
