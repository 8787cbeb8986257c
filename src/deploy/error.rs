// ABOUTME: Error types for deploy and rollback workflows.
// ABOUTME: Covers guards, promotion failures, and wrapped history/remote errors.

use crate::error::ErrorKind;
use crate::history::HistoryError;
use crate::orchestrator::{RemoteError, RemoteErrorKind};
use crate::types::{ParseImageRefError, RevisionError};

/// Errors that can occur while deploying or rolling back a service.
#[derive(Debug, thiserror::Error)]
pub enum DeployError {
    /// The service does not exist in the cluster.
    #[error("service {service} not found in cluster {cluster}")]
    ServiceNotFound { cluster: String, service: String },

    /// Another rollout has not finished yet.
    #[error("{service} is currently deploying ({deployments} active deployments)")]
    RollingOut { service: String, deployments: usize },

    /// Rollback was requested while a rollout is still in flight.
    #[error("can not roll back {service} while it is deploying ({deployments} active deployments)")]
    RollbackWhileDeploying { service: String, deployments: usize },

    /// Rollback needs a current and a previous record.
    #[error("can not find a previous state: history has {0} record(s), need at least 2")]
    InsufficientHistory(usize),

    /// The definition would register with no containers at all.
    #[error("task definition {0} has no registry-managed containers to ship")]
    NothingToShip(String),

    /// An `--image repo:tag` selector named no managed container.
    #[error("--image {0} matches no managed container")]
    UnmatchedSelector(String),

    /// A malformed `--image` selector.
    #[error("invalid image selector '{0}': expected <repository>:<tag>")]
    InvalidSelector(String),

    /// The source image to promote does not exist.
    #[error("image {repository}{reference} not found in registry")]
    ImageNotFound {
        repository: String,
        reference: String,
    },

    /// A container image string could not be parsed.
    #[error("container {container}: {source}")]
    InvalidImage {
        container: String,
        #[source]
        source: ParseImageRefError,
    },

    #[error(transparent)]
    Revision(#[from] RevisionError),

    #[error(transparent)]
    History(#[from] HistoryError),

    #[error(transparent)]
    Remote(#[from] RemoteError),
}

impl DeployError {
    /// Returns the error kind for programmatic handling.
    pub fn kind(&self) -> ErrorKind {
        match self {
            DeployError::ServiceNotFound { .. } | DeployError::ImageNotFound { .. } => {
                ErrorKind::NotFound
            }
            DeployError::RollingOut { .. } => ErrorKind::Conflict,
            DeployError::InsufficientHistory(_) | DeployError::RollbackWhileDeploying { .. } => {
                ErrorKind::Guard
            }
            DeployError::NothingToShip(_)
            | DeployError::UnmatchedSelector(_)
            | DeployError::InvalidSelector(_)
            | DeployError::InvalidImage { .. }
            | DeployError::Revision(_) => ErrorKind::Validation,
            DeployError::History(e) => e.kind(),
            DeployError::Remote(e) if e.kind() == RemoteErrorKind::NotFound => ErrorKind::NotFound,
            DeployError::Remote(_) => ErrorKind::Remote,
        }
    }
}
