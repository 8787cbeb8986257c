// ABOUTME: Pluggable key-value backends that persist deployment history blobs.
// ABOUTME: Backends are selected by name: "ssm" (default) or "file".

use crate::orchestrator::RemoteError;
use async_trait::async_trait;
use std::fmt;
use std::str::FromStr;

/// A durable string store addressed by parameter name.
///
/// Writes always overwrite. Backends provide no locking or versioning, so
/// concurrent writers to the same name can lose updates.
#[async_trait]
pub trait ParameterStore: Send + Sync {
    /// Read a value. `None` if the name has never been written.
    async fn get(&self, name: &str) -> Result<Option<String>, RemoteError>;

    /// Write a value, replacing any previous one.
    async fn put(&self, name: &str, value: &str) -> Result<(), RemoteError>;

    /// Names of every stored value starting with `prefix`.
    async fn list(&self, prefix: &str) -> Result<Vec<String>, RemoteError>;
}

/// Built-in history backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Backend {
    /// AWS Systems Manager Parameter Store.
    #[default]
    Ssm,
    /// One JSON file per service in a local directory.
    File,
}

#[derive(Debug, thiserror::Error)]
#[error("unknown history backend '{0}' (expected ssm or file)")]
pub struct UnknownBackend(pub String);

impl FromStr for Backend {
    type Err = UnknownBackend;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ssm" => Ok(Backend::Ssm),
            "file" => Ok(Backend::File),
            _ => Err(UnknownBackend(s.to_string())),
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Backend::Ssm => f.write_str("ssm"),
            Backend::File => f.write_str("file"),
        }
    }
}
