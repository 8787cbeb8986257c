// ABOUTME: Error types for configuration loading and merging.
// ABOUTME: Covers file parsing, missing settings, and region lookup.

use std::path::PathBuf;

use crate::error::ErrorKind;
use crate::history::UnknownBackend;
use crate::types::NameError;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),

    #[error("--cluster is required")]
    MissingCluster,

    #[error("invalid {field}: {source}")]
    InvalidName {
        field: &'static str,
        #[source]
        source: NameError,
    },

    #[error(transparent)]
    Backend(#[from] UnknownBackend),

    #[error("AWS region is not found. please set a AWS_DEFAULT_REGION or AWS_REGION")]
    MissingRegion,
}

impl ConfigError {
    /// Returns the error kind for programmatic handling.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ConfigError::MissingCluster
            | ConfigError::InvalidName { .. }
            | ConfigError::Backend(_) => ErrorKind::Validation,
            ConfigError::Read { .. }
            | ConfigError::Yaml(_)
            | ConfigError::Invalid(_)
            | ConfigError::MissingRegion => ErrorKind::Configuration,
        }
    }
}
