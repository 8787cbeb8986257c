// ABOUTME: Configuration types and parsing for shipctl.yml.
// ABOUTME: Handles YAML discovery and merging file values with command-line flags.

mod deserialize;
mod error;
mod region;

pub use error::ConfigError;
pub use region::{AWS_DEFAULT_REGION_ENV, AWS_REGION_ENV, resolve_region};

use crate::deploy::{DEFAULT_POLL_INTERVAL, MIN_POLL_INTERVAL, PromotionMode};
use crate::history::{Backend, DEFAULT_HISTORY_LIMIT, DEFAULT_HISTORY_PREFIX};
use crate::oneshot::STARTED_BY;
use crate::types::ClusterName;
use deserialize::{deserialize_backend, deserialize_cluster_name};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const CONFIG_FILENAME: &str = "shipctl.yml";
pub const CONFIG_FILENAME_ALT: &str = "shipctl.yaml";
pub const CONFIG_FILENAME_DIR: &str = ".shipctl/config.yml";

/// Fallback for the Slack webhook when neither flag nor file sets one.
pub const SLACK_WEBHOOK_ENV: &str = "SHIPCTL_SLACK_WEBHOOK_URL";

/// Contents of the optional configuration file. Every field has a default.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default, deserialize_with = "deserialize_cluster_name")]
    pub cluster: Option<ClusterName>,

    #[serde(default, deserialize_with = "deserialize_backend")]
    pub backend: Backend,

    #[serde(default)]
    pub history: HistoryConfig,

    #[serde(default = "default_poll_interval", with = "humantime_serde")]
    pub poll_interval: Duration,

    #[serde(default)]
    pub promotion: PromotionMode,

    #[serde(default = "default_started_by")]
    pub started_by: String,

    #[serde(default)]
    pub notify: NotifyConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HistoryConfig {
    #[serde(default = "default_history_limit")]
    pub limit: usize,

    #[serde(default = "default_history_prefix")]
    pub prefix: String,

    /// Directory of the file backend, relative to the working directory.
    #[serde(default = "default_history_dir")]
    pub dir: PathBuf,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NotifyConfig {
    #[serde(default)]
    pub slack_webhook_url: Option<String>,
}

fn default_poll_interval() -> Duration {
    DEFAULT_POLL_INTERVAL
}

fn default_started_by() -> String {
    STARTED_BY.to_string()
}

fn default_history_limit() -> usize {
    DEFAULT_HISTORY_LIMIT
}

fn default_history_prefix() -> String {
    DEFAULT_HISTORY_PREFIX.to_string()
}

fn default_history_dir() -> PathBuf {
    PathBuf::from(".shipctl/history")
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cluster: None,
            backend: Backend::default(),
            history: HistoryConfig::default(),
            poll_interval: default_poll_interval(),
            promotion: PromotionMode::default(),
            started_by: default_started_by(),
            notify: NotifyConfig::default(),
        }
    }
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            limit: default_history_limit(),
            prefix: default_history_prefix(),
            dir: default_history_dir(),
        }
    }
}

/// Values given on the command line. `None` defers to the file.
#[derive(Debug, Clone, Default)]
pub struct Flags {
    pub cluster: Option<String>,
    pub backend: Option<String>,
    pub slack_webhook_url: Option<String>,
}

/// Effective settings for one invocation: flag, then file, then default.
#[derive(Debug, Clone)]
pub struct Settings {
    pub cluster: ClusterName,
    pub backend: Backend,
    pub history: HistoryConfig,
    pub poll_interval: Duration,
    pub promotion: PromotionMode,
    pub started_by: String,
    pub slack_webhook_url: Option<String>,
}

impl Config {
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&content)
    }

    /// First config file present in `dir`, if any.
    pub fn find(dir: &Path) -> Option<PathBuf> {
        [
            dir.join(CONFIG_FILENAME),
            dir.join(CONFIG_FILENAME_ALT),
            dir.join(CONFIG_FILENAME_DIR),
        ]
        .into_iter()
        .find(|path| path.exists())
    }

    /// Load the config file in `dir`, or the defaults when there is none.
    pub fn discover(dir: &Path) -> Result<Self, ConfigError> {
        match Self::find(dir) {
            Some(path) => {
                tracing::debug!(path = %path.display(), "loading config");
                Self::load(&path)
            }
            None => Ok(Self::default()),
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.poll_interval < MIN_POLL_INTERVAL {
            return Err(ConfigError::Invalid(format!(
                "poll_interval must be at least {}",
                humantime::format_duration(MIN_POLL_INTERVAL)
            )));
        }
        if self.history.limit == 0 {
            return Err(ConfigError::Invalid(
                "history.limit must be at least 1".to_string(),
            ));
        }
        if self.history.prefix.is_empty() {
            return Err(ConfigError::Invalid(
                "history.prefix cannot be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Merge command-line flags over this file.
    ///
    /// The Slack webhook falls back to `SHIPCTL_SLACK_WEBHOOK_URL` last.
    pub fn settings(&self, flags: &Flags) -> Result<Settings, ConfigError> {
        let cluster = match flags.cluster.as_deref() {
            Some(name) => ClusterName::new(name).map_err(|source| ConfigError::InvalidName {
                field: "--cluster",
                source,
            })?,
            None => self.cluster.clone().ok_or(ConfigError::MissingCluster)?,
        };

        let backend = match flags.backend.as_deref() {
            Some(name) => name.parse()?,
            None => self.backend,
        };

        let slack_webhook_url = flags
            .slack_webhook_url
            .clone()
            .or_else(|| self.notify.slack_webhook_url.clone())
            .or_else(|| std::env::var(SLACK_WEBHOOK_ENV).ok())
            .filter(|url| !url.is_empty());

        Ok(Settings {
            cluster,
            backend,
            history: self.history.clone(),
            poll_interval: self.poll_interval,
            promotion: self.promotion,
            started_by: self.started_by.clone(),
            slack_webhook_url,
        })
    }
}
