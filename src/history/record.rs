// ABOUTME: Deployment history record types and their JSON wire format.
// ABOUTME: Status is stored as an integer: 1 = pending, 2 = deployed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Lifecycle of a recorded deployment attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeployStatus {
    /// Written by records from older tools that predate status tracking.
    Unknown,
    /// Recorded before the service update was submitted.
    Pending,
    /// The service converged on this revision.
    Deployed,
}

impl DeployStatus {
    fn code(self) -> u8 {
        match self {
            DeployStatus::Unknown => 0,
            DeployStatus::Pending => 1,
            DeployStatus::Deployed => 2,
        }
    }
}

impl fmt::Display for DeployStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DeployStatus::Unknown => "unknown",
            DeployStatus::Pending => "pending",
            DeployStatus::Deployed => "deployed",
        };
        f.write_str(s)
    }
}

impl Serialize for DeployStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.code())
    }
}

impl<'de> Deserialize<'de> for DeployStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match u8::deserialize(deserializer)? {
            0 => Ok(DeployStatus::Unknown),
            1 => Ok(DeployStatus::Pending),
            2 => Ok(DeployStatus::Deployed),
            other => Err(serde::de::Error::custom(format!(
                "unknown deploy status {other}"
            ))),
        }
    }
}

/// One entry in a service's deployment history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentRecord {
    pub revision: i64,
    pub status: DeployStatus,
    pub cause: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recorded_at: Option<DateTime<Utc>>,
}

impl DeploymentRecord {
    pub fn pending(revision: i64, cause: impl Into<String>) -> Self {
        Self {
            revision,
            status: DeployStatus::Pending,
            cause: cause.into(),
            recorded_at: Some(Utc::now()),
        }
    }
}
