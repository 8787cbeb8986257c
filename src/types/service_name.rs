// ABOUTME: Validated ECS cluster and service names.
// ABOUTME: Names are 1-255 letters, digits, hyphens, and underscores.

use std::fmt;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum NameError {
    #[error("{0} name cannot be empty")]
    Empty(&'static str),

    #[error("{0} name exceeds maximum length of 255 characters")]
    TooLong(&'static str),

    #[error("invalid character in {0} name: '{1}'")]
    InvalidChar(&'static str, char),
}

fn validate(what: &'static str, value: &str) -> Result<(), NameError> {
    if value.is_empty() {
        return Err(NameError::Empty(what));
    }

    if value.len() > 255 {
        return Err(NameError::TooLong(what));
    }

    // Cluster references may also be full ARNs
    for c in value.chars() {
        if !c.is_ascii_alphanumeric() && !matches!(c, '-' | '_' | ':' | '/' | '.') {
            return Err(NameError::InvalidChar(what, c));
        }
    }

    Ok(())
}

/// Name or ARN of an ECS service.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ServiceName(String);

impl ServiceName {
    pub fn new(value: &str) -> Result<Self, NameError> {
        validate("service", value)?;
        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ServiceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Name or ARN of an ECS cluster.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClusterName(String);

impl ClusterName {
    pub fn new(value: &str) -> Result<Self, NameError> {
        validate("cluster", value)?;
        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ClusterName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
