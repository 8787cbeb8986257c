// ABOUTME: AWS region lookup from the environment.
// ABOUTME: AWS_REGION wins over AWS_DEFAULT_REGION; empty values count as unset.

use super::ConfigError;

pub const AWS_REGION_ENV: &str = "AWS_REGION";
pub const AWS_DEFAULT_REGION_ENV: &str = "AWS_DEFAULT_REGION";

/// Region every AWS client of this invocation talks to.
///
/// # Errors
///
/// Returns `ConfigError::MissingRegion` when neither variable is set.
pub fn resolve_region() -> Result<String, ConfigError> {
    [AWS_REGION_ENV, AWS_DEFAULT_REGION_ENV]
        .into_iter()
        .filter_map(|name| std::env::var(name).ok())
        .find(|value| !value.is_empty())
        .ok_or(ConfigError::MissingRegion)
}
