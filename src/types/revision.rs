// ABOUTME: Rewrites task definition ARNs to target an explicit revision.
// ABOUTME: Only ARNs ending in a positive numeric revision can be rewritten.

use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

static REVISION_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.*):[1-9][0-9]*$").expect("revision pattern is valid"));

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RevisionError {
    #[error("cannot select revision {revision}: '{arn}' has no revision suffix")]
    NoRevisionSuffix { arn: String, revision: i64 },
}

/// Point `arn` at `revision`.
///
/// A `revision` of zero or less means "use as given" and returns the input
/// unchanged. Otherwise the trailing `:<n>` suffix is replaced; an input
/// without one is rejected rather than silently left alone.
pub fn specify_revision(arn: &str, revision: i64) -> Result<String, RevisionError> {
    if revision <= 0 {
        return Ok(arn.to_string());
    }

    let captures = REVISION_SUFFIX
        .captures(arn)
        .ok_or_else(|| RevisionError::NoRevisionSuffix {
            arn: arn.to_string(),
            revision,
        })?;

    Ok(format!("{}:{}", &captures[1], revision))
}

/// Trailing revision number of an ARN or `family:revision` string.
pub fn revision_of(arn: &str) -> Option<i64> {
    let (_, suffix) = arn.rsplit_once(':')?;
    suffix.parse().ok().filter(|n| *n > 0)
}
