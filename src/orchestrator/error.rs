// ABOUTME: Remote API error types with SNAFU pattern.
// ABOUTME: Covers orchestration, registry, and parameter store failures without retrying.

use snafu::Snafu;
use std::time::Duration;

/// Failure talking to a remote API.
///
/// Errors are passed through as reported; nothing here is retried.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum RemoteError {
    #[snafu(display("{operation} failed: {message}"))]
    Api {
        operation: &'static str,
        message: String,
    },

    #[snafu(display("{operation}: {resource} not found"))]
    NotFound {
        operation: &'static str,
        resource: String,
    },

    #[snafu(display("{operation} returned no {what}"))]
    Malformed {
        operation: &'static str,
        what: &'static str,
    },

    #[snafu(display("{operation} reported failures:\n{reasons}"))]
    Rejected {
        operation: &'static str,
        reasons: String,
    },

    #[snafu(display("gave up waiting after {}", humantime::format_duration(*elapsed)))]
    Timeout { elapsed: Duration },
}

/// Error kind for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteErrorKind {
    /// The API call itself failed.
    Api,
    /// The addressed resource does not exist.
    NotFound,
    /// The response lacked a field shipctl depends on.
    Malformed,
    /// The API accepted the call but reported per-item failures.
    Rejected,
    /// An external wait limit expired.
    Timeout,
}

impl RemoteError {
    /// Returns the error kind for programmatic handling.
    pub fn kind(&self) -> RemoteErrorKind {
        match self {
            RemoteError::Api { .. } => RemoteErrorKind::Api,
            RemoteError::NotFound { .. } => RemoteErrorKind::NotFound,
            RemoteError::Malformed { .. } => RemoteErrorKind::Malformed,
            RemoteError::Rejected { .. } => RemoteErrorKind::Rejected,
            RemoteError::Timeout { .. } => RemoteErrorKind::Timeout,
        }
    }

    /// Build an `Api` error from any SDK error, keeping its full cause chain.
    pub fn api<E>(operation: &'static str, err: E) -> Self
    where
        E: std::error::Error + 'static,
    {
        let mut message = err.to_string();
        let mut source = err.source();
        while let Some(cause) = source {
            message.push_str(": ");
            message.push_str(&cause.to_string());
            source = cause.source();
        }
        RemoteError::Api { operation, message }
    }

    /// Join per-item failure reasons, one indented line each.
    pub fn rejected<I, S>(operation: &'static str, reasons: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: std::fmt::Display,
    {
        let reasons = reasons
            .into_iter()
            .map(|r| format!("    {}", r))
            .collect::<Vec<_>>()
            .join("\n");
        RemoteError::Rejected { operation, reasons }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejected_lists_every_reason() {
        let err = RemoteError::rejected("RunTask", ["RESOURCE:MEMORY", "AGENT"]);
        assert_eq!(err.kind(), RemoteErrorKind::Rejected);
        assert_eq!(
            err.to_string(),
            "RunTask reported failures:\n    RESOURCE:MEMORY\n    AGENT"
        );
    }

    #[test]
    fn api_error_includes_cause_chain() {
        let io = std::io::Error::other("connection reset");
        let err = RemoteError::api("DescribeServices", io);
        assert!(err.to_string().contains("connection reset"));
        assert_eq!(err.kind(), RemoteErrorKind::Api);
    }
}
