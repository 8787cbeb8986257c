// ABOUTME: Warnings that do not fail a command but must reach the operator.
// ABOUTME: Covers one-off tasks left running and Slack notifications that were dropped.

use std::fmt;

use crate::types::TaskArn;

/// Warnings gathered while a command runs, printed once it finishes.
#[derive(Debug, Default)]
pub struct Diagnostics {
    warnings: Vec<Warning>,
}

impl Diagnostics {
    pub fn warn(&mut self, warning: Warning) {
        match &warning {
            Warning::TaskNotStopped { task, reason } => {
                tracing::warn!(%task, reason, "stop request failed");
            }
            Warning::SlackDisabled { reason } => {
                tracing::warn!(reason, "slack notifications disabled");
            }
        }
        self.warnings.push(warning);
    }

    /// Warnings in the order they were raised.
    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// Something the operator should follow up on by hand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    /// StopTask was rejected after a cancel; the one-off task may still be running.
    TaskNotStopped { task: TaskArn, reason: String },
    /// A Slack webhook was configured but the client could not be built.
    SlackDisabled { reason: String },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::TaskNotStopped { task, reason } => write!(
                f,
                "task {task} may still be running: stop request failed: {reason}"
            ),
            Warning::SlackDisabled { reason } => {
                write!(f, "Slack notifications disabled: {reason}")
            }
        }
    }
}
