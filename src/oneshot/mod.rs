// ABOUTME: One-off task execution: launch, poll to completion, stop on cancel.
// ABOUTME: The exit code of the task's first container becomes the process exit code.

mod error;
mod runner;

pub use error::OneshotError;
pub use runner::{
    Phase, STARTED_BY, STOP_REASON, TaskSource, TaskStatus, await_completion, launch,
    resolve_task_definition,
};
