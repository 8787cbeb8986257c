// ABOUTME: Task operations trait for the orchestrator.
// ABOUTME: Run, describe, and stop standalone tasks.

use super::shared_types::{RunTaskOutput, RunTaskRequest, TaskRun};
use crate::orchestrator::RemoteError;
use crate::types::{ClusterArn, TaskArn};
use async_trait::async_trait;

/// Standalone task operations.
#[async_trait]
pub trait TaskOps: Send + Sync {
    /// Launch tasks. Placement and capacity problems come back as
    /// `RunTaskOutput::failures`, not as an `Err`.
    async fn run_task(&self, request: &RunTaskRequest) -> Result<RunTaskOutput, RemoteError>;

    /// Fetch the current state of a task.
    async fn describe_task(
        &self,
        cluster: &ClusterArn,
        task: &TaskArn,
    ) -> Result<TaskRun, RemoteError>;

    /// Ask the orchestrator to stop a task.
    async fn stop_task(
        &self,
        cluster: &ClusterArn,
        task: &TaskArn,
        reason: &str,
    ) -> Result<(), RemoteError>;
}
