// ABOUTME: Task definition operations trait for the orchestrator.
// ABOUTME: Describe existing revisions and register new ones.

use super::shared_types::{TaskDefinition, TaskDefinitionDraft};
use crate::orchestrator::RemoteError;
use async_trait::async_trait;

/// Task definition operations: describe, register.
#[async_trait]
pub trait TaskDefinitionOps: Send + Sync {
    /// Describe a task definition by ARN, `family`, or `family:revision`.
    async fn describe_task_definition(
        &self,
        reference: &str,
    ) -> Result<TaskDefinition, RemoteError>;

    /// Register a draft as a new revision of its family.
    async fn register_task_definition(
        &self,
        draft: &TaskDefinitionDraft,
    ) -> Result<TaskDefinition, RemoteError>;
}
