// ABOUTME: Shared types used across orchestrator and registry trait definitions.
// ABOUTME: Service, TaskDefinition, TaskDefinitionDraft, TaskRun, ImageManifest, etc.

use crate::types::{ClusterArn, ClusterName, ServiceName, TaskArn, TaskDefinitionArn};
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// Backend-native payload carried alongside a domain value.
///
/// Adapters stash their own representation here so that fields shipctl does
/// not model survive a describe/register round trip untouched. Cloning shares
/// the payload; equality is identity of the shared payload.
#[derive(Clone, Default)]
pub struct Native(Option<Arc<dyn Any + Send + Sync>>);

impl Native {
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self(Some(Arc::new(value)))
    }

    pub fn none() -> Self {
        Self(None)
    }

    /// Borrow the payload if it was stored as a `T`.
    pub fn get<T: Any>(&self) -> Option<&T> {
        self.0.as_deref().and_then(|v| v.downcast_ref::<T>())
    }

    pub fn is_some(&self) -> bool {
        self.0.is_some()
    }
}

impl fmt::Debug for Native {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(_) => f.write_str("Native(..)"),
            None => f.write_str("Native(None)"),
        }
    }
}

impl PartialEq for Native {
    fn eq(&self, other: &Self) -> bool {
        match (&self.0, &other.0) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        }
    }
}

/// Current state of a service.
#[derive(Debug, Clone)]
pub struct Service {
    pub cluster_arn: ClusterArn,
    pub service_name: ServiceName,
    pub task_definition: TaskDefinitionArn,
    pub desired_count: i32,
    pub running_count: i32,
    pub deployment_configuration: Option<DeploymentConfiguration>,
    /// Active deployments. Exactly one means the service is stable.
    pub deployments: Vec<ServiceDeployment>,
}

impl Service {
    /// More than one active deployment: a rollout is still in progress.
    pub fn is_rolling_out(&self) -> bool {
        self.deployments.len() > 1
    }

    /// A single deployment with every desired task running.
    pub fn has_converged(&self) -> bool {
        self.deployments.len() == 1 && self.running_count == self.desired_count
    }
}

/// Rollout tuning of a service, carried over unchanged on update.
#[derive(Debug, Clone, PartialEq)]
pub struct DeploymentConfiguration {
    pub maximum_percent: Option<i32>,
    pub minimum_healthy_percent: Option<i32>,
    pub native: Native,
}

/// One deployment of a service (PRIMARY, ACTIVE, ...).
#[derive(Debug, Clone)]
pub struct ServiceDeployment {
    pub id: String,
    pub status: String,
    pub task_definition: TaskDefinitionArn,
    pub desired_count: i32,
    pub running_count: i32,
}

/// Parameters for pointing a service at a new task definition.
#[derive(Debug, Clone)]
pub struct ServiceUpdate {
    pub cluster: ClusterArn,
    pub service: ServiceName,
    pub task_definition: TaskDefinitionArn,
    pub desired_count: i32,
    pub deployment_configuration: Option<DeploymentConfiguration>,
}

/// A registered, immutable task definition revision.
#[derive(Debug, Clone)]
pub struct TaskDefinition {
    pub arn: TaskDefinitionArn,
    pub revision: i64,
    pub family: String,
    pub containers: Vec<ContainerDefinition>,
    pub network_mode: Option<String>,
    pub placement_constraints: Vec<PlacementConstraint>,
    pub task_role_arn: Option<String>,
    pub execution_role_arn: Option<String>,
    pub volumes: Vec<Volume>,
    pub cpu: Option<String>,
    pub memory: Option<String>,
    pub requires_compatibilities: Vec<String>,
}

/// A task definition that has not been registered yet.
///
/// Has no ARN or revision: registration allocates fresh ones.
#[derive(Debug, Clone)]
pub struct TaskDefinitionDraft {
    pub family: String,
    pub containers: Vec<ContainerDefinition>,
    pub network_mode: Option<String>,
    pub placement_constraints: Vec<PlacementConstraint>,
    pub task_role_arn: Option<String>,
    pub execution_role_arn: Option<String>,
    pub volumes: Vec<Volume>,
    pub cpu: Option<String>,
    pub memory: Option<String>,
    pub requires_compatibilities: Vec<String>,
}

/// One container of a task definition.
#[derive(Debug, Clone, PartialEq)]
pub struct ContainerDefinition {
    pub name: String,
    pub image: String,
    pub command: Vec<String>,
    pub essential: Option<bool>,
    /// Every other container field, owned by the adapter.
    pub native: Native,
}

impl ContainerDefinition {
    pub fn new(name: impl Into<String>, image: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            image: image.into(),
            command: Vec::new(),
            essential: None,
            native: Native::none(),
        }
    }
}

/// Task placement constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacementConstraint {
    pub kind: String,
    pub expression: Option<String>,
}

/// Data volume of a task definition.
#[derive(Debug, Clone, PartialEq)]
pub struct Volume {
    pub name: String,
    pub host_path: Option<String>,
    pub native: Native,
}

/// Request to launch exactly one task.
#[derive(Debug, Clone)]
pub struct RunTaskRequest {
    pub cluster: ClusterName,
    pub task_definition: TaskDefinitionArn,
    /// Container whose command is overridden.
    pub container_name: String,
    pub command: Vec<String>,
    pub started_by: String,
}

/// Outcome of a run-task call: launched tasks and per-task failures.
#[derive(Debug, Clone, Default)]
pub struct RunTaskOutput {
    pub tasks: Vec<TaskRun>,
    pub failures: Vec<TaskFailure>,
}

/// A failure reported by the orchestrator for one task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskFailure {
    pub arn: Option<String>,
    pub reason: String,
    pub detail: Option<String>,
}

impl fmt::Display for TaskFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.reason)?;
        if let Some(ref detail) = self.detail {
            write!(f, " ({})", detail)?;
        }
        Ok(())
    }
}

/// Observed state of one task.
#[derive(Debug, Clone)]
pub struct TaskRun {
    pub arn: TaskArn,
    pub cluster_arn: ClusterArn,
    pub last_status: TaskState,
    pub containers: Vec<ContainerState>,
    pub stopped_reason: Option<String>,
}

/// Observed state of one container inside a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerState {
    pub name: String,
    pub exit_code: Option<i32>,
    pub reason: Option<String>,
}

/// Task lifecycle status as reported by the orchestrator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskState {
    Provisioning,
    Pending,
    Activating,
    Running,
    Deactivating,
    Stopping,
    Deprovisioning,
    Stopped,
    Other(String),
}

impl TaskState {
    pub fn parse(value: &str) -> Self {
        match value {
            "PROVISIONING" => TaskState::Provisioning,
            "PENDING" => TaskState::Pending,
            "ACTIVATING" => TaskState::Activating,
            "RUNNING" => TaskState::Running,
            "DEACTIVATING" => TaskState::Deactivating,
            "STOPPING" => TaskState::Stopping,
            "DEPROVISIONING" => TaskState::Deprovisioning,
            "STOPPED" => TaskState::Stopped,
            other => TaskState::Other(other.to_string()),
        }
    }

    pub fn is_stopped(&self) -> bool {
        matches!(self, TaskState::Stopped)
    }
}

impl fmt::Display for TaskState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TaskState::Provisioning => "PROVISIONING",
            TaskState::Pending => "PENDING",
            TaskState::Activating => "ACTIVATING",
            TaskState::Running => "RUNNING",
            TaskState::Deactivating => "DEACTIVATING",
            TaskState::Stopping => "STOPPING",
            TaskState::Deprovisioning => "DEPROVISIONING",
            TaskState::Stopped => "STOPPED",
            TaskState::Other(other) => other,
        };
        f.write_str(s)
    }
}

/// Which image in a repository to read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSelector {
    Tag(String),
    Digest(String),
}

impl fmt::Display for ImageSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageSelector::Tag(tag) => write!(f, ":{}", tag),
            ImageSelector::Digest(digest) => write!(f, "@{}", digest),
        }
    }
}

/// Raw image manifest as stored by the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageManifest {
    pub body: String,
    pub media_type: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn native_payload_round_trips_by_type() {
        let native = Native::new(42u32);
        assert_eq!(native.get::<u32>(), Some(&42));
        assert!(native.get::<String>().is_none());
    }

    #[test]
    fn native_equality_is_shared_identity() {
        let a = Native::new("x".to_string());
        let shared = a.clone();
        let other = Native::new("x".to_string());
        assert_eq!(a, shared);
        assert_ne!(a, other);
        assert_eq!(Native::none(), Native::none());
    }

    #[test]
    fn task_state_parses_known_and_unknown() {
        assert_eq!(TaskState::parse("STOPPED"), TaskState::Stopped);
        assert_eq!(
            TaskState::parse("WEIRD"),
            TaskState::Other("WEIRD".to_string())
        );
        assert_eq!(TaskState::parse("RUNNING").to_string(), "RUNNING");
    }
}
