// ABOUTME: Shared test fakes for integration tests.
// ABOUTME: Scriptable in-memory orchestrator, registry, and notifier that record every call.

#![allow(dead_code)]

use async_trait::async_trait;
use parking_lot::Mutex;
use shipctl::history::{MemoryParameterStore, ParameterStore};
use shipctl::notify::{Notifier, NotifyKind};
use shipctl::orchestrator::{
    ContainerDefinition, ContainerState, ImageManifest, ImageSelector, RegistryOps, RemoteError,
    RunTaskOutput, RunTaskRequest, Service, ServiceDeployment, ServiceOps, ServiceUpdate,
    TaskDefinition, TaskDefinitionDraft, TaskDefinitionOps, TaskFailure, TaskOps, TaskRun,
    TaskState,
};
use shipctl::types::{
    ClusterArn, ClusterName, ServiceName, TaskArn, TaskDefinitionArn, revision_of,
};
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

pub const ECR_HOST: &str = "123456789012.dkr.ecr.us-east-1.amazonaws.com";
pub const CLUSTER_ARN: &str = "arn:aws:ecs:us-east-1:123456789012:cluster/prod";
pub const TASK_ARN: &str = "arn:aws:ecs:us-east-1:123456789012:task/prod/0f1e2d3c";

pub fn cluster() -> ClusterName {
    ClusterName::new("prod").unwrap()
}

pub fn service_name() -> ServiceName {
    ServiceName::new("api").unwrap()
}

pub fn task_definition_arn(family: &str, revision: i64) -> TaskDefinitionArn {
    TaskDefinitionArn::new(format!(
        "arn:aws:ecs:us-east-1:123456789012:task-definition/{}:{}",
        family, revision
    ))
}

pub fn ecr_image(repository: &str, tag: &str) -> String {
    format!("{}/{}:{}", ECR_HOST, repository, tag)
}

pub fn task_definition(
    family: &str,
    revision: i64,
    containers: Vec<ContainerDefinition>,
) -> TaskDefinition {
    TaskDefinition {
        arn: task_definition_arn(family, revision),
        revision,
        family: family.to_string(),
        containers,
        network_mode: Some("awsvpc".to_string()),
        placement_constraints: Vec::new(),
        task_role_arn: None,
        execution_role_arn: None,
        volumes: Vec::new(),
        cpu: Some("256".to_string()),
        memory: Some("512".to_string()),
        requires_compatibilities: vec!["FARGATE".to_string()],
    }
}

/// A service snapshot with one deployment per entry in `deployments`.
pub fn service(revision: i64, deployments: usize, running: i32, desired: i32) -> Service {
    Service {
        cluster_arn: ClusterArn::new(CLUSTER_ARN),
        service_name: service_name(),
        task_definition: task_definition_arn("api", revision),
        desired_count: desired,
        running_count: running,
        deployment_configuration: None,
        deployments: (0..deployments)
            .map(|i| ServiceDeployment {
                id: format!("ecs-svc/{}", i),
                status: if i == 0 { "PRIMARY" } else { "ACTIVE" }.to_string(),
                task_definition: task_definition_arn("api", revision),
                desired_count: desired,
                running_count: running,
            })
            .collect(),
    }
}

pub fn task_run(state: TaskState, exit_code: Option<i32>) -> TaskRun {
    TaskRun {
        arn: TaskArn::new(TASK_ARN),
        cluster_arn: ClusterArn::new(CLUSTER_ARN),
        last_status: state,
        containers: vec![ContainerState {
            name: "app".to_string(),
            exit_code,
            reason: None,
        }],
        stopped_reason: exit_code.map(|_| "Essential container in task exited".to_string()),
    }
}

/// Every call the fake orchestrator received, in order.
#[derive(Debug, Clone)]
pub enum Call {
    DescribeService,
    UpdateService(ServiceUpdate),
    DescribeTaskDefinition(String),
    RegisterTaskDefinition(TaskDefinitionDraft),
    RunTask(RunTaskRequest),
    DescribeTask,
    StopTask(String),
}

/// Scriptable orchestrator.
///
/// `describe_service` and `describe_task` hand out scripted snapshots in
/// order and keep repeating the last one.
#[derive(Default)]
pub struct FakeOrchestrator {
    services: Mutex<VecDeque<Service>>,
    definitions: Mutex<Vec<TaskDefinition>>,
    tasks: Mutex<VecDeque<TaskRun>>,
    run_output: Mutex<Option<RunTaskOutput>>,
    fail_stop: Mutex<bool>,
    calls: Mutex<Vec<Call>>,
    history_snapshot: Mutex<Option<(Arc<MemoryParameterStore>, String)>>,
    history_at_update: Mutex<Vec<Option<String>>>,
}

impl FakeOrchestrator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_services(self, snapshots: impl IntoIterator<Item = Service>) -> Self {
        self.services.lock().extend(snapshots);
        self
    }

    pub fn with_definition(self, definition: TaskDefinition) -> Self {
        self.definitions.lock().push(definition);
        self
    }

    pub fn with_tasks(self, snapshots: impl IntoIterator<Item = TaskRun>) -> Self {
        self.tasks.lock().extend(snapshots);
        self
    }

    pub fn with_run_output(self, output: RunTaskOutput) -> Self {
        *self.run_output.lock() = Some(output);
        self
    }

    pub fn failing_stop(self) -> Self {
        *self.fail_stop.lock() = true;
        self
    }

    /// Capture the raw history blob `name` whenever a service update arrives.
    pub fn snapshot_history(self, store: Arc<MemoryParameterStore>, name: &str) -> Self {
        *self.history_snapshot.lock() = Some((store, name.to_string()));
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }

    pub fn history_at_update(&self) -> Vec<Option<String>> {
        self.history_at_update.lock().clone()
    }

    pub fn updates(&self) -> Vec<ServiceUpdate> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::UpdateService(u) => Some(u),
                _ => None,
            })
            .collect()
    }

    pub fn registrations(&self) -> Vec<TaskDefinitionDraft> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::RegisterTaskDefinition(d) => Some(d),
                _ => None,
            })
            .collect()
    }

    pub fn stops(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::StopTask(reason) => Some(reason),
                _ => None,
            })
            .collect()
    }

    pub fn count(&self, matches: impl Fn(&Call) -> bool) -> usize {
        self.calls.lock().iter().filter(|c| matches(c)).count()
    }

    fn next<T: Clone>(queue: &Mutex<VecDeque<T>>) -> Option<T> {
        let mut queue = queue.lock();
        if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().cloned()
        }
    }
}

#[async_trait]
impl ServiceOps for FakeOrchestrator {
    async fn describe_service(
        &self,
        _cluster: &ClusterName,
        _service: &ServiceName,
    ) -> Result<Option<Service>, RemoteError> {
        self.calls.lock().push(Call::DescribeService);
        Ok(Self::next(&self.services))
    }

    async fn update_service(&self, update: &ServiceUpdate) -> Result<(), RemoteError> {
        self.calls.lock().push(Call::UpdateService(update.clone()));
        let snapshot = self.history_snapshot.lock().clone();
        if let Some((store, name)) = snapshot {
            let blob = store.get(&name).await?;
            self.history_at_update.lock().push(blob);
        }
        Ok(())
    }
}

#[async_trait]
impl TaskDefinitionOps for FakeOrchestrator {
    async fn describe_task_definition(
        &self,
        reference: &str,
    ) -> Result<TaskDefinition, RemoteError> {
        self.calls
            .lock()
            .push(Call::DescribeTaskDefinition(reference.to_string()));

        let definitions = self.definitions.lock();
        let found = definitions.iter().find(|d| {
            d.arn.as_str() == reference || format!("{}:{}", d.family, d.revision) == reference
        });
        let found = found.or_else(|| {
            definitions
                .iter()
                .filter(|d| d.family == reference)
                .max_by_key(|d| d.revision)
        });

        found.cloned().ok_or_else(|| RemoteError::NotFound {
            operation: "DescribeTaskDefinition",
            resource: reference.to_string(),
        })
    }

    async fn register_task_definition(
        &self,
        draft: &TaskDefinitionDraft,
    ) -> Result<TaskDefinition, RemoteError> {
        self.calls
            .lock()
            .push(Call::RegisterTaskDefinition(draft.clone()));

        let mut definitions = self.definitions.lock();
        let revision = definitions
            .iter()
            .filter(|d| d.family == draft.family)
            .filter_map(|d| revision_of(d.arn.as_str()))
            .max()
            .unwrap_or(0)
            + 1;

        let registered = TaskDefinition {
            arn: task_definition_arn(&draft.family, revision),
            revision,
            family: draft.family.clone(),
            containers: draft.containers.clone(),
            network_mode: draft.network_mode.clone(),
            placement_constraints: draft.placement_constraints.clone(),
            task_role_arn: draft.task_role_arn.clone(),
            execution_role_arn: draft.execution_role_arn.clone(),
            volumes: draft.volumes.clone(),
            cpu: draft.cpu.clone(),
            memory: draft.memory.clone(),
            requires_compatibilities: draft.requires_compatibilities.clone(),
        };
        definitions.push(registered.clone());
        Ok(registered)
    }
}

#[async_trait]
impl TaskOps for FakeOrchestrator {
    async fn run_task(&self, request: &RunTaskRequest) -> Result<RunTaskOutput, RemoteError> {
        self.calls.lock().push(Call::RunTask(request.clone()));
        let scripted = self.run_output.lock().clone();
        Ok(scripted.unwrap_or_else(|| RunTaskOutput {
            tasks: vec![task_run(TaskState::Provisioning, None)],
            failures: Vec::new(),
        }))
    }

    async fn describe_task(
        &self,
        _cluster: &ClusterArn,
        _task: &TaskArn,
    ) -> Result<TaskRun, RemoteError> {
        self.calls.lock().push(Call::DescribeTask);
        Self::next(&self.tasks).ok_or_else(|| RemoteError::NotFound {
            operation: "DescribeTasks",
            resource: TASK_ARN.to_string(),
        })
    }

    async fn stop_task(
        &self,
        _cluster: &ClusterArn,
        _task: &TaskArn,
        reason: &str,
    ) -> Result<(), RemoteError> {
        self.calls.lock().push(Call::StopTask(reason.to_string()));
        if *self.fail_stop.lock() {
            return Err(RemoteError::Api {
                operation: "StopTask",
                message: "ThrottlingException: rate exceeded".to_string(),
            });
        }
        Ok(())
    }
}

pub fn failure(reason: &str) -> TaskFailure {
    TaskFailure {
        arn: None,
        reason: reason.to_string(),
        detail: None,
    }
}

/// Registry holding manifests per `(repository, selector)`.
#[derive(Default)]
pub struct FakeRegistry {
    manifests: Mutex<HashMap<(String, String), ImageManifest>>,
    gets: Mutex<Vec<(String, String)>>,
    puts: Mutex<Vec<(String, String)>>,
    fail_puts: Mutex<bool>,
}

impl FakeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_image(self, repository: &str, selector: ImageSelector) -> Self {
        let manifest = ImageManifest {
            body: format!(r#"{{"schemaVersion":2,"repository":"{}"}}"#, repository),
            media_type: Some("application/vnd.docker.distribution.manifest.v2+json".to_string()),
        };
        self.manifests
            .lock()
            .insert((repository.to_string(), selector.to_string()), manifest);
        self
    }

    pub fn failing_puts(self) -> Self {
        *self.fail_puts.lock() = true;
        self
    }

    /// `(repository, selector)` of every manifest read.
    pub fn gets(&self) -> Vec<(String, String)> {
        self.gets.lock().clone()
    }

    /// `(repository, tag)` of every manifest written.
    pub fn puts(&self) -> Vec<(String, String)> {
        self.puts.lock().clone()
    }
}

#[async_trait]
impl RegistryOps for FakeRegistry {
    async fn get_manifest(
        &self,
        repository: &str,
        image: &ImageSelector,
    ) -> Result<Option<ImageManifest>, RemoteError> {
        let key = (repository.to_string(), image.to_string());
        self.gets.lock().push(key.clone());
        Ok(self.manifests.lock().get(&key).cloned())
    }

    async fn put_manifest(
        &self,
        repository: &str,
        _manifest: &ImageManifest,
        tag: &str,
    ) -> Result<(), RemoteError> {
        if *self.fail_puts.lock() {
            return Err(RemoteError::Api {
                operation: "PutImage",
                message: "AccessDeniedException".to_string(),
            });
        }
        self.puts
            .lock()
            .push((repository.to_string(), tag.to_string()));
        Ok(())
    }
}

/// Notifier that keeps every message.
#[derive(Default)]
pub struct RecordingNotifier {
    messages: Mutex<Vec<(NotifyKind, String)>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<(NotifyKind, String)> {
        self.messages.lock().clone()
    }

    pub fn plain(&self) -> Vec<String> {
        self.messages()
            .into_iter()
            .filter(|(kind, _)| *kind == NotifyKind::Plain)
            .map(|(_, message)| message)
            .collect()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, kind: NotifyKind, message: &str) {
        self.messages.lock().push((kind, message.to_string()));
    }
}
