// ABOUTME: Launches a single task and waits for it to stop.
// ABOUTME: A cancellation future triggers one best-effort stop request.

use std::fmt;
use std::future::Future;
use std::time::Duration;

use tokio::time::{Instant, interval_at};

use crate::deploy::MIN_POLL_INTERVAL;
use crate::diagnostics::{Diagnostics, Warning};
use crate::notify::Notifier;
use crate::orchestrator::{
    RemoteError, RunTaskRequest, ServiceOps, TaskDefinition, TaskDefinitionOps, TaskOps, TaskRun,
};
use crate::output::format_elapsed;
use crate::types::{ClusterName, ServiceName, specify_revision};

use super::error::OneshotError;

/// Default `startedBy` marker on launched tasks.
pub const STARTED_BY: &str = "shipctl oneshot";

/// Reason sent with the stop request.
pub const STOP_REASON: &str = "SIGINT";

/// Where the task definition to run comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskSource {
    /// A family, `family:revision`, or full ARN.
    TaskDefinition(String),
    /// Whatever the service currently runs.
    Service(ServiceName),
}

/// Lifecycle phase shown in progress lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Running,
    Stopping,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Running => f.write_str("running"),
            Phase::Stopping => f.write_str("stopping"),
        }
    }
}

/// Final state of a stopped task.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskStatus {
    /// Exit code of the first container; 0 when it reported none.
    pub exit_code: i32,
    pub stopped_reason: String,
}

impl TaskStatus {
    fn from_run(run: &TaskRun) -> Self {
        Self {
            exit_code: run
                .containers
                .first()
                .and_then(|c| c.exit_code)
                .unwrap_or(0),
            stopped_reason: run.stopped_reason.clone().unwrap_or_default(),
        }
    }
}

/// Find the task definition to run and apply `revision` to it.
///
/// # Errors
///
/// Returns `OneshotError::ServiceNotFound` for a missing service and
/// `OneshotError::Revision` if the ARN cannot be re-pointed.
pub async fn resolve_task_definition<O>(
    orchestrator: &O,
    cluster: &ClusterName,
    source: &TaskSource,
    revision: i64,
) -> Result<TaskDefinition, OneshotError>
where
    O: ServiceOps + TaskDefinitionOps + ?Sized,
{
    let arn = match source {
        TaskSource::TaskDefinition(name) => orchestrator.describe_task_definition(name).await?.arn,
        TaskSource::Service(service) => {
            orchestrator
                .describe_service(cluster, service)
                .await?
                .ok_or_else(|| OneshotError::ServiceNotFound {
                    cluster: cluster.to_string(),
                    service: service.to_string(),
                })?
                .task_definition
        }
    };

    let arn = specify_revision(arn.as_str(), revision)?;
    Ok(orchestrator.describe_task_definition(&arn).await?)
}

/// Start one task running `command` in the definition's first container.
///
/// # Errors
///
/// Every failure the orchestrator reports is listed in one
/// `RemoteError::Rejected`.
pub async fn launch<O: TaskOps + ?Sized>(
    orchestrator: &O,
    cluster: &ClusterName,
    definition: &TaskDefinition,
    command: &[String],
    started_by: &str,
) -> Result<TaskRun, OneshotError> {
    if command.is_empty() {
        return Err(OneshotError::MissingCommand);
    }

    let container = definition
        .containers
        .first()
        .ok_or_else(|| OneshotError::NoContainers(definition.arn.to_string()))?;

    let request = RunTaskRequest {
        cluster: cluster.clone(),
        task_definition: definition.arn.clone(),
        container_name: container.name.clone(),
        command: command.to_vec(),
        started_by: started_by.to_string(),
    };

    tracing::info!(task_definition = %definition.arn, container = %container.name, "running task");
    let output = orchestrator.run_task(&request).await?;

    if !output.failures.is_empty() {
        return Err(RemoteError::rejected("RunTask", &output.failures).into());
    }

    output.tasks.into_iter().next().ok_or(OneshotError::NoTask)
}

/// Poll `run` until it reports `STOPPED`.
///
/// When `cancel` resolves the task is asked to stop once, the phase turns to
/// `stopping`, and polling continues until the task is really gone. A failed
/// stop request is recorded in `diag` and otherwise ignored.
///
/// # Errors
///
/// Any failed observation aborts the wait.
pub async fn await_completion<O, N, C>(
    orchestrator: &O,
    run: &TaskRun,
    cancel: C,
    interval: Duration,
    notifier: &N,
    diag: &mut Diagnostics,
) -> Result<TaskStatus, OneshotError>
where
    O: TaskOps + ?Sized,
    N: Notifier + ?Sized,
    C: Future<Output = ()>,
{
    let interval = interval.max(MIN_POLL_INTERVAL);
    let start = Instant::now();
    let mut ticker = interval_at(start + interval, interval);
    let mut phase = Phase::Running;
    tokio::pin!(cancel);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let task = orchestrator.describe_task(&run.cluster_arn, &run.arn).await?;
                notifier
                    .log(&format!("still {}... [{}]", phase, format_elapsed(start.elapsed())))
                    .await;

                if task.last_status.is_stopped() {
                    let status = TaskStatus::from_run(&task);
                    tracing::info!(task = %run.arn, exit_code = status.exit_code, "task stopped");
                    return Ok(status);
                }
            }
            () = &mut cancel, if phase == Phase::Running => {
                if let Err(e) = orchestrator
                    .stop_task(&run.cluster_arn, &run.arn, STOP_REASON)
                    .await
                {
                    diag.warn(Warning::TaskNotStopped {
                        task: run.arn.clone(),
                        reason: e.to_string(),
                    });
                }
                notifier.log("send stop signal").await;
                phase = Phase::Stopping;
            }
        }
    }
}
