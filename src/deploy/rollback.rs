// ABOUTME: Rollback to the previous revision recorded in deployment history.
// ABOUTME: Resubmits that revision, waits for the rollout, then records it as pending.

use std::time::Duration;

use crate::history::{HistoryKey, HistoryStore};
use crate::notify::{Notifier, NotifyKind};
use crate::orchestrator::{ServiceOps, TaskDefinitionOps};
use crate::types::{TaskDefinitionArn, specify_revision};

use super::converge::{await_convergence, submit};
use super::error::DeployError;

/// What a finished rollback changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RollbackOutcome {
    pub from_revision: i64,
    pub to_revision: i64,
    pub task_definition: TaskDefinitionArn,
}

/// Roll `key` back to the second most recent revision in its history.
///
/// The restored revision is appended as a pending record once the service
/// has converged. It is never marked deployed.
///
/// # Errors
///
/// Returns `DeployError::InsufficientHistory` with fewer than two records,
/// `DeployError::RollbackWhileDeploying` if a rollout is in progress, and any
/// failure of the service update or wait. History is untouched unless the
/// service converged.
pub async fn rollback<O, N>(
    orchestrator: &O,
    history: &HistoryStore,
    notifier: &N,
    key: &HistoryKey,
    interval: Duration,
) -> Result<RollbackOutcome, DeployError>
where
    O: ServiceOps + TaskDefinitionOps + ?Sized,
    N: Notifier + ?Sized,
{
    let records = history.pull(key).await?;
    let [.., previous, current] = records.as_slice() else {
        return Err(DeployError::InsufficientHistory(records.len()));
    };

    let service = orchestrator
        .describe_service(&key.cluster, &key.service)
        .await?
        .ok_or_else(|| DeployError::ServiceNotFound {
            cluster: key.cluster.to_string(),
            service: key.service.to_string(),
        })?;
    if service.is_rolling_out() {
        return Err(DeployError::RollbackWhileDeploying {
            service: service.service_name.to_string(),
            deployments: service.deployments.len(),
        });
    }

    let arn = specify_revision(service.task_definition.as_str(), previous.revision)?;
    let target = orchestrator.describe_task_definition(&arn).await?;

    notifier
        .log(&format!(
            "rollback: revision {} -> {}",
            current.revision, previous.revision
        ))
        .await;

    submit(orchestrator, &service, &target.arn).await?;
    notifier.log("service updating").await;

    await_convergence(orchestrator, &key.cluster, &key.service, interval, notifier).await?;

    let cause = format!("rollback: {} -> {}", current.revision, previous.revision);
    history
        .record_rollback(key, previous.revision, &cause)
        .await?;
    tracing::info!(%key, from = current.revision, to = previous.revision, "rollback complete");

    notifier
        .notify(NotifyKind::Success, "service updated successfully")
        .await;

    Ok(RollbackOutcome {
        from_revision: current.revision,
        to_revision: previous.revision,
        task_definition: target.arn,
    })
}
