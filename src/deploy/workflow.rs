// ABOUTME: The deploy workflow: every transition from resolve to mark-deployed.
// ABOUTME: Progress goes to the notifier; the caller reports failures.

use std::time::Duration;

use crate::history::{HistoryKey, HistoryStore};
use crate::notify::{Notifier, NotifyKind};
use crate::orchestrator::{RegistryOps, ServiceOps, TaskDefinitionOps};
use crate::types::DeploymentId;

use super::Deployment;
use super::converge::DEFAULT_POLL_INTERVAL;
use super::error::DeployError;
use super::promote::PromotionPlan;
use super::transitions::DeployOutcome;

/// Inputs of one deploy.
#[derive(Debug, Clone)]
pub struct DeployRequest {
    pub key: HistoryKey,
    /// Revision to ship; zero or less ships the service's current one.
    pub revision: i64,
    pub promotion: PromotionPlan,
    pub poll_interval: Duration,
    /// Fixed deployment id; generated when `None`.
    pub id: Option<DeploymentId>,
}

impl DeployRequest {
    pub fn new(key: HistoryKey) -> Self {
        Self {
            key,
            revision: 0,
            promotion: PromotionPlan::default(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            id: None,
        }
    }
}

/// Ship a new revision of a service.
///
/// Order is fixed: promote images, register the definition, record it as
/// pending, update the service, wait for convergence, mark it deployed.
///
/// # Errors
///
/// Fails fast on the first error. Nothing is retried or undone.
pub async fn deploy<O, R, N>(
    orchestrator: &O,
    registry: &R,
    history: &HistoryStore,
    notifier: &N,
    request: &DeployRequest,
) -> Result<DeployOutcome, DeployError>
where
    O: ServiceOps + TaskDefinitionOps + ?Sized,
    R: RegistryOps + ?Sized,
    N: Notifier + ?Sized,
{
    let mut resolved =
        Deployment::resolve(orchestrator, request.key.clone(), request.revision).await?;
    if let Some(id) = request.id {
        resolved = resolved.with_id(id);
    }

    let registered = resolved
        .promote(registry, &request.promotion)
        .await?
        .register(orchestrator)
        .await?;

    notifier
        .log(&format!(
            "task definition registered successfully: revision {} -> {}",
            registered.source().revision,
            registered.task_definition().revision
        ))
        .await;

    let submitted = registered
        .record_pending(history)
        .await?
        .submit(orchestrator)
        .await?;
    notifier.log("service updating").await;

    let outcome = submitted
        .await_convergence(orchestrator, request.poll_interval, notifier)
        .await?
        .mark_deployed(history)
        .await?;

    notifier
        .notify(NotifyKind::Success, "service updated successfully")
        .await;

    Ok(outcome)
}
