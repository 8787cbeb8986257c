// ABOUTME: State transition methods for deployment orchestration.
// ABOUTME: Each method consumes self and returns the next state on success.

use std::time::Duration;

use crate::history::HistoryStore;
use crate::notify::Notifier;
use crate::orchestrator::{RegistryOps, ServiceOps, TaskDefinitionDraft, TaskDefinitionOps};
use crate::types::TaskDefinitionArn;

use super::Deployment;
use super::converge;
use super::error::DeployError;
use super::promote::{ImagePromoter, PromotionPlan};
use super::state::{Converged, Promoted, Recorded, Registered, Resolved, Submitted};

/// What a finished deploy changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployOutcome {
    pub previous_revision: i64,
    pub revision: i64,
    pub task_definition: TaskDefinitionArn,
    pub tag: String,
}

impl<S> Deployment<S> {
    /// Internal helper to transition to a new state.
    fn transition<T>(self, state: T) -> Deployment<T> {
        Deployment {
            key: self.key,
            service: self.service,
            source: self.source,
            id: self.id,
            state,
        }
    }
}

// =============================================================================
// Resolved -> Promoted
// =============================================================================

impl Deployment<Resolved> {
    /// Copy every shipped image to the deployment tag.
    ///
    /// # Errors
    ///
    /// Returns the first promotion failure. Nothing has been registered or
    /// recorded at that point.
    #[must_use = "deployment state must be used"]
    pub async fn promote<R: RegistryOps + ?Sized>(
        self,
        registry: &R,
        plan: &PromotionPlan,
    ) -> Result<Deployment<Promoted>, DeployError> {
        let images = ImagePromoter::new(registry, plan)
            .promote(&self.source, &self.id)
            .await?;

        Ok(self.transition(Promoted {
            mode: plan.mode,
            images,
        }))
    }
}

// =============================================================================
// Promoted -> Registered
// =============================================================================

impl Deployment<Promoted> {
    /// Register a new revision that runs the promoted images.
    ///
    /// # Errors
    ///
    /// Returns error if the draft is empty or registration fails.
    #[must_use = "deployment state must be used"]
    pub async fn register<O: TaskDefinitionOps + ?Sized>(
        self,
        orchestrator: &O,
    ) -> Result<Deployment<Registered>, DeployError> {
        let draft = TaskDefinitionDraft::from_source(&self.source)
            .promotion(self.state.mode)
            .retag_managed(&self.id)?;

        let task_definition = orchestrator.register_task_definition(&draft).await?;
        tracing::info!(
            from = self.source.revision,
            to = task_definition.revision,
            "registered task definition"
        );

        Ok(self.transition(Registered { task_definition }))
    }
}

// =============================================================================
// Registered -> Recorded
// =============================================================================

impl Deployment<Registered> {
    /// History cause for this deploy, e.g. `deploy: 6 -> 7`.
    pub fn cause(&self) -> String {
        format!(
            "deploy: {} -> {}",
            self.source.revision, self.state.task_definition.revision
        )
    }

    /// Write the pending history record before the service is touched.
    ///
    /// # Errors
    ///
    /// Returns `DeployError::History` if the revision is already in history
    /// or the backend fails.
    #[must_use = "deployment state must be used"]
    pub async fn record_pending(
        self,
        history: &HistoryStore,
    ) -> Result<Deployment<Recorded>, DeployError> {
        let cause = self.cause();
        history
            .push_pending(&self.key, self.state.task_definition.revision, &cause)
            .await?;

        let task_definition = self.state.task_definition.clone();
        Ok(self.transition(Recorded { task_definition }))
    }
}

// =============================================================================
// Recorded -> Submitted
// =============================================================================

impl Deployment<Recorded> {
    /// Point the service at the registered revision.
    ///
    /// # Errors
    ///
    /// Returns `DeployError::RollingOut` if the service was mid-rollout when
    /// resolved, or the update failure.
    #[must_use = "deployment state must be used"]
    pub async fn submit<O: ServiceOps + ?Sized>(
        self,
        orchestrator: &O,
    ) -> Result<Deployment<Submitted>, DeployError> {
        converge::submit(orchestrator, &self.service, &self.state.task_definition.arn).await?;

        let task_definition = self.state.task_definition.clone();
        Ok(self.transition(Submitted { task_definition }))
    }
}

// =============================================================================
// Submitted -> Converged
// =============================================================================

impl Deployment<Submitted> {
    /// Wait for the rollout to finish.
    ///
    /// # Errors
    ///
    /// Returns the first failed service observation.
    #[must_use = "deployment state must be used"]
    pub async fn await_convergence<O, N>(
        self,
        orchestrator: &O,
        interval: Duration,
        notifier: &N,
    ) -> Result<Deployment<Converged>, DeployError>
    where
        O: ServiceOps + ?Sized,
        N: Notifier + ?Sized,
    {
        converge::await_convergence(
            orchestrator,
            &self.key.cluster,
            &self.key.service,
            interval,
            notifier,
        )
        .await?;

        let task_definition = self.state.task_definition.clone();
        Ok(self.transition(Converged { task_definition }))
    }
}

// =============================================================================
// Converged -> done
// =============================================================================

impl Deployment<Converged> {
    /// Flip the pending record to deployed and finish.
    ///
    /// # Errors
    ///
    /// Returns `DeployError::History` if the pending record is gone.
    pub async fn mark_deployed(self, history: &HistoryStore) -> Result<DeployOutcome, DeployError> {
        let revision = self.state.task_definition.revision;
        history.mark_deployed(&self.key, revision).await?;
        tracing::info!(key = %self.key, revision, "deployment complete");

        Ok(DeployOutcome {
            previous_revision: self.source.revision,
            revision,
            task_definition: self.state.task_definition.arn,
            tag: self.id.as_tag(),
        })
    }
}
