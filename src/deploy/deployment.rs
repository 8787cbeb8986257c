// ABOUTME: Generic deployment struct parameterized by state marker.
// ABOUTME: State types carry their own data for compile-time guarantees.

use crate::history::HistoryKey;
use crate::orchestrator::{Service, ServiceOps, TaskDefinition, TaskDefinitionOps};
use crate::types::{DeploymentId, specify_revision};

use super::converge::ensure_stable;
use super::error::DeployError;
use super::state::{Converged, Promoted, Recorded, Registered, Resolved, Submitted};

/// A deployment in progress, parameterized by its current state.
///
/// The state type parameter `S` carries state-specific data (like the
/// registered task definition) directly in the state type, so a step that
/// needs it cannot be called before the step that produces it.
#[derive(Debug)]
pub struct Deployment<S> {
    pub(crate) key: HistoryKey,
    pub(crate) service: Service,
    pub(crate) source: TaskDefinition,
    pub(crate) id: DeploymentId,
    pub(crate) state: S,
}

impl Deployment<Resolved> {
    /// Look up the service and the task definition revision to ship.
    ///
    /// A `revision` of zero or less ships the service's current revision.
    ///
    /// # Errors
    ///
    /// Returns `DeployError::ServiceNotFound` if the service does not exist,
    /// `DeployError::RollingOut` if another rollout is in progress, and
    /// `DeployError::Revision` if the current ARN cannot be re-pointed.
    pub async fn resolve<O>(
        orchestrator: &O,
        key: HistoryKey,
        revision: i64,
    ) -> Result<Self, DeployError>
    where
        O: ServiceOps + TaskDefinitionOps + ?Sized,
    {
        let service = orchestrator
            .describe_service(&key.cluster, &key.service)
            .await?
            .ok_or_else(|| DeployError::ServiceNotFound {
                cluster: key.cluster.to_string(),
                service: key.service.to_string(),
            })?;
        ensure_stable(&service)?;

        let arn = specify_revision(service.task_definition.as_str(), revision)?;
        let source = orchestrator.describe_task_definition(&arn).await?;
        tracing::info!(%key, revision = source.revision, "resolved source task definition");

        Ok(Deployment {
            key,
            service,
            source,
            id: DeploymentId::generate(),
            state: Resolved,
        })
    }

    /// Replace the generated deployment id.
    #[must_use]
    pub fn with_id(mut self, id: DeploymentId) -> Self {
        self.id = id;
        self
    }
}

impl<S> Deployment<S> {
    pub fn key(&self) -> &HistoryKey {
        &self.key
    }

    /// The service as observed when the deployment was resolved.
    pub fn service(&self) -> &Service {
        &self.service
    }

    /// The task definition the deployment started from.
    pub fn source(&self) -> &TaskDefinition {
        &self.source
    }

    /// The deployment id, also the promoted image tag.
    pub fn id(&self) -> &DeploymentId {
        &self.id
    }

    pub fn state(&self) -> &S {
        &self.state
    }
}

// State-specific accessors for the registered task definition
impl Deployment<Registered> {
    pub fn task_definition(&self) -> &TaskDefinition {
        &self.state.task_definition
    }
}

impl Deployment<Recorded> {
    pub fn task_definition(&self) -> &TaskDefinition {
        &self.state.task_definition
    }
}

impl Deployment<Submitted> {
    pub fn task_definition(&self) -> &TaskDefinition {
        &self.state.task_definition
    }
}

impl Deployment<Converged> {
    pub fn task_definition(&self) -> &TaskDefinition {
        &self.state.task_definition
    }
}

impl Deployment<Promoted> {
    pub fn promoted_images(&self) -> &[super::state::PromotedImage] {
        self.state.images()
    }
}
