// ABOUTME: Service operations trait for the orchestrator.
// ABOUTME: Describe a service and point it at a new task definition.

use super::shared_types::{Service, ServiceUpdate};
use crate::orchestrator::RemoteError;
use crate::types::{ClusterName, ServiceName};
use async_trait::async_trait;

/// Service operations: describe, update.
#[async_trait]
pub trait ServiceOps: Send + Sync {
    /// Describe a service. `None` if the cluster has no such service.
    async fn describe_service(
        &self,
        cluster: &ClusterName,
        service: &ServiceName,
    ) -> Result<Option<Service>, RemoteError>;

    /// Submit a service update.
    async fn update_service(&self, update: &ServiceUpdate) -> Result<(), RemoteError>;
}
