// ABOUTME: Submits a task definition to a service and waits for the rollout.
// ABOUTME: Polling has no deadline of its own; callers wrap it if they need one.

use std::time::Duration;

use tokio::time::{Instant, interval_at};

use crate::notify::Notifier;
use crate::orchestrator::{Service, ServiceOps, ServiceUpdate};
use crate::output::format_elapsed;
use crate::types::{ClusterName, ServiceName, TaskDefinitionArn};

use super::error::DeployError;

/// Default time between service observations.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(10);

/// Shortest poll interval accepted; smaller values are raised to it.
pub const MIN_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Point `service` at `task_definition`.
///
/// Desired count and deployment configuration are carried over unchanged.
///
/// # Errors
///
/// Returns `DeployError::RollingOut` without calling the orchestrator if the
/// service still has more than one active deployment.
pub async fn submit<O: ServiceOps + ?Sized>(
    orchestrator: &O,
    service: &Service,
    task_definition: &TaskDefinitionArn,
) -> Result<(), DeployError> {
    ensure_stable(service)?;

    let update = ServiceUpdate {
        cluster: service.cluster_arn.clone(),
        service: service.service_name.clone(),
        task_definition: task_definition.clone(),
        desired_count: service.desired_count,
        deployment_configuration: service.deployment_configuration.clone(),
    };

    tracing::info!(
        service = %service.service_name,
        task_definition = %task_definition,
        "updating service"
    );
    orchestrator.update_service(&update).await?;

    Ok(())
}

/// Refuse to touch a service that is mid-rollout.
pub(crate) fn ensure_stable(service: &Service) -> Result<(), DeployError> {
    if service.is_rolling_out() {
        return Err(DeployError::RollingOut {
            service: service.service_name.to_string(),
            deployments: service.deployments.len(),
        });
    }
    Ok(())
}

/// Poll until the service has one deployment with every desired task running.
///
/// The first observation happens one `interval` after the call. Every
/// observation logs `still service updating... [<elapsed>]`.
///
/// # Errors
///
/// Any failed observation aborts the wait.
pub async fn await_convergence<O, N>(
    orchestrator: &O,
    cluster: &ClusterName,
    service: &ServiceName,
    interval: Duration,
    notifier: &N,
) -> Result<Service, DeployError>
where
    O: ServiceOps + ?Sized,
    N: Notifier + ?Sized,
{
    let interval = interval.max(MIN_POLL_INTERVAL);
    let start = Instant::now();
    let mut ticker = interval_at(start + interval, interval);

    loop {
        ticker.tick().await;

        let current = orchestrator
            .describe_service(cluster, service)
            .await?
            .ok_or_else(|| DeployError::ServiceNotFound {
                cluster: cluster.to_string(),
                service: service.to_string(),
            })?;

        notifier
            .log(&format!(
                "still service updating... [{}]",
                format_elapsed(start.elapsed())
            ))
            .await;

        tracing::debug!(
            deployments = current.deployments.len(),
            running = current.running_count,
            desired = current.desired_count,
            "observed service"
        );

        if current.has_converged() {
            return Ok(current);
        }
    }
}
