// ABOUTME: Amazon ECS implementation of the orchestrator traits.
// ABOUTME: Converts between aws-sdk-ecs shapes and shipctl's domain types.

use crate::orchestrator::error::MalformedSnafu;
use crate::orchestrator::traits::{
    ContainerDefinition, ContainerState, DeploymentConfiguration, Native, PlacementConstraint,
    RunTaskOutput, RunTaskRequest, Service, ServiceDeployment, ServiceOps, ServiceUpdate,
    TaskDefinition, TaskDefinitionDraft, TaskDefinitionOps, TaskFailure, TaskOps, TaskRun,
    TaskState, Volume,
};
use crate::orchestrator::RemoteError;
use crate::types::{ClusterArn, ClusterName, ServiceName, TaskArn, TaskDefinitionArn};
use async_trait::async_trait;
use aws_sdk_ecs::Client;
use aws_sdk_ecs::operation::describe_task_definition::DescribeTaskDefinitionError;
use aws_sdk_ecs::types as ecs;
use snafu::OptionExt;

/// Orchestrator backed by the ECS API.
#[derive(Debug, Clone)]
pub struct EcsOrchestrator {
    client: Client,
}

impl EcsOrchestrator {
    pub fn new(config: &aws_config::SdkConfig) -> Self {
        Self {
            client: Client::new(config),
        }
    }
}

// =============================================================================
// Conversions: ECS -> domain
// =============================================================================

/// ECS reports an unknown family or revision as a generic client exception.
fn missing_task_definition(
    operation: &'static str,
    reference: &str,
    err: &DescribeTaskDefinitionError,
) -> Option<RemoteError> {
    match err {
        DescribeTaskDefinitionError::ClientException(ex)
            if ex
                .message()
                .is_some_and(|m| m.contains("Unable to describe task definition")) =>
        {
            Some(RemoteError::NotFound {
                operation,
                resource: format!("task definition {reference}"),
            })
        }
        _ => None,
    }
}

fn service_from_ecs(svc: &ecs::Service) -> Result<Service, RemoteError> {
    const OP: &str = "DescribeServices";

    let cluster_arn = svc.cluster_arn().context(MalformedSnafu {
        operation: OP,
        what: "cluster ARN",
    })?;
    let name = svc.service_name().context(MalformedSnafu {
        operation: OP,
        what: "service name",
    })?;
    let task_definition = svc.task_definition().context(MalformedSnafu {
        operation: OP,
        what: "task definition",
    })?;
    let service_name = ServiceName::new(name).ok().context(MalformedSnafu {
        operation: OP,
        what: "valid service name",
    })?;

    let deployments = svc
        .deployments()
        .iter()
        .map(|d| ServiceDeployment {
            id: d.id().unwrap_or_default().to_string(),
            status: d.status().unwrap_or_default().to_string(),
            task_definition: TaskDefinitionArn::new(d.task_definition().unwrap_or_default()),
            desired_count: d.desired_count(),
            running_count: d.running_count(),
        })
        .collect();

    Ok(Service {
        cluster_arn: ClusterArn::new(cluster_arn),
        service_name,
        task_definition: TaskDefinitionArn::new(task_definition),
        desired_count: svc.desired_count(),
        running_count: svc.running_count(),
        deployment_configuration: svc.deployment_configuration().map(|c| {
            DeploymentConfiguration {
                maximum_percent: c.maximum_percent(),
                minimum_healthy_percent: c.minimum_healthy_percent(),
                native: Native::new(c.clone()),
            }
        }),
        deployments,
    })
}

fn task_definition_from_ecs(
    operation: &'static str,
    def: &ecs::TaskDefinition,
) -> Result<TaskDefinition, RemoteError> {
    let arn = def.task_definition_arn().context(MalformedSnafu {
        operation,
        what: "task definition ARN",
    })?;
    let family = def.family().context(MalformedSnafu {
        operation,
        what: "family",
    })?;

    let containers = def
        .container_definitions()
        .iter()
        .map(|c| ContainerDefinition {
            name: c.name().unwrap_or_default().to_string(),
            image: c.image().unwrap_or_default().to_string(),
            command: c.command().to_vec(),
            essential: c.essential(),
            native: Native::new(c.clone()),
        })
        .collect();

    let placement_constraints = def
        .placement_constraints()
        .iter()
        .map(|p| PlacementConstraint {
            kind: p
                .r#type()
                .map(|t| t.as_str().to_string())
                .unwrap_or_default(),
            expression: p.expression().map(str::to_string),
        })
        .collect();

    let volumes = def
        .volumes()
        .iter()
        .map(|v| Volume {
            name: v.name().unwrap_or_default().to_string(),
            host_path: v
                .host()
                .and_then(|h| h.source_path())
                .map(str::to_string),
            native: Native::new(v.clone()),
        })
        .collect();

    Ok(TaskDefinition {
        arn: TaskDefinitionArn::new(arn),
        revision: i64::from(def.revision()),
        family: family.to_string(),
        containers,
        network_mode: def.network_mode().map(|m| m.as_str().to_string()),
        placement_constraints,
        task_role_arn: def.task_role_arn().map(str::to_string),
        execution_role_arn: def.execution_role_arn().map(str::to_string),
        volumes,
        cpu: def.cpu().map(str::to_string),
        memory: def.memory().map(str::to_string),
        requires_compatibilities: def
            .requires_compatibilities()
            .iter()
            .map(|c| c.as_str().to_string())
            .collect(),
    })
}

fn task_from_ecs(operation: &'static str, task: &ecs::Task) -> Result<TaskRun, RemoteError> {
    let arn = task.task_arn().context(MalformedSnafu {
        operation,
        what: "task ARN",
    })?;
    let cluster_arn = task.cluster_arn().context(MalformedSnafu {
        operation,
        what: "cluster ARN",
    })?;

    Ok(TaskRun {
        arn: TaskArn::new(arn),
        cluster_arn: ClusterArn::new(cluster_arn),
        last_status: TaskState::parse(task.last_status().unwrap_or("PROVISIONING")),
        containers: task
            .containers()
            .iter()
            .map(|c| ContainerState {
                name: c.name().unwrap_or_default().to_string(),
                exit_code: c.exit_code(),
                reason: c.reason().map(str::to_string),
            })
            .collect(),
        stopped_reason: task.stopped_reason().map(str::to_string),
    })
}

fn failure_from_ecs(failure: &ecs::Failure) -> TaskFailure {
    TaskFailure {
        arn: failure.arn().map(str::to_string),
        reason: failure.reason().unwrap_or("unknown reason").to_string(),
        detail: failure.detail().map(str::to_string),
    }
}

// =============================================================================
// Conversions: domain -> ECS
// =============================================================================

fn container_to_ecs(container: &ContainerDefinition) -> ecs::ContainerDefinition {
    let mut native = container
        .native
        .get::<ecs::ContainerDefinition>()
        .cloned()
        .unwrap_or_else(|| ecs::ContainerDefinition::builder().build());

    native.name = Some(container.name.clone());
    native.image = Some(container.image.clone());
    if !container.command.is_empty() {
        native.command = Some(container.command.clone());
    }
    if container.essential.is_some() {
        native.essential = container.essential;
    }
    native
}

fn volume_to_ecs(volume: &Volume) -> ecs::Volume {
    if let Some(native) = volume.native.get::<ecs::Volume>() {
        return native.clone();
    }

    ecs::Volume::builder()
        .name(&volume.name)
        .set_host(
            volume
                .host_path
                .as_ref()
                .map(|p| ecs::HostVolumeProperties::builder().source_path(p).build()),
        )
        .build()
}

fn constraint_to_ecs(constraint: &PlacementConstraint) -> ecs::TaskDefinitionPlacementConstraint {
    ecs::TaskDefinitionPlacementConstraint::builder()
        .r#type(ecs::TaskDefinitionPlacementConstraintType::from(
            constraint.kind.as_str(),
        ))
        .set_expression(constraint.expression.clone())
        .build()
}

fn deployment_configuration_to_ecs(
    config: &DeploymentConfiguration,
) -> ecs::DeploymentConfiguration {
    if let Some(native) = config.native.get::<ecs::DeploymentConfiguration>() {
        return native.clone();
    }

    ecs::DeploymentConfiguration::builder()
        .set_maximum_percent(config.maximum_percent)
        .set_minimum_healthy_percent(config.minimum_healthy_percent)
        .build()
}

fn non_empty<T>(items: Vec<T>) -> Option<Vec<T>> {
    if items.is_empty() { None } else { Some(items) }
}

// =============================================================================
// Trait implementations
// =============================================================================

#[async_trait]
impl ServiceOps for EcsOrchestrator {
    async fn describe_service(
        &self,
        cluster: &ClusterName,
        service: &ServiceName,
    ) -> Result<Option<Service>, RemoteError> {
        tracing::debug!(%cluster, %service, "DescribeServices");
        let output = self
            .client
            .describe_services()
            .cluster(cluster.as_str())
            .services(service.as_str())
            .send()
            .await
            .map_err(|e| RemoteError::api("DescribeServices", e))?;

        match output.services().first() {
            Some(svc) => service_from_ecs(svc).map(Some),
            None => Ok(None),
        }
    }

    async fn update_service(&self, update: &ServiceUpdate) -> Result<(), RemoteError> {
        tracing::debug!(
            service = %update.service,
            task_definition = %update.task_definition,
            "UpdateService"
        );
        self.client
            .update_service()
            .cluster(update.cluster.as_str())
            .service(update.service.as_str())
            .task_definition(update.task_definition.as_str())
            .desired_count(update.desired_count)
            .set_deployment_configuration(
                update
                    .deployment_configuration
                    .as_ref()
                    .map(deployment_configuration_to_ecs),
            )
            .send()
            .await
            .map_err(|e| RemoteError::api("UpdateService", e))?;

        Ok(())
    }
}

#[async_trait]
impl TaskDefinitionOps for EcsOrchestrator {
    async fn describe_task_definition(
        &self,
        reference: &str,
    ) -> Result<TaskDefinition, RemoteError> {
        const OP: &str = "DescribeTaskDefinition";

        tracing::debug!(reference, "DescribeTaskDefinition");
        let output = self
            .client
            .describe_task_definition()
            .task_definition(reference)
            .send()
            .await
            .map_err(|e| {
                e.as_service_error()
                    .and_then(|service| missing_task_definition(OP, reference, service))
                    .unwrap_or_else(|| RemoteError::api(OP, e))
            })?;

        let def = output.task_definition().context(MalformedSnafu {
            operation: OP,
            what: "task definition",
        })?;
        task_definition_from_ecs(OP, def)
    }

    async fn register_task_definition(
        &self,
        draft: &TaskDefinitionDraft,
    ) -> Result<TaskDefinition, RemoteError> {
        const OP: &str = "RegisterTaskDefinition";

        tracing::debug!(family = %draft.family, "RegisterTaskDefinition");
        let output = self
            .client
            .register_task_definition()
            .family(&draft.family)
            .set_container_definitions(Some(
                draft.containers.iter().map(container_to_ecs).collect(),
            ))
            .set_network_mode(draft.network_mode.as_deref().map(ecs::NetworkMode::from))
            .set_placement_constraints(non_empty(
                draft
                    .placement_constraints
                    .iter()
                    .map(constraint_to_ecs)
                    .collect(),
            ))
            .set_task_role_arn(draft.task_role_arn.clone())
            .set_execution_role_arn(draft.execution_role_arn.clone())
            .set_volumes(non_empty(draft.volumes.iter().map(volume_to_ecs).collect()))
            .set_cpu(draft.cpu.clone())
            .set_memory(draft.memory.clone())
            .set_requires_compatibilities(non_empty(
                draft
                    .requires_compatibilities
                    .iter()
                    .map(|c| ecs::Compatibility::from(c.as_str()))
                    .collect(),
            ))
            .send()
            .await
            .map_err(|e| RemoteError::api(OP, e))?;

        let def = output.task_definition().context(MalformedSnafu {
            operation: OP,
            what: "task definition",
        })?;
        task_definition_from_ecs(OP, def)
    }
}

#[async_trait]
impl TaskOps for EcsOrchestrator {
    async fn run_task(&self, request: &RunTaskRequest) -> Result<RunTaskOutput, RemoteError> {
        const OP: &str = "RunTask";

        tracing::debug!(
            cluster = %request.cluster,
            task_definition = %request.task_definition,
            "RunTask"
        );
        let overrides = ecs::TaskOverride::builder()
            .container_overrides(
                ecs::ContainerOverride::builder()
                    .name(&request.container_name)
                    .set_command(Some(request.command.clone()))
                    .build(),
            )
            .build();

        let output = self
            .client
            .run_task()
            .cluster(request.cluster.as_str())
            .task_definition(request.task_definition.as_str())
            .overrides(overrides)
            .count(1)
            .started_by(&request.started_by)
            .send()
            .await
            .map_err(|e| RemoteError::api(OP, e))?;

        Ok(RunTaskOutput {
            tasks: output
                .tasks()
                .iter()
                .map(|t| task_from_ecs(OP, t))
                .collect::<Result<_, _>>()?,
            failures: output.failures().iter().map(failure_from_ecs).collect(),
        })
    }

    async fn describe_task(
        &self,
        cluster: &ClusterArn,
        task: &TaskArn,
    ) -> Result<TaskRun, RemoteError> {
        const OP: &str = "DescribeTasks";

        let output = self
            .client
            .describe_tasks()
            .cluster(cluster.as_str())
            .tasks(task.as_str())
            .send()
            .await
            .map_err(|e| RemoteError::api(OP, e))?;

        if !output.failures().is_empty() {
            return Err(RemoteError::rejected(
                OP,
                output.failures().iter().map(failure_from_ecs),
            ));
        }

        let task = output.tasks().first().context(MalformedSnafu {
            operation: OP,
            what: "task",
        })?;
        task_from_ecs(OP, task)
    }

    async fn stop_task(
        &self,
        cluster: &ClusterArn,
        task: &TaskArn,
        reason: &str,
    ) -> Result<(), RemoteError> {
        tracing::debug!(%task, reason, "StopTask");
        self.client
            .stop_task()
            .cluster(cluster.as_str())
            .task(task.as_str())
            .reason(reason)
            .send()
            .await
            .map_err(|e| RemoteError::api("StopTask", e))?;

        Ok(())
    }
}
