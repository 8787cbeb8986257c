// ABOUTME: Builds the task definition draft a deploy registers.
// ABOUTME: Managed containers are retagged to the deployment id; the rest are dropped.

use crate::orchestrator::{ContainerDefinition, TaskDefinition, TaskDefinitionDraft};
use crate::types::{DeploymentId, ImageRef};

use super::error::DeployError;
use super::promote::PromotionMode;

/// Containers a deploy ships, in definition order, with their parsed images.
///
/// # Errors
///
/// Returns `DeployError::InvalidImage` if a considered image does not parse
/// and `DeployError::NothingToShip` if no managed container is left.
pub(crate) fn shipped_containers(
    definition: &TaskDefinition,
    mode: PromotionMode,
) -> Result<Vec<(&ContainerDefinition, ImageRef)>, DeployError> {
    let considered = match mode {
        PromotionMode::AllManaged => definition.containers.len(),
        PromotionMode::FirstContainer => 1,
    };

    let mut shipped = Vec::new();
    for container in definition.containers.iter().take(considered) {
        let image =
            ImageRef::parse(&container.image).map_err(|source| DeployError::InvalidImage {
                container: container.name.clone(),
                source,
            })?;

        if image.is_managed() {
            shipped.push((container, image));
        } else {
            tracing::debug!(container = %container.name, image = %image, "skipping unmanaged image");
        }
    }

    if shipped.is_empty() {
        return Err(DeployError::NothingToShip(definition.arn.to_string()));
    }

    Ok(shipped)
}

/// Builder returned by [`TaskDefinitionDraft::from_source`].
///
/// Borrows the source definition; the draft it produces shares nothing
/// mutable with it.
#[derive(Debug)]
pub struct DraftBuilder<'a> {
    source: &'a TaskDefinition,
    mode: PromotionMode,
}

impl TaskDefinitionDraft {
    /// Start a draft copied from a registered definition.
    pub fn from_source(source: &TaskDefinition) -> DraftBuilder<'_> {
        DraftBuilder {
            source,
            mode: PromotionMode::default(),
        }
    }
}

impl DraftBuilder<'_> {
    #[must_use]
    pub fn promotion(mut self, mode: PromotionMode) -> Self {
        self.mode = mode;
        self
    }

    /// Point every shipped container at `<image name>:<id>`.
    ///
    /// Only the image changes; every other container field is carried over.
    ///
    /// # Errors
    ///
    /// Returns `DeployError::NothingToShip` if the draft would have no
    /// containers.
    pub fn retag_managed(self, id: &DeploymentId) -> Result<TaskDefinitionDraft, DeployError> {
        let tag = id.as_tag();
        let source = self.source;

        let containers = shipped_containers(source, self.mode)?
            .into_iter()
            .map(|(container, image)| ContainerDefinition {
                image: image.with_tag(&tag).to_string(),
                ..container.clone()
            })
            .collect();

        Ok(TaskDefinitionDraft {
            family: source.family.clone(),
            containers,
            network_mode: source.network_mode.clone(),
            placement_constraints: source.placement_constraints.clone(),
            task_role_arn: source.task_role_arn.clone(),
            execution_role_arn: source.execution_role_arn.clone(),
            volumes: source.volumes.clone(),
            cpu: source.cpu.clone(),
            memory: source.memory.clone(),
            requires_compatibilities: source.requires_compatibilities.clone(),
        })
    }
}
