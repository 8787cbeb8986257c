// ABOUTME: Copies registry-managed images to the deployment-unique tag.
// ABOUTME: Promotion is sequential; the first failure aborts the deploy.

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use crate::orchestrator::{ImageSelector, RegistryOps, TaskDefinition};
use crate::types::{DeploymentId, ImageRef};

use super::error::DeployError;
use super::mutate::shipped_containers;
use super::state::PromotedImage;

/// Which containers a deploy promotes and ships.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PromotionMode {
    /// Every container whose image lives in a managed registry.
    #[default]
    AllManaged,
    /// Only the first container, as older releases did.
    FirstContainer,
}

impl FromStr for PromotionMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all-managed" => Ok(PromotionMode::AllManaged),
            "first-container" => Ok(PromotionMode::FirstContainer),
            other => Err(format!(
                "unknown promotion mode '{}' (expected all-managed or first-container)",
                other
            )),
        }
    }
}

impl fmt::Display for PromotionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PromotionMode::AllManaged => f.write_str("all-managed"),
            PromotionMode::FirstContainer => f.write_str("first-container"),
        }
    }
}

/// Source tag override for one repository, written `<repository>:<tag>`.
///
/// The repository may be given bare (`team/api`) or with its registry host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceTag {
    repository: String,
    tag: String,
}

impl SourceTag {
    pub fn new(repository: impl Into<String>, tag: impl Into<String>) -> Self {
        Self {
            repository: repository.into(),
            tag: tag.into(),
        }
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    fn matches(&self, image: &ImageRef) -> bool {
        self.repository == image.repository() || self.repository == image.name()
    }
}

impl FromStr for SourceTag {
    type Err = DeployError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.rsplit_once(':') {
            Some((repository, tag))
                if !repository.is_empty() && !tag.is_empty() && !tag.contains('/') =>
            {
                Ok(SourceTag::new(repository, tag))
            }
            _ => Err(DeployError::InvalidSelector(s.to_string())),
        }
    }
}

impl fmt::Display for SourceTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.repository, self.tag)
    }
}

/// What to promote: the container selection and any source tag overrides.
#[derive(Debug, Clone, Default)]
pub struct PromotionPlan {
    pub mode: PromotionMode,
    pub sources: Vec<SourceTag>,
}

/// Retags images in a registry under a deployment id.
pub struct ImagePromoter<'a, R: ?Sized> {
    registry: &'a R,
    plan: &'a PromotionPlan,
}

impl<'a, R: RegistryOps + ?Sized> ImagePromoter<'a, R> {
    pub fn new(registry: &'a R, plan: &'a PromotionPlan) -> Self {
        Self { registry, plan }
    }

    /// Copy every shipped image's source manifest to the `id` tag.
    ///
    /// Selectors are checked before the first registry call, so a typo in
    /// `--image` never leaves a half-promoted deploy behind.
    ///
    /// # Errors
    ///
    /// Returns `DeployError::UnmatchedSelector` if a selector names no shipped
    /// container, `DeployError::ImageNotFound` if a source manifest is
    /// missing, and `DeployError::Remote` for any other registry failure.
    pub async fn promote(
        &self,
        definition: &TaskDefinition,
        id: &DeploymentId,
    ) -> Result<Vec<PromotedImage>, DeployError> {
        let shipped = shipped_containers(definition, self.plan.mode)?;

        if let Some(unmatched) = self
            .plan
            .sources
            .iter()
            .find(|source| !shipped.iter().any(|(_, image)| source.matches(image)))
        {
            return Err(DeployError::UnmatchedSelector(unmatched.to_string()));
        }

        let tag = id.as_tag();
        let mut promoted = Vec::with_capacity(shipped.len());

        for (container, image) in shipped {
            let selector = self.source_of(&image);
            tracing::info!(
                container = %container.name,
                repository = image.repository(),
                from = %selector,
                to = %tag,
                "promoting image"
            );

            let manifest = self
                .registry
                .get_manifest(image.repository(), &selector)
                .await?
                .ok_or_else(|| DeployError::ImageNotFound {
                    repository: image.name(),
                    reference: selector.to_string(),
                })?;

            self.registry
                .put_manifest(image.repository(), &manifest, &tag)
                .await?;

            promoted.push(PromotedImage {
                container: container.name.clone(),
                target: image.with_tag(&tag),
                source: image,
            });
        }

        Ok(promoted)
    }

    fn source_of(&self, image: &ImageRef) -> ImageSelector {
        if let Some(source) = self.plan.sources.iter().find(|s| s.matches(image)) {
            return ImageSelector::Tag(source.tag.clone());
        }

        match (image.tag(), image.digest()) {
            (Some(tag), _) => ImageSelector::Tag(tag.to_string()),
            (None, Some(digest)) => ImageSelector::Digest(digest.to_string()),
            (None, None) => ImageSelector::Tag("latest".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_tag_parses_repository_and_tag() {
        let source: SourceTag = "team/api:v1.2".parse().unwrap();
        assert_eq!(source, SourceTag::new("team/api", "v1.2"));
    }

    #[test]
    fn source_tag_keeps_registry_port_in_repository() {
        let source: SourceTag = "registry:5000/api:stable".parse().unwrap();
        assert_eq!(source, SourceTag::new("registry:5000/api", "stable"));
    }

    #[test]
    fn source_tag_requires_a_tag() {
        assert!("team/api".parse::<SourceTag>().is_err());
        assert!("team/api:".parse::<SourceTag>().is_err());
        assert!(":v1".parse::<SourceTag>().is_err());
        assert!("registry:5000/api".parse::<SourceTag>().is_err());
    }

    #[test]
    fn source_tag_matches_bare_or_qualified_repository() {
        let image =
            ImageRef::parse("123456789012.dkr.ecr.us-east-1.amazonaws.com/team/api:v1").unwrap();
        assert!(SourceTag::new("team/api", "v2").matches(&image));
        assert!(
            SourceTag::new("123456789012.dkr.ecr.us-east-1.amazonaws.com/team/api", "v2")
                .matches(&image)
        );
        assert!(!SourceTag::new("api", "v2").matches(&image));
    }

    #[test]
    fn promotion_mode_round_trips_through_strings() {
        for mode in [PromotionMode::AllManaged, PromotionMode::FirstContainer] {
            assert_eq!(mode.to_string().parse::<PromotionMode>().unwrap(), mode);
        }
        assert!("everything".parse::<PromotionMode>().is_err());
    }
}
