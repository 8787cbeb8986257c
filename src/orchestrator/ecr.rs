// ABOUTME: Amazon ECR implementation of the registry trait.
// ABOUTME: Retags images by copying manifests with BatchGetImage and PutImage.

use crate::orchestrator::RemoteError;
use crate::orchestrator::traits::{ImageManifest, ImageSelector, RegistryOps};
use async_trait::async_trait;
use aws_sdk_ecr::Client;
use aws_sdk_ecr::types::{ImageFailureCode, ImageIdentifier};

/// Manifest formats we ask ECR to return unconverted.
const ACCEPTED_MEDIA_TYPES: &[&str] = &[
    "application/vnd.docker.distribution.manifest.v1+json",
    "application/vnd.docker.distribution.manifest.v2+json",
    "application/vnd.docker.distribution.manifest.list.v2+json",
    "application/vnd.oci.image.manifest.v1+json",
    "application/vnd.oci.image.index.v1+json",
];

/// Registry backed by the ECR API.
#[derive(Debug, Clone)]
pub struct EcrRegistry {
    client: Client,
}

impl EcrRegistry {
    pub fn new(config: &aws_config::SdkConfig) -> Self {
        Self {
            client: Client::new(config),
        }
    }
}

#[async_trait]
impl RegistryOps for EcrRegistry {
    async fn get_manifest(
        &self,
        repository: &str,
        image: &ImageSelector,
    ) -> Result<Option<ImageManifest>, RemoteError> {
        const OP: &str = "BatchGetImage";

        let id = match image {
            ImageSelector::Tag(tag) => ImageIdentifier::builder().image_tag(tag).build(),
            ImageSelector::Digest(digest) => {
                ImageIdentifier::builder().image_digest(digest).build()
            }
        };

        tracing::debug!(repository, %image, "BatchGetImage");
        let output = self
            .client
            .batch_get_image()
            .repository_name(repository)
            .image_ids(id)
            .set_accepted_media_types(Some(
                ACCEPTED_MEDIA_TYPES.iter().map(|s| s.to_string()).collect(),
            ))
            .send()
            .await
            .map_err(|e| RemoteError::api(OP, e))?;

        if let Some(found) = output.images().first()
            && let Some(body) = found.image_manifest()
        {
            return Ok(Some(ImageManifest {
                body: body.to_string(),
                media_type: found.image_manifest_media_type().map(str::to_string),
            }));
        }

        let failures = output.failures();
        if failures.is_empty()
            || failures
                .iter()
                .all(|f| matches!(f.failure_code(), Some(ImageFailureCode::ImageNotFound)))
        {
            return Ok(None);
        }

        Err(RemoteError::rejected(
            OP,
            failures
                .iter()
                .map(|f| f.failure_reason().unwrap_or("unknown reason").to_string()),
        ))
    }

    async fn put_manifest(
        &self,
        repository: &str,
        manifest: &ImageManifest,
        tag: &str,
    ) -> Result<(), RemoteError> {
        tracing::debug!(repository, tag, "PutImage");
        let result = self
            .client
            .put_image()
            .repository_name(repository)
            .image_manifest(&manifest.body)
            .set_image_manifest_media_type(manifest.media_type.clone())
            .image_tag(tag)
            .send()
            .await;

        match result {
            Ok(_) => Ok(()),
            Err(e)
                if e.as_service_error()
                    .is_some_and(|se| se.is_image_already_exists_exception()) =>
            {
                tracing::debug!(repository, tag, "tag already points at this manifest");
                Ok(())
            }
            Err(e) => Err(RemoteError::api("PutImage", e)),
        }
    }
}
