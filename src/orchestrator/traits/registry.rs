// ABOUTME: Image registry operations trait.
// ABOUTME: Read a manifest and push it back under another tag.

use super::shared_types::{ImageManifest, ImageSelector};
use crate::orchestrator::RemoteError;
use async_trait::async_trait;

/// Registry operations needed to retag an image without rebuilding it.
#[async_trait]
pub trait RegistryOps: Send + Sync {
    /// Read the manifest of one image. `None` if the image does not exist.
    async fn get_manifest(
        &self,
        repository: &str,
        image: &ImageSelector,
    ) -> Result<Option<ImageManifest>, RemoteError>;

    /// Store `manifest` under `tag`. Re-putting an identical manifest is not an error.
    async fn put_manifest(
        &self,
        repository: &str,
        manifest: &ImageManifest,
        tag: &str,
    ) -> Result<(), RemoteError>;
}
