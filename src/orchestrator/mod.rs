// ABOUTME: Orchestrator and image registry abstractions with their AWS adapters.
// ABOUTME: ECS provides services and tasks, ECR provides image manifests.

mod ecr;
mod ecs;
mod error;
pub mod traits;

pub use ecr::EcrRegistry;
pub use ecs::EcsOrchestrator;
pub use error::{RemoteError, RemoteErrorKind};
pub use traits::*;

use aws_config::{BehaviorVersion, Region};

/// Load shared AWS SDK configuration pinned to `region`.
///
/// Credentials come from the SDK's default provider chain.
pub async fn load_sdk_config(region: &str) -> aws_config::SdkConfig {
    aws_config::defaults(BehaviorVersion::latest())
        .region(Region::new(region.to_string()))
        .load()
        .await
}
