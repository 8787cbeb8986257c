// ABOUTME: Type-safe identifiers and validated domain types.
// ABOUTME: Uses phantom types to prevent ARN confusion at compile time.

mod id;
mod image_ref;
mod revision;
mod service_name;

pub use id::{Arn, ClusterArn, DeploymentId, TaskArn, TaskDefinitionArn};
pub use image_ref::{ImageRef, ParseImageRefError};
pub use revision::{RevisionError, revision_of, specify_revision};
pub use service_name::{ClusterName, NameError, ServiceName};
