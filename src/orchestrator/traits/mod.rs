// ABOUTME: Composable capability traits for the orchestrator and image registry.
// ABOUTME: Defines ServiceOps, TaskDefinitionOps, TaskOps, and RegistryOps.

mod registry;
mod service;
mod shared_types;
mod task;
mod task_definition;

pub use registry::RegistryOps;
pub use service::ServiceOps;
pub use shared_types::*;
pub use task::TaskOps;
pub use task_definition::TaskDefinitionOps;

/// Everything a deploy or rollback needs from the orchestrator.
pub trait Orchestrator: ServiceOps + TaskDefinitionOps + TaskOps {}

impl<T: ServiceOps + TaskDefinitionOps + TaskOps> Orchestrator for T {}
