// ABOUTME: Deployment state marker types for the type state pattern.
// ABOUTME: Each state carries the data produced by the step that entered it.

use crate::orchestrator::TaskDefinition;
use crate::types::ImageRef;

use super::promote::PromotionMode;

/// Initial state: service and source task definition looked up.
/// Available actions: `promote()`
#[derive(Debug, Clone, Copy, Default)]
pub struct Resolved;

/// One image copied to the deployment tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromotedImage {
    pub container: String,
    pub source: ImageRef,
    pub target: ImageRef,
}

/// Images promoted: every shipped image exists under the deployment tag.
/// Available actions: `register()`
#[derive(Debug, Clone)]
pub struct Promoted {
    pub(crate) mode: PromotionMode,
    pub(crate) images: Vec<PromotedImage>,
}

impl Promoted {
    pub fn images(&self) -> &[PromotedImage] {
        &self.images
    }
}

/// Registered: the new task definition revision exists.
/// Available actions: `record_pending()`
#[derive(Debug, Clone)]
pub struct Registered {
    pub(crate) task_definition: TaskDefinition,
}

/// Recorded: a pending history record names the new revision.
/// Available actions: `submit()`
#[derive(Debug, Clone)]
pub struct Recorded {
    pub(crate) task_definition: TaskDefinition,
}

/// Submitted: the service points at the new revision.
/// Available actions: `await_convergence()`
#[derive(Debug, Clone)]
pub struct Submitted {
    pub(crate) task_definition: TaskDefinition,
}

/// Converged: one deployment left with every desired task running.
/// Available actions: `mark_deployed()`
#[derive(Debug, Clone)]
pub struct Converged {
    pub(crate) task_definition: TaskDefinition,
}
