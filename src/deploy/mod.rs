// ABOUTME: Deployment orchestration using the type state pattern.
// ABOUTME: Exports state markers, transitions, and the deploy and rollback workflows.

mod converge;
mod deployment;
mod error;
mod mutate;
mod promote;
mod rollback;
mod state;
mod transitions;
mod workflow;

pub use converge::{DEFAULT_POLL_INTERVAL, MIN_POLL_INTERVAL, await_convergence, submit};
pub use deployment::Deployment;
pub use error::DeployError;
pub use mutate::DraftBuilder;
pub use promote::{ImagePromoter, PromotionMode, PromotionPlan, SourceTag};
pub use rollback::{RollbackOutcome, rollback};
pub use state::{Converged, Promoted, PromotedImage, Recorded, Registered, Resolved, Submitted};
pub use transitions::DeployOutcome;
pub use workflow::{DeployRequest, deploy};
