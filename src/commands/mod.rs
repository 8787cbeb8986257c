// ABOUTME: Command module aggregator for the shipctl CLI.
// ABOUTME: Re-exports deploy, rollback, oneshot, and history command handlers.

mod context;
mod deploy;
mod history;
mod oneshot;
mod rollback;

pub use deploy::deploy;
pub use history::history;
pub use oneshot::oneshot;
pub use rollback::rollback;
