// ABOUTME: Library root for shipctl - exposes the workflows and their seams for testing.
// ABOUTME: The main binary is in main.rs.

pub mod config;
pub mod deploy;
pub mod diagnostics;
pub mod error;
pub mod history;
pub mod notify;
pub mod oneshot;
pub mod orchestrator;
pub mod output;
pub mod types;
