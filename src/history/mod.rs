// ABOUTME: Deployment history used to support rollback.
// ABOUTME: Exports the record types, the bounded store, and its pluggable backends.

mod backend;
mod file;
mod memory;
mod record;
mod ssm;
mod store;

pub use backend::{Backend, ParameterStore, UnknownBackend};
pub use file::FileParameterStore;
pub use memory::MemoryParameterStore;
pub use record::{DeployStatus, DeploymentRecord};
pub use ssm::SsmParameterStore;
pub use store::{
    DEFAULT_HISTORY_LIMIT, DEFAULT_HISTORY_PREFIX, HistoryError, HistoryKey, HistoryStore,
};
