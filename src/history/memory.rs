// ABOUTME: In-process history backend.
// ABOUTME: Backs tests and embedders; nothing survives the process.

use super::backend::ParameterStore;
use crate::orchestrator::RemoteError;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::BTreeMap;

/// Parameter store held in memory.
#[derive(Debug, Default)]
pub struct MemoryParameterStore {
    values: Mutex<BTreeMap<String, String>>,
    writes: Mutex<Vec<String>>,
}

impl MemoryParameterStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a raw value without going through history bookkeeping.
    pub fn insert(&self, name: impl Into<String>, value: impl Into<String>) {
        self.values.lock().insert(name.into(), value.into());
    }

    /// Every value written through `put`, in order.
    pub fn writes(&self) -> Vec<String> {
        self.writes.lock().clone()
    }
}

#[async_trait]
impl ParameterStore for MemoryParameterStore {
    async fn get(&self, name: &str) -> Result<Option<String>, RemoteError> {
        Ok(self.values.lock().get(name).cloned())
    }

    async fn put(&self, name: &str, value: &str) -> Result<(), RemoteError> {
        self.values
            .lock()
            .insert(name.to_string(), value.to_string());
        self.writes.lock().push(value.to_string());
        Ok(())
    }

    async fn list(&self, prefix: &str) -> Result<Vec<String>, RemoteError> {
        Ok(self
            .values
            .lock()
            .keys()
            .filter(|k| k.starts_with(prefix))
            .cloned()
            .collect())
    }
}
