// ABOUTME: Bounded, ordered deployment history per (cluster, service).
// ABOUTME: Every change rewrites the whole history blob through a ParameterStore.

use super::backend::ParameterStore;
use super::record::{DeployStatus, DeploymentRecord};
use crate::error::ErrorKind;
use crate::orchestrator::RemoteError;
use crate::types::{ClusterName, ServiceName};
use std::fmt;
use std::sync::Arc;

/// Default number of records kept per service.
pub const DEFAULT_HISTORY_LIMIT: usize = 5;

/// Default parameter name prefix.
pub const DEFAULT_HISTORY_PREFIX: &str = "deploy-state";

/// Errors from history bookkeeping.
#[derive(Debug, thiserror::Error)]
pub enum HistoryError {
    /// Deploys may not record a revision that is already in the window.
    #[error("revision {0} already exists in deployment history")]
    DuplicateRevision(i64),

    /// No pending record to mark as deployed.
    #[error("no pending deployment of revision {0} in history")]
    StateNotFound(i64),

    #[error("deployment history '{name}' is not valid JSON: {source}")]
    Corrupt {
        name: String,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Backend(#[from] RemoteError),
}

impl HistoryError {
    /// Returns the error kind for programmatic handling.
    pub fn kind(&self) -> ErrorKind {
        match self {
            HistoryError::DuplicateRevision(_) => ErrorKind::Conflict,
            HistoryError::StateNotFound(_) => ErrorKind::NotFound,
            HistoryError::Corrupt { .. } | HistoryError::Backend(_) => ErrorKind::Remote,
        }
    }
}

/// Addresses one service's history.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HistoryKey {
    pub cluster: ClusterName,
    pub service: ServiceName,
}

impl HistoryKey {
    pub fn new(cluster: ClusterName, service: ServiceName) -> Self {
        Self { cluster, service }
    }
}

impl fmt::Display for HistoryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.cluster, self.service)
    }
}

/// Owner of all deployment history records.
///
/// Nothing else mutates history. There is no concurrency guard: two writers
/// racing on the same key lose one of the updates.
#[derive(Clone)]
pub struct HistoryStore {
    backend: Arc<dyn ParameterStore>,
    prefix: String,
    limit: usize,
}

impl fmt::Debug for HistoryStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HistoryStore")
            .field("prefix", &self.prefix)
            .field("limit", &self.limit)
            .finish()
    }
}

impl HistoryStore {
    pub fn new(backend: Arc<dyn ParameterStore>) -> Self {
        Self {
            backend,
            prefix: DEFAULT_HISTORY_PREFIX.to_string(),
            limit: DEFAULT_HISTORY_LIMIT,
        }
    }

    /// Keep at most `limit` records (at least one).
    #[must_use]
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit.max(1);
        self
    }

    #[must_use]
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Parameter name for a key, e.g. `deploy-state.prod.api`.
    pub fn parameter_name(&self, key: &HistoryKey) -> String {
        format!("{}.{}.{}", self.prefix, key.cluster, key.service)
    }

    /// Records for `key`, oldest first. Empty before the first deploy.
    pub async fn pull(&self, key: &HistoryKey) -> Result<Vec<DeploymentRecord>, HistoryError> {
        let name = self.parameter_name(key);
        match self.backend.get(&name).await? {
            None => Ok(Vec::new()),
            Some(raw) => {
                serde_json::from_str(&raw).map_err(|source| HistoryError::Corrupt { name, source })
            }
        }
    }

    /// Append a pending record for a fresh deploy.
    ///
    /// Fails with `DuplicateRevision` if `revision` appears anywhere in the
    /// current history.
    pub async fn push_pending(
        &self,
        key: &HistoryKey,
        revision: i64,
        cause: &str,
    ) -> Result<(), HistoryError> {
        let mut records = self.pull(key).await?;
        if records.iter().any(|r| r.revision == revision) {
            return Err(HistoryError::DuplicateRevision(revision));
        }

        records.push(DeploymentRecord::pending(revision, cause));
        self.store(key, records).await
    }

    /// Append a pending record for a rollback target.
    ///
    /// Unlike `push_pending` this skips the duplicate check: the revision
    /// being restored is already in history by construction.
    pub async fn record_rollback(
        &self,
        key: &HistoryKey,
        revision: i64,
        cause: &str,
    ) -> Result<(), HistoryError> {
        let mut records = self.pull(key).await?;
        records.push(DeploymentRecord::pending(revision, cause));
        self.store(key, records).await
    }

    /// Flip the most recent pending record for `revision` to deployed.
    pub async fn mark_deployed(&self, key: &HistoryKey, revision: i64) -> Result<(), HistoryError> {
        let mut records = self.pull(key).await?;
        let index = records
            .iter()
            .rposition(|r| r.revision == revision && r.status == DeployStatus::Pending)
            .ok_or(HistoryError::StateNotFound(revision))?;

        records[index].status = DeployStatus::Deployed;
        self.store(key, records).await
    }

    /// Every key with stored history under this store's prefix.
    ///
    /// Names that do not parse back into a key are skipped.
    pub async fn list_keys(&self) -> Result<Vec<HistoryKey>, HistoryError> {
        let prefix = format!("{}.", self.prefix);
        let names = self.backend.list(&prefix).await?;

        Ok(names
            .iter()
            .filter_map(|name| {
                let (cluster, service) = name.strip_prefix(&prefix)?.split_once('.')?;
                Some(HistoryKey::new(
                    ClusterName::new(cluster).ok()?,
                    ServiceName::new(service).ok()?,
                ))
            })
            .collect())
    }

    /// Truncate from the front to the limit and overwrite the whole blob.
    async fn store(
        &self,
        key: &HistoryKey,
        mut records: Vec<DeploymentRecord>,
    ) -> Result<(), HistoryError> {
        if records.len() > self.limit {
            let excess = records.len() - self.limit;
            records.drain(..excess);
        }

        let name = self.parameter_name(key);
        let blob = serde_json::to_string(&records)
            .map_err(|source| HistoryError::Corrupt {
                name: name.clone(),
                source,
            })?;
        tracing::debug!(%key, records = records.len(), "writing deployment history");
        self.backend.put(&name, &blob).await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::MemoryParameterStore;
    use proptest::prelude::*;

    fn key() -> HistoryKey {
        HistoryKey::new(
            ClusterName::new("prod").unwrap(),
            ServiceName::new("api").unwrap(),
        )
    }

    fn store() -> HistoryStore {
        HistoryStore::new(Arc::new(MemoryParameterStore::new()))
    }

    fn revisions(records: &[DeploymentRecord]) -> Vec<i64> {
        records.iter().map(|r| r.revision).collect()
    }

    #[tokio::test]
    async fn pull_is_empty_before_first_deploy() {
        assert!(store().pull(&key()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn push_pending_appends_pending_record() {
        let store = store();
        store.push_pending(&key(), 7, "deploy: 6 -> 7").await.unwrap();

        let records = store.pull(&key()).await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].revision, 7);
        assert_eq!(records[0].status, DeployStatus::Pending);
        assert_eq!(records[0].cause, "deploy: 6 -> 7");
    }

    #[tokio::test]
    async fn push_pending_rejects_duplicates_anywhere_in_history() {
        let store = store();
        store.push_pending(&key(), 1, "a").await.unwrap();
        store.push_pending(&key(), 2, "b").await.unwrap();
        store.mark_deployed(&key(), 1).await.unwrap();

        let err = store.push_pending(&key(), 1, "c").await.unwrap_err();
        assert!(matches!(err, HistoryError::DuplicateRevision(1)));
        assert_eq!(revisions(&store.pull(&key()).await.unwrap()), vec![1, 2]);
    }

    #[tokio::test]
    async fn mark_deployed_flips_only_the_latest_pending_match() {
        let store = store();
        store.push_pending(&key(), 5, "deploy").await.unwrap();
        store.mark_deployed(&key(), 5).await.unwrap();
        store.push_pending(&key(), 6, "deploy").await.unwrap();
        store.record_rollback(&key(), 5, "rollback: 6 -> 5").await.unwrap();
        store.record_rollback(&key(), 5, "rollback again").await.unwrap();

        store.mark_deployed(&key(), 5).await.unwrap();

        let statuses: Vec<_> = store
            .pull(&key())
            .await
            .unwrap()
            .iter()
            .map(|r| r.status)
            .collect();
        assert_eq!(
            statuses,
            vec![
                DeployStatus::Deployed,
                DeployStatus::Pending,
                DeployStatus::Pending,
                DeployStatus::Deployed,
            ]
        );
    }

    #[tokio::test]
    async fn mark_deployed_without_pending_record_fails() {
        let store = store();
        store.push_pending(&key(), 3, "deploy").await.unwrap();
        store.mark_deployed(&key(), 3).await.unwrap();

        assert!(matches!(
            store.mark_deployed(&key(), 3).await,
            Err(HistoryError::StateNotFound(3))
        ));
        assert!(matches!(
            store.mark_deployed(&key(), 4).await,
            Err(HistoryError::StateNotFound(4))
        ));
    }

    #[tokio::test]
    async fn corrupt_blob_is_reported() {
        let backend = Arc::new(MemoryParameterStore::new());
        backend.insert("deploy-state.prod.api", "not json");
        let store = HistoryStore::new(backend);

        assert!(matches!(
            store.pull(&key()).await,
            Err(HistoryError::Corrupt { .. })
        ));
    }

    #[tokio::test]
    async fn parameter_name_uses_prefix_cluster_and_service() {
        let store = store().with_prefix("ship");
        assert_eq!(store.parameter_name(&key()), "ship.prod.api");
    }

    #[tokio::test]
    async fn list_keys_parses_names_under_prefix() {
        let backend = Arc::new(MemoryParameterStore::new());
        backend.insert("deploy-state.prod.api", "[]");
        backend.insert("deploy-state.staging.worker", "[]");
        backend.insert("other.prod.api", "[]");
        backend.insert("deploy-state.garbage", "[]");
        let store = HistoryStore::new(backend);

        let mut keys: Vec<String> = store
            .list_keys()
            .await
            .unwrap()
            .iter()
            .map(ToString::to_string)
            .collect();
        keys.sort();
        assert_eq!(keys, vec!["prod/api", "staging/worker"]);
    }

    proptest! {
        #[test]
        fn keeps_only_the_most_recent_records(pushes in 1usize..20, limit in 1usize..8) {
            let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();
            let retained = runtime.block_on(async {
                let store = store().with_limit(limit);
                for revision in 1..=pushes as i64 {
                    store.push_pending(&key(), revision, "deploy").await.unwrap();
                }
                revisions(&store.pull(&key()).await.unwrap())
            });

            let first_kept = pushes.saturating_sub(limit) as i64 + 1;
            let expected: Vec<i64> = (first_kept..=pushes as i64).collect();
            prop_assert_eq!(retained, expected);
        }
    }
}
