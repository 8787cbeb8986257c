// ABOUTME: Integration tests for deployment history on the file backend.
// ABOUTME: Verifies the persisted wire format and that history survives a new store instance.

use shipctl::history::{
    DeployStatus, FileParameterStore, HistoryKey, HistoryStore, ParameterStore,
};
use shipctl::types::{ClusterName, ServiceName};
use std::sync::Arc;

fn key(cluster: &str, service: &str) -> HistoryKey {
    HistoryKey::new(
        ClusterName::new(cluster).unwrap(),
        ServiceName::new(service).unwrap(),
    )
}

fn store(dir: &std::path::Path) -> HistoryStore {
    HistoryStore::new(Arc::new(FileParameterStore::new(dir)))
}

#[tokio::test]
async fn history_survives_a_new_store() {
    let dir = tempfile::tempdir().unwrap();

    store(dir.path())
        .push_pending(&key("prod", "api"), 7, "deploy: 6 -> 7")
        .await
        .unwrap();
    store(dir.path())
        .mark_deployed(&key("prod", "api"), 7)
        .await
        .unwrap();

    let records = store(dir.path()).pull(&key("prod", "api")).await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].status, DeployStatus::Deployed);
}

#[tokio::test]
async fn blob_uses_integer_status_codes() {
    let dir = tempfile::tempdir().unwrap();
    let history = store(dir.path());
    history
        .push_pending(&key("prod", "api"), 7, "deploy: 6 -> 7")
        .await
        .unwrap();

    let raw = FileParameterStore::new(dir.path())
        .get("deploy-state.prod.api")
        .await
        .unwrap()
        .unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();

    assert_eq!(value[0]["revision"], 7);
    assert_eq!(value[0]["status"], 1);
    assert_eq!(value[0]["cause"], "deploy: 6 -> 7");
}

#[tokio::test]
async fn services_are_kept_apart() {
    let dir = tempfile::tempdir().unwrap();
    let history = store(dir.path());

    history
        .push_pending(&key("prod", "api"), 3, "deploy: 2 -> 3")
        .await
        .unwrap();
    history
        .push_pending(&key("prod", "worker"), 3, "deploy: 2 -> 3")
        .await
        .unwrap();

    assert_eq!(history.pull(&key("prod", "api")).await.unwrap().len(), 1);
    assert_eq!(history.pull(&key("prod", "worker")).await.unwrap().len(), 1);
    assert!(history.pull(&key("staging", "api")).await.unwrap().is_empty());

    let mut keys: Vec<String> = history
        .list_keys()
        .await
        .unwrap()
        .iter()
        .map(ToString::to_string)
        .collect();
    keys.sort();
    assert_eq!(keys, vec!["prod/api", "prod/worker"]);
}

#[tokio::test]
async fn prefix_separates_histories() {
    let dir = tempfile::tempdir().unwrap();
    let a = store(dir.path()).with_prefix("team-a");
    let b = store(dir.path()).with_prefix("team-b");

    a.push_pending(&key("prod", "api"), 1, "deploy: 0 -> 1")
        .await
        .unwrap();

    assert!(b.pull(&key("prod", "api")).await.unwrap().is_empty());
    assert!(b.list_keys().await.unwrap().is_empty());
}

#[tokio::test]
async fn truncation_keeps_the_newest_records_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let history = store(dir.path()).with_limit(3);

    for revision in 1..=5 {
        history
            .push_pending(&key("prod", "api"), revision, "deploy")
            .await
            .unwrap();
        history
            .mark_deployed(&key("prod", "api"), revision)
            .await
            .unwrap();
    }

    let revisions: Vec<i64> = store(dir.path())
        .pull(&key("prod", "api"))
        .await
        .unwrap()
        .iter()
        .map(|r| r.revision)
        .collect();
    assert_eq!(revisions, vec![3, 4, 5]);
}
