//! DocumentStore behaviour shared by every backend.

use std::sync::Arc;

use devicehub::backend::{Document, DocumentStore, Filter, database::InMemory};
use serde_json::json;

use crate::helpers::test_store;

fn doc(value: serde_json::Value) -> Document {
    value.as_object().cloned().unwrap()
}

async fn exercise_store(store: &dyn DocumentStore) {
    // Collections start out empty
    assert!(store.find("devices", &Filter::All).await.unwrap().is_empty());
    assert!(store.find_one("devices", "a").await.unwrap().is_none());

    for id in ["b", "c", "a"] {
        store
            .insert("devices", id, doc(json!({ "id": id, "name": id.to_uppercase() })))
            .await
            .unwrap();
    }

    // Duplicate ids are rejected
    let err = store
        .insert("devices", "a", doc(json!({"id": "a"})))
        .await
        .unwrap_err();
    assert!(err.is_conflict());

    // Ordered by id
    let all = store.find("devices", &Filter::All).await.unwrap();
    let ids: Vec<_> = all.iter().map(|d| d["id"].as_str().unwrap()).collect();
    assert_eq!(ids, ["a", "b", "c"]);

    // Merge update keeps untouched keys
    let matched = store
        .update("devices", "b", doc(json!({"name": "renamed", "extra": 1})))
        .await
        .unwrap();
    assert_eq!(matched, 1);
    let b = store.find_one("devices", "b").await.unwrap().unwrap();
    assert_eq!(b["name"], "renamed");
    assert_eq!(b["id"], "b");
    assert_eq!(b["extra"], 1);

    assert_eq!(
        store
            .update("devices", "zzz", doc(json!({"name": "x"})))
            .await
            .unwrap(),
        0
    );

    // Collections are independent
    assert!(store.find_one("sessions", "a").await.unwrap().is_none());

    assert_eq!(store.delete("devices", &Filter::id("a")).await.unwrap(), 1);
    assert_eq!(store.delete("devices", &Filter::id("a")).await.unwrap(), 0);
    assert_eq!(store.delete("devices", &Filter::All).await.unwrap(), 2);
    assert!(store.find("devices", &Filter::All).await.unwrap().is_empty());

    store.ping().await.unwrap();
}

#[tokio::test]
async fn test_configured_backend_behaviour() {
    let store = test_store().await;
    exercise_store(store.as_ref()).await;
}

#[tokio::test]
async fn test_in_memory_behaviour() {
    let store = InMemory::new();
    exercise_store(&store).await;
    assert_eq!(store.kind(), "inmemory");
}

#[cfg(feature = "sqlite")]
#[tokio::test]
async fn test_sqlite_behaviour() {
    use devicehub::backend::database::{DbKind, SqlxBackend};

    let store = SqlxBackend::sqlite_in_memory().await.unwrap();
    assert_eq!(store.db_kind(), DbKind::Sqlite);
    assert_eq!(store.kind(), "sqlite");
    exercise_store(&store).await;
}

#[cfg(feature = "sqlite")]
#[tokio::test]
async fn test_sqlite_in_memory_databases_are_isolated() {
    use devicehub::backend::database::SqlxBackend;

    let first = SqlxBackend::sqlite_in_memory().await.unwrap();
    let second = SqlxBackend::sqlite_in_memory().await.unwrap();

    first
        .insert("devices", "a", doc(json!({"id": "a"})))
        .await
        .unwrap();
    assert!(second.find_one("devices", "a").await.unwrap().is_none());
}

#[cfg(feature = "sqlite")]
#[tokio::test]
async fn test_sqlite_file_survives_reopen() {
    use devicehub::backend::database::SqlxBackend;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("devicehub.db");

    let store = SqlxBackend::open_sqlite(&path).await.unwrap();
    store
        .insert("users", "alice", doc(json!({"username": "alice"})))
        .await
        .unwrap();
    store.close().await;

    let reopened = SqlxBackend::open_sqlite(&path).await.unwrap();
    let alice = reopened.find_one("users", "alice").await.unwrap().unwrap();
    assert_eq!(alice["username"], "alice");
}

#[tokio::test]
async fn test_in_memory_save_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("devicehub.json");

    let store = InMemory::new();
    store
        .insert("devices", "d1", doc(json!({"id": "d1", "name": "Sensor"})))
        .await
        .unwrap();
    store
        .insert("users", "alice", doc(json!({"username": "alice"})))
        .await
        .unwrap();
    store.save_to_file(&path).await.unwrap();

    let loaded: Arc<dyn DocumentStore> = Arc::new(InMemory::load_from_file(&path).await.unwrap());
    let d1 = loaded.find_one("devices", "d1").await.unwrap().unwrap();
    assert_eq!(d1["name"], "Sensor");
    assert!(loaded.find_one("users", "alice").await.unwrap().is_some());

    // Downcast used on shutdown to find the store to save
    assert!(loaded.as_any().downcast_ref::<InMemory>().is_some());
}
