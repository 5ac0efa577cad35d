//! Device upsert reconciliation and deletion.

use std::any::Any;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use devicehub::{
    Error, Result,
    backend::{BackendError, Document, DocumentStore, Filter, database::InMemory},
    device::{
        Device, DeviceError, DeviceFilter, DeviceRepository, DeviceService,
        DocumentDeviceRepository, UpsertPolicy,
    },
};

use crate::helpers::{sample_device, test_store};

async fn service(policy: UpsertPolicy) -> DeviceService {
    let store = test_store().await;
    DeviceService::new(Arc::new(DocumentDeviceRepository::with_policy(
        store, policy,
    )))
}

#[tokio::test]
async fn test_new_device_is_inserted_whole() {
    let devices = service(UpsertPolicy::NameOnly).await;
    let device = sample_device("d1", "Controller");

    devices.upsert(std::slice::from_ref(&device)).await.unwrap();

    assert_eq!(devices.find().await.unwrap(), vec![device]);
}

#[tokio::test]
async fn test_existing_device_only_gets_new_name() {
    let devices = service(UpsertPolicy::NameOnly).await;
    let original = sample_device("d1", "Controller");
    devices.upsert(std::slice::from_ref(&original)).await.unwrap();

    let mut changed = sample_device("d1", "Renamed");
    changed.temp_max = 99;
    changed.failsafe = false;
    changed.terminal_element = Some(true);
    devices.upsert(&[changed]).await.unwrap();

    let found = devices.find_by_id("d1").await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].name, "Renamed");
    assert_eq!(found[0].temp_max, original.temp_max);
    assert_eq!(found[0].failsafe, original.failsafe);
    assert_eq!(found[0].terminal_element, None);
}

#[tokio::test]
async fn test_replace_all_overwrites_every_field() {
    let devices = service(UpsertPolicy::ReplaceAll).await;
    devices
        .upsert(&[sample_device("d1", "Controller")])
        .await
        .unwrap();

    let mut changed = sample_device("d1", "Renamed");
    changed.temp_max = 99;
    changed.terminal_element = Some(false);
    changed.advanced_environmental_conditions = None;
    devices.upsert(std::slice::from_ref(&changed)).await.unwrap();

    assert_eq!(devices.find_by_id("d1").await.unwrap(), vec![changed]);
}

#[tokio::test]
async fn test_batch_applies_in_order() {
    let devices = service(UpsertPolicy::NameOnly).await;

    // The second record for d1 updates the first within one batch
    devices
        .upsert(&[
            sample_device("d1", "first"),
            sample_device("d2", "other"),
            sample_device("d1", "second"),
        ])
        .await
        .unwrap();

    let all = devices.find().await.unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].id, "d1");
    assert_eq!(all[0].name, "second");
}

#[tokio::test]
async fn test_find_by_unknown_id_is_empty() {
    let devices = service(UpsertPolicy::NameOnly).await;
    devices.upsert(&[sample_device("d1", "x")]).await.unwrap();

    assert!(devices.find_by_id("nope").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_delete_one_and_all() {
    let devices = service(UpsertPolicy::NameOnly).await;
    devices
        .upsert(&[
            sample_device("d1", "a"),
            sample_device("d2", "b"),
            sample_device("d3", "c"),
        ])
        .await
        .unwrap();

    devices.delete_one("d2").await.unwrap();
    // Deleting an unknown id is not an error
    devices.delete_one("d2").await.unwrap();

    let ids: Vec<_> = devices
        .find()
        .await
        .unwrap()
        .into_iter()
        .map(|d| d.id)
        .collect();
    assert_eq!(ids, ["d1", "d3"]);

    devices.delete_all().await.unwrap();
    assert!(devices.find().await.unwrap().is_empty());
}

/// Repository that counts calls and stores nothing.
#[derive(Default)]
struct CountingRepository {
    calls: AtomicUsize,
}

#[async_trait]
impl DeviceRepository for CountingRepository {
    async fn find(&self, _filter: &DeviceFilter) -> Result<Vec<Device>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(Vec::new())
    }

    async fn upsert_batch(&self, _devices: &[Device]) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn delete(&self, _filter: &DeviceFilter) -> Result<u64> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(0)
    }
}

#[tokio::test]
async fn test_missing_id_never_reaches_repository() {
    let repository = Arc::new(CountingRepository::default());
    let devices = DeviceService::new(repository.clone());

    let err = devices.delete_one("").await.unwrap_err();
    assert!(matches!(err, Error::Device(DeviceError::MissingId)));
    let err = devices.find_by_id("").await.unwrap_err();
    assert!(matches!(err, Error::Device(DeviceError::MissingId)));

    assert_eq!(repository.calls.load(Ordering::SeqCst), 0);

    devices.delete_one("d1").await.unwrap();
    assert_eq!(repository.calls.load(Ordering::SeqCst), 1);
}

/// Store that fails every insert after the first `allowed`.
struct FailingStore {
    inner: InMemory,
    allowed: usize,
    inserts: AtomicUsize,
}

#[async_trait]
impl DocumentStore for FailingStore {
    async fn find(&self, collection: &str, filter: &Filter) -> Result<Vec<Document>> {
        self.inner.find(collection, filter).await
    }

    async fn find_one(&self, collection: &str, id: &str) -> Result<Option<Document>> {
        self.inner.find_one(collection, id).await
    }

    async fn insert(&self, collection: &str, id: &str, document: Document) -> Result<()> {
        if self.inserts.fetch_add(1, Ordering::SeqCst) >= self.allowed {
            return Err(BackendError::Unavailable {
                reason: "connection reset".to_string(),
            }
            .into());
        }
        self.inner.insert(collection, id, document).await
    }

    async fn update(&self, collection: &str, id: &str, fields: Document) -> Result<u64> {
        self.inner.update(collection, id, fields).await
    }

    async fn delete(&self, collection: &str, filter: &Filter) -> Result<u64> {
        self.inner.delete(collection, filter).await
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }

    fn kind(&self) -> &'static str {
        "failing"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[tokio::test]
async fn test_failed_record_aborts_batch_without_rollback() {
    let store = Arc::new(FailingStore {
        inner: InMemory::new(),
        allowed: 2,
        inserts: AtomicUsize::new(0),
    });
    let devices = DeviceService::new(Arc::new(DocumentDeviceRepository::new(store.clone())));

    let err = devices
        .upsert(&[
            sample_device("d1", "a"),
            sample_device("d2", "b"),
            sample_device("d3", "c"),
            sample_device("d4", "d"),
        ])
        .await
        .unwrap_err();
    assert!(err.is_database_error());
    assert_eq!(err.to_string(), "Store unavailable: connection reset");

    let ids: Vec<_> = devices
        .find()
        .await
        .unwrap()
        .into_iter()
        .map(|d| d.id)
        .collect();
    assert_eq!(ids, ["d1", "d2"]);
    // d4 was never attempted
    assert_eq!(store.inserts.load(Ordering::SeqCst), 3);
}
