//! Device persistence and upsert reconciliation.

use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;
use uuid::Uuid;

use super::types::Device;
use crate::Result;
use crate::backend::{Document, DocumentStore, Filter, from_document, to_document};
use crate::constants::DEVICES;

/// How a submitted device is applied to an existing record with the same id.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum UpsertPolicy {
    /// Only `name` is written; every other submitted field is discarded.
    #[default]
    NameOnly,
    /// Every field except the id is overwritten, and absent optional
    /// fields are cleared.
    ReplaceAll,
}

impl UpsertPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            UpsertPolicy::NameOnly => "name-only",
            UpsertPolicy::ReplaceAll => "replace-all",
        }
    }
}

impl std::fmt::Display for UpsertPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UpsertPolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "name-only" => Ok(UpsertPolicy::NameOnly),
            "replace-all" => Ok(UpsertPolicy::ReplaceAll),
            other => Err(format!(
                "unknown upsert policy '{other}', expected 'name-only' or 'replace-all'"
            )),
        }
    }
}

/// Selects devices.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DeviceFilter {
    All,
    Id(String),
}

impl From<&DeviceFilter> for Filter {
    fn from(filter: &DeviceFilter) -> Self {
        match filter {
            DeviceFilter::All => Filter::All,
            DeviceFilter::Id(id) => Filter::id(id.as_str()),
        }
    }
}

/// Persists device id → device.
#[async_trait]
pub trait DeviceRepository: Send + Sync {
    /// Devices matching `filter`, ordered by id. Empty when nothing matches.
    async fn find(&self, filter: &DeviceFilter) -> Result<Vec<Device>>;

    /// Apply a batch with insert-or-update semantics, in batch order.
    ///
    /// The first failure aborts the batch. Records applied before it stay
    /// applied.
    async fn upsert_batch(&self, devices: &[Device]) -> Result<()>;

    /// Delete every device matching `filter` and return how many were removed.
    async fn delete(&self, filter: &DeviceFilter) -> Result<u64>;
}

/// [`DeviceRepository`] over the `devices` collection of a [`DocumentStore`].
#[derive(Clone)]
pub struct DocumentDeviceRepository {
    store: Arc<dyn DocumentStore>,
    policy: UpsertPolicy,
}

impl DocumentDeviceRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self::with_policy(store, UpsertPolicy::default())
    }

    pub fn with_policy(store: Arc<dyn DocumentStore>, policy: UpsertPolicy) -> Self {
        Self { store, policy }
    }

    pub fn policy(&self) -> UpsertPolicy {
        self.policy
    }

    fn update_fields(&self, device: &Device) -> Result<Document> {
        match self.policy {
            UpsertPolicy::NameOnly => {
                let mut fields = Document::new();
                fields.insert("name".to_string(), Value::String(device.name.clone()));
                Ok(fields)
            }
            UpsertPolicy::ReplaceAll => device.mutable_fields(),
        }
    }

    async fn upsert_one(&self, device: &Device) -> Result<()> {
        if !device.id.is_empty() && self.store.find_one(DEVICES, &device.id).await?.is_some() {
            debug!(id = %device.id, policy = %self.policy, "Updating existing device");
            let fields = self.update_fields(device)?;
            self.store.update(DEVICES, &device.id, fields).await?;
            return Ok(());
        }

        let mut record = device.clone();
        if record.id.is_empty() {
            record.id = Uuid::new_v4().to_string();
        }
        debug!(id = %record.id, "Inserting new device");
        self.store
            .insert(DEVICES, &record.id, to_document(&record)?)
            .await
    }
}

#[async_trait]
impl DeviceRepository for DocumentDeviceRepository {
    async fn find(&self, filter: &DeviceFilter) -> Result<Vec<Device>> {
        self.store
            .find(DEVICES, &Filter::from(filter))
            .await?
            .into_iter()
            .map(from_document)
            .collect()
    }

    async fn upsert_batch(&self, devices: &[Device]) -> Result<()> {
        for device in devices {
            self.upsert_one(device).await?;
        }
        Ok(())
    }

    async fn delete(&self, filter: &DeviceFilter) -> Result<u64> {
        self.store.delete(DEVICES, &Filter::from(filter)).await
    }
}
