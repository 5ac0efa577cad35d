//! Device operations exposed to authenticated callers.

use std::sync::Arc;

use tracing::info;

use super::errors::DeviceError;
use super::repository::{DeviceFilter, DeviceRepository};
use super::types::Device;
use crate::Result;

/// Lookup, upsert and deletion of devices.
///
/// Single-device operations reject an empty id before the repository is
/// contacted.
#[derive(Clone)]
pub struct DeviceService {
    repository: Arc<dyn DeviceRepository>,
}

impl DeviceService {
    pub fn new(repository: Arc<dyn DeviceRepository>) -> Self {
        Self { repository }
    }

    /// All devices, ordered by id.
    pub async fn find(&self) -> Result<Vec<Device>> {
        self.repository.find(&DeviceFilter::All).await
    }

    /// The device with the given id, as a list of zero or one.
    pub async fn find_by_id(&self, id: &str) -> Result<Vec<Device>> {
        let filter = Self::id_filter(id)?;
        self.repository.find(&filter).await
    }

    /// Apply a batch of devices with insert-or-update semantics.
    pub async fn upsert(&self, devices: &[Device]) -> Result<()> {
        self.repository.upsert_batch(devices).await?;
        info!(count = devices.len(), "Upserted devices");
        Ok(())
    }

    /// Delete the device with the given id. Deleting an unknown id succeeds.
    pub async fn delete_one(&self, id: &str) -> Result<()> {
        let filter = Self::id_filter(id)?;
        let removed = self.repository.delete(&filter).await?;
        info!(id, removed, "Deleted device");
        Ok(())
    }

    /// Delete every device.
    pub async fn delete_all(&self) -> Result<()> {
        let removed = self.repository.delete(&DeviceFilter::All).await?;
        info!(removed, "Deleted all devices");
        Ok(())
    }

    fn id_filter(id: &str) -> Result<DeviceFilter> {
        if id.is_empty() {
            return Err(DeviceError::MissingId.into());
        }
        Ok(DeviceFilter::Id(id.to_string()))
    }
}
