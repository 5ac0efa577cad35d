//! Device catalog
//!
//! Devices are flat records keyed by id. Writes go through a batch upsert:
//! unseen ids are inserted whole, while for an existing id the configured
//! [`UpsertPolicy`] decides which fields are overwritten.

pub mod errors;
pub mod repository;
pub mod service;
pub mod types;

pub use errors::DeviceError;
pub use repository::{DeviceFilter, DeviceRepository, DocumentDeviceRepository, UpsertPolicy};
pub use service::DeviceService;
pub use types::{Device, DeviceBatch};
