//! Error types for device operations

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DeviceError {
    #[error("device id must be specified")]
    MissingId,
}

impl DeviceError {
    /// Check if this error is caused by invalid caller input.
    pub fn is_validation_error(&self) -> bool {
        matches!(self, DeviceError::MissingId)
    }
}

impl From<DeviceError> for crate::Error {
    fn from(err: DeviceError) -> Self {
        crate::Error::Device(err)
    }
}
