//! Error types for the document store backends.

use thiserror::Error;

/// Errors that can occur during document store operations.
///
/// # Stability
///
/// - New variants may be added in minor versions (enum is `#[non_exhaustive]`)
/// - Helper methods like `is_*()` provide stable APIs
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum BackendError {
    /// A document with this id already exists in the collection.
    #[error("Duplicate id '{id}' in collection '{collection}'")]
    DuplicateId {
        /// The collection written to
        collection: String,
        /// The conflicting id
        id: String,
    },

    /// The store could not be reached.
    #[error("Store unavailable: {reason}")]
    Unavailable {
        /// Description of the connection problem
        reason: String,
    },

    /// A value did not serialize to a JSON object.
    #[error("Expected a JSON object, found {found}")]
    NotADocument {
        /// JSON type that was produced instead
        found: &'static str,
    },

    /// Serialization failed.
    #[error("Serialization failed")]
    SerializationFailed {
        /// The underlying serialization error
        #[source]
        source: serde_json::Error,
    },

    /// Deserialization failed.
    #[error("Deserialization failed")]
    DeserializationFailed {
        /// The underlying deserialization error
        #[source]
        source: serde_json::Error,
    },

    /// File I/O error.
    #[error("File I/O error")]
    FileIo {
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Stored schema version is not the one this build understands.
    #[error("Unsupported schema version {found}, expected {expected}")]
    SchemaVersionMismatch {
        /// Version found in the database
        found: i64,
        /// Version this build writes
        expected: i64,
    },

    /// SQL driver error.
    #[cfg(any(feature = "sqlite", feature = "postgres"))]
    #[error("SQL error: {reason}")]
    SqlxError {
        /// Context and driver message
        reason: String,
        /// The underlying sqlx error, when there is one
        #[source]
        source: Option<sqlx::Error>,
    },
}

impl BackendError {
    /// Check if this error is a duplicate-id conflict.
    pub fn is_conflict(&self) -> bool {
        matches!(self, BackendError::DuplicateId { .. })
    }

    /// Check if the store itself could not be reached.
    pub fn is_unavailable(&self) -> bool {
        match self {
            BackendError::Unavailable { .. } => true,
            #[cfg(any(feature = "sqlite", feature = "postgres"))]
            BackendError::SqlxError {
                source: Some(sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_)),
                ..
            } => true,
            _ => false,
        }
    }

    /// Check if this error is related to I/O or (de)serialization.
    pub fn is_io_error(&self) -> bool {
        matches!(
            self,
            BackendError::FileIo { .. }
                | BackendError::SerializationFailed { .. }
                | BackendError::DeserializationFailed { .. }
        )
    }
}

impl From<BackendError> for crate::Error {
    fn from(err: BackendError) -> Self {
        crate::Error::Backend(err)
    }
}
