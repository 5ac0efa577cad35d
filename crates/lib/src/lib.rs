//!
//! devicehub: a device catalog behind cookie sessions.
//! This library provides the core components of the devicehub service.
//!
//! ## Core Concepts
//!
//! * **Document stores (`backend::DocumentStore`)**: A pluggable storage layer holding named
//!   collections of JSON documents. `InMemory` and `SqlxBackend` (SQLite, PostgreSQL) are provided.
//! * **Accounts (`user::AccountService`)**: Username/password registration and verification,
//!   with passwords kept as Argon2id digests.
//! * **Sessions (`session::SessionManager`)**: Issues, validates, renews and ends session tokens.
//!   Sessions live only in the session store; nothing is cached in-process.
//! * **Devices (`device::DeviceService`)**: Lookup, batch upsert and deletion of device records.
//! * **HTTP service (`service`)**: The axum router exposing all of the above, with an
//!   authentication extractor in front of every protected route (requires the "service" feature).

pub mod backend;
pub mod clock;
pub mod constants;
pub mod device;
#[cfg(feature = "service")]
pub mod service;
pub mod session;
pub mod user;

pub use clock::{Clock, SystemClock};
#[cfg(any(test, feature = "testing"))]
pub use clock::FixedClock;

/// Result type used throughout the devicehub library.
pub type Result<T> = std::result::Result<T, Error>;

/// Common error type for the devicehub library.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Structured document store errors from the backend module
    #[error(transparent)]
    Backend(backend::BackendError),

    /// Structured session errors from the session module
    #[error(transparent)]
    Auth(session::AuthError),

    /// Structured account errors from the user module
    #[error(transparent)]
    User(user::UserError),

    /// Structured device errors from the device module
    #[error(transparent)]
    Device(device::DeviceError),
}

impl Error {
    /// Get the originating module for this error.
    pub fn module(&self) -> &'static str {
        match self {
            Error::Backend(_) => "backend",
            Error::Auth(_) => "session",
            Error::User(_) => "user",
            Error::Device(_) => "device",
            Error::Io(_) => "io",
            Error::Serialize(_) => "serialize",
        }
    }

    /// Check if this error indicates a resource was not found.
    pub fn is_not_found(&self) -> bool {
        match self {
            Error::Auth(auth_err) => auth_err.is_not_found(),
            _ => false,
        }
    }

    /// Check if this error indicates a conflict (already exists).
    pub fn is_conflict(&self) -> bool {
        match self {
            Error::Backend(backend_err) => backend_err.is_conflict(),
            Error::Auth(auth_err) => auth_err.is_conflict(),
            Error::User(user_err) => user_err.is_conflict(),
            _ => false,
        }
    }

    /// Check if this error is authentication-related.
    pub fn is_authentication_error(&self) -> bool {
        matches!(self, Error::Auth(_))
    }

    /// Check if this error is database/backend-related.
    pub fn is_database_error(&self) -> bool {
        matches!(self, Error::Backend(_))
    }

    /// Check if the document store could not be reached.
    pub fn is_unavailable(&self) -> bool {
        match self {
            Error::Backend(backend_err) => backend_err.is_unavailable(),
            _ => false,
        }
    }

    /// Check if this error is I/O related.
    pub fn is_io_error(&self) -> bool {
        match self {
            Error::Io(_) => true,
            Error::Backend(backend_err) => backend_err.is_io_error(),
            _ => false,
        }
    }

    /// Check if this error is validation-related.
    pub fn is_validation_error(&self) -> bool {
        match self {
            Error::User(user_err) => user_err.is_validation_error(),
            Error::Device(device_err) => device_err.is_validation_error(),
            _ => false,
        }
    }
}
