//! Session lifecycle for devicehub
//!
//! A session is created by a successful login, checked on every protected
//! request, and ends on logout, on renewal (the old token), or when it is
//! found expired. Sessions exist only in the [`SessionStore`]; nothing is kept
//! in process memory between requests.
//!
//! Per token the lifecycle is `absent -> active -> absent`. An absent token is
//! never reactivated; renewal always issues a fresh token.

pub mod errors;
pub mod manager;
pub mod store;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use errors::AuthError;
pub use manager::SessionManager;
pub use store::{DocumentSessionStore, SessionStore};

/// A live login.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Opaque bearer token (UUID v4)
    pub token: String,
    pub username: String,
    /// The session is invalid at and after this instant.
    pub expiry: DateTime<Utc>,
}

impl Session {
    /// Check whether the session has expired at `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expiry <= now
    }
}
