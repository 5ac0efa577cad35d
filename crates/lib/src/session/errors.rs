//! Session error types for the devicehub library.
//!
//! Every variant carries the exact message shown to HTTP clients, so the
//! service layer can surface these errors unchanged.

use thiserror::Error as ThisError;

use crate::Error;

/// Errors produced while establishing or checking a session.
///
/// # Stability
///
/// - New variants may be added in minor versions (enum is `#[non_exhaustive]`)
/// - Helper methods like `is_*()` provide stable APIs
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum AuthError {
    /// The request carried no session token.
    #[error("no session cookie found")]
    NoCookie,

    /// The token is unknown to the session store.
    #[error("session does not exist")]
    SessionNotFound,

    /// The session existed but its expiry has passed; it has been purged.
    #[error("session expired")]
    SessionExpired,

    /// Unknown user or wrong password.
    #[error("not authorized")]
    NotAuthenticated,

    /// Login attempted while presenting a live session.
    #[error("already authenticated")]
    AlreadyAuthenticated,

    /// `now + ttl` falls outside the representable time range.
    #[error("session expiry out of range")]
    ExpiryOutOfRange,
}

impl AuthError {
    /// Check if the presented session does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, AuthError::SessionNotFound)
    }

    /// Check if this error is a login attempt on top of a live session.
    pub fn is_conflict(&self) -> bool {
        matches!(self, AuthError::AlreadyAuthenticated)
    }

    /// Check if this error comes from the server's session settings rather
    /// than from the caller.
    pub fn is_internal(&self) -> bool {
        matches!(self, AuthError::ExpiryOutOfRange)
    }

    /// Check if the caller presented no usable session at all.
    pub fn is_missing_session(&self) -> bool {
        matches!(
            self,
            AuthError::NoCookie | AuthError::SessionNotFound | AuthError::SessionExpired
        )
    }
}

impl From<AuthError> for Error {
    fn from(err: AuthError) -> Self {
        Error::Auth(err)
    }
}
