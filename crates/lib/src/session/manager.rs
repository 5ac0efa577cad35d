//! Token issuing, validation and renewal.

use std::sync::Arc;

use chrono::Duration;
use tracing::{debug, info};
use uuid::Uuid;

use super::errors::AuthError;
use super::store::SessionStore;
use super::Session;
use crate::Result;
use crate::clock::Clock;
use crate::constants::DEFAULT_SESSION_TTL_SECS;
use crate::user::AccountService;

/// Issues, validates, renews and ends sessions.
///
/// All state lives in the injected [`SessionStore`]. The manager is cheap to
/// clone and is shared by every request handler.
#[derive(Clone)]
pub struct SessionManager {
    sessions: Arc<dyn SessionStore>,
    accounts: AccountService,
    clock: Arc<dyn Clock>,
    ttl: Duration,
}

impl SessionManager {
    pub fn new(
        sessions: Arc<dyn SessionStore>,
        accounts: AccountService,
        clock: Arc<dyn Clock>,
        ttl: Duration,
    ) -> Self {
        Self {
            sessions,
            accounts,
            clock,
            ttl,
        }
    }

    /// The default session lifetime.
    pub fn default_ttl() -> Duration {
        Duration::seconds(DEFAULT_SESSION_TTL_SECS)
    }

    /// Lifetime given to new sessions.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// The account service used to check credentials.
    pub fn accounts(&self) -> &AccountService {
        &self.accounts
    }

    /// Log in and start a new session.
    ///
    /// `presented` is the token the caller already holds, if any. A live one
    /// fails the login with [`AuthError::AlreadyAuthenticated`]; an expired or
    /// unknown one is ignored.
    pub async fn login(
        &self,
        username: &str,
        password: &str,
        presented: Option<&str>,
    ) -> Result<Session> {
        if presented.is_some() {
            match self.validate(presented).await {
                Ok(_) => return Err(AuthError::AlreadyAuthenticated.into()),
                Err(e) if e.is_authentication_error() => {}
                Err(e) => return Err(e),
            }
        }

        self.accounts.verify_credentials(username, password).await?;

        let session = self.issue(username)?;
        self.sessions.put(&session).await?;

        info!(username, expiry = %session.expiry, "Session created");
        Ok(session)
    }

    /// Check a presented token.
    ///
    /// An expired session is deleted before [`AuthError::SessionExpired`] is
    /// returned, so the next check of the same token reports
    /// [`AuthError::SessionNotFound`].
    pub async fn validate(&self, token: Option<&str>) -> Result<Session> {
        let token = token.ok_or(AuthError::NoCookie)?;

        let session = self
            .sessions
            .get(token)
            .await?
            .ok_or(AuthError::SessionNotFound)?;

        if session.is_expired_at(self.clock.now()) {
            self.sessions.delete(token).await?;
            debug!(username = %session.username, "Purged expired session");
            return Err(AuthError::SessionExpired.into());
        }

        Ok(session)
    }

    /// Replace a live session with a fresh token and expiry.
    ///
    /// The new session is stored before the old one is deleted. A failure in
    /// between leaves both tokens valid, never neither.
    pub async fn renew(&self, token: Option<&str>) -> Result<Session> {
        let old = self.validate(token).await?;

        let session = self.issue(&old.username)?;
        self.sessions.put(&session).await?;
        self.sessions.delete(&old.token).await?;

        info!(username = %session.username, expiry = %session.expiry, "Session renewed");
        Ok(session)
    }

    /// End a live session.
    pub async fn logout(&self, token: Option<&str>) -> Result<()> {
        let session = self.validate(token).await?;
        self.sessions.delete(&session.token).await?;

        info!(username = %session.username, "Session ended");
        Ok(())
    }

    fn issue(&self, username: &str) -> Result<Session> {
        let expiry = self
            .clock
            .now()
            .checked_add_signed(self.ttl)
            .ok_or(AuthError::ExpiryOutOfRange)?;

        Ok(Session {
            token: Uuid::new_v4().to_string(),
            username: username.to_string(),
            expiry,
        })
    }
}
