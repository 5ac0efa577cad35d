//! Account registration and credential verification.

use std::sync::Arc;

use tracing::{info, warn};

use super::crypto::{hash_password, verify_password};
use super::errors::UserError;
use super::store::CredentialStore;
use super::types::UserCredential;
use crate::Result;
use crate::session::AuthError;

/// Creates accounts and checks passwords against stored digests.
#[derive(Clone)]
pub struct AccountService {
    credentials: Arc<dyn CredentialStore>,
}

impl AccountService {
    pub fn new(credentials: Arc<dyn CredentialStore>) -> Self {
        Self { credentials }
    }

    /// Register a new account.
    ///
    /// # Errors
    /// - [`UserError::EmptyUsername`] for an empty username
    /// - [`UserError::UserExists`] if the username is taken
    pub async fn create_user(&self, username: &str, password: &str) -> Result<()> {
        if username.is_empty() {
            return Err(UserError::EmptyUsername.into());
        }
        if self.credentials.exists(username).await? {
            return Err(UserError::UserExists {
                username: username.to_string(),
            }
            .into());
        }

        let credential = UserCredential {
            username: username.to_string(),
            password_digest: hash_password(password)?,
        };
        self.credentials.create(&credential).await?;

        info!(username, "Created user");
        Ok(())
    }

    /// Check a username and password.
    ///
    /// An unknown user and a wrong password both fail with
    /// [`AuthError::NotAuthenticated`].
    pub async fn verify_credentials(&self, username: &str, password: &str) -> Result<()> {
        let verified = match self.credentials.get(username).await? {
            Some(credential) => verify_password(password, &credential.password_digest),
            None => false,
        };

        if !verified {
            warn!(username, "Rejected credentials");
            return Err(AuthError::NotAuthenticated.into());
        }
        Ok(())
    }
}
