//! Credential persistence.

use std::sync::Arc;

use async_trait::async_trait;

use super::errors::UserError;
use super::types::UserCredential;
use crate::Result;
use crate::backend::{DocumentStore, from_document, to_document};
use crate::constants::USERS;

/// Persists username → password digest.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Check whether an account exists.
    async fn exists(&self, username: &str) -> Result<bool>;

    /// Store a new account.
    ///
    /// Fails with [`UserError::UserExists`] if the username is taken.
    async fn create(&self, credential: &UserCredential) -> Result<()>;

    /// Look up an account by username.
    async fn get(&self, username: &str) -> Result<Option<UserCredential>>;
}

/// [`CredentialStore`] over the `users` collection of a [`DocumentStore`].
#[derive(Clone)]
pub struct DocumentCredentialStore {
    store: Arc<dyn DocumentStore>,
}

impl DocumentCredentialStore {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl CredentialStore for DocumentCredentialStore {
    async fn exists(&self, username: &str) -> Result<bool> {
        Ok(self.store.find_one(USERS, username).await?.is_some())
    }

    async fn create(&self, credential: &UserCredential) -> Result<()> {
        let document = to_document(credential)?;
        match self.store.insert(USERS, &credential.username, document).await {
            // Lost a race with a concurrent registration
            Err(e) if e.is_conflict() => Err(UserError::UserExists {
                username: credential.username.clone(),
            }
            .into()),
            other => other,
        }
    }

    async fn get(&self, username: &str) -> Result<Option<UserCredential>> {
        self.store
            .find_one(USERS, username)
            .await?
            .map(from_document)
            .transpose()
    }
}
