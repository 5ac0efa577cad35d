//! Session persistence.

use std::sync::Arc;

use async_trait::async_trait;

use super::Session;
use crate::Result;
use crate::backend::{DocumentStore, Filter, from_document, to_document};
use crate::constants::SESSIONS;

/// Persists token → session.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Store a session, replacing any record under the same token.
    async fn put(&self, session: &Session) -> Result<()>;

    /// Look up a session by token.
    async fn get(&self, token: &str) -> Result<Option<Session>>;

    /// Remove a session. Removing an absent token is not an error.
    async fn delete(&self, token: &str) -> Result<()>;
}

/// [`SessionStore`] over the `sessions` collection of a [`DocumentStore`].
#[derive(Clone)]
pub struct DocumentSessionStore {
    store: Arc<dyn DocumentStore>,
}

impl DocumentSessionStore {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl SessionStore for DocumentSessionStore {
    async fn put(&self, session: &Session) -> Result<()> {
        let document = to_document(session)?;
        if self.store.find_one(SESSIONS, &session.token).await?.is_some() {
            self.store.update(SESSIONS, &session.token, document).await?;
        } else {
            self.store.insert(SESSIONS, &session.token, document).await?;
        }
        Ok(())
    }

    async fn get(&self, token: &str) -> Result<Option<Session>> {
        self.store
            .find_one(SESSIONS, token)
            .await?
            .map(from_document)
            .transpose()
    }

    async fn delete(&self, token: &str) -> Result<()> {
        self.store.delete(SESSIONS, &Filter::id(token)).await?;
        Ok(())
    }
}
