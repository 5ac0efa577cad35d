//! In-memory document store
//!
//! Suitable for tests, development, and single-process deployments that are
//! fine with snapshotting state to a JSON file on shutdown.

mod persistence;

use std::any::Any;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::Result;
use crate::backend::errors::BackendError;
use crate::backend::{Document, DocumentStore, Filter};

/// Documents of one collection, ordered by id.
pub(crate) type Collection = BTreeMap<String, Document>;

/// A simple in-memory store using a map of collections.
///
/// Each trait method takes the lock once, so every single-document operation
/// is atomic with respect to other callers. Nothing is atomic across calls.
///
/// Basic persistence is available via `save_to_file` and `load_from_file`,
/// which serialize all collections to JSON.
#[derive(Debug, Default)]
pub struct InMemory {
    pub(crate) collections: RwLock<HashMap<String, Collection>>,
}

impl InMemory {
    /// Creates a new, empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents in a collection.
    pub async fn count(&self, collection: &str) -> usize {
        self.collections
            .read()
            .await
            .get(collection)
            .map_or(0, BTreeMap::len)
    }

    /// Saves every collection to a file as JSON.
    pub async fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        persistence::save_to_file(self, path).await
    }

    /// Loads a store from a JSON file.
    ///
    /// If the file does not exist, a new, empty store is returned.
    pub async fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        persistence::load_from_file(path).await
    }
}

#[async_trait]
impl DocumentStore for InMemory {
    async fn find(&self, collection: &str, filter: &Filter) -> Result<Vec<Document>> {
        let collections = self.collections.read().await;
        let Some(docs) = collections.get(collection) else {
            return Ok(Vec::new());
        };
        let found = match filter {
            Filter::All => docs.values().cloned().collect(),
            Filter::Id(id) => docs.get(id).cloned().into_iter().collect(),
        };
        Ok(found)
    }

    async fn find_one(&self, collection: &str, id: &str) -> Result<Option<Document>> {
        let collections = self.collections.read().await;
        Ok(collections.get(collection).and_then(|docs| docs.get(id)).cloned())
    }

    async fn insert(&self, collection: &str, id: &str, document: Document) -> Result<()> {
        let mut collections = self.collections.write().await;
        let docs = collections.entry(collection.to_string()).or_default();
        if docs.contains_key(id) {
            return Err(BackendError::DuplicateId {
                collection: collection.to_string(),
                id: id.to_string(),
            }
            .into());
        }
        docs.insert(id.to_string(), document);
        Ok(())
    }

    async fn update(&self, collection: &str, id: &str, fields: Document) -> Result<u64> {
        let mut collections = self.collections.write().await;
        let Some(existing) = collections
            .get_mut(collection)
            .and_then(|docs| docs.get_mut(id))
        else {
            return Ok(0);
        };
        for (key, value) in fields {
            existing.insert(key, value);
        }
        Ok(1)
    }

    async fn delete(&self, collection: &str, filter: &Filter) -> Result<u64> {
        let mut collections = self.collections.write().await;
        let Some(docs) = collections.get_mut(collection) else {
            return Ok(0);
        };
        let removed = match filter {
            Filter::All => {
                let n = docs.len();
                docs.clear();
                n
            }
            Filter::Id(id) => usize::from(docs.remove(id).is_some()),
        };
        Ok(removed as u64)
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }

    fn kind(&self) -> &'static str {
        "inmemory"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
