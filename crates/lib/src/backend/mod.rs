//! Document store backends for devicehub
//!
//! This module provides the core `DocumentStore` trait and its implementations.
//!
//! The trait models a small document database: named collections of JSON
//! documents, each addressed by a string id. The typed stores built on top of it
//! (credentials, sessions, devices) only ever talk to this trait, so any backend
//! can be swapped in without touching the session or device logic.
//!
//! Every method is a single-document or single-statement operation; the trait
//! makes no promise of atomicity across calls.

use std::any::Any;

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::Result;

pub mod database;
pub mod errors;

pub use errors::BackendError;

/// A stored document: a JSON object.
pub type Document = Map<String, Value>;

/// Selects documents in a collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
    /// Every document in the collection.
    All,
    /// Documents whose id equals the given value.
    Id(String),
}

impl Filter {
    /// Filter on a single id.
    pub fn id(id: impl Into<String>) -> Self {
        Filter::Id(id.into())
    }

    /// Check whether a document stored under `id` matches this filter.
    pub fn matches(&self, id: &str) -> bool {
        match self {
            Filter::All => true,
            Filter::Id(wanted) => wanted == id,
        }
    }
}

/// Storage abstraction over keyed document collections.
///
/// Collections are created implicitly on first write. Documents are returned
/// exactly as they were stored (merged with later `update` calls); ids are kept
/// alongside the document and are not injected into its body.
///
/// All implementations must be `Send + Sync` so a single store handle can be
/// shared by every request handler, and `Any` to allow downcasting (for example
/// to save an [`InMemory`](database::InMemory) store on shutdown).
#[async_trait]
pub trait DocumentStore: Send + Sync + Any {
    /// Return all documents in `collection` matching `filter`, ordered by id.
    ///
    /// An empty vector is returned when nothing matches.
    async fn find(&self, collection: &str, filter: &Filter) -> Result<Vec<Document>>;

    /// Fetch a single document by id.
    async fn find_one(&self, collection: &str, id: &str) -> Result<Option<Document>>;

    /// Insert a new document.
    ///
    /// Fails with [`BackendError::DuplicateId`] if `id` is already present.
    async fn insert(&self, collection: &str, id: &str, document: Document) -> Result<()>;

    /// Merge `fields` into the document stored under `id`.
    ///
    /// Keys in `fields` overwrite existing keys; keys not mentioned are kept.
    /// Returns the number of matched documents (0 or 1).
    async fn update(&self, collection: &str, id: &str, fields: Document) -> Result<u64>;

    /// Delete every document matching `filter` and return how many were removed.
    async fn delete(&self, collection: &str, filter: &Filter) -> Result<u64>;

    /// Check that the store is reachable.
    async fn ping(&self) -> Result<()>;

    /// Short name of the backend, reported by the health endpoint.
    fn kind(&self) -> &'static str;

    /// Returns a reference to the store as a `dyn Any` for downcasting.
    fn as_any(&self) -> &dyn Any;
}

/// Serialize a value into a document.
///
/// Values that do not serialize to a JSON object are rejected.
pub fn to_document<T: serde::Serialize>(value: &T) -> Result<Document> {
    match serde_json::to_value(value).map_err(|e| BackendError::SerializationFailed { source: e })? {
        Value::Object(map) => Ok(map),
        other => Err(BackendError::NotADocument {
            found: json_type_name(&other),
        }
        .into()),
    }
}

/// Deserialize a stored document into a typed value.
pub fn from_document<T: serde::de::DeserializeOwned>(document: Document) -> Result<T> {
    serde_json::from_value(Value::Object(document))
        .map_err(|e| BackendError::DeserializationFailed { source: e }.into())
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
