//! Document storage operations for SQL backends.

use crate::Result;
use crate::backend::errors::BackendError;
use crate::backend::{Document, Filter};

use super::{SqlxBackend, SqlxResultExt};

fn decode(body: &str) -> Result<Document> {
    serde_json::from_str(body).map_err(|e| BackendError::DeserializationFailed { source: e }.into())
}

fn encode(document: &Document) -> Result<String> {
    serde_json::to_string(document).map_err(|e| BackendError::SerializationFailed { source: e }.into())
}

/// Find documents in a collection, ordered by id.
pub async fn find(backend: &SqlxBackend, collection: &str, filter: &Filter) -> Result<Vec<Document>> {
    let pool = backend.pool();

    let rows: Vec<(String,)> = match filter {
        Filter::All => {
            sqlx::query_as("SELECT body FROM documents WHERE collection = $1 ORDER BY id")
                .bind(collection)
                .fetch_all(pool)
                .await
        }
        Filter::Id(id) => {
            sqlx::query_as("SELECT body FROM documents WHERE collection = $1 AND id = $2")
                .bind(collection)
                .bind(id.as_str())
                .fetch_all(pool)
                .await
        }
    }
    .sql_context("Failed to find documents")?;

    rows.iter().map(|(body,)| decode(body)).collect()
}

/// Fetch one document by id.
pub async fn find_one(backend: &SqlxBackend, collection: &str, id: &str) -> Result<Option<Document>> {
    let row: Option<(String,)> =
        sqlx::query_as("SELECT body FROM documents WHERE collection = $1 AND id = $2")
            .bind(collection)
            .bind(id)
            .fetch_optional(backend.pool())
            .await
            .sql_context("Failed to get document")?;

    row.map(|(body,)| decode(&body)).transpose()
}

/// Insert a new document, rejecting duplicate ids.
pub async fn insert(backend: &SqlxBackend, collection: &str, id: &str, document: Document) -> Result<()> {
    let body = encode(&document)?;

    let result = sqlx::query("INSERT INTO documents (collection, id, body) VALUES ($1, $2, $3)")
        .bind(collection)
        .bind(id)
        .bind(body)
        .execute(backend.pool())
        .await;

    match result {
        Ok(_) => Ok(()),
        Err(e)
            if e
                .as_database_error()
                .is_some_and(|db_err| db_err.is_unique_violation()) =>
        {
            Err(BackendError::DuplicateId {
                collection: collection.to_string(),
                id: id.to_string(),
            }
            .into())
        }
        Err(e) => Err(e).sql_context("Failed to insert document"),
    }
}

/// Merge fields into an existing document.
pub async fn update(backend: &SqlxBackend, collection: &str, id: &str, fields: Document) -> Result<u64> {
    let mut tx = backend
        .pool()
        .begin()
        .await
        .sql_context("Failed to begin transaction")?;

    let row: Option<(String,)> =
        sqlx::query_as("SELECT body FROM documents WHERE collection = $1 AND id = $2")
            .bind(collection)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await
            .sql_context("Failed to read document for update")?;

    let Some((body,)) = row else {
        return Ok(0);
    };

    let mut document = decode(&body)?;
    for (key, value) in fields {
        document.insert(key, value);
    }

    sqlx::query("UPDATE documents SET body = $1 WHERE collection = $2 AND id = $3")
        .bind(encode(&document)?)
        .bind(collection)
        .bind(id)
        .execute(&mut *tx)
        .await
        .sql_context("Failed to update document")?;

    tx.commit().await.sql_context("Failed to commit update")?;
    Ok(1)
}

/// Delete documents matching a filter.
pub async fn delete(backend: &SqlxBackend, collection: &str, filter: &Filter) -> Result<u64> {
    let pool = backend.pool();

    let result = match filter {
        Filter::All => {
            sqlx::query("DELETE FROM documents WHERE collection = $1")
                .bind(collection)
                .execute(pool)
                .await
        }
        Filter::Id(id) => {
            sqlx::query("DELETE FROM documents WHERE collection = $1 AND id = $2")
                .bind(collection)
                .bind(id.as_str())
                .execute(pool)
                .await
        }
    }
    .sql_context("Failed to delete documents")?;

    Ok(result.rows_affected())
}
