//! SQL-based document store.
//!
//! Documents are kept as JSON text in a single `documents` table keyed by
//! `(collection, id)`. The backend uses sqlx with `AnyPool` so the same code
//! serves SQLite and PostgreSQL.
//!
//! ## Available Backends
//!
//! - **SQLite** (feature: `sqlite`): Embedded database, file or in-memory
//! - **PostgreSQL** (feature: `postgres`): PostgreSQL database

mod storage;

/// Schema definition.
pub mod schema;

use std::any::Any;

use async_trait::async_trait;
use sqlx::AnyPool;
use sqlx::any::AnyPoolOptions;

use crate::Result;
use crate::backend::errors::BackendError;
use crate::backend::{Document, DocumentStore, Filter};

/// Extension trait for sqlx Result types to simplify error handling.
///
/// Converts sqlx errors to `BackendError::SqlxError` with a context message.
pub(crate) trait SqlxResultExt<T> {
    /// Convert sqlx error to BackendError with context message.
    fn sql_context(self, context: &str) -> Result<T>;
}

impl<T> SqlxResultExt<T> for std::result::Result<T, sqlx::Error> {
    fn sql_context(self, context: &str) -> Result<T> {
        self.map_err(|e| {
            BackendError::SqlxError {
                reason: format!("{context}: {e}"),
                source: Some(e),
            }
            .into()
        })
    }
}

/// Database backend kind for SQL dialect selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DbKind {
    /// SQLite database
    Sqlite,
    /// PostgreSQL database
    Postgres,
}

/// SQL-backed [`DocumentStore`].
///
/// `SqlxBackend` is `Send + Sync`; the underlying sqlx pool handles connection
/// pooling. Single statements are atomic; `update` runs its read-merge-write in
/// one transaction.
pub struct SqlxBackend {
    pool: AnyPool,
    kind: DbKind,
}

impl SqlxBackend {
    /// Get a reference to the underlying pool.
    pub fn pool(&self) -> &AnyPool {
        &self.pool
    }

    /// Get the database kind.
    pub fn db_kind(&self) -> DbKind {
        self.kind
    }

    /// Close every pooled connection.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

// SQLite-specific implementations
#[cfg(feature = "sqlite")]
impl SqlxBackend {
    /// Open a SQLite database at the given path.
    ///
    /// Creates the database file and schema if they don't exist.
    pub async fn open_sqlite<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        // mode=rwc: read-write-create (create file if it doesn't exist)
        let url = format!("sqlite:{}?mode=rwc", path.as_ref().display());
        Self::connect_sqlite(&url).await
    }

    /// Connect to a SQLite database using a connection URL.
    pub async fn connect_sqlite(url: &str) -> Result<Self> {
        sqlx::any::install_default_drivers();

        let is_in_memory = url.contains("mode=memory");

        // In-memory databases vanish with their last connection, so keep one
        // connection alive for the lifetime of the pool.
        let pool = if is_in_memory {
            AnyPoolOptions::new()
                .max_connections(5)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
                .connect(url)
                .await
                .sql_context("Failed to connect to SQLite")?
        } else {
            AnyPoolOptions::new()
                .max_connections(5)
                .connect(url)
                .await
                .sql_context("Failed to connect to SQLite")?
        };

        if is_in_memory {
            sqlx::query("PRAGMA busy_timeout = 5000;")
                .execute(&pool)
                .await
                .sql_context("Failed to configure SQLite")?;
        } else {
            sqlx::query(
                "PRAGMA journal_mode = WAL;
                 PRAGMA synchronous = NORMAL;
                 PRAGMA busy_timeout = 5000;",
            )
            .execute(&pool)
            .await
            .sql_context("Failed to configure SQLite")?;
        }

        let backend = Self {
            pool,
            kind: DbKind::Sqlite,
        };
        schema::initialize(&backend).await?;
        Ok(backend)
    }

    /// Create an in-memory SQLite database.
    ///
    /// Each call gets its own database; it lives as long as the backend.
    pub async fn sqlite_in_memory() -> Result<Self> {
        // Shared cache so all pooled connections see the same database,
        // unique name so separate backends stay isolated.
        let unique_id = uuid::Uuid::new_v4().simple();
        let url = format!("sqlite:file:mem_{unique_id}?mode=memory&cache=shared");
        Self::connect_sqlite(&url).await
    }
}

// PostgreSQL-specific implementations
#[cfg(feature = "postgres")]
impl SqlxBackend {
    /// Connect to a PostgreSQL database.
    ///
    /// `acquire_timeout` bounds how long a request waits for a pooled
    /// connection before failing with a store error.
    pub async fn connect_postgres(url: &str, acquire_timeout: std::time::Duration) -> Result<Self> {
        sqlx::any::install_default_drivers();

        let pool = AnyPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(acquire_timeout)
            .connect(url)
            .await
            .map_err(|e| BackendError::Unavailable {
                reason: format!("Failed to connect to PostgreSQL: {e}"),
            })?;

        let backend = Self {
            pool,
            kind: DbKind::Postgres,
        };
        schema::initialize(&backend).await?;
        Ok(backend)
    }
}

#[async_trait]
impl DocumentStore for SqlxBackend {
    async fn find(&self, collection: &str, filter: &Filter) -> Result<Vec<Document>> {
        storage::find(self, collection, filter).await
    }

    async fn find_one(&self, collection: &str, id: &str) -> Result<Option<Document>> {
        storage::find_one(self, collection, id).await
    }

    async fn insert(&self, collection: &str, id: &str, document: Document) -> Result<()> {
        storage::insert(self, collection, id, document).await
    }

    async fn update(&self, collection: &str, id: &str, fields: Document) -> Result<u64> {
        storage::update(self, collection, id, fields).await
    }

    async fn delete(&self, collection: &str, filter: &Filter) -> Result<u64> {
        storage::delete(self, collection, filter).await
    }

    async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| BackendError::Unavailable {
                reason: e.to_string(),
            })?;
        Ok(())
    }

    fn kind(&self) -> &'static str {
        match self.kind {
            DbKind::Sqlite => "sqlite",
            DbKind::Postgres => "postgres",
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
