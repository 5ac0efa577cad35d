//! Store creation and connection-string utilities.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use devicehub::backend::{
    DocumentStore,
    database::{InMemory, SqlxBackend},
};

use crate::cli::{Backend, BackendConfig};

/// File name of the SQLite database inside the data directory
pub const SQLITE_FILE: &str = "devicehub.db";

/// File name of the InMemory snapshot inside the data directory
pub const JSON_FILE: &str = "devicehub.json";

/// Redact credentials from a PostgreSQL connection URL for safe logging
pub fn redact_postgres_url(url: &str) -> String {
    if let Ok(parsed) = url::Url::parse(url) {
        let mut redacted = parsed.clone();
        if !parsed.username().is_empty() {
            let _ = redacted.set_username("***");
        }
        if parsed.password().is_some() {
            let _ = redacted.set_password(Some("***"));
        }
        redacted.to_string()
    } else {
        "postgres://***@<unparsable-url>".to_string()
    }
}

/// PostgreSQL URL from the configuration.
///
/// An explicit `database_url` wins. Otherwise the URL is assembled from the
/// individual settings; credentials are included only when both user and
/// password are set.
pub fn postgres_url(config: &BackendConfig) -> String {
    if let Some(url) = &config.database_url {
        return url.clone();
    }

    let base = format!(
        "postgres://{}:{}/{}",
        config.db_host, config.db_port, config.db_name
    );
    let Ok(mut url) = url::Url::parse(&base) else {
        return base;
    };

    if let (Some(user), Some(password)) = (&config.db_user, &config.db_password)
        && !user.is_empty()
        && !password.is_empty()
    {
        // set_* percent-encodes reserved characters
        let _ = url.set_username(user);
        let _ = url.set_password(Some(password));
    }
    url.to_string()
}

/// Data directory from the configuration, defaulting to the working directory.
pub fn data_dir(config: &BackendConfig) -> PathBuf {
    config.data_dir.clone().unwrap_or_else(|| PathBuf::from("."))
}

/// Create the configured document store
pub async fn create_store(
    config: &BackendConfig,
) -> Result<Arc<dyn DocumentStore>, Box<dyn std::error::Error>> {
    let data_dir = data_dir(config);

    match config.backend {
        Backend::Sqlite => {
            tokio::fs::create_dir_all(&data_dir).await?;
            let db_path = data_dir.join(SQLITE_FILE);
            tracing::info!("Using SQLite backend at {}", db_path.display());
            Ok(Arc::new(SqlxBackend::open_sqlite(&db_path).await?))
        }
        Backend::Postgres => {
            let url = postgres_url(config);
            let display_url = redact_postgres_url(&url);
            tracing::info!("Connecting to PostgreSQL backend at {}", display_url);

            match SqlxBackend::connect_postgres(&url, Duration::from_secs(config.db_timeout)).await
            {
                Ok(backend) => {
                    tracing::info!("Connected to PostgreSQL successfully");
                    Ok(Arc::new(backend))
                }
                Err(e) => {
                    Err(format!("Failed to connect to PostgreSQL at {}: {}", display_url, e).into())
                }
            }
        }
        Backend::Inmemory => {
            tokio::fs::create_dir_all(&data_dir).await?;
            let json_path = data_dir.join(JSON_FILE);
            tracing::info!(
                "Using in-memory backend with persistence at {}",
                json_path.display()
            );
            Ok(Arc::new(InMemory::load_from_file(&json_path).await?))
        }
    }
}
