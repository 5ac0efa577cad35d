//! CLI argument definitions for the devicehub binary.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use devicehub::device::UpsertPolicy;

/// Storage backend type
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Backend {
    /// SQLite database (default)
    Sqlite,
    /// PostgreSQL database
    Postgres,
    /// In-memory with JSON persistence (for development)
    Inmemory,
}

/// Device catalog server
#[derive(Parser, Debug)]
#[command(name = "devicehub")]
#[command(about = "Devicehub: device catalog with cookie sessions")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the devicehub server
    Serve(ServeArgs),
    /// Check health of a running devicehub server
    Health(HealthArgs),
}

/// Arguments for the serve command
#[derive(clap::Args, Debug, Clone)]
pub struct ServeArgs {
    /// Port to listen on
    #[arg(short, long, default_value_t = 3000, env = "DEVICEHUB_PORT")]
    pub port: u16,

    /// Bind address
    #[arg(long, default_value = "0.0.0.0", env = "DEVICEHUB_HOST")]
    pub host: String,

    #[command(flatten)]
    pub backend_config: BackendConfig,

    /// Session lifetime in seconds
    #[arg(long, default_value_t = 120, env = "DEVICEHUB_SESSION_TTL")]
    pub session_ttl: i64,

    /// How a device write treats an existing id: name-only or replace-all
    #[arg(long, default_value = "name-only", env = "DEVICEHUB_UPSERT_POLICY")]
    pub upsert_policy: UpsertPolicy,

    /// Mark the session cookie Secure (serve behind TLS)
    #[arg(long, env = "DEVICEHUB_SECURE_COOKIE")]
    pub secure_cookie: bool,
}

/// Storage backend selection and connection settings
#[derive(clap::Args, Debug, Clone)]
pub struct BackendConfig {
    /// Storage backend to use
    #[arg(short, long, default_value = "sqlite", env = "DEVICEHUB_BACKEND")]
    pub backend: Backend,

    /// Data directory for storage files.
    /// For SQLite: stores devicehub.db
    /// For InMemory: stores devicehub.json
    #[arg(short = 'D', long, env = "DEVICEHUB_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// PostgreSQL connection URL; overrides the individual --db-* settings
    #[arg(long, env = "DEVICEHUB_DATABASE_URL")]
    pub database_url: Option<String>,

    /// PostgreSQL user
    #[arg(long, env = "DEVICEHUB_DB_USER")]
    pub db_user: Option<String>,

    /// PostgreSQL password
    #[arg(long, env = "DEVICEHUB_DB_PASSWORD", hide_env_values = true)]
    pub db_password: Option<String>,

    /// PostgreSQL host
    #[arg(long, default_value = "localhost", env = "DEVICEHUB_DB_HOST")]
    pub db_host: String,

    /// PostgreSQL port
    #[arg(long, default_value_t = 5432, env = "DEVICEHUB_DB_PORT")]
    pub db_port: u16,

    /// PostgreSQL database name
    #[arg(long, default_value = "devicehub", env = "DEVICEHUB_DB_NAME")]
    pub db_name: String,

    /// Seconds to wait for a database connection
    #[arg(long, default_value_t = 10, env = "DEVICEHUB_DB_TIMEOUT")]
    pub db_timeout: u64,
}

/// Arguments for the health command
#[derive(clap::Args, Debug)]
pub struct HealthArgs {
    /// Base URL of the server to check
    #[arg(default_value = "http://127.0.0.1:3000")]
    pub url: String,

    /// Timeout in seconds
    #[arg(short, long, default_value_t = 5)]
    pub timeout: u64,
}
