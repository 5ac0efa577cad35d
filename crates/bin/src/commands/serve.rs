//! Serve command - runs the devicehub HTTP server.

use std::path::Path;
use std::sync::Arc;

use tokio::signal::unix::{SignalKind, signal};
use tracing_subscriber::EnvFilter;

use devicehub::{
    SystemClock,
    backend::{DocumentStore, database::InMemory},
    constants::MAX_SESSION_TTL_SECS,
    service::{AppState, ServiceConfig, router},
};

use crate::backend::{JSON_FILE, create_store, data_dir};
use crate::cli::ServeArgs;

/// Service settings from the command line.
fn service_config(args: &ServeArgs) -> Result<ServiceConfig, Box<dyn std::error::Error>> {
    if !(1..=MAX_SESSION_TTL_SECS).contains(&args.session_ttl) {
        return Err(format!(
            "session TTL must be between 1 and {MAX_SESSION_TTL_SECS} seconds, got {}",
            args.session_ttl
        )
        .into());
    }
    let session_ttl = chrono::TimeDelta::try_seconds(args.session_ttl)
        .ok_or_else(|| format!("session TTL out of range: {}", args.session_ttl))?;

    Ok(ServiceConfig {
        session_ttl,
        upsert_policy: args.upsert_policy,
        secure_cookie: args.secure_cookie,
    })
}

/// Write the InMemory store to `path`; other backends persist on their own.
///
/// Returns whether a snapshot was written.
async fn save_snapshot(store: &dyn DocumentStore, path: &Path) -> bool {
    let Some(in_memory) = store.as_any().downcast_ref::<InMemory>() else {
        return false;
    };
    match in_memory.save_to_file(path).await {
        Ok(()) => {
            tracing::info!("Store saved to {}", path.display());
            true
        }
        Err(e) => {
            tracing::error!("Failed to save store: {e:?}");
            false
        }
    }
}

/// Resolves on SIGTERM or SIGINT.
async fn shutdown_signal() {
    let (mut sigterm, mut sigint) =
        match (signal(SignalKind::terminate()), signal(SignalKind::interrupt())) {
            (Ok(term), Ok(int)) => (term, int),
            (Err(e), _) | (_, Err(e)) => {
                tracing::warn!("Failed to install signal handlers, falling back to Ctrl+C: {e}");
                let _ = tokio::signal::ctrl_c().await;
                return;
            }
        };

    tokio::select! {
        _ = sigterm.recv() => tracing::info!("Received SIGTERM, initiating graceful shutdown..."),
        _ = sigint.recv() => tracing::info!("Received SIGINT, initiating graceful shutdown..."),
    }
}

/// Run the devicehub server
pub async fn run(args: &ServeArgs) -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("devicehub=info".parse()?))
        .init();

    let config = service_config(args)?;
    tracing::info!(
        session_ttl = args.session_ttl,
        upsert_policy = %config.upsert_policy,
        "Service configuration"
    );

    let store = create_store(&args.backend_config).await?;
    let state = AppState::new(store.clone(), Arc::new(SystemClock), config);
    let app = router(state);

    // Bind server
    let addr = format!("{}:{}", args.host, args.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    let local_addr = listener.local_addr()?;

    println!("Devicehub server listening on http://{local_addr}");
    println!();
    println!("Available endpoints:");
    println!("  POST   /auth         - Log in (sets session_token cookie)");
    println!("  PUT    /auth         - Log out");
    println!("  GET    /session      - Current session");
    println!("  PUT    /refresh      - Renew session");
    println!("  POST   /user         - Register a user");
    println!("  GET    /devices      - List devices");
    println!("  POST   /devices      - Upsert devices");
    println!("  DELETE /devices      - Delete all devices");
    println!("  GET    /device/{{id}}  - Get one device");
    println!("  DELETE /device/{{id}}  - Delete one device");
    println!("  GET    /health       - Health check");
    println!();
    println!("Press Ctrl+C to shutdown");

    let json_path = data_dir(&args.backend_config).join(JSON_FILE);

    // Start server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // In-flight requests have drained
    save_snapshot(store.as_ref(), &json_path).await;

    tracing::info!("Server shut down");
    Ok(())
}
