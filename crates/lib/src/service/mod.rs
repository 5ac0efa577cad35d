//! HTTP surface of devicehub
//!
//! An axum [`Router`] exposing login, session, account and device routes.
//! Protected routes take the [`Authenticated`] extractor, which validates the
//! `session_token` cookie before the handler body runs.
//!
//! Every error becomes a JSON body `{"code": <status>, "error": "<message>"}`.

mod error;
mod gate;
mod handlers;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post, put};
use chrono::Duration;
use tower_cookies::CookieManagerLayer;

pub use error::{ApiError, MALFORMED_REQUEST};
pub use gate::Authenticated;

use crate::backend::DocumentStore;
use crate::clock::Clock;
use crate::device::{DeviceService, DocumentDeviceRepository, UpsertPolicy};
use crate::session::{DocumentSessionStore, SessionManager};
use crate::user::{AccountService, DocumentCredentialStore};

/// Tunables for the HTTP service.
#[derive(Clone, Debug)]
pub struct ServiceConfig {
    /// Lifetime of a new or renewed session
    pub session_ttl: Duration,
    /// How a batch write treats an existing device id
    pub upsert_policy: UpsertPolicy,
    /// Mark the session cookie `Secure`
    pub secure_cookie: bool,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            session_ttl: SessionManager::default_ttl(),
            upsert_policy: UpsertPolicy::default(),
            secure_cookie: false,
        }
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub sessions: SessionManager,
    pub accounts: AccountService,
    pub devices: DeviceService,
    pub store: Arc<dyn DocumentStore>,
    pub secure_cookie: bool,
}

impl AppState {
    /// Wire every service to one document store.
    pub fn new(store: Arc<dyn DocumentStore>, clock: Arc<dyn Clock>, config: ServiceConfig) -> Self {
        let accounts = AccountService::new(Arc::new(DocumentCredentialStore::new(store.clone())));
        let sessions = SessionManager::new(
            Arc::new(DocumentSessionStore::new(store.clone())),
            accounts.clone(),
            clock,
            config.session_ttl,
        );
        let devices = DeviceService::new(Arc::new(DocumentDeviceRepository::with_policy(
            store.clone(),
            config.upsert_policy,
        )));

        Self {
            sessions,
            accounts,
            devices,
            store,
            secure_cookie: config.secure_cookie,
        }
    }
}

/// Build the router with all routes and the cookie layer.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/auth", post(handlers::login).put(handlers::logout))
        .route("/session", get(handlers::get_session))
        .route("/refresh", put(handlers::refresh))
        .route("/user", post(handlers::create_user))
        .route(
            "/devices",
            get(handlers::list_devices)
                .post(handlers::upsert_devices)
                .delete(handlers::delete_devices),
        )
        .route(
            "/device",
            get(handlers::get_device_by_query).delete(handlers::delete_device_by_query),
        )
        .route(
            "/device/",
            get(handlers::get_device_by_query).delete(handlers::delete_device_by_query),
        )
        .route(
            "/device/{id}",
            get(handlers::get_device).delete(handlers::delete_device),
        )
        .route("/health", get(handlers::health))
        .layer(CookieManagerLayer::new())
        .with_state(state)
}
