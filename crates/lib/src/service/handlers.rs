//! Route handlers.

use axum::Json;
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tower_cookies::{Cookie, Cookies};

use super::AppState;
use super::error::ApiError;
use super::gate::Authenticated;
use crate::constants::SESSION_COOKIE;
use crate::device::DeviceBatch;
use crate::session::Session;
use crate::user::Credentials;

type ApiResult<T> = Result<T, ApiError>;

/// Session as shown to its holder. The token travels only in the cookie.
#[derive(Serialize)]
pub(super) struct SessionView {
    username: String,
    expiry: DateTime<Utc>,
}

impl From<&Session> for SessionView {
    fn from(session: &Session) -> Self {
        Self {
            username: session.username.clone(),
            expiry: session.expiry,
        }
    }
}

#[derive(Deserialize)]
pub(super) struct IdQuery {
    id: Option<String>,
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    backend: &'static str,
}

fn session_cookie(session: &Session, secure: bool) -> Cookie<'static> {
    let mut cookie = Cookie::new(SESSION_COOKIE, session.token.clone());
    cookie.set_http_only(true);
    cookie.set_path("/");
    cookie.set_secure(secure);
    if let Ok(expires) = time::OffsetDateTime::from_unix_timestamp(session.expiry.timestamp()) {
        cookie.set_expires(expires);
    }
    cookie
}

fn presented_token(cookies: &Cookies) -> Option<String> {
    cookies.get(SESSION_COOKIE).map(|c| c.value().to_string())
}

// ============================================================================
// Session Handlers
// ============================================================================

/// Handler for POST /auth - Log in
pub(super) async fn login(
    State(state): State<AppState>,
    cookies: Cookies,
    payload: Result<Json<Credentials>, JsonRejection>,
) -> ApiResult<Response> {
    let Json(creds) = payload?;
    let presented = presented_token(&cookies);

    let session = state
        .sessions
        .login(&creds.username, &creds.password, presented.as_deref())
        .await?;

    cookies.add(session_cookie(&session, state.secure_cookie));
    Ok(Json(SessionView::from(&session)).into_response())
}

/// Handler for PUT /auth - Log out
///
/// The cookie is cleared whether or not the session was still live.
pub(super) async fn logout(State(state): State<AppState>, cookies: Cookies) -> ApiResult<StatusCode> {
    let presented = presented_token(&cookies);
    let result = state.sessions.logout(presented.as_deref()).await;

    let mut removal = Cookie::from(SESSION_COOKIE);
    removal.set_path("/");
    cookies.remove(removal);

    result?;
    Ok(StatusCode::OK)
}

/// Handler for GET /session - Show the current session
pub(super) async fn get_session(Authenticated(session): Authenticated) -> Json<SessionView> {
    Json(SessionView::from(&session))
}

/// Handler for PUT /refresh - Swap the session for a fresh one
pub(super) async fn refresh(
    State(state): State<AppState>,
    cookies: Cookies,
    Authenticated(session): Authenticated,
) -> ApiResult<Json<SessionView>> {
    let renewed = state.sessions.renew(Some(&session.token)).await?;
    cookies.add(session_cookie(&renewed, state.secure_cookie));
    Ok(Json(SessionView::from(&renewed)))
}

// ============================================================================
// Account Handlers
// ============================================================================

/// Handler for POST /user - Register an account
pub(super) async fn create_user(
    State(state): State<AppState>,
    payload: Result<Json<Credentials>, JsonRejection>,
) -> ApiResult<StatusCode> {
    let Json(creds) = payload?;
    state
        .accounts
        .create_user(&creds.username, &creds.password)
        .await?;
    Ok(StatusCode::OK)
}

// ============================================================================
// Device Handlers
// ============================================================================

/// Handler for GET /devices
pub(super) async fn list_devices(
    State(state): State<AppState>,
    _auth: Authenticated,
) -> ApiResult<Json<DeviceBatch>> {
    let devices = state.devices.find().await?;
    Ok(Json(devices.into()))
}

/// Handler for POST /devices - Batch upsert
pub(super) async fn upsert_devices(
    State(state): State<AppState>,
    _auth: Authenticated,
    payload: Result<Json<DeviceBatch>, JsonRejection>,
) -> ApiResult<StatusCode> {
    let Json(batch) = payload?;
    state.devices.upsert(&batch.devices).await?;
    Ok(StatusCode::OK)
}

/// Handler for DELETE /devices
pub(super) async fn delete_devices(
    State(state): State<AppState>,
    _auth: Authenticated,
) -> ApiResult<StatusCode> {
    state.devices.delete_all().await?;
    Ok(StatusCode::OK)
}

/// Handler for GET /device/{id}
pub(super) async fn get_device(
    State(state): State<AppState>,
    _auth: Authenticated,
    id: Result<Path<String>, PathRejection>,
) -> ApiResult<Json<DeviceBatch>> {
    let Path(id) = id?;
    let devices = state.devices.find_by_id(&id).await?;
    Ok(Json(devices.into()))
}

/// Handler for GET /device?id=...
pub(super) async fn get_device_by_query(
    State(state): State<AppState>,
    auth: Authenticated,
    query: Result<Query<IdQuery>, QueryRejection>,
) -> ApiResult<Json<DeviceBatch>> {
    let Query(query) = query?;
    get_device(State(state), auth, Ok(Path(query.id.unwrap_or_default()))).await
}

/// Handler for DELETE /device/{id}
pub(super) async fn delete_device(
    State(state): State<AppState>,
    _auth: Authenticated,
    id: Result<Path<String>, PathRejection>,
) -> ApiResult<StatusCode> {
    let Path(id) = id?;
    state.devices.delete_one(&id).await?;
    Ok(StatusCode::OK)
}

/// Handler for DELETE /device?id=...
pub(super) async fn delete_device_by_query(
    State(state): State<AppState>,
    auth: Authenticated,
    query: Result<Query<IdQuery>, QueryRejection>,
) -> ApiResult<StatusCode> {
    let Query(query) = query?;
    delete_device(State(state), auth, Ok(Path(query.id.unwrap_or_default()))).await
}

// ============================================================================
// Health
// ============================================================================

/// Handler for GET /health
pub(super) async fn health(State(state): State<AppState>) -> Response {
    let backend = state.store.kind();
    match state.store.ping().await {
        Ok(()) => Json(HealthResponse {
            status: "healthy",
            backend,
        })
        .into_response(),
        Err(e) => {
            tracing::error!("Health check failed: {e}");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthResponse {
                    status: "unhealthy",
                    backend,
                }),
            )
                .into_response()
        }
    }
}
