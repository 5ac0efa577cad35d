//! Session check in front of protected routes.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use tower_cookies::Cookies;

use super::AppState;
use super::error::ApiError;
use crate::constants::SESSION_COOKIE;
use crate::session::Session;

/// Extractor that admits only requests carrying a live session cookie.
///
/// Any handler taking `Authenticated` never runs for a request whose session
/// fails validation; the validation error is returned as the response.
#[derive(Clone, Debug)]
pub struct Authenticated(pub Session);

impl FromRequestParts<AppState> for Authenticated {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let cookies = Cookies::from_request_parts(parts, state)
            .await
            .map_err(|(_, msg)| ApiError::internal(msg))?;

        let token = cookies.get(SESSION_COOKIE).map(|c| c.value().to_string());
        match state.sessions.validate(token.as_deref()).await {
            Ok(session) => Ok(Authenticated(session)),
            Err(e) => {
                tracing::warn!(path = %parts.uri.path(), "Rejected request: {e}");
                Err(e.into())
            }
        }
    }
}
