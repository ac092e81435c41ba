use std::sync::Arc;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::extract::CookieJar;

use crate::auth::token::validate_session_token;
use crate::error::ChatError;

use super::app_state::AppState;

/// Name of the session cookie set on login.
pub const SESSION_COOKIE: &str = "clublit_session";

/// Extractor that validates the session JWT from the `clublit_session` cookie.
/// Use this in any handler that requires authentication.
pub struct AuthUser {
    pub user_id: String,
}

impl FromRequestParts<Arc<AppState>> for AuthUser {
    type Rejection = ChatError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_request_parts(parts, state)
            .await
            .unwrap(); // CookieJar extraction is infallible

        let cookie = jar
            .get(SESSION_COOKIE)
            .ok_or_else(|| ChatError::unauthorized("not authenticated"))?;

        let claims = validate_session_token(cookie.value(), &state.auth_config.jwt_secret)
            .map_err(|_| ChatError::unauthorized("invalid or expired session"))?;

        Ok(AuthUser {
            user_id: claims.sub,
        })
    }
}
