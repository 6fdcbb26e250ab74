use axum::{extract::FromRequestParts, http::request::Parts};
use axum_extra::extract::CookieJar;

use crate::error::AppError;
use crate::state::AppState;
use crate::utils::jwt;

/// Name of the HttpOnly cookie holding the admin session token.
pub const SESSION_COOKIE: &str = "papers_session";

/// Proof of an admin session, taken from `Authorization: Bearer <token>`
/// or the session cookie.
///
/// Add this as a handler parameter to require admin access.
#[derive(Debug)]
pub struct AdminSession;

/// Pull the raw session token out of the request, header first.
pub fn session_token(parts: &Parts) -> Result<Option<String>, AppError> {
    if let Some(value) = parts.headers.get("Authorization") {
        let value = value.to_str().map_err(|_| AppError::TokenInvalid)?;
        let token = value
            .strip_prefix("Bearer ")
            .ok_or(AppError::TokenInvalid)?;
        return Ok(Some(token.to_owned()));
    }

    let jar = CookieJar::from_headers(&parts.headers);
    Ok(jar
        .get(SESSION_COOKIE)
        .map(|c| c.value().to_owned())
        .filter(|v| !v.is_empty()))
}

impl FromRequestParts<AppState> for AdminSession {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = session_token(parts)?.ok_or(AppError::TokenMissing)?;

        jwt::verify(&state.config.auth.token_secret, &token)
            .map_err(|_| AppError::TokenInvalid)?;

        Ok(AdminSession)
    }
}

/// Like [`AdminSession`] but never rejects; `None` for visitors.
pub struct MaybeAdmin(pub Option<AdminSession>);

impl FromRequestParts<AppState> for MaybeAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(MaybeAdmin(
            AdminSession::from_request_parts(parts, state).await.ok(),
        ))
    }
}
