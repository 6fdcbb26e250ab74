use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum_extra::extract::CookieJar;
use axum_extra::extract::cookie::{Cookie, SameSite};
use common::catalog::ReconcileReport;
use tracing::{info, instrument, warn};

use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::{AdminSession, MaybeAdmin, SESSION_COOKIE};
use crate::extractors::json::AppJson;
use crate::models::auth::{LoginRequest, LoginResponse, SessionResponse, validate_login_request};
use crate::state::AppState;
use crate::utils::{hash, jwt};

#[utoipa::path(
    post,
    path = "/api/v1/admin/login",
    tag = "Admin",
    operation_id = "login",
    summary = "Start an admin session",
    description = "Checks the shared upload password, ignoring surrounding whitespace. \
        On success returns a session token and also sets it as the HttpOnly \
        `papers_session` cookie.",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in", body = LoginResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Wrong password (INVALID_CREDENTIALS)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, jar, payload))]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    AppJson(payload): AppJson<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_login_request(&payload)?;

    // Surrounding whitespace is ignored.
    let matches = hash::verify_password(payload.password.trim(), &state.password_hash)
        .map_err(|e| AppError::Internal(format!("Password verify error: {e}")))?;
    if !matches {
        warn!("Admin login rejected");
        return Err(AppError::InvalidCredentials);
    }

    let auth = &state.config.auth;
    let (token, expires_at) = jwt::sign(&auth.token_secret, auth.session_hours)
        .map_err(|e| AppError::Internal(format!("Token error: {e}")))?;

    let cookie = Cookie::build((SESSION_COOKIE, token.clone()))
        .http_only(true)
        .same_site(SameSite::Lax)
        .path("/")
        .max_age(time::Duration::hours(auth.session_hours));

    info!(%expires_at, "Admin session started");
    Ok((jar.add(cookie), Json(LoginResponse { token, expires_at })))
}

#[utoipa::path(
    post,
    path = "/api/v1/admin/logout",
    tag = "Admin",
    operation_id = "logout",
    summary = "End the admin session",
    description = "Clears the session cookie. Bearer tokens stay valid until they expire.",
    responses(
        (status = 204, description = "Logged out"),
    ),
)]
pub async fn logout(jar: CookieJar) -> impl IntoResponse {
    let jar = jar.remove(Cookie::build(SESSION_COOKIE).path("/"));
    (jar, StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/api/v1/admin/session",
    tag = "Admin",
    operation_id = "session",
    summary = "Check for an admin session",
    responses(
        (status = 200, description = "Session state", body = SessionResponse),
    ),
)]
pub async fn session(MaybeAdmin(session): MaybeAdmin) -> Json<SessionResponse> {
    Json(SessionResponse {
        is_admin: session.is_some(),
    })
}

#[utoipa::path(
    get,
    path = "/api/v1/admin/reconcile",
    tag = "Admin",
    operation_id = "reconcile",
    summary = "Report drift between records and files",
    description = "Lists records whose file is missing and files no record points at. \
        Read-only: nothing is repaired.",
    responses(
        (status = 200, description = "Drift report", body = ReconcileReport),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, _session))]
pub async fn reconcile(
    _session: AdminSession,
    State(state): State<AppState>,
) -> Result<Json<ReconcileReport>, AppError> {
    let report = state.catalog.reconcile().await?;
    if !report.is_consistent() {
        warn!(
            missing = report.missing_files.len(),
            orphaned = report.orphaned_files.len(),
            "Catalog drift detected"
        );
    }
    Ok(Json(report))
}
