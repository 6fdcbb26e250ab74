use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Request body for admin login.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct LoginRequest {
    /// The shared upload password.
    #[schema(example = "odisha123")]
    pub password: String,
}

pub fn validate_login_request(payload: &LoginRequest) -> Result<(), AppError> {
    if payload.password.trim().is_empty() {
        return Err(AppError::Validation("Password must not be empty".into()));
    }
    Ok(())
}

/// Successful login response. The token is also set as a session cookie.
#[derive(Serialize, utoipa::ToSchema)]
pub struct LoginResponse {
    /// HS256 session token for the `Authorization: Bearer` header.
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct SessionResponse {
    /// Whether the request carries a valid admin session.
    pub is_admin: bool,
}
