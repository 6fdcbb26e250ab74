use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

/// Subject claim carried by every admin session token.
pub const ADMIN_SUBJECT: &str = "admin";

/// JWT Claims structure.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: usize, // Expiration timestamp
}

/// Sign an admin session token valid for `hours`.
pub fn sign(secret: &str, hours: i64) -> Result<(String, DateTime<Utc>)> {
    let expires_at = Utc::now()
        .checked_add_signed(Duration::hours(hours))
        .context("session expiry out of range")?;

    let claims = Claims {
        sub: ADMIN_SUBJECT.to_owned(),
        exp: expires_at.timestamp() as usize,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;

    Ok((token, expires_at))
}

/// Verify and decode an admin session token.
pub fn verify(secret: &str, token: &str) -> Result<Claims> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )?;
    anyhow::ensure!(
        token_data.claims.sub == ADMIN_SUBJECT,
        "unexpected token subject"
    );
    Ok(token_data.claims)
}
