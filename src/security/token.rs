use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use rand::{distributions::Alphanumeric, Rng};
use serde::{Deserialize, Serialize};
use subtle::ConstantTimeEq;

use crate::config::JwtConfig;
use crate::error::{AppError, Result};
use crate::models::{Role, User};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
    pub sub: String, // User ID
    pub email: String,
    pub full_name: String,
    pub role: Role,
    /// Must match `users.token_version` at verification time.
    pub ver: i32,
    pub iat: usize,
    pub exp: usize,
}

pub fn issue_token(user: &User, config: &JwtConfig) -> Result<String> {
    let now = Utc::now();
    let exp = now + Duration::hours(config.expiry_hours as i64);

    let claims = Claims {
        sub: user.id.to_string(),
        email: user.email.clone(),
        full_name: user.full_name.clone(),
        role: user.role(),
        ver: user.token_version,
        iat: now.timestamp() as usize,
        exp: exp.timestamp() as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(anyhow::anyhow!("Token generation failed: {}", e)))
}

/// Checks signature and expiry. Anything wrong with the token is `Unauthorized`.
pub fn decode_token(token: &str, secret: &str) -> Result<Claims> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| {
        tracing::debug!("token rejected: {}", e);
        AppError::Unauthorized
    })
}

/// Random one-time token for email verification and password resets.
pub fn generate_secret_token() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(32)
        .map(char::from)
        .collect()
}

/// Compares a presented one-time token against the stored one in constant time.
/// A missing stored token never matches.
pub fn secret_token_matches(stored: Option<&str>, presented: &str) -> bool {
    match stored {
        Some(stored) => stored.as_bytes().ct_eq(presented.as_bytes()).into(),
        None => false,
    }
}
