//! Bearer-token authentication as an extractor.
//!
//! Handlers that take an [`AuthUser`] argument are protected; the rest are
//! public. The token may arrive in `x-access-token` or `Authorization`, and
//! in both cases must carry the `Bearer ` prefix.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{Role, User};
use crate::security::decode_token;
use crate::AppState;

const ACCESS_TOKEN_HEADER: &str = "x-access-token";

/// The verified requester, loaded fresh from the store.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: Uuid,
    pub email: String,
    pub role: Role,
    pub user: User,
}

fn bearer_token(parts: &Parts) -> Result<&str, AppError> {
    let raw = parts
        .headers
        .get(ACCESS_TOKEN_HEADER)
        .or_else(|| parts.headers.get(axum::http::header::AUTHORIZATION))
        .ok_or(AppError::MissingToken)?
        .to_str()
        .map_err(|_| AppError::Unauthorized)?;

    let token = raw
        .strip_prefix("Bearer ")
        .ok_or(AppError::Unauthorized)?
        .trim();

    if token.is_empty() {
        return Err(AppError::MissingToken);
    }

    Ok(token)
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?;
        let claims = decode_token(token, &state.config.jwt.secret)?;

        let id = Uuid::parse_str(&claims.sub).map_err(|_| AppError::Unauthorized)?;

        let user = state
            .store
            .find_user(id)
            .await?
            .ok_or(AppError::Unauthorized)?;

        if user.is_blocked() {
            tracing::warn!(user_id = %id, "blocked user presented a valid token");
            return Err(AppError::Unauthorized);
        }

        // password changed since the token was issued
        if claims.ver != user.token_version {
            return Err(AppError::Unauthorized);
        }

        Ok(AuthUser {
            id,
            email: user.email.clone(),
            role: user.role(),
            user,
        })
    }
}
