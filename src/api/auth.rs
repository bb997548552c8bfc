use axum::{extract::State, routing::post, Router};
use serde::Deserialize;
use validator::Validate;

use crate::error::Result;
use crate::middleware::ValidatedJson;
use crate::models::{AuthenticatedUser, PublicUser};
use crate::response::ApiResponse;
use crate::services::{AuthService, RegisterParams};
use crate::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", post(register))
        .route("/login", post(login))
}

fn service(state: &AppState) -> AuthService {
    AuthService::new(
        state.store.clone(),
        state.config.jwt.clone(),
        state.email.clone(),
    )
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 100))]
    pub full_name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 6, max = 128))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

async fn register(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<RegisterRequest>,
) -> Result<ApiResponse<PublicUser>> {
    let user = service(&state)
        .register(RegisterParams {
            full_name: payload.full_name,
            email: payload.email,
            password: payload.password,
        })
        .await?;

    Ok(ApiResponse::with_message(user, "User created successfully"))
}

async fn login(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> Result<ApiResponse<AuthenticatedUser>> {
    let user = service(&state)
        .login(&payload.email, &payload.password)
        .await?;

    Ok(ApiResponse::with_message(user, "Login successful"))
}
