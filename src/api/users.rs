use axum::{
    extract::State,
    routing::{get, post, put},
    Router,
};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::error::Result;
use crate::middleware::{AuthUser, QueryParams, ValidatedJson};
use crate::models::{AuthenticatedUser, PublicUser, Role, UserStatus};
use crate::response::{ApiResponse, OneOrMany};
use crate::services::{CreateUserParams, UpdateUserParams, UserService};
use crate::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(get_users).post(create_user).put(update_user))
        .route("/confirm-email", put(confirm_email))
        .route("/request-verification", post(request_verification))
        .route("/change-password", put(change_password))
        .route("/avatar", put(update_avatar))
        .route("/forgot-password", post(forgot_password))
        .route("/reset-password", post(reset_password))
}

fn service(state: &AppState) -> UserService {
    UserService::new(
        state.store.clone(),
        state.config.jwt.clone(),
        state.email.clone(),
    )
}

#[derive(Debug, Deserialize)]
pub struct UserQuery {
    pub id: Option<Uuid>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    #[validate(length(min = 1, max = 100))]
    pub full_name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 6, max = 128))]
    pub password: String,
    #[serde(default)]
    pub admin: bool,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    pub id: Uuid,
    #[validate(length(min = 1, max = 100))]
    pub full_name: Option<String>,
    #[validate(length(max = 1000))]
    pub bio: Option<String>,
    #[validate(length(min = 6, max = 128))]
    pub password: Option<String>,
    pub is_email_verified: Option<bool>,
    pub admin_type: Option<Role>,
    pub status: Option<UserStatus>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmEmailRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub verification_token: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct EmailRequest {
    #[validate(email)]
    pub email: String,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    #[validate(length(min = 1))]
    pub old_password: String,
    #[validate(length(min = 6, max = 128))]
    pub new_password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct AvatarRequest {
    #[validate(url)]
    pub avatar: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ResetPasswordRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub token: String,
    #[validate(length(min = 6, max = 128))]
    pub password: String,
}

async fn get_users(
    State(state): State<AppState>,
    _requester: AuthUser,
    QueryParams(query): QueryParams<UserQuery>,
) -> Result<ApiResponse<OneOrMany<PublicUser>>> {
    let service = service(&state);

    let data = match query.id {
        Some(id) => OneOrMany::One(Some(service.get_user(id).await?)),
        None => OneOrMany::Many(service.list_users().await?),
    };

    Ok(ApiResponse::ok(data))
}

async fn create_user(
    State(state): State<AppState>,
    requester: AuthUser,
    ValidatedJson(payload): ValidatedJson<CreateUserRequest>,
) -> Result<ApiResponse<PublicUser>> {
    let user = service(&state)
        .create_user(
            &requester,
            CreateUserParams {
                full_name: payload.full_name,
                email: payload.email,
                password: payload.password,
                admin: payload.admin,
            },
        )
        .await?;

    Ok(ApiResponse::with_message(user, "User created successfully"))
}

async fn update_user(
    State(state): State<AppState>,
    requester: AuthUser,
    ValidatedJson(payload): ValidatedJson<UpdateUserRequest>,
) -> Result<ApiResponse<PublicUser>> {
    let user = service(&state)
        .update_user(
            &requester,
            UpdateUserParams {
                id: payload.id,
                full_name: payload.full_name,
                bio: payload.bio,
                password: payload.password,
                is_email_verified: payload.is_email_verified,
                role: payload.admin_type,
                status: payload.status,
            },
        )
        .await?;

    Ok(ApiResponse::with_message(user, "Update successful"))
}

async fn confirm_email(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<ConfirmEmailRequest>,
) -> Result<ApiResponse<PublicUser>> {
    let user = service(&state)
        .confirm_email(&payload.email, &payload.verification_token)
        .await?;

    Ok(ApiResponse::with_message(user, "Email successfully confirmed"))
}

async fn request_verification(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<EmailRequest>,
) -> Result<ApiResponse<PublicUser>> {
    let user = service(&state).request_verification(&payload.email).await?;
    Ok(ApiResponse::with_message(user, "Verification email sent"))
}

async fn change_password(
    State(state): State<AppState>,
    requester: AuthUser,
    ValidatedJson(payload): ValidatedJson<ChangePasswordRequest>,
) -> Result<ApiResponse<AuthenticatedUser>> {
    let user = service(&state)
        .change_password(&requester, &payload.old_password, &payload.new_password)
        .await?;

    Ok(ApiResponse::with_message(user, "Password changed successfully"))
}

async fn update_avatar(
    State(state): State<AppState>,
    requester: AuthUser,
    ValidatedJson(payload): ValidatedJson<AvatarRequest>,
) -> Result<ApiResponse<PublicUser>> {
    let user = service(&state)
        .update_avatar(&requester, &payload.avatar)
        .await?;
    Ok(ApiResponse::with_message(user, "Avatar updated"))
}

async fn forgot_password(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<EmailRequest>,
) -> Result<ApiResponse<PublicUser>> {
    let user = service(&state).forgot_password(&payload.email).await?;
    Ok(ApiResponse::with_message(user, "Reset email sent successfully"))
}

async fn reset_password(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<ResetPasswordRequest>,
) -> Result<ApiResponse<PublicUser>> {
    let user = service(&state)
        .reset_password(&payload.email, &payload.token, &payload.password)
        .await?;

    Ok(ApiResponse::with_message(user, "Password reset successfully"))
}
