// User service - profile management, email verification and password flows
use std::sync::Arc;

use uuid::Uuid;

use crate::config::JwtConfig;
use crate::error::{AppError, Result};
use crate::middleware::AuthUser;
use crate::models::{
    AuthenticatedUser, NewUser, PublicUser, Role, User, UserChanges, UserStatus,
};
use crate::repository::Store;
use crate::security::{
    generate_secret_token, hash_password, issue_token, secret_token_matches, verify_password,
};

use super::{log_send_failure, EmailService};

pub struct UserService {
    store: Arc<dyn Store>,
    jwt: JwtConfig,
    email: EmailService,
}

#[derive(Debug, Clone)]
pub struct CreateUserParams {
    pub full_name: String,
    pub email: String,
    pub password: String,
    pub admin: bool,
}

/// Fields a requester may change on a profile. `is_email_verified`,
/// `role` and `status` only take effect for super users.
#[derive(Debug, Clone, Default)]
pub struct UpdateUserParams {
    pub id: Uuid,
    pub full_name: Option<String>,
    pub bio: Option<String>,
    pub password: Option<String>,
    pub is_email_verified: Option<bool>,
    pub role: Option<Role>,
    pub status: Option<UserStatus>,
}

impl UserService {
    pub fn new(store: Arc<dyn Store>, jwt: JwtConfig, email: EmailService) -> Self {
        Self { store, jwt, email }
    }

    async fn user_by_email(&self, email: &str) -> Result<User> {
        self.store
            .find_user_by_email(&email.trim().to_lowercase())
            .await?
            .ok_or(AppError::UserNotFound)
    }

    async fn apply(&self, id: Uuid, changes: UserChanges) -> Result<User> {
        self.store
            .update_user(id, changes)
            .await?
            .ok_or(AppError::UserNotFound)
    }

    pub async fn get_user(&self, id: Uuid) -> Result<PublicUser> {
        let user = self.store.find_user(id).await?.ok_or(AppError::UserNotFound)?;
        Ok(PublicUser::from(user))
    }

    pub async fn list_users(&self) -> Result<Vec<PublicUser>> {
        let users = self.store.list_users().await?;
        Ok(users.iter().map(PublicUser::from).collect())
    }

    /// Creating an admin account requires a super requester.
    pub async fn create_user(
        &self,
        requester: &AuthUser,
        params: CreateUserParams,
    ) -> Result<PublicUser> {
        let role = if params.admin {
            requester.require_role(Role::Super)?;
            Role::Admin
        } else {
            Role::User
        };

        let email = params.email.trim().to_lowercase();
        if self.store.find_user_by_email(&email).await?.is_some() {
            return Err(AppError::UserExists);
        }

        let token = generate_secret_token();
        let user = self
            .store
            .insert_user(NewUser {
                full_name: params.full_name.trim().to_string(),
                email,
                password_hash: hash_password(&params.password)?,
                role,
                verification_token: Some(token.clone()),
            })
            .await?;

        tracing::info!(
            user_id = %user.id,
            created_by = %requester.id,
            role = role.as_str(),
            "user created"
        );

        log_send_failure(
            self.email
                .send_registration(&user.email, &user.full_name, &token)
                .await,
            &user.email,
        );

        Ok(PublicUser::from(user))
    }

    pub async fn update_user(
        &self,
        requester: &AuthUser,
        params: UpdateUserParams,
    ) -> Result<PublicUser> {
        let user = self
            .store
            .find_user(params.id)
            .await?
            .ok_or(AppError::UserNotFound)?;

        requester.authorize(&user)?;

        let mut changes = UserChanges {
            full_name: params.full_name.map(|n| n.trim().to_string()),
            bio: params.bio,
            ..Default::default()
        };

        if let Some(password) = params.password {
            changes.password_hash = Some(hash_password(&password)?);
            changes.bump_token_version = true;
        }

        if requester.is_super() {
            changes.is_email_verified = params.is_email_verified;
            changes.role = params.role;
            changes.status = params.status;
        } else if params.is_email_verified.is_some()
            || params.role.is_some()
            || params.status.is_some()
        {
            tracing::debug!(requester = %requester.id, "ignoring privileged profile fields");
        }

        let updated = self.apply(user.id, changes).await?;
        Ok(PublicUser::from(updated))
    }

    pub async fn confirm_email(&self, email: &str, verification_token: &str) -> Result<PublicUser> {
        let user = self.user_by_email(email).await?;

        if !secret_token_matches(user.verification_token.as_deref(), verification_token) {
            return Err(AppError::InvalidToken("Invalid verification token".to_string()));
        }

        // confirming never lifts a block
        let status = if user.is_blocked() {
            UserStatus::Blocked
        } else {
            UserStatus::Enabled
        };

        let updated = self
            .apply(
                user.id,
                UserChanges {
                    is_email_verified: Some(true),
                    status: Some(status),
                    verification_token: Some(None),
                    ..Default::default()
                },
            )
            .await?;

        log_send_failure(
            self.email
                .send_email_confirmed(&updated.email, &updated.full_name)
                .await,
            &updated.email,
        );

        Ok(PublicUser::from(updated))
    }

    pub async fn request_verification(&self, email: &str) -> Result<PublicUser> {
        let user = self.user_by_email(email).await?;

        if user.is_email_verified {
            return Err(AppError::Forbidden(format!(
                "{} is already verified",
                user.email
            )));
        }

        let token = generate_secret_token();
        let updated = self
            .apply(
                user.id,
                UserChanges {
                    verification_token: Some(Some(token.clone())),
                    ..Default::default()
                },
            )
            .await?;

        log_send_failure(
            self.email
                .send_registration(&updated.email, &updated.full_name, &token)
                .await,
            &updated.email,
        );

        Ok(PublicUser::from(updated))
    }

    /// Invalidates every token issued so far and hands back a fresh one.
    pub async fn change_password(
        &self,
        requester: &AuthUser,
        old_password: &str,
        new_password: &str,
    ) -> Result<AuthenticatedUser> {
        if !verify_password(old_password, &requester.user.password_hash)? {
            return Err(AppError::WrongCredentials);
        }

        let updated = self
            .apply(
                requester.id,
                UserChanges {
                    password_hash: Some(hash_password(new_password)?),
                    bump_token_version: true,
                    ..Default::default()
                },
            )
            .await?;

        tracing::info!(user_id = %updated.id, "password changed");

        let token = issue_token(&updated, &self.jwt)?;
        Ok(AuthenticatedUser {
            user: PublicUser::from(updated),
            token,
        })
    }

    pub async fn update_avatar(&self, requester: &AuthUser, avatar: &str) -> Result<PublicUser> {
        let avatar = avatar.trim();
        if !(avatar.starts_with("http://") || avatar.starts_with("https://")) {
            return Err(AppError::invalid_params("Avatar must be an http(s) URL"));
        }

        let updated = self
            .apply(
                requester.id,
                UserChanges {
                    avatar: Some(avatar.to_string()),
                    ..Default::default()
                },
            )
            .await?;
        Ok(PublicUser::from(updated))
    }

    pub async fn forgot_password(&self, email: &str) -> Result<PublicUser> {
        let user = self.user_by_email(email).await?;

        let token = generate_secret_token();
        let updated = self
            .apply(
                user.id,
                UserChanges {
                    forgot_password_token: Some(Some(token.clone())),
                    ..Default::default()
                },
            )
            .await?;

        log_send_failure(
            self.email
                .send_forgot_password(&updated.email, &updated.full_name, &token)
                .await,
            &updated.email,
        );

        Ok(PublicUser::from(updated))
    }

    pub async fn reset_password(
        &self,
        email: &str,
        token: &str,
        password: &str,
    ) -> Result<PublicUser> {
        let user = self.user_by_email(email).await?;

        if !secret_token_matches(user.forgot_password_token.as_deref(), token) {
            return Err(AppError::BadRequest(
                "Wrong token, try resetting your password again".to_string(),
            ));
        }

        let updated = self
            .apply(
                user.id,
                UserChanges {
                    password_hash: Some(hash_password(password)?),
                    forgot_password_token: Some(None),
                    bump_token_version: true,
                    ..Default::default()
                },
            )
            .await?;

        tracing::info!(user_id = %updated.id, "password reset");

        log_send_failure(
            self.email
                .send_password_reset(&updated.email, &updated.full_name)
                .await,
            &updated.email,
        );

        Ok(PublicUser::from(updated))
    }
}
