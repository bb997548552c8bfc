// Auth service - registration and login
use std::sync::Arc;

use chrono::Utc;

use crate::config::JwtConfig;
use crate::error::{AppError, Result};
use crate::models::{AuthenticatedUser, NewUser, PublicUser, Role, UserChanges};
use crate::repository::Store;
use crate::security::{generate_secret_token, hash_password, issue_token, verify_password};

use super::{log_send_failure, EmailService};

pub struct AuthService {
    store: Arc<dyn Store>,
    jwt: JwtConfig,
    email: EmailService,
}

#[derive(Debug, Clone)]
pub struct RegisterParams {
    pub full_name: String,
    pub email: String,
    pub password: String,
}

impl AuthService {
    pub fn new(store: Arc<dyn Store>, jwt: JwtConfig, email: EmailService) -> Self {
        Self { store, jwt, email }
    }

    /// Creates a pending account and mails its verification token.
    pub async fn register(&self, params: RegisterParams) -> Result<PublicUser> {
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
                role: Role::User,
                verification_token: Some(token.clone()),
            })
            .await?;

        tracing::info!(user_id = %user.id, "user registered");

        log_send_failure(
            self.email
                .send_registration(&user.email, &user.full_name, &token)
                .await,
            &user.email,
        );

        Ok(PublicUser::from(user))
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<AuthenticatedUser> {
        let email = email.trim().to_lowercase();

        let user = self
            .store
            .find_user_by_email(&email)
            .await?
            .ok_or(AppError::UserNotFound)?;

        if !verify_password(password, &user.password_hash)? {
            tracing::debug!(user_id = %user.id, "wrong password");
            return Err(AppError::WrongCredentials);
        }

        if user.is_blocked() {
            return Err(AppError::Forbidden("Your account has been blocked".to_string()));
        }

        let user = self
            .store
            .update_user(
                user.id,
                UserChanges {
                    last_login: Some(Utc::now()),
                    ..Default::default()
                },
            )
            .await?
            .ok_or(AppError::UserNotFound)?;

        let token = issue_token(&user, &self.jwt)?;

        Ok(AuthenticatedUser {
            user: PublicUser::from(user),
            token,
        })
    }
}
