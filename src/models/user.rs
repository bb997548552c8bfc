use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Privilege levels, ordered from least to most privileged.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
    Super,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
            Role::Super => "super",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "user" => Some(Role::User),
            "admin" => Some(Role::Admin),
            "super" => Some(Role::Super),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    Pending,
    Enabled,
    Blocked,
}

impl UserStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserStatus::Pending => "pending",
            UserStatus::Enabled => "enabled",
            UserStatus::Blocked => "blocked",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(UserStatus::Pending),
            "enabled" => Some(UserStatus::Enabled),
            "blocked" => Some(UserStatus::Blocked),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    pub password_hash: String,
    pub bio: Option<String>,
    pub avatar: Option<String>,
    pub status: String,
    pub role: String,
    pub is_email_verified: bool,
    pub verification_token: Option<String>,
    pub forgot_password_token: Option<String>,
    /// Bumped on every password change; tokens carrying an older value are rejected.
    pub token_version: i32,
    pub last_login: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn role(&self) -> Role {
        Role::parse(&self.role).unwrap_or(Role::User)
    }

    pub fn status(&self) -> UserStatus {
        UserStatus::parse(&self.status).unwrap_or(UserStatus::Pending)
    }

    pub fn is_blocked(&self) -> bool {
        self.status() == UserStatus::Blocked
    }
}

/// What clients get to see of a user.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    pub bio: Option<String>,
    pub avatar: Option<String>,
    pub status: UserStatus,
    pub role: Role,
    pub is_email_verified: bool,
    pub last_login: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&User> for PublicUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            full_name: user.full_name.clone(),
            email: user.email.clone(),
            bio: user.bio.clone(),
            avatar: user.avatar.clone(),
            status: user.status(),
            role: user.role(),
            is_email_verified: user.is_email_verified,
            last_login: user.last_login,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

impl From<User> for PublicUser {
    fn from(user: User) -> Self {
        PublicUser::from(&user)
    }
}

/// Login response: the public user plus a signed token.
#[derive(Debug, Serialize)]
pub struct AuthenticatedUser {
    #[serde(flatten)]
    pub user: PublicUser,
    pub token: String,
}

/// Compact author info embedded in articles and comments.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorSummary {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    pub avatar: Option<String>,
}

impl From<&User> for AuthorSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            full_name: user.full_name.clone(),
            email: user.email.clone(),
            avatar: user.avatar.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub full_name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub verification_token: Option<String>,
}

/// Partial update. `None` leaves a column untouched; for the nullable
/// token columns `Some(None)` clears them.
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub full_name: Option<String>,
    pub bio: Option<String>,
    pub avatar: Option<String>,
    pub status: Option<UserStatus>,
    pub role: Option<Role>,
    pub is_email_verified: Option<bool>,
    pub verification_token: Option<Option<String>>,
    pub forgot_password_token: Option<Option<String>>,
    pub password_hash: Option<String>,
    pub bump_token_version: bool,
    pub last_login: Option<DateTime<Utc>>,
}
