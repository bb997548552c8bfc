//! Ownership and privilege checks shared by every service that mutates
//! user-owned resources.

use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::models::{Article, Comment, Role, User};

use super::AuthUser;

/// A resource with a single owning user.
pub trait Ownable {
    fn owner_id(&self) -> Uuid;
}

impl Ownable for Article {
    fn owner_id(&self) -> Uuid {
        self.author_id
    }
}

impl Ownable for Comment {
    fn owner_id(&self) -> Uuid {
        self.author_id
    }
}

impl Ownable for User {
    fn owner_id(&self) -> Uuid {
        self.id
    }
}

impl AuthUser {
    pub fn is_super(&self) -> bool {
        self.role == Role::Super
    }

    /// Owner or super passes; everyone else gets 403.
    pub fn authorize(&self, resource: &impl Ownable) -> Result<()> {
        if resource.owner_id() == self.id || self.is_super() {
            return Ok(());
        }

        tracing::debug!(
            requester = %self.id,
            owner = %resource.owner_id(),
            "ownership check failed"
        );
        Err(AppError::forbidden())
    }

    pub fn require_role(&self, role: Role) -> Result<()> {
        if self.role >= role {
            Ok(())
        } else {
            Err(AppError::forbidden())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn user(role: Role) -> User {
        let now = Utc::now();
        User {
            id: Uuid::new_v4(),
            full_name: "Test".to_string(),
            email: "test@example.com".to_string(),
            password_hash: String::new(),
            bio: None,
            avatar: None,
            status: "enabled".to_string(),
            role: role.as_str().to_string(),
            is_email_verified: true,
            verification_token: None,
            forgot_password_token: None,
            token_version: 0,
            last_login: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn requester(role: Role) -> AuthUser {
        let user = user(role);
        AuthUser {
            id: user.id,
            email: user.email.clone(),
            role,
            user,
        }
    }

    fn article_by(author_id: Uuid) -> Article {
        let now = Utc::now();
        Article {
            id: Uuid::new_v4(),
            title: "t".to_string(),
            slug: "t".to_string(),
            body: "b".to_string(),
            author_id,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn owner_passes() {
        let me = requester(Role::User);
        assert!(me.authorize(&article_by(me.id)).is_ok());
        assert!(me.authorize(&me.user).is_ok());
    }

    #[test]
    fn stranger_is_forbidden() {
        let me = requester(Role::Admin);
        let err = me.authorize(&article_by(Uuid::new_v4())).unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
    }

    #[test]
    fn super_passes_on_anything() {
        let root = requester(Role::Super);
        assert!(root.authorize(&article_by(Uuid::new_v4())).is_ok());
        assert!(root.authorize(&user(Role::User)).is_ok());
    }

    #[test]
    fn role_levels() {
        let admin = requester(Role::Admin);
        assert!(admin.require_role(Role::User).is_ok());
        assert!(admin.require_role(Role::Admin).is_ok());
        assert!(admin.require_role(Role::Super).is_err());
    }
}
