use std::sync::Arc;

use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::middleware::AuthUser;
use crate::models::Follow;
use crate::repository::Store;

pub struct FollowService {
    store: Arc<dyn Store>,
}

impl FollowService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn find(&self, requester: &AuthUser, following_id: Uuid) -> Result<Option<Follow>> {
        self.store.find_follow(requester.id, following_id).await
    }

    pub async fn list(&self, requester: &AuthUser) -> Result<Vec<Follow>> {
        self.store.list_follows(requester.id).await
    }

    pub async fn follow(&self, requester: &AuthUser, author_id: Uuid) -> Result<Follow> {
        if self.store.find_user(author_id).await?.is_none() {
            return Err(AppError::UserNotFound);
        }

        if author_id == requester.id {
            return Err(AppError::Forbidden("You cannot follow yourself".to_string()));
        }

        let follow = self
            .store
            .insert_follow(requester.id, author_id)
            .await?
            .ok_or_else(|| AppError::Forbidden("Already following this author".to_string()))?;

        tracing::debug!(author = %requester.id, following = %author_id, "follow added");
        Ok(follow)
    }

    pub async fn unfollow(&self, requester: &AuthUser, author_id: Uuid) -> Result<Follow> {
        self.store
            .delete_follow(requester.id, author_id)
            .await?
            .ok_or_else(|| AppError::Forbidden("You are not following this author".to_string()))
    }
}
