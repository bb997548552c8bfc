use std::sync::Arc;

use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::middleware::AuthUser;
use crate::models::Tag;
use crate::repository::Store;

pub struct TagService {
    store: Arc<dyn Store>,
}

impl TagService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn get_tag(&self, id: Uuid) -> Result<Tag> {
        self.store
            .find_tag(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Tag".to_string()))
    }

    pub async fn search_tags(&self, term: &str) -> Result<Vec<Tag>> {
        self.store.search_tags(term.trim()).await
    }

    pub async fn list_tags(&self) -> Result<Vec<Tag>> {
        self.store.list_tags().await
    }

    /// Titles are unique ignoring case.
    pub async fn create_tag(&self, requester: &AuthUser, title: &str) -> Result<Tag> {
        let title = title.trim();
        if title.is_empty() {
            return Err(AppError::invalid_params("Tag title must not be empty"));
        }

        if self.store.find_tag_by_title(title).await?.is_some() {
            return Err(AppError::ResourceExists("Tag".to_string()));
        }

        let tag = self.store.insert_tag(title, requester.id).await?;
        tracing::info!(tag_id = %tag.id, title = %tag.title, "tag created");
        Ok(tag)
    }
}
