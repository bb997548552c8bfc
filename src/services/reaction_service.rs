// Reaction service - article likes, favourites, comment likes and dislikes
use std::sync::Arc;

use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::middleware::AuthUser;
use crate::models::{ReactionKind, ReactionView};
use crate::repository::Store;

/// One service for all four pair records; the kind picks the table,
/// the target type and the rejection messages.
pub struct ReactionService {
    store: Arc<dyn Store>,
    kind: ReactionKind,
}

impl ReactionService {
    pub fn new(store: Arc<dyn Store>, kind: ReactionKind) -> Self {
        Self { store, kind }
    }

    async fn ensure_target(&self, target_id: Uuid) -> Result<()> {
        let exists = if self.kind.targets_article() {
            self.store.find_article(target_id).await?.is_some()
        } else {
            self.store.find_comment(target_id).await?.is_some()
        };

        if exists {
            Ok(())
        } else {
            Err(AppError::NotFound(self.kind.target_name().to_string()))
        }
    }

    /// The requester's record for one target, if any.
    pub async fn find(&self, requester: &AuthUser, target_id: Uuid) -> Result<Option<ReactionView>> {
        let reaction = self
            .store
            .find_reaction(self.kind, requester.id, target_id)
            .await?;
        Ok(reaction.map(|r| r.view(self.kind)))
    }

    /// All of the requester's records of this kind, newest first.
    pub async fn list(&self, requester: &AuthUser) -> Result<Vec<ReactionView>> {
        let reactions = self.store.list_reactions(self.kind, requester.id).await?;
        Ok(reactions.into_iter().map(|r| r.view(self.kind)).collect())
    }

    pub async fn add(&self, requester: &AuthUser, target_id: Uuid) -> Result<ReactionView> {
        self.ensure_target(target_id).await?;

        let reaction = self
            .store
            .insert_reaction(self.kind, requester.id, target_id)
            .await?
            .ok_or_else(|| AppError::Forbidden(self.kind.duplicate_message().to_string()))?;

        tracing::debug!(
            kind = ?self.kind,
            author = %requester.id,
            target = %target_id,
            "reaction added"
        );
        Ok(reaction.view(self.kind))
    }

    /// Returns the removed record.
    pub async fn remove(&self, requester: &AuthUser, target_id: Uuid) -> Result<ReactionView> {
        self.ensure_target(target_id).await?;

        let reaction = self
            .store
            .delete_reaction(self.kind, requester.id, target_id)
            .await?
            .ok_or_else(|| AppError::Forbidden(self.kind.missing_message().to_string()))?;

        Ok(reaction.view(self.kind))
    }
}
