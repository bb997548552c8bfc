use std::sync::Arc;

use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::middleware::AuthUser;
use crate::models::{AuthorSummary, Comment, CommentFilter, CommentView, NewComment};
use crate::repository::Store;

pub struct CommentService {
    store: Arc<dyn Store>,
}

impl CommentService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    async fn find(&self, id: Uuid) -> Result<Comment> {
        self.store
            .find_comment(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Comment".to_string()))
    }

    async fn view(&self, comment: Comment) -> Result<CommentView> {
        let author = self
            .store
            .find_user(comment.author_id)
            .await?
            .as_ref()
            .map(AuthorSummary::from);
        let stats = self.store.comment_stats(comment.id).await?;
        Ok(CommentView::assemble(comment, author, stats))
    }

    async fn views(&self, comments: Vec<Comment>) -> Result<Vec<CommentView>> {
        let mut views = Vec::with_capacity(comments.len());
        for comment in comments {
            views.push(self.view(comment).await?);
        }
        Ok(views)
    }

    pub async fn get_comment(&self, id: Uuid) -> Result<CommentView> {
        let comment = self.find(id).await?;
        self.view(comment).await
    }

    /// Oldest first.
    pub async fn article_comments(&self, article_id: Uuid) -> Result<Vec<CommentView>> {
        if self.store.find_article(article_id).await?.is_none() {
            return Err(AppError::NotFound("Article".to_string()));
        }
        let comments = self
            .store
            .list_comments(CommentFilter::Article(article_id))
            .await?;
        self.views(comments).await
    }

    pub async fn author_comments(&self, author_id: Uuid) -> Result<Vec<CommentView>> {
        let comments = self
            .store
            .list_comments(CommentFilter::Author(author_id))
            .await?;
        self.views(comments).await
    }

    pub async fn create_comment(
        &self,
        requester: &AuthUser,
        article_id: Uuid,
        body: &str,
    ) -> Result<CommentView> {
        if self.store.find_article(article_id).await?.is_none() {
            return Err(AppError::NotFound("Article".to_string()));
        }

        let comment = self
            .store
            .insert_comment(NewComment {
                body: body.to_string(),
                article_id,
                author_id: requester.id,
            })
            .await?;

        tracing::debug!(comment_id = %comment.id, article_id = %article_id, "comment created");
        self.view(comment).await
    }

    pub async fn update_comment(
        &self,
        requester: &AuthUser,
        id: Uuid,
        body: &str,
    ) -> Result<CommentView> {
        let comment = self.find(id).await?;
        requester.authorize(&comment)?;

        let updated = self
            .store
            .update_comment(id, body)
            .await?
            .ok_or_else(|| AppError::NotFound("Comment".to_string()))?;
        self.view(updated).await
    }

    pub async fn delete_comment(&self, requester: &AuthUser, id: Uuid) -> Result<CommentView> {
        let comment = self.find(id).await?;
        requester.authorize(&comment)?;

        let snapshot = self.view(comment).await?;
        if !self.store.delete_comment(id).await? {
            return Err(AppError::NotFound("Comment".to_string()));
        }
        Ok(snapshot)
    }
}
