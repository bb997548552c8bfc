use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

use super::user::AuthorSummary;

#[derive(Debug, Clone, FromRow)]
pub struct Comment {
    pub id: Uuid,
    pub body: String,
    pub article_id: Uuid,
    pub author_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CommentStats {
    pub likes: i64,
    pub dislikes: i64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentView {
    pub id: Uuid,
    pub body: String,
    pub article: Uuid,
    pub author: Option<AuthorSummary>,
    pub likes: i64,
    pub dislikes: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CommentView {
    pub fn assemble(comment: Comment, author: Option<AuthorSummary>, stats: CommentStats) -> Self {
        Self {
            id: comment.id,
            body: comment.body,
            article: comment.article_id,
            author,
            likes: stats.likes,
            dislikes: stats.dislikes,
            created_at: comment.created_at,
            updated_at: comment.updated_at,
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewComment {
    pub body: String,
    pub article_id: Uuid,
    pub author_id: Uuid,
}

#[derive(Debug, Clone, Copy)]
pub enum CommentFilter {
    Article(Uuid),
    Author(Uuid),
}
