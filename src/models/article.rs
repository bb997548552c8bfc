use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

use super::tag::TagSummary;
use super::user::AuthorSummary;

#[derive(Debug, Clone, FromRow)]
pub struct Article {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub body: String,
    pub author_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ArticleStats {
    pub likes: i64,
    pub favourites: i64,
    pub comments: i64,
}

/// Article as returned to clients, with its author, tags and counters resolved.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleView {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub body: String,
    pub author: Option<AuthorSummary>,
    pub tags: Vec<TagSummary>,
    pub likes: i64,
    pub favourites: i64,
    pub comments: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ArticleView {
    pub fn assemble(
        article: Article,
        author: Option<AuthorSummary>,
        tags: Vec<TagSummary>,
        stats: ArticleStats,
    ) -> Self {
        Self {
            id: article.id,
            title: article.title,
            slug: article.slug,
            body: article.body,
            author,
            tags,
            likes: stats.likes,
            favourites: stats.favourites,
            comments: stats.comments,
            created_at: article.created_at,
            updated_at: article.updated_at,
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewArticle {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub body: String,
    pub author_id: Uuid,
    pub tag_ids: Vec<Uuid>,
}

#[derive(Debug, Clone, Default)]
pub struct ArticleChanges {
    pub title: Option<String>,
    pub body: Option<String>,
    pub tag_ids: Option<Vec<Uuid>>,
}

#[derive(Debug, Clone)]
pub enum ArticleFilter {
    All,
    Author(Uuid),
    /// Case-insensitive substring match on title or slug.
    Search(String),
}
