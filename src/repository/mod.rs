mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

use uuid::Uuid;

use crate::error::Result;
use crate::models::{
    Article, ArticleChanges, ArticleFilter, ArticleStats, Comment, CommentFilter, CommentStats,
    Follow, NewArticle, NewComment, NewUser, Reaction, ReactionKind, Tag, User, UserChanges,
};

/// Persistence interface for the whole API.
/// Both PgStore (PostgreSQL) and MemoryStore (tests, local runs) implement this.
#[async_trait::async_trait]
pub trait Store: Send + Sync {
    // Users

    /// Fails with `AppError::UserExists` if the email is taken.
    async fn insert_user(&self, user: NewUser) -> Result<User>;

    async fn find_user(&self, id: Uuid) -> Result<Option<User>>;

    /// Emails are stored lowercased; callers pass the normalized form.
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>>;

    async fn list_users(&self) -> Result<Vec<User>>;

    async fn update_user(&self, id: Uuid, changes: UserChanges) -> Result<Option<User>>;

    // Tags

    async fn insert_tag(&self, title: &str, author_id: Uuid) -> Result<Tag>;

    async fn find_tag(&self, id: Uuid) -> Result<Option<Tag>>;

    /// Exact, case-insensitive title lookup.
    async fn find_tag_by_title(&self, title: &str) -> Result<Option<Tag>>;

    /// Case-insensitive substring search on titles.
    async fn search_tags(&self, term: &str) -> Result<Vec<Tag>>;

    async fn list_tags(&self) -> Result<Vec<Tag>>;

    /// Tags with the given ids, in the order of `ids`. Unknown ids are skipped.
    async fn find_tags(&self, ids: &[Uuid]) -> Result<Vec<Tag>>;

    // Articles

    async fn insert_article(&self, article: NewArticle) -> Result<Article>;

    async fn find_article(&self, id: Uuid) -> Result<Option<Article>>;

    /// Newest first.
    async fn list_articles(&self, filter: ArticleFilter) -> Result<Vec<Article>>;

    async fn update_article(&self, id: Uuid, changes: ArticleChanges) -> Result<Option<Article>>;

    /// Removes the article with its tag links, comments and reactions.
    async fn delete_article(&self, id: Uuid) -> Result<bool>;

    async fn article_tags(&self, article_id: Uuid) -> Result<Vec<Tag>>;

    async fn article_stats(&self, article_id: Uuid) -> Result<ArticleStats>;

    // Comments

    async fn insert_comment(&self, comment: NewComment) -> Result<Comment>;

    async fn find_comment(&self, id: Uuid) -> Result<Option<Comment>>;

    /// Oldest first.
    async fn list_comments(&self, filter: CommentFilter) -> Result<Vec<Comment>>;

    async fn update_comment(&self, id: Uuid, body: &str) -> Result<Option<Comment>>;

    /// Removes the comment with its likes and dislikes.
    async fn delete_comment(&self, id: Uuid) -> Result<bool>;

    async fn comment_stats(&self, comment_id: Uuid) -> Result<CommentStats>;

    // Reactions (article likes, favourites, comment likes/dislikes)

    async fn find_reaction(
        &self,
        kind: ReactionKind,
        author_id: Uuid,
        target_id: Uuid,
    ) -> Result<Option<Reaction>>;

    async fn list_reactions(&self, kind: ReactionKind, author_id: Uuid) -> Result<Vec<Reaction>>;

    /// Returns `None` if the pair already exists.
    async fn insert_reaction(
        &self,
        kind: ReactionKind,
        author_id: Uuid,
        target_id: Uuid,
    ) -> Result<Option<Reaction>>;

    /// Returns the removed record, or `None` if there was nothing to remove.
    async fn delete_reaction(
        &self,
        kind: ReactionKind,
        author_id: Uuid,
        target_id: Uuid,
    ) -> Result<Option<Reaction>>;

    // Follows

    async fn find_follow(&self, author_id: Uuid, following_id: Uuid) -> Result<Option<Follow>>;

    async fn list_follows(&self, author_id: Uuid) -> Result<Vec<Follow>>;

    /// Returns `None` if already following.
    async fn insert_follow(&self, author_id: Uuid, following_id: Uuid) -> Result<Option<Follow>>;

    async fn delete_follow(&self, author_id: Uuid, following_id: Uuid) -> Result<Option<Follow>>;
}
