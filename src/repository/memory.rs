use std::collections::HashMap;

use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::models::{
    Article, ArticleChanges, ArticleFilter, ArticleStats, Comment, CommentFilter, CommentStats,
    Follow, NewArticle, NewComment, NewUser, Reaction, ReactionKind, Tag, User, UserChanges,
    UserStatus,
};

use super::Store;

/// In-process store. Rows are kept in insertion order, which doubles as
/// creation order for the "newest first" listings.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    tags: Vec<Tag>,
    articles: Vec<Article>,
    article_tags: HashMap<Uuid, Vec<Uuid>>,
    comments: Vec<Comment>,
    reactions: HashMap<ReactionKind, Vec<Reaction>>,
    follows: Vec<Follow>,
}

impl Tables {
    fn reactions(&self, kind: ReactionKind) -> &[Reaction] {
        self.reactions.get(&kind).map(Vec::as_slice).unwrap_or(&[])
    }

    fn count_reactions(&self, kind: ReactionKind, target_id: Uuid) -> i64 {
        self.reactions(kind)
            .iter()
            .filter(|r| r.target_id == target_id)
            .count() as i64
    }

    fn remove_comment_cascade(&mut self, comment_id: Uuid) {
        self.comments.retain(|c| c.id != comment_id);
        for kind in [ReactionKind::CommentLike, ReactionKind::CommentDislike] {
            if let Some(rows) = self.reactions.get_mut(&kind) {
                rows.retain(|r| r.target_id != comment_id);
            }
        }
    }
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl Store for MemoryStore {
    async fn insert_user(&self, user: NewUser) -> Result<User> {
        let mut tables = self.tables.write().await;

        if tables.users.iter().any(|u| u.email == user.email) {
            return Err(AppError::UserExists);
        }

        let now = Utc::now();
        let created = User {
            id: Uuid::new_v4(),
            full_name: user.full_name,
            email: user.email,
            password_hash: user.password_hash,
            bio: None,
            avatar: None,
            status: UserStatus::Pending.as_str().to_string(),
            role: user.role.as_str().to_string(),
            is_email_verified: false,
            verification_token: user.verification_token,
            forgot_password_token: None,
            token_version: 0,
            last_login: None,
            created_at: now,
            updated_at: now,
        };

        tables.users.push(created.clone());
        Ok(created)
    }

    async fn find_user(&self, id: Uuid) -> Result<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| u.email == email).cloned())
    }

    async fn list_users(&self) -> Result<Vec<User>> {
        let tables = self.tables.read().await;
        Ok(tables.users.clone())
    }

    async fn update_user(&self, id: Uuid, changes: UserChanges) -> Result<Option<User>> {
        let mut tables = self.tables.write().await;

        let Some(user) = tables.users.iter_mut().find(|u| u.id == id) else {
            return Ok(None);
        };

        if let Some(full_name) = changes.full_name {
            user.full_name = full_name;
        }
        if let Some(bio) = changes.bio {
            user.bio = Some(bio);
        }
        if let Some(avatar) = changes.avatar {
            user.avatar = Some(avatar);
        }
        if let Some(status) = changes.status {
            user.status = status.as_str().to_string();
        }
        if let Some(role) = changes.role {
            user.role = role.as_str().to_string();
        }
        if let Some(verified) = changes.is_email_verified {
            user.is_email_verified = verified;
        }
        if let Some(token) = changes.verification_token {
            user.verification_token = token;
        }
        if let Some(token) = changes.forgot_password_token {
            user.forgot_password_token = token;
        }
        if let Some(hash) = changes.password_hash {
            user.password_hash = hash;
        }
        if changes.bump_token_version {
            user.token_version += 1;
        }
        if let Some(last_login) = changes.last_login {
            user.last_login = Some(last_login);
        }
        user.updated_at = Utc::now();

        Ok(Some(user.clone()))
    }

    async fn insert_tag(&self, title: &str, author_id: Uuid) -> Result<Tag> {
        let mut tables = self.tables.write().await;

        if tables.tags.iter().any(|t| t.title.to_lowercase() == title.to_lowercase()) {
            return Err(AppError::ResourceExists("Tag".to_string()));
        }

        let now = Utc::now();
        let tag = Tag {
            id: Uuid::new_v4(),
            title: title.to_string(),
            author_id,
            created_at: now,
            updated_at: now,
        };

        tables.tags.push(tag.clone());
        Ok(tag)
    }

    async fn find_tag(&self, id: Uuid) -> Result<Option<Tag>> {
        let tables = self.tables.read().await;
        Ok(tables.tags.iter().find(|t| t.id == id).cloned())
    }

    async fn find_tag_by_title(&self, title: &str) -> Result<Option<Tag>> {
        let tables = self.tables.read().await;
        Ok(tables
            .tags
            .iter()
            .find(|t| t.title.to_lowercase() == title.to_lowercase())
            .cloned())
    }

    async fn search_tags(&self, term: &str) -> Result<Vec<Tag>> {
        let tables = self.tables.read().await;
        let mut tags: Vec<Tag> = tables
            .tags
            .iter()
            .filter(|t| contains_ignore_case(&t.title, term))
            .cloned()
            .collect();
        tags.sort_by(|a, b| a.title.cmp(&b.title));
        Ok(tags)
    }

    async fn list_tags(&self) -> Result<Vec<Tag>> {
        let tables = self.tables.read().await;
        let mut tags = tables.tags.clone();
        tags.sort_by(|a, b| a.title.cmp(&b.title));
        Ok(tags)
    }

    async fn find_tags(&self, ids: &[Uuid]) -> Result<Vec<Tag>> {
        let tables = self.tables.read().await;
        Ok(ids
            .iter()
            .filter_map(|id| tables.tags.iter().find(|t| t.id == *id).cloned())
            .collect())
    }

    async fn insert_article(&self, article: NewArticle) -> Result<Article> {
        let mut tables = self.tables.write().await;

        let now = Utc::now();
        let created = Article {
            id: article.id,
            title: article.title,
            slug: article.slug,
            body: article.body,
            author_id: article.author_id,
            created_at: now,
            updated_at: now,
        };

        tables.article_tags.insert(created.id, article.tag_ids);
        tables.articles.push(created.clone());
        Ok(created)
    }

    async fn find_article(&self, id: Uuid) -> Result<Option<Article>> {
        let tables = self.tables.read().await;
        Ok(tables.articles.iter().find(|a| a.id == id).cloned())
    }

    async fn list_articles(&self, filter: ArticleFilter) -> Result<Vec<Article>> {
        let tables = self.tables.read().await;
        let articles = tables
            .articles
            .iter()
            .rev()
            .filter(|a| match &filter {
                ArticleFilter::All => true,
                ArticleFilter::Author(author_id) => a.author_id == *author_id,
                ArticleFilter::Search(term) => {
                    contains_ignore_case(&a.title, term) || contains_ignore_case(&a.slug, term)
                }
            })
            .cloned()
            .collect();
        Ok(articles)
    }

    async fn update_article(&self, id: Uuid, changes: ArticleChanges) -> Result<Option<Article>> {
        let mut tables = self.tables.write().await;

        let Some(article) = tables.articles.iter_mut().find(|a| a.id == id) else {
            return Ok(None);
        };

        if let Some(title) = changes.title {
            article.title = title;
        }
        if let Some(body) = changes.body {
            article.body = body;
        }
        article.updated_at = Utc::now();
        let updated = article.clone();

        if let Some(tag_ids) = changes.tag_ids {
            tables.article_tags.insert(id, tag_ids);
        }

        Ok(Some(updated))
    }

    async fn delete_article(&self, id: Uuid) -> Result<bool> {
        let mut tables = self.tables.write().await;

        let before = tables.articles.len();
        tables.articles.retain(|a| a.id != id);
        if tables.articles.len() == before {
            return Ok(false);
        }

        tables.article_tags.remove(&id);

        let comment_ids: Vec<Uuid> = tables
            .comments
            .iter()
            .filter(|c| c.article_id == id)
            .map(|c| c.id)
            .collect();
        for comment_id in comment_ids {
            tables.remove_comment_cascade(comment_id);
        }

        for kind in [ReactionKind::ArticleLike, ReactionKind::Favourite] {
            if let Some(rows) = tables.reactions.get_mut(&kind) {
                rows.retain(|r| r.target_id != id);
            }
        }

        Ok(true)
    }

    async fn article_tags(&self, article_id: Uuid) -> Result<Vec<Tag>> {
        let tables = self.tables.read().await;
        let Some(tag_ids) = tables.article_tags.get(&article_id) else {
            return Ok(Vec::new());
        };
        Ok(tag_ids
            .iter()
            .filter_map(|id| tables.tags.iter().find(|t| t.id == *id).cloned())
            .collect())
    }

    async fn article_stats(&self, article_id: Uuid) -> Result<ArticleStats> {
        let tables = self.tables.read().await;
        Ok(ArticleStats {
            likes: tables.count_reactions(ReactionKind::ArticleLike, article_id),
            favourites: tables.count_reactions(ReactionKind::Favourite, article_id),
            comments: tables
                .comments
                .iter()
                .filter(|c| c.article_id == article_id)
                .count() as i64,
        })
    }

    async fn insert_comment(&self, comment: NewComment) -> Result<Comment> {
        let mut tables = self.tables.write().await;

        let now = Utc::now();
        let created = Comment {
            id: Uuid::new_v4(),
            body: comment.body,
            article_id: comment.article_id,
            author_id: comment.author_id,
            created_at: now,
            updated_at: now,
        };

        tables.comments.push(created.clone());
        Ok(created)
    }

    async fn find_comment(&self, id: Uuid) -> Result<Option<Comment>> {
        let tables = self.tables.read().await;
        Ok(tables.comments.iter().find(|c| c.id == id).cloned())
    }

    async fn list_comments(&self, filter: CommentFilter) -> Result<Vec<Comment>> {
        let tables = self.tables.read().await;
        Ok(tables
            .comments
            .iter()
            .filter(|c| match filter {
                CommentFilter::Article(article_id) => c.article_id == article_id,
                CommentFilter::Author(author_id) => c.author_id == author_id,
            })
            .cloned()
            .collect())
    }

    async fn update_comment(&self, id: Uuid, body: &str) -> Result<Option<Comment>> {
        let mut tables = self.tables.write().await;
        let Some(comment) = tables.comments.iter_mut().find(|c| c.id == id) else {
            return Ok(None);
        };
        comment.body = body.to_string();
        comment.updated_at = Utc::now();
        Ok(Some(comment.clone()))
    }

    async fn delete_comment(&self, id: Uuid) -> Result<bool> {
        let mut tables = self.tables.write().await;
        if !tables.comments.iter().any(|c| c.id == id) {
            return Ok(false);
        }
        tables.remove_comment_cascade(id);
        Ok(true)
    }

    async fn comment_stats(&self, comment_id: Uuid) -> Result<CommentStats> {
        let tables = self.tables.read().await;
        Ok(CommentStats {
            likes: tables.count_reactions(ReactionKind::CommentLike, comment_id),
            dislikes: tables.count_reactions(ReactionKind::CommentDislike, comment_id),
        })
    }

    async fn find_reaction(
        &self,
        kind: ReactionKind,
        author_id: Uuid,
        target_id: Uuid,
    ) -> Result<Option<Reaction>> {
        let tables = self.tables.read().await;
        Ok(tables
            .reactions(kind)
            .iter()
            .find(|r| r.author_id == author_id && r.target_id == target_id)
            .cloned())
    }

    async fn list_reactions(&self, kind: ReactionKind, author_id: Uuid) -> Result<Vec<Reaction>> {
        let tables = self.tables.read().await;
        Ok(tables
            .reactions(kind)
            .iter()
            .rev()
            .filter(|r| r.author_id == author_id)
            .cloned()
            .collect())
    }

    async fn insert_reaction(
        &self,
        kind: ReactionKind,
        author_id: Uuid,
        target_id: Uuid,
    ) -> Result<Option<Reaction>> {
        let mut tables = self.tables.write().await;
        let rows = tables.reactions.entry(kind).or_default();

        if rows
            .iter()
            .any(|r| r.author_id == author_id && r.target_id == target_id)
        {
            return Ok(None);
        }

        let reaction = Reaction {
            id: Uuid::new_v4(),
            author_id,
            target_id,
            created_at: Utc::now(),
        };
        rows.push(reaction.clone());
        Ok(Some(reaction))
    }

    async fn delete_reaction(
        &self,
        kind: ReactionKind,
        author_id: Uuid,
        target_id: Uuid,
    ) -> Result<Option<Reaction>> {
        let mut tables = self.tables.write().await;
        let Some(rows) = tables.reactions.get_mut(&kind) else {
            return Ok(None);
        };

        let position = rows
            .iter()
            .position(|r| r.author_id == author_id && r.target_id == target_id);
        Ok(position.map(|i| rows.remove(i)))
    }

    async fn find_follow(&self, author_id: Uuid, following_id: Uuid) -> Result<Option<Follow>> {
        let tables = self.tables.read().await;
        Ok(tables
            .follows
            .iter()
            .find(|f| f.author_id == author_id && f.following_id == following_id)
            .cloned())
    }

    async fn list_follows(&self, author_id: Uuid) -> Result<Vec<Follow>> {
        let tables = self.tables.read().await;
        Ok(tables
            .follows
            .iter()
            .rev()
            .filter(|f| f.author_id == author_id)
            .cloned()
            .collect())
    }

    async fn insert_follow(&self, author_id: Uuid, following_id: Uuid) -> Result<Option<Follow>> {
        let mut tables = self.tables.write().await;

        if tables
            .follows
            .iter()
            .any(|f| f.author_id == author_id && f.following_id == following_id)
        {
            return Ok(None);
        }

        let follow = Follow {
            id: Uuid::new_v4(),
            author_id,
            following_id,
            created_at: Utc::now(),
        };
        tables.follows.push(follow.clone());
        Ok(Some(follow))
    }

    async fn delete_follow(&self, author_id: Uuid, following_id: Uuid) -> Result<Option<Follow>> {
        let mut tables = self.tables.write().await;
        let position = tables
            .follows
            .iter()
            .position(|f| f.author_id == author_id && f.following_id == following_id);
        Ok(position.map(|i| tables.follows.remove(i)))
    }
}
