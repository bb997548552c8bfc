use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Postgres, QueryBuilder, Transaction};
use uuid::Uuid;

use crate::config::DatabaseConfig;
use crate::error::{AppError, Result};
use crate::models::{
    Article, ArticleChanges, ArticleFilter, ArticleStats, Comment, CommentFilter, CommentStats,
    Follow, NewArticle, NewComment, NewUser, Reaction, ReactionKind, Tag, User, UserChanges,
};

use super::Store;

/// PostgreSQL-backed store. Schema lives in `./migrations`.
#[derive(Clone)]
pub struct PgStore {
    pub pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(config: &DatabaseConfig) -> anyhow::Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .connect(&config.url)
            .await?;

        tracing::info!("PostgreSQL connection pool established");

        Ok(Self { pool })
    }

    pub async fn run_migrations(&self) -> anyhow::Result<()> {
        tracing::info!("Running database migrations...");
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        tracing::info!("Database migrations completed");
        Ok(())
    }

    async fn replace_article_tags(
        tx: &mut Transaction<'_, Postgres>,
        article_id: Uuid,
        tag_ids: &[Uuid],
    ) -> Result<()> {
        sqlx::query("DELETE FROM article_tags WHERE article_id = $1")
            .bind(article_id)
            .execute(&mut **tx)
            .await?;

        sqlx::query(
            r#"
            INSERT INTO article_tags (article_id, tag_id, position)
            SELECT $1, t.tag_id, t.position
            FROM UNNEST($2::uuid[]) WITH ORDINALITY AS t(tag_id, position)
            ON CONFLICT (article_id, tag_id) DO NOTHING
            "#,
        )
        .bind(article_id)
        .bind(tag_ids)
        .execute(&mut **tx)
        .await?;

        Ok(())
    }
}

/// Escapes LIKE metacharacters and wraps the term for a substring match.
fn like_pattern(term: &str) -> String {
    let escaped = term
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_unique_violation())
}

#[async_trait::async_trait]
impl Store for PgStore {
    async fn insert_user(&self, user: NewUser) -> Result<User> {
        let result = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, full_name, email, password_hash, role, verification_token)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&user.full_name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.role.as_str())
        .bind(&user.verification_token)
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(user) => Ok(user),
            Err(e) if is_unique_violation(&e) => Err(AppError::UserExists),
            Err(e) => Err(e.into()),
        }
    }

    async fn find_user(&self, id: Uuid) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn list_users(&self) -> Result<Vec<User>> {
        let users = sqlx::query_as::<_, User>("SELECT * FROM users ORDER BY created_at ASC")
            .fetch_all(&self.pool)
            .await?;
        Ok(users)
    }

    async fn update_user(&self, id: Uuid, changes: UserChanges) -> Result<Option<User>> {
        let mut qb = QueryBuilder::<Postgres>::new("UPDATE users SET updated_at = NOW()");

        if let Some(full_name) = changes.full_name {
            qb.push(", full_name = ").push_bind(full_name);
        }
        if let Some(bio) = changes.bio {
            qb.push(", bio = ").push_bind(bio);
        }
        if let Some(avatar) = changes.avatar {
            qb.push(", avatar = ").push_bind(avatar);
        }
        if let Some(status) = changes.status {
            qb.push(", status = ").push_bind(status.as_str());
        }
        if let Some(role) = changes.role {
            qb.push(", role = ").push_bind(role.as_str());
        }
        if let Some(verified) = changes.is_email_verified {
            qb.push(", is_email_verified = ").push_bind(verified);
        }
        if let Some(token) = changes.verification_token {
            qb.push(", verification_token = ").push_bind(token);
        }
        if let Some(token) = changes.forgot_password_token {
            qb.push(", forgot_password_token = ").push_bind(token);
        }
        if let Some(hash) = changes.password_hash {
            qb.push(", password_hash = ").push_bind(hash);
        }
        if changes.bump_token_version {
            qb.push(", token_version = token_version + 1");
        }
        if let Some(last_login) = changes.last_login {
            qb.push(", last_login = ").push_bind(last_login);
        }

        qb.push(" WHERE id = ").push_bind(id).push(" RETURNING *");

        let user = qb
            .build_query_as::<User>()
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn insert_tag(&self, title: &str, author_id: Uuid) -> Result<Tag> {
        let result = sqlx::query_as::<_, Tag>(
            r#"
            INSERT INTO tags (id, title, author_id)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(title)
        .bind(author_id)
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(tag) => Ok(tag),
            Err(e) if is_unique_violation(&e) => Err(AppError::ResourceExists("Tag".to_string())),
            Err(e) => Err(e.into()),
        }
    }

    async fn find_tag(&self, id: Uuid) -> Result<Option<Tag>> {
        let tag = sqlx::query_as::<_, Tag>("SELECT * FROM tags WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(tag)
    }

    async fn find_tag_by_title(&self, title: &str) -> Result<Option<Tag>> {
        let tag = sqlx::query_as::<_, Tag>("SELECT * FROM tags WHERE LOWER(title) = LOWER($1)")
            .bind(title)
            .fetch_optional(&self.pool)
            .await?;
        Ok(tag)
    }

    async fn search_tags(&self, term: &str) -> Result<Vec<Tag>> {
        let tags = sqlx::query_as::<_, Tag>(
            "SELECT * FROM tags WHERE title ILIKE $1 ORDER BY title ASC",
        )
        .bind(like_pattern(term))
        .fetch_all(&self.pool)
        .await?;
        Ok(tags)
    }

    async fn list_tags(&self) -> Result<Vec<Tag>> {
        let tags = sqlx::query_as::<_, Tag>("SELECT * FROM tags ORDER BY title ASC")
            .fetch_all(&self.pool)
            .await?;
        Ok(tags)
    }

    async fn find_tags(&self, ids: &[Uuid]) -> Result<Vec<Tag>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let found = sqlx::query_as::<_, Tag>("SELECT * FROM tags WHERE id = ANY($1)")
            .bind(ids)
            .fetch_all(&self.pool)
            .await?;

        let ordered = ids
            .iter()
            .filter_map(|id| found.iter().find(|t| t.id == *id).cloned())
            .collect();
        Ok(ordered)
    }

    async fn insert_article(&self, article: NewArticle) -> Result<Article> {
        let mut tx = self.pool.begin().await?;

        let created = sqlx::query_as::<_, Article>(
            r#"
            INSERT INTO articles (id, title, slug, body, author_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(article.id)
        .bind(&article.title)
        .bind(&article.slug)
        .bind(&article.body)
        .bind(article.author_id)
        .fetch_one(&mut *tx)
        .await?;

        Self::replace_article_tags(&mut tx, created.id, &article.tag_ids).await?;

        tx.commit().await?;
        Ok(created)
    }

    async fn find_article(&self, id: Uuid) -> Result<Option<Article>> {
        let article = sqlx::query_as::<_, Article>("SELECT * FROM articles WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(article)
    }

    async fn list_articles(&self, filter: ArticleFilter) -> Result<Vec<Article>> {
        let articles = match filter {
            ArticleFilter::All => {
                sqlx::query_as::<_, Article>("SELECT * FROM articles ORDER BY created_at DESC")
                    .fetch_all(&self.pool)
                    .await?
            }
            ArticleFilter::Author(author_id) => {
                sqlx::query_as::<_, Article>(
                    "SELECT * FROM articles WHERE author_id = $1 ORDER BY created_at DESC",
                )
                .bind(author_id)
                .fetch_all(&self.pool)
                .await?
            }
            ArticleFilter::Search(term) => {
                sqlx::query_as::<_, Article>(
                    r#"
                    SELECT * FROM articles
                    WHERE title ILIKE $1 OR slug ILIKE $1
                    ORDER BY created_at DESC
                    "#,
                )
                .bind(like_pattern(&term))
                .fetch_all(&self.pool)
                .await?
            }
        };
        Ok(articles)
    }

    async fn update_article(&self, id: Uuid, changes: ArticleChanges) -> Result<Option<Article>> {
        let mut tx = self.pool.begin().await?;

        let mut qb = QueryBuilder::<Postgres>::new("UPDATE articles SET updated_at = NOW()");
        if let Some(title) = changes.title {
            qb.push(", title = ").push_bind(title);
        }
        if let Some(body) = changes.body {
            qb.push(", body = ").push_bind(body);
        }
        qb.push(" WHERE id = ").push_bind(id).push(" RETURNING *");

        let updated = qb
            .build_query_as::<Article>()
            .fetch_optional(&mut *tx)
            .await?;

        let Some(updated) = updated else {
            return Ok(None);
        };

        if let Some(tag_ids) = changes.tag_ids {
            Self::replace_article_tags(&mut tx, id, &tag_ids).await?;
        }

        tx.commit().await?;
        Ok(Some(updated))
    }

    async fn delete_article(&self, id: Uuid) -> Result<bool> {
        // comments, reactions and tag links cascade
        let affected = sqlx::query("DELETE FROM articles WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?
            .rows_affected();
        Ok(affected > 0)
    }

    async fn article_tags(&self, article_id: Uuid) -> Result<Vec<Tag>> {
        let tags = sqlx::query_as::<_, Tag>(
            r#"
            SELECT t.*
            FROM tags t
            JOIN article_tags at ON at.tag_id = t.id
            WHERE at.article_id = $1
            ORDER BY at.position ASC
            "#,
        )
        .bind(article_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(tags)
    }

    async fn article_stats(&self, article_id: Uuid) -> Result<ArticleStats> {
        let (likes, favourites, comments): (i64, i64, i64) = sqlx::query_as(
            r#"
            SELECT
                (SELECT COUNT(*) FROM article_likes WHERE article_id = $1),
                (SELECT COUNT(*) FROM favourites WHERE article_id = $1),
                (SELECT COUNT(*) FROM comments WHERE article_id = $1)
            "#,
        )
        .bind(article_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(ArticleStats {
            likes,
            favourites,
            comments,
        })
    }

    async fn insert_comment(&self, comment: NewComment) -> Result<Comment> {
        let created = sqlx::query_as::<_, Comment>(
            r#"
            INSERT INTO comments (id, body, article_id, author_id)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&comment.body)
        .bind(comment.article_id)
        .bind(comment.author_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(created)
    }

    async fn find_comment(&self, id: Uuid) -> Result<Option<Comment>> {
        let comment = sqlx::query_as::<_, Comment>("SELECT * FROM comments WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(comment)
    }

    async fn list_comments(&self, filter: CommentFilter) -> Result<Vec<Comment>> {
        let (column, id) = match filter {
            CommentFilter::Article(id) => ("article_id", id),
            CommentFilter::Author(id) => ("author_id", id),
        };

        let query = format!(
            "SELECT * FROM comments WHERE {} = $1 ORDER BY created_at ASC",
            column
        );

        let comments = sqlx::query_as::<_, Comment>(&query)
            .bind(id)
            .fetch_all(&self.pool)
            .await?;
        Ok(comments)
    }

    async fn update_comment(&self, id: Uuid, body: &str) -> Result<Option<Comment>> {
        let comment = sqlx::query_as::<_, Comment>(
            r#"
            UPDATE comments SET body = $1, updated_at = NOW()
            WHERE id = $2
            RETURNING *
            "#,
        )
        .bind(body)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(comment)
    }

    async fn delete_comment(&self, id: Uuid) -> Result<bool> {
        let affected = sqlx::query("DELETE FROM comments WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?
            .rows_affected();
        Ok(affected > 0)
    }

    async fn comment_stats(&self, comment_id: Uuid) -> Result<CommentStats> {
        let (likes, dislikes): (i64, i64) = sqlx::query_as(
            r#"
            SELECT
                (SELECT COUNT(*) FROM comment_likes WHERE comment_id = $1),
                (SELECT COUNT(*) FROM comment_dislikes WHERE comment_id = $1)
            "#,
        )
        .bind(comment_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(CommentStats { likes, dislikes })
    }

    async fn find_reaction(
        &self,
        kind: ReactionKind,
        author_id: Uuid,
        target_id: Uuid,
    ) -> Result<Option<Reaction>> {
        let query = format!(
            "SELECT id, author_id, {col} AS target_id, created_at FROM {table} \
             WHERE author_id = $1 AND {col} = $2",
            col = kind.target_column(),
            table = kind.table(),
        );

        let reaction = sqlx::query_as::<_, Reaction>(&query)
            .bind(author_id)
            .bind(target_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(reaction)
    }

    async fn list_reactions(&self, kind: ReactionKind, author_id: Uuid) -> Result<Vec<Reaction>> {
        let query = format!(
            "SELECT id, author_id, {col} AS target_id, created_at FROM {table} \
             WHERE author_id = $1 ORDER BY created_at DESC",
            col = kind.target_column(),
            table = kind.table(),
        );

        let reactions = sqlx::query_as::<_, Reaction>(&query)
            .bind(author_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(reactions)
    }

    async fn insert_reaction(
        &self,
        kind: ReactionKind,
        author_id: Uuid,
        target_id: Uuid,
    ) -> Result<Option<Reaction>> {
        let query = format!(
            "INSERT INTO {table} (id, author_id, {col}, created_at) \
             VALUES ($1, $2, $3, NOW()) \
             ON CONFLICT (author_id, {col}) DO NOTHING \
             RETURNING id, author_id, {col} AS target_id, created_at",
            col = kind.target_column(),
            table = kind.table(),
        );

        let reaction = sqlx::query_as::<_, Reaction>(&query)
            .bind(Uuid::new_v4())
            .bind(author_id)
            .bind(target_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(reaction)
    }

    async fn delete_reaction(
        &self,
        kind: ReactionKind,
        author_id: Uuid,
        target_id: Uuid,
    ) -> Result<Option<Reaction>> {
        let query = format!(
            "DELETE FROM {table} WHERE author_id = $1 AND {col} = $2 \
             RETURNING id, author_id, {col} AS target_id, created_at",
            col = kind.target_column(),
            table = kind.table(),
        );

        let reaction = sqlx::query_as::<_, Reaction>(&query)
            .bind(author_id)
            .bind(target_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(reaction)
    }

    async fn find_follow(&self, author_id: Uuid, following_id: Uuid) -> Result<Option<Follow>> {
        let follow = sqlx::query_as::<_, Follow>(
            "SELECT * FROM follows WHERE author_id = $1 AND following_id = $2",
        )
        .bind(author_id)
        .bind(following_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(follow)
    }

    async fn list_follows(&self, author_id: Uuid) -> Result<Vec<Follow>> {
        let follows = sqlx::query_as::<_, Follow>(
            "SELECT * FROM follows WHERE author_id = $1 ORDER BY created_at DESC",
        )
        .bind(author_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(follows)
    }

    async fn insert_follow(&self, author_id: Uuid, following_id: Uuid) -> Result<Option<Follow>> {
        let follow = sqlx::query_as::<_, Follow>(
            r#"
            INSERT INTO follows (id, author_id, following_id, created_at)
            VALUES ($1, $2, $3, NOW())
            ON CONFLICT (author_id, following_id) DO NOTHING
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(author_id)
        .bind(following_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(follow)
    }

    async fn delete_follow(&self, author_id: Uuid, following_id: Uuid) -> Result<Option<Follow>> {
        let follow = sqlx::query_as::<_, Follow>(
            r#"
            DELETE FROM follows
            WHERE author_id = $1 AND following_id = $2
            RETURNING *
            "#,
        )
        .bind(author_id)
        .bind(following_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(follow)
    }
}
