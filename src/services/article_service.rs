// Article service - publishing and the article read model
use std::sync::Arc;

use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::middleware::AuthUser;
use crate::models::{
    Article, ArticleChanges, ArticleFilter, ArticleView, AuthorSummary, NewArticle, TagSummary,
};
use crate::repository::Store;

pub struct ArticleService {
    store: Arc<dyn Store>,
}

#[derive(Debug, Clone)]
pub struct CreateArticleParams {
    pub title: String,
    pub slug: Option<String>,
    pub body: String,
    pub tags: Vec<Uuid>,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateArticleParams {
    pub id: Uuid,
    pub title: Option<String>,
    pub body: Option<String>,
    pub tags: Option<Vec<Uuid>>,
}

/// Lowercase words joined by single dashes. Letters outside ASCII are kept.
pub fn slugify(title: &str) -> String {
    title
        .split(|c: char| !c.is_alphanumeric())
        .filter(|word| !word.is_empty())
        .map(|word| word.to_lowercase())
        .collect::<Vec<_>>()
        .join("-")
}

/// Drops repeated ids, keeping first occurrences in order.
fn dedupe(ids: Vec<Uuid>) -> Vec<Uuid> {
    let mut seen = std::collections::HashSet::new();
    ids.into_iter().filter(|id| seen.insert(*id)).collect()
}

impl ArticleService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    async fn find(&self, id: Uuid) -> Result<Article> {
        self.store
            .find_article(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Article".to_string()))
    }

    /// Every id must name an existing tag.
    async fn resolve_tags(&self, ids: Vec<Uuid>) -> Result<Vec<Uuid>> {
        let ids = dedupe(ids);
        let found = self.store.find_tags(&ids).await?;
        if found.len() != ids.len() {
            return Err(AppError::NotFound("Tag".to_string()));
        }
        Ok(ids)
    }

    async fn view(&self, article: Article) -> Result<ArticleView> {
        let author = self
            .store
            .find_user(article.author_id)
            .await?
            .as_ref()
            .map(AuthorSummary::from);
        let tags = self
            .store
            .article_tags(article.id)
            .await?
            .iter()
            .map(TagSummary::from)
            .collect();
        let stats = self.store.article_stats(article.id).await?;

        Ok(ArticleView::assemble(article, author, tags, stats))
    }

    async fn views(&self, articles: Vec<Article>) -> Result<Vec<ArticleView>> {
        let mut views = Vec::with_capacity(articles.len());
        for article in articles {
            views.push(self.view(article).await?);
        }
        Ok(views)
    }

    pub async fn get_article(&self, id: Uuid) -> Result<ArticleView> {
        let article = self.find(id).await?;
        self.view(article).await
    }

    /// Newest first.
    pub async fn list_articles(&self, filter: ArticleFilter) -> Result<Vec<ArticleView>> {
        let articles = self.store.list_articles(filter).await?;
        self.views(articles).await
    }

    pub async fn create_article(
        &self,
        requester: &AuthUser,
        params: CreateArticleParams,
    ) -> Result<ArticleView> {
        let tag_ids = self.resolve_tags(params.tags).await?;

        let id = Uuid::new_v4();
        let slug = [params.slug.as_deref(), Some(params.title.as_str())]
            .into_iter()
            .flatten()
            .map(slugify)
            .find(|slug| !slug.is_empty())
            .unwrap_or_else(|| id.to_string());

        let article = self
            .store
            .insert_article(NewArticle {
                id,
                title: params.title.trim().to_string(),
                slug,
                body: params.body,
                author_id: requester.id,
                tag_ids,
            })
            .await?;

        tracing::info!(article_id = %article.id, author_id = %requester.id, "article created");
        self.view(article).await
    }

    pub async fn update_article(
        &self,
        requester: &AuthUser,
        params: UpdateArticleParams,
    ) -> Result<ArticleView> {
        let article = self.find(params.id).await?;
        requester.authorize(&article)?;

        let tag_ids = match params.tags {
            Some(tags) => Some(self.resolve_tags(tags).await?),
            None => None,
        };

        let updated = self
            .store
            .update_article(
                article.id,
                ArticleChanges {
                    title: params.title.map(|t| t.trim().to_string()),
                    body: params.body,
                    tag_ids,
                },
            )
            .await?
            .ok_or_else(|| AppError::NotFound("Article".to_string()))?;

        self.view(updated).await
    }

    /// Returns the article as it was just before removal.
    pub async fn delete_article(&self, requester: &AuthUser, id: Uuid) -> Result<ArticleView> {
        let article = self.find(id).await?;
        requester.authorize(&article)?;

        let snapshot = self.view(article).await?;
        if !self.store.delete_article(id).await? {
            return Err(AppError::NotFound("Article".to_string()));
        }

        tracing::info!(article_id = %id, deleted_by = %requester.id, "article deleted");
        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugify_collapses_separators() {
        assert_eq!(slugify("Hello, World!"), "hello-world");
        assert_eq!(slugify("  Async   Rust 2024 "), "async-rust-2024");
        assert_eq!(slugify("already-a-slug"), "already-a-slug");
        assert_eq!(slugify("!!!"), "");
    }

    #[test]
    fn slugify_keeps_non_ascii_letters() {
        assert_eq!(slugify("Ржавчина и владение"), "ржавчина-и-владение");
        assert_eq!(slugify("Café über Rust"), "café-über-rust");
    }

    #[test]
    fn dedupe_keeps_first_occurrence() {
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        assert_eq!(dedupe(vec![a, b, a, b]), vec![a, b]);
    }
}
