use axum::{extract::State, routing::get, Router};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::error::Result;
use crate::middleware::{AuthUser, QueryParams, ValidatedJson};
use crate::models::{ArticleFilter, ArticleView};
use crate::response::{ApiResponse, OneOrMany};
use crate::services::{ArticleService, CreateArticleParams, UpdateArticleParams};
use crate::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route(
        "/",
        get(get_articles)
            .post(create_article)
            .put(update_article)
            .delete(delete_article),
    )
}

#[derive(Debug, Deserialize)]
pub struct ArticleQuery {
    pub id: Option<Uuid>,
    /// Substring of the title or slug.
    pub slug: Option<String>,
    pub author: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct ArticleIdQuery {
    pub id: Uuid,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateArticleRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(max = 200))]
    pub slug: Option<String>,
    #[validate(length(min = 1))]
    pub body: String,
    #[serde(default)]
    pub tags: Vec<Uuid>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateArticleRequest {
    pub id: Uuid,
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    #[validate(length(min = 1))]
    pub body: Option<String>,
    pub tags: Option<Vec<Uuid>>,
}

/// Public: no token needed to read articles.
async fn get_articles(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<ArticleQuery>,
) -> Result<ApiResponse<OneOrMany<ArticleView>>> {
    let service = ArticleService::new(state.store.clone());

    let data = if let Some(id) = query.id {
        OneOrMany::One(Some(service.get_article(id).await?))
    } else {
        let filter = match (query.slug, query.author) {
            (Some(term), _) => ArticleFilter::Search(term),
            (None, Some(author)) => ArticleFilter::Author(author),
            (None, None) => ArticleFilter::All,
        };
        OneOrMany::Many(service.list_articles(filter).await?)
    };

    Ok(ApiResponse::ok(data))
}

async fn create_article(
    State(state): State<AppState>,
    requester: AuthUser,
    ValidatedJson(payload): ValidatedJson<CreateArticleRequest>,
) -> Result<ApiResponse<ArticleView>> {
    let article = ArticleService::new(state.store.clone())
        .create_article(
            &requester,
            CreateArticleParams {
                title: payload.title,
                slug: payload.slug,
                body: payload.body,
                tags: payload.tags,
            },
        )
        .await?;

    Ok(ApiResponse::with_message(article, "Article created successfully"))
}

async fn update_article(
    State(state): State<AppState>,
    requester: AuthUser,
    ValidatedJson(payload): ValidatedJson<UpdateArticleRequest>,
) -> Result<ApiResponse<ArticleView>> {
    let article = ArticleService::new(state.store.clone())
        .update_article(
            &requester,
            UpdateArticleParams {
                id: payload.id,
                title: payload.title,
                body: payload.body,
                tags: payload.tags,
            },
        )
        .await?;

    Ok(ApiResponse::with_message(article, "Article updated successfully"))
}

async fn delete_article(
    State(state): State<AppState>,
    requester: AuthUser,
    QueryParams(query): QueryParams<ArticleIdQuery>,
) -> Result<ApiResponse<ArticleView>> {
    let article = ArticleService::new(state.store.clone())
        .delete_article(&requester, query.id)
        .await?;

    Ok(ApiResponse::with_message(article, "Article deleted successfully"))
}
