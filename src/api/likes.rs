//! `/article/like` and `/article/favourite`.

use axum::{extract::State, routing::get, Router};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::Result;
use crate::middleware::{AuthUser, QueryParams};
use crate::models::{ReactionKind, ReactionView};
use crate::response::{ApiResponse, OneOrMany};
use crate::services::ReactionService;
use crate::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/like", get(get_likes).post(like).delete(unlike))
        .route(
            "/favourite",
            get(get_favourites).post(favourite).delete(unfavourite),
        )
}

#[derive(Debug, Deserialize)]
pub struct ArticleLookup {
    pub article: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct ArticleTarget {
    pub article: Uuid,
}

async fn lookup(
    state: &AppState,
    kind: ReactionKind,
    requester: &AuthUser,
    article: Option<Uuid>,
) -> Result<OneOrMany<ReactionView>> {
    let service = ReactionService::new(state.store.clone(), kind);
    Ok(match article {
        Some(id) => OneOrMany::One(service.find(requester, id).await?),
        None => OneOrMany::Many(service.list(requester).await?),
    })
}

async fn get_likes(
    State(state): State<AppState>,
    requester: AuthUser,
    QueryParams(query): QueryParams<ArticleLookup>,
) -> Result<ApiResponse<OneOrMany<ReactionView>>> {
    let data = lookup(&state, ReactionKind::ArticleLike, &requester, query.article).await?;
    Ok(ApiResponse::ok(data))
}

async fn like(
    State(state): State<AppState>,
    requester: AuthUser,
    QueryParams(query): QueryParams<ArticleTarget>,
) -> Result<ApiResponse<ReactionView>> {
    let like = ReactionService::new(state.store.clone(), ReactionKind::ArticleLike)
        .add(&requester, query.article)
        .await?;
    Ok(ApiResponse::with_message(like, "Article liked"))
}

async fn unlike(
    State(state): State<AppState>,
    requester: AuthUser,
    QueryParams(query): QueryParams<ArticleTarget>,
) -> Result<ApiResponse<ReactionView>> {
    let like = ReactionService::new(state.store.clone(), ReactionKind::ArticleLike)
        .remove(&requester, query.article)
        .await?;
    Ok(ApiResponse::with_message(like, "Article unliked"))
}

async fn get_favourites(
    State(state): State<AppState>,
    requester: AuthUser,
    QueryParams(query): QueryParams<ArticleLookup>,
) -> Result<ApiResponse<OneOrMany<ReactionView>>> {
    let data = lookup(&state, ReactionKind::Favourite, &requester, query.article).await?;
    Ok(ApiResponse::ok(data))
}

async fn favourite(
    State(state): State<AppState>,
    requester: AuthUser,
    QueryParams(query): QueryParams<ArticleTarget>,
) -> Result<ApiResponse<ReactionView>> {
    let favourite = ReactionService::new(state.store.clone(), ReactionKind::Favourite)
        .add(&requester, query.article)
        .await?;
    Ok(ApiResponse::with_message(favourite, "Article added to favourites"))
}

async fn unfavourite(
    State(state): State<AppState>,
    requester: AuthUser,
    QueryParams(query): QueryParams<ArticleTarget>,
) -> Result<ApiResponse<ReactionView>> {
    let favourite = ReactionService::new(state.store.clone(), ReactionKind::Favourite)
        .remove(&requester, query.article)
        .await?;
    Ok(ApiResponse::with_message(favourite, "Article removed from favourites"))
}
