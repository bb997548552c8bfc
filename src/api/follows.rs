use axum::{extract::State, routing::get, Router};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::Result;
use crate::middleware::{AuthUser, QueryParams};
use crate::models::Follow;
use crate::response::{ApiResponse, OneOrMany};
use crate::services::FollowService;
use crate::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/", get(get_follows).post(follow).delete(unfollow))
}

#[derive(Debug, Deserialize)]
pub struct FollowLookup {
    pub following: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct AuthorTarget {
    pub author: Uuid,
}

async fn get_follows(
    State(state): State<AppState>,
    requester: AuthUser,
    QueryParams(query): QueryParams<FollowLookup>,
) -> Result<ApiResponse<OneOrMany<Follow>>> {
    let service = FollowService::new(state.store.clone());

    let data = match query.following {
        Some(id) => OneOrMany::One(service.find(&requester, id).await?),
        None => OneOrMany::Many(service.list(&requester).await?),
    };

    Ok(ApiResponse::ok(data))
}

async fn follow(
    State(state): State<AppState>,
    requester: AuthUser,
    QueryParams(query): QueryParams<AuthorTarget>,
) -> Result<ApiResponse<Follow>> {
    let follow = FollowService::new(state.store.clone())
        .follow(&requester, query.author)
        .await?;
    Ok(ApiResponse::with_message(follow, "Author followed"))
}

async fn unfollow(
    State(state): State<AppState>,
    requester: AuthUser,
    QueryParams(query): QueryParams<AuthorTarget>,
) -> Result<ApiResponse<Follow>> {
    let follow = FollowService::new(state.store.clone())
        .unfollow(&requester, query.author)
        .await?;
    Ok(ApiResponse::with_message(follow, "Author unfollowed"))
}
