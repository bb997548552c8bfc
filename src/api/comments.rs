use axum::{
    extract::State,
    routing::{delete, get, post},
    Router,
};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::error::Result;
use crate::middleware::{AuthUser, QueryParams, ValidatedJson};
use crate::models::{CommentView, ReactionKind, ReactionView};
use crate::response::{ApiResponse, OneOrMany};
use crate::services::{CommentService, ReactionService};
use crate::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(get_comments)
                .post(create_comment)
                .put(update_comment)
                .delete(delete_comment),
        )
        .route("/likes", get(get_likes))
        .route("/dislikes", get(get_dislikes))
        .route("/like", post(like).delete(unlike))
        .route("/dislike", post(dislike))
        .route("/undislike", delete(undislike))
}

#[derive(Debug, Deserialize)]
pub struct CommentQuery {
    pub id: Option<Uuid>,
    pub article: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct CommentIdQuery {
    pub id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct CommentLookup {
    pub comment: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct CommentTarget {
    pub comment: Uuid,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateCommentRequest {
    pub article: Uuid,
    #[validate(length(min = 1, max = 5000))]
    pub body: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateCommentRequest {
    pub id: Uuid,
    #[validate(length(min = 1, max = 5000))]
    pub body: String,
}

async fn get_comments(
    State(state): State<AppState>,
    requester: AuthUser,
    QueryParams(query): QueryParams<CommentQuery>,
) -> Result<ApiResponse<OneOrMany<CommentView>>> {
    let service = CommentService::new(state.store.clone());

    let data = match (query.id, query.article) {
        (Some(id), _) => OneOrMany::One(Some(service.get_comment(id).await?)),
        (None, Some(article)) => OneOrMany::Many(service.article_comments(article).await?),
        (None, None) => OneOrMany::Many(service.author_comments(requester.id).await?),
    };

    Ok(ApiResponse::ok(data))
}

async fn create_comment(
    State(state): State<AppState>,
    requester: AuthUser,
    ValidatedJson(payload): ValidatedJson<CreateCommentRequest>,
) -> Result<ApiResponse<CommentView>> {
    let comment = CommentService::new(state.store.clone())
        .create_comment(&requester, payload.article, &payload.body)
        .await?;
    Ok(ApiResponse::with_message(comment, "Comment created successfully"))
}

async fn update_comment(
    State(state): State<AppState>,
    requester: AuthUser,
    ValidatedJson(payload): ValidatedJson<UpdateCommentRequest>,
) -> Result<ApiResponse<CommentView>> {
    let comment = CommentService::new(state.store.clone())
        .update_comment(&requester, payload.id, &payload.body)
        .await?;
    Ok(ApiResponse::with_message(comment, "Comment updated successfully"))
}

async fn delete_comment(
    State(state): State<AppState>,
    requester: AuthUser,
    QueryParams(query): QueryParams<CommentIdQuery>,
) -> Result<ApiResponse<CommentView>> {
    let comment = CommentService::new(state.store.clone())
        .delete_comment(&requester, query.id)
        .await?;
    Ok(ApiResponse::with_message(comment, "Comment deleted successfully"))
}

async fn lookup(
    state: &AppState,
    kind: ReactionKind,
    requester: &AuthUser,
    comment: Option<Uuid>,
) -> Result<OneOrMany<ReactionView>> {
    let service = ReactionService::new(state.store.clone(), kind);
    Ok(match comment {
        Some(id) => OneOrMany::One(service.find(requester, id).await?),
        None => OneOrMany::Many(service.list(requester).await?),
    })
}

async fn get_likes(
    State(state): State<AppState>,
    requester: AuthUser,
    QueryParams(query): QueryParams<CommentLookup>,
) -> Result<ApiResponse<OneOrMany<ReactionView>>> {
    let data = lookup(&state, ReactionKind::CommentLike, &requester, query.comment).await?;
    Ok(ApiResponse::ok(data))
}

async fn get_dislikes(
    State(state): State<AppState>,
    requester: AuthUser,
    QueryParams(query): QueryParams<CommentLookup>,
) -> Result<ApiResponse<OneOrMany<ReactionView>>> {
    let data = lookup(&state, ReactionKind::CommentDislike, &requester, query.comment).await?;
    Ok(ApiResponse::ok(data))
}

async fn like(
    State(state): State<AppState>,
    requester: AuthUser,
    QueryParams(query): QueryParams<CommentTarget>,
) -> Result<ApiResponse<ReactionView>> {
    let like = ReactionService::new(state.store.clone(), ReactionKind::CommentLike)
        .add(&requester, query.comment)
        .await?;
    Ok(ApiResponse::with_message(like, "Comment liked"))
}

async fn unlike(
    State(state): State<AppState>,
    requester: AuthUser,
    QueryParams(query): QueryParams<CommentTarget>,
) -> Result<ApiResponse<ReactionView>> {
    let like = ReactionService::new(state.store.clone(), ReactionKind::CommentLike)
        .remove(&requester, query.comment)
        .await?;
    Ok(ApiResponse::with_message(like, "Comment unliked"))
}

async fn dislike(
    State(state): State<AppState>,
    requester: AuthUser,
    QueryParams(query): QueryParams<CommentTarget>,
) -> Result<ApiResponse<ReactionView>> {
    let dislike = ReactionService::new(state.store.clone(), ReactionKind::CommentDislike)
        .add(&requester, query.comment)
        .await?;
    Ok(ApiResponse::with_message(dislike, "Comment disliked"))
}

async fn undislike(
    State(state): State<AppState>,
    requester: AuthUser,
    QueryParams(query): QueryParams<CommentTarget>,
) -> Result<ApiResponse<ReactionView>> {
    let dislike = ReactionService::new(state.store.clone(), ReactionKind::CommentDislike)
        .remove(&requester, query.comment)
        .await?;
    Ok(ApiResponse::with_message(dislike, "Comment dislike removed"))
}
