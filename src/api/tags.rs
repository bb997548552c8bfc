use axum::{extract::State, routing::get, Router};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::error::Result;
use crate::middleware::{AuthUser, QueryParams, ValidatedJson};
use crate::models::Tag;
use crate::response::{ApiResponse, OneOrMany};
use crate::services::TagService;
use crate::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/", get(get_tags).post(create_tag))
}

#[derive(Debug, Deserialize)]
pub struct TagQuery {
    pub id: Option<Uuid>,
    pub term: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateTagRequest {
    #[validate(length(min = 1, max = 50))]
    pub tag: String,
}

async fn get_tags(
    State(state): State<AppState>,
    _requester: AuthUser,
    QueryParams(query): QueryParams<TagQuery>,
) -> Result<ApiResponse<OneOrMany<Tag>>> {
    let service = TagService::new(state.store.clone());

    let data = match (query.id, query.term) {
        (Some(id), _) => OneOrMany::One(Some(service.get_tag(id).await?)),
        (None, Some(term)) => OneOrMany::Many(service.search_tags(&term).await?),
        (None, None) => OneOrMany::Many(service.list_tags().await?),
    };

    Ok(ApiResponse::ok(data))
}

async fn create_tag(
    State(state): State<AppState>,
    requester: AuthUser,
    ValidatedJson(payload): ValidatedJson<CreateTagRequest>,
) -> Result<ApiResponse<Tag>> {
    let tag = TagService::new(state.store.clone())
        .create_tag(&requester, &payload.tag)
        .await?;

    Ok(ApiResponse::with_message(tag, "Tag created successfully"))
}
