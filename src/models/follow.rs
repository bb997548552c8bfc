use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// `author` follows `following`.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Follow {
    pub id: Uuid,
    #[serde(rename = "author")]
    pub author_id: Uuid,
    #[serde(rename = "following")]
    pub following_id: Uuid,
    pub created_at: DateTime<Utc>,
}
