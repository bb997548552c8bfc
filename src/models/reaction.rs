use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// The four user-to-target pair records. Each kind lives in its own table and
/// holds at most one row per (author, target).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReactionKind {
    ArticleLike,
    Favourite,
    CommentLike,
    CommentDislike,
}

impl ReactionKind {
    pub fn table(&self) -> &'static str {
        match self {
            ReactionKind::ArticleLike => "article_likes",
            ReactionKind::Favourite => "favourites",
            ReactionKind::CommentLike => "comment_likes",
            ReactionKind::CommentDislike => "comment_dislikes",
        }
    }

    pub fn target_column(&self) -> &'static str {
        if self.targets_article() {
            "article_id"
        } else {
            "comment_id"
        }
    }

    pub fn targets_article(&self) -> bool {
        matches!(self, ReactionKind::ArticleLike | ReactionKind::Favourite)
    }

    /// What a target of this kind is called in messages.
    pub fn target_name(&self) -> &'static str {
        if self.targets_article() {
            "Article"
        } else {
            "Comment"
        }
    }

    pub fn duplicate_message(&self) -> &'static str {
        match self {
            ReactionKind::ArticleLike => "Already liked this article",
            ReactionKind::Favourite => "Article is already your favourite",
            ReactionKind::CommentLike => "Already liked comment",
            ReactionKind::CommentDislike => "Already disliked comment",
        }
    }

    pub fn missing_message(&self) -> &'static str {
        match self {
            ReactionKind::ArticleLike => "You've not liked this article",
            ReactionKind::Favourite => "Article is not one of your favourites",
            ReactionKind::CommentLike => "You've not liked this comment",
            ReactionKind::CommentDislike => "You've not disliked this comment",
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct Reaction {
    pub id: Uuid,
    pub author_id: Uuid,
    pub target_id: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReactionView {
    pub id: Uuid,
    pub author: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub article: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl Reaction {
    pub fn view(self, kind: ReactionKind) -> ReactionView {
        let (article, comment) = if kind.targets_article() {
            (Some(self.target_id), None)
        } else {
            (None, Some(self.target_id))
        };

        ReactionView {
            id: self.id,
            author: self.author_id,
            article,
            comment,
            created_at: self.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn article_kinds_serialize_article_key() {
        let reaction = Reaction {
            id: Uuid::new_v4(),
            author_id: Uuid::new_v4(),
            target_id: Uuid::new_v4(),
            created_at: Utc::now(),
        };
        let target = reaction.target_id;

        let json = serde_json::to_value(reaction.clone().view(ReactionKind::Favourite)).unwrap();
        assert_eq!(json["article"], target.to_string());
        assert!(json.get("comment").is_none());

        let json = serde_json::to_value(reaction.view(ReactionKind::CommentDislike)).unwrap();
        assert_eq!(json["comment"], target.to_string());
        assert!(json.get("article").is_none());
    }

    #[test]
    fn tables_are_distinct() {
        let kinds = [
            ReactionKind::ArticleLike,
            ReactionKind::Favourite,
            ReactionKind::CommentLike,
            ReactionKind::CommentDislike,
        ];
        let tables: std::collections::HashSet<_> = kinds.iter().map(|k| k.table()).collect();
        assert_eq!(tables.len(), kinds.len());
    }
}
