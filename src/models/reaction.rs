// src/models/reaction.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Represents the 'reactions' table in the database.
/// At most one row exists per (user, article); the schema enforces this
/// with a unique constraint.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Reaction {
    pub id: i64,
    pub user_id: i64,
    pub article_id: i64,
    /// +1 for a like, -1 for a dislike.
    pub value: i16,
    pub reaction_date: chrono::DateTime<chrono::Utc>,
}

/// The two reaction endpoints a user can hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReactionKind {
    Like,
    Dislike,
}

impl ReactionKind {
    pub fn value(self) -> i16 {
        match self {
            ReactionKind::Like => 1,
            ReactionKind::Dislike => -1,
        }
    }
}

/// Stored reaction state of one (user, article) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReactionState {
    None,
    Liked,
    Disliked,
}

impl ReactionState {
    /// Builds the state from the stored row value, if any.
    pub fn from_stored(value: Option<i16>) -> Self {
        match value {
            Option::None => ReactionState::None,
            Some(v) if v > 0 => ReactionState::Liked,
            Some(_) => ReactionState::Disliked,
        }
    }

    /// The reaction this state exposes to the caller, if any.
    pub fn kind(self) -> Option<ReactionKind> {
        match self {
            ReactionState::None => Option::None,
            ReactionState::Liked => Some(ReactionKind::Like),
            ReactionState::Disliked => Some(ReactionKind::Dislike),
        }
    }

    /// Storage mutation a toggle resolves to.
    ///
    /// Hitting the endpoint that matches the current state removes the
    /// reaction (toggle, not set); hitting the opposite endpoint flips it;
    /// from a clean state a new row is inserted.
    pub fn toggle(self, kind: ReactionKind) -> ReactionChange {
        match (self, kind) {
            (ReactionState::None, kind) => ReactionChange::Insert(kind.value()),
            (ReactionState::Liked, ReactionKind::Dislike) => {
                ReactionChange::Flip(ReactionKind::Dislike.value())
            }
            (ReactionState::Disliked, ReactionKind::Like) => {
                ReactionChange::Flip(ReactionKind::Like.value())
            }
            (ReactionState::Liked, ReactionKind::Like) => ReactionChange::Clear,
            (ReactionState::Disliked, ReactionKind::Dislike) => ReactionChange::Clear,
        }
    }
}

/// Row mutation produced by a reaction toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReactionChange {
    /// Insert a new row with the given value.
    Insert(i16),
    /// Update the existing row to the given value.
    Flip(i16),
    /// Delete the existing row.
    Clear,
}

/// List item for the liked/disliked articles pages.
#[derive(Debug, Serialize, FromRow)]
pub struct ReactedArticleResponse {
    pub reaction_id: i64,
    pub article_id: i64,
    pub title: String,
    pub author_username: String,
    pub reaction_date: chrono::DateTime<chrono::Utc>,
}
