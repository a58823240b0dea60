// src/models/article.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use super::reaction::ReactionKind;

/// Represents the 'articles' table in the database.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Article {
    pub id: i64,
    pub author_id: i64,
    pub title: String,
    pub content: String,

    /// Path of the cover image under the media directory.
    pub image: String,

    pub times_read: i64,

    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// List item for article listings (no body, author joined in).
#[derive(Debug, Serialize, FromRow)]
pub struct ArticleSummary {
    pub id: i64,
    pub author_id: i64,
    pub author_username: String,
    pub title: String,
    pub image: String,
    pub times_read: i64,
    pub created_at: chrono::DateTime<chrono::Utc>,

    /// Populated after the main query from the tag join table.
    #[sqlx(skip)]
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Article detail payload.
///
/// `content` is only revealed by the read endpoint; the plain detail view
/// carries `None` so a view does not count as a reading.
#[derive(Debug, Serialize)]
pub struct ArticleDetailResponse {
    pub id: i64,
    pub author_id: i64,
    pub author_username: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    pub image: String,
    pub times_read: i64,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
    pub tags: Vec<String>,

    pub likes: i64,
    pub dislikes: i64,
    pub subscribers: i64,

    /// Caller-specific status; defaults for anonymous visitors.
    pub is_favorited: bool,
    pub is_subscribed: bool,
    pub reaction: Option<ReactionKind>,
}

/// DTO for publishing or updating an article.
#[derive(Debug, Deserialize, Validate)]
pub struct ArticleRequest {
    #[validate(length(
        min = 1,
        max = 255,
        message = "Title length must be between 1 and 255 characters."
    ))]
    pub title: String,

    #[validate(length(min = 1, message = "Content must not be empty."))]
    pub content: String,

    /// Reference to an already-uploaded image.
    #[validate(length(
        min = 1,
        max = 255,
        message = "Image path must be between 1 and 255 characters."
    ))]
    pub image: String,

    /// Tag labels; use comma-free plain names, '#' is not needed.
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Query parameters for listing articles.
#[derive(Debug, Deserialize)]
pub struct ArticleListParams {
    /// Search string for title/author match; a leading '#' or '%' turns
    /// the query into a tag lookup.
    pub q: Option<String>,

    /// Tag slug filter.
    pub tag: Option<String>,

    /// Cursor for pagination: the created_at timestamp of the last
    /// article in the previous page. Only used by the unfiltered listing.
    pub cursor: Option<chrono::DateTime<chrono::Utc>>,

    /// Number of items to return (default: 20, max: 100).
    pub limit: Option<i64>,
}

/// A tag with its slug, as shown on the index page.
#[derive(Debug, Serialize, FromRow)]
pub struct TagResponse {
    pub name: String,
    pub slug: String,
}
