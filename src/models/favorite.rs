// src/models/favorite.rs

use serde::Serialize;
use sqlx::FromRow;

/// Represents the per-user 'favorite_lists' row (0 or 1 per user).
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct FavoriteList {
    pub id: i64,
    pub user_id: i64,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// List item for the favorites page, including joined article info.
#[derive(Debug, Serialize, FromRow)]
pub struct FavoriteArticleResponse {
    pub article_id: i64,
    pub title: String,
    pub author_username: String,
    pub added_at: chrono::DateTime<chrono::Utc>,
}
