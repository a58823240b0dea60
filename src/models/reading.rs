// src/models/reading.rs

use serde::Serialize;
use sqlx::FromRow;

/// Represents the 'user_readings' table in the database.
/// At most one row accumulates per (user, article) per UTC calendar day;
/// re-reads within a day refresh the timestamp of that day's row.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct UserReading {
    pub id: i64,
    pub user_id: i64,
    pub article_id: i64,
    pub date_read: chrono::DateTime<chrono::Utc>,
}

/// List item for the reading-history page.
#[derive(Debug, Serialize, FromRow)]
pub struct ReadingResponse {
    pub id: i64,
    pub article_id: i64,
    pub title: String,
    pub author_username: String,
    pub date_read: chrono::DateTime<chrono::Utc>,
}
