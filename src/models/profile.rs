// src/models/profile.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Social networks a profile can link to, stored as two-letter codes.
pub const SOCIAL_MEDIA_CODES: [(&str, &str); 5] = [
    ("FB", "Facebook"),
    ("IM", "Instagram"),
    ("YB", "Youtube"),
    ("TT", "TikTok"),
    ("TW", "Twitter"),
];

/// Represents the 'social_media' table in the database.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SocialMedia {
    pub id: i64,
    pub user_id: i64,
    /// Two-letter network code, one of `SOCIAL_MEDIA_CODES`.
    pub title: String,
    pub link: String,
}

/// DTO for adding a social media link.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateSocialMediaRequest {
    /// Two-letter network code.
    #[validate(length(equal = 2, message = "Network code must be two letters."))]
    pub title: String,

    #[validate(length(
        min = 1,
        max = 128,
        message = "Link must be between 1 and 128 characters."
    ))]
    pub link: String,
}

/// Represents the 'user_descriptions' table (one row per user).
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct UserDescription {
    pub id: i64,
    pub user_id: i64,
    pub content: String,
}

/// DTO for publishing or updating the profile description.
#[derive(Debug, Deserialize, Validate)]
pub struct DescriptionRequest {
    #[validate(length(
        min = 1,
        max = 5000,
        message = "Description must be between 1 and 5000 characters"
    ))]
    pub content: String,
}

/// About page payload: description, ordered social links, readings total.
#[derive(Debug, Serialize)]
pub struct AboutResponse {
    pub description: Option<String>,
    pub social_media: Vec<SocialMedia>,
    /// Sum of times_read over the author's articles.
    pub readings: i64,
}
