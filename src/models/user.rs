// src/models/user.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Represents the 'users' table in the database.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct User {
    pub id: i64,

    /// Unique username.
    pub username: String,

    /// Unique email address.
    pub email: String,

    /// Argon2 password hash.
    /// Skipped during serialization to prevent leaking sensitive data.
    #[serde(skip)]
    pub password: String,

    /// Path of the user's avatar under the media directory.
    pub user_image: Option<String>,

    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// Public-facing author info (no email, no hash).
#[derive(Debug, Serialize, FromRow)]
pub struct AuthorResponse {
    pub id: i64,
    pub username: String,
    pub user_image: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// Author page payload: author info plus subscriber count and the
/// caller's subscription status.
#[derive(Debug, Serialize)]
pub struct AuthorPageResponse {
    #[serde(flatten)]
    pub author: AuthorResponse,
    pub subscribers: i64,
    pub is_subscribed: bool,
}

/// Personal page payload for the logged-in user.
#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub user_image: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub subscribers: i64,
}

/// DTO for creating a new user (Registration).
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(length(
        min = 3,
        max = 50,
        message = "Username length must be between 3 and 50 characters."
    ))]
    pub username: String,
    #[validate(email(message = "Enter a valid email address."))]
    pub email: String,
    #[validate(length(
        min = 4,
        max = 128,
        message = "Password length must be between 4 and 128 characters."
    ))]
    pub password: String,
}

/// DTO for user login.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, max = 50))]
    pub username: String,
    #[validate(length(min = 1, max = 128))]
    pub password: String,
}
