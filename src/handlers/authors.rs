// src/handlers/authors.rs

use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};
use sqlx::PgPool;

use crate::{
    error::AppError,
    models::{
        article::ArticleSummary,
        profile::{AboutResponse, SocialMedia},
        user::{AuthorPageResponse, AuthorResponse},
    },
    utils::jwt::OptionalClaims,
};

async fn fetch_author(pool: &PgPool, id: i64) -> Result<AuthorResponse, AppError> {
    sqlx::query_as::<_, AuthorResponse>(
        "SELECT id, username, user_image, created_at FROM users WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or(AppError::NotFound("Author not found".to_string()))
}

pub(super) async fn subscriber_count(pool: &PgPool, author_id: i64) -> Result<i64, AppError> {
    Ok(sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM subscriptions WHERE subscribe_to_id = $1",
    )
    .bind(author_id)
    .fetch_one(pool)
    .await?)
}

/// Sum of times_read over an author's articles.
pub(super) async fn readings_total(pool: &PgPool, author_id: i64) -> Result<i64, AppError> {
    Ok(sqlx::query_scalar::<_, i64>(
        "SELECT COALESCE(SUM(times_read), 0)::BIGINT FROM articles WHERE author_id = $1",
    )
    .bind(author_id)
    .fetch_one(pool)
    .await?)
}

/// Author page (Public): author info, subscriber count, and whether the
/// caller is subscribed.
pub async fn author_page(
    State(pool): State<PgPool>,
    OptionalClaims(claims): OptionalClaims,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let author = fetch_author(&pool, id).await?;
    let subscribers = subscriber_count(&pool, id).await?;

    let is_subscribed = match claims {
        Some(claims) => sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM subscriptions
                WHERE subscriber_id = $1 AND subscribe_to_id = $2
            )
            "#,
        )
        .bind(claims.user_id())
        .bind(id)
        .fetch_one(&pool)
        .await?,
        None => false,
    };

    Ok(Json(AuthorPageResponse {
        author,
        subscribers,
        is_subscribed,
    }))
}

/// About page of an author (Public): description, social media links
/// ordered by network, and how many times their articles were read.
pub async fn about_page(
    State(pool): State<PgPool>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    fetch_author(&pool, id).await?;

    let about = build_about(&pool, id).await?;

    Ok(Json(about))
}

pub(super) async fn build_about(pool: &PgPool, user_id: i64) -> Result<AboutResponse, AppError> {
    let description = sqlx::query_scalar::<_, String>(
        "SELECT content FROM user_descriptions WHERE user_id = $1",
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    let social_media = sqlx::query_as::<_, SocialMedia>(
        "SELECT id, user_id, title, link FROM social_media WHERE user_id = $1 ORDER BY title",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    let readings = readings_total(pool, user_id).await?;

    Ok(AboutResponse {
        description,
        social_media,
        readings,
    })
}

/// Articles by an author (Public), most read first.
pub async fn author_articles(
    State(pool): State<PgPool>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    fetch_author(&pool, id).await?;

    let mut articles = sqlx::query_as::<_, ArticleSummary>(
        r#"
        SELECT
            a.id, a.author_id, u.username AS author_username,
            a.title, a.image, a.times_read, a.created_at
        FROM articles a
        JOIN users u ON a.author_id = u.id
        WHERE a.author_id = $1
        ORDER BY a.times_read DESC
        "#,
    )
    .bind(id)
    .fetch_all(&pool)
    .await?;

    super::articles::attach_tags(&pool, &mut articles).await?;

    Ok(Json(articles))
}
