// src/handlers/comments.rs

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;
use sqlx::PgPool;
use validator::Validate;

use crate::{
    error::AppError,
    models::comment::{CommentRequest, CommentResponse},
    utils::{guard::ensure_owner, html::clean_html, jwt::Claims},
};

async fn article_exists(pool: &PgPool, article_id: i64) -> Result<(), AppError> {
    let exists =
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM articles WHERE id = $1)")
            .bind(article_id)
            .fetch_one(pool)
            .await?;

    if !exists {
        return Err(AppError::NotFound("Article not found".to_string()));
    }
    Ok(())
}

/// List all comments for an article, oldest first (Public).
pub async fn list_comments(
    State(pool): State<PgPool>,
    Path(article_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    article_exists(&pool, article_id).await?;

    let comments = sqlx::query_as::<_, CommentResponse>(
        r#"
        SELECT
            c.id, c.user_id, c.article_id, u.username, c.content,
            c.pub_date, c.update_date
        FROM comments c
        JOIN users u ON c.user_id = u.id
        WHERE c.article_id = $1
        ORDER BY c.pub_date ASC
        "#,
    )
    .bind(article_id)
    .fetch_all(&pool)
    .await?;

    Ok(Json(comments))
}

/// Publish a comment on an article.
pub async fn create_comment(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
    Path(article_id): Path<i64>,
    Json(payload): Json<CommentRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    article_exists(&pool, article_id).await?;

    let user_id = claims.user_id();
    let content = clean_html(&payload.content);

    let new_id = sqlx::query_scalar::<_, i64>(
        r#"
        INSERT INTO comments (user_id, article_id, content)
        VALUES ($1, $2, $3)
        RETURNING id
        "#,
    )
    .bind(user_id)
    .bind(article_id)
    .bind(&content)
    .fetch_one(&pool)
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "id": new_id,
            "message": "You successfully published a comment on this article",
        })),
    ))
}

#[derive(sqlx::FromRow)]
struct CommentOwnerRow {
    user_id: i64,
    article_id: i64,
}

async fn fetch_comment(pool: &PgPool, id: i64) -> Result<CommentOwnerRow, AppError> {
    sqlx::query_as::<_, CommentOwnerRow>(
        "SELECT user_id, article_id FROM comments WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or(AppError::NotFound("Comment not found".to_string()))
}

/// Update one's own comment.
pub async fn update_comment(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i64>,
    Json(payload): Json<CommentRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let comment = fetch_comment(&pool, id).await?;
    ensure_owner(claims.user_id(), comment.user_id)?;

    let content = clean_html(&payload.content);

    sqlx::query("UPDATE comments SET content = $1, update_date = NOW() WHERE id = $2")
        .bind(&content)
        .bind(id)
        .execute(&pool)
        .await?;

    Ok(Json(json!({
        "article_id": comment.article_id,
        "message": "You successfully updated your comment on this article",
    })))
}

/// Delete one's own comment.
pub async fn delete_comment(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let comment = fetch_comment(&pool, id).await?;
    ensure_owner(claims.user_id(), comment.user_id)?;

    sqlx::query("DELETE FROM comments WHERE id = $1")
        .bind(id)
        .execute(&pool)
        .await?;

    Ok(Json(json!({
        "article_id": comment.article_id,
        "message": "You successfully deleted your comment on this article",
    })))
}
