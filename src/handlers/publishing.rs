// src/handlers/publishing.rs

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;
use sqlx::{PgPool, Postgres, Transaction};
use validator::Validate;

use crate::{
    error::AppError,
    models::article::{Article, ArticleRequest, ArticleSummary},
    utils::{guard::ensure_owner, html::clean_html, jwt::Claims, slug::slugify},
};

const MAX_TAGS: usize = 10;

/// List articles published by the current user, newest first.
pub async fn list_my_articles(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let mut articles = sqlx::query_as::<_, ArticleSummary>(
        r#"
        SELECT
            a.id, a.author_id, u.username AS author_username,
            a.title, a.image, a.times_read, a.created_at
        FROM articles a
        JOIN users u ON a.author_id = u.id
        WHERE a.author_id = $1
        ORDER BY a.created_at DESC
        "#,
    )
    .bind(claims.user_id())
    .fetch_all(&pool)
    .await?;

    super::articles::attach_tags(&pool, &mut articles).await?;

    Ok(Json(articles))
}

async fn fetch_own_article(
    pool: &PgPool,
    requester_id: i64,
    article_id: i64,
) -> Result<Article, AppError> {
    let article = sqlx::query_as::<_, Article>(
        r#"
        SELECT id, author_id, title, content, image, times_read, created_at, updated_at
        FROM articles
        WHERE id = $1
        "#,
    )
    .bind(article_id)
    .fetch_optional(pool)
    .await?
    .ok_or(AppError::NotFound("Article not found".to_string()))?;

    ensure_owner(requester_id, article.author_id)?;

    Ok(article)
}

/// Detail of one's own article, body included.
pub async fn get_my_article(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let article = fetch_own_article(&pool, claims.user_id(), id).await?;

    let tags = sqlx::query_scalar::<_, String>(
        r#"
        SELECT t.name
        FROM tags t
        JOIN article_tags at ON at.tag_id = t.id
        WHERE at.article_id = $1
        ORDER BY t.name
        "#,
    )
    .bind(id)
    .fetch_all(&pool)
    .await?;

    Ok(Json(json!({ "article": article, "tags": tags })))
}

/// Replaces an article's tag set, creating tags on first use.
///
/// Labels are deduplicated by slug so "Pop Music" and "pop music" do not
/// become two tags.
async fn set_article_tags(
    tx: &mut Transaction<'_, Postgres>,
    article_id: i64,
    labels: &[String],
) -> Result<(), AppError> {
    sqlx::query("DELETE FROM article_tags WHERE article_id = $1")
        .bind(article_id)
        .execute(&mut **tx)
        .await?;

    let mut seen = Vec::new();

    for label in labels {
        let name = label.trim();
        if name.is_empty() {
            continue;
        }

        let slug = slugify(name);
        if slug.is_empty() || seen.contains(&slug) {
            continue;
        }
        seen.push(slug.clone());

        let tag_id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO tags (name, slug) VALUES ($1, $2)
            ON CONFLICT (slug) DO UPDATE SET name = tags.name
            RETURNING id
            "#,
        )
        .bind(name)
        .bind(&slug)
        .fetch_one(&mut **tx)
        .await?;

        sqlx::query("INSERT INTO article_tags (article_id, tag_id) VALUES ($1, $2)")
            .bind(article_id)
            .bind(tag_id)
            .execute(&mut **tx)
            .await?;
    }

    Ok(())
}

fn validate_article(payload: &ArticleRequest) -> Result<(), AppError> {
    payload
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    if payload.tags.len() > MAX_TAGS {
        return Err(AppError::BadRequest(format!(
            "An article can carry at most {} tags",
            MAX_TAGS
        )));
    }

    Ok(())
}

/// Publish a new article.
pub async fn publish_article(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<ArticleRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_article(&payload)?;

    let content = clean_html(&payload.content);

    let mut tx = pool.begin().await?;

    let article_id = sqlx::query_scalar::<_, i64>(
        r#"
        INSERT INTO articles (author_id, title, content, image)
        VALUES ($1, $2, $3, $4)
        RETURNING id
        "#,
    )
    .bind(claims.user_id())
    .bind(&payload.title)
    .bind(&content)
    .bind(&payload.image)
    .fetch_one(&mut *tx)
    .await
    .map_err(|e| {
        tracing::error!("Failed to publish article: {:?}", e);
        AppError::InternalServerError(e.to_string())
    })?;

    set_article_tags(&mut tx, article_id, &payload.tags).await?;

    tx.commit().await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "id": article_id,
            "message": "You successfully published new article",
        })),
    ))
}

/// Update one's own article, replacing its tag set.
pub async fn update_article(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i64>,
    Json(payload): Json<ArticleRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_article(&payload)?;

    fetch_own_article(&pool, claims.user_id(), id).await?;

    let content = clean_html(&payload.content);

    let mut tx = pool.begin().await?;

    sqlx::query(
        r#"
        UPDATE articles
        SET title = $1, content = $2, image = $3, updated_at = NOW()
        WHERE id = $4
        "#,
    )
    .bind(&payload.title)
    .bind(&content)
    .bind(&payload.image)
    .bind(id)
    .execute(&mut *tx)
    .await?;

    set_article_tags(&mut tx, id, &payload.tags).await?;

    tx.commit().await?;

    Ok(Json(json!({
        "id": id,
        "message": "You successfully updated your article",
    })))
}

/// Delete one's own article.
///
/// Reactions, comments, readings and favorite membership go with it via
/// the declared foreign-key cascades.
pub async fn delete_article(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    fetch_own_article(&pool, claims.user_id(), id).await?;

    sqlx::query("DELETE FROM articles WHERE id = $1")
        .bind(id)
        .execute(&pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to delete article: {:?}", e);
            AppError::InternalServerError(e.to_string())
        })?;

    Ok(Json(json!({
        "message": "You successfully deleted your article",
    })))
}
