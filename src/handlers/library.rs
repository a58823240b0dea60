// src/handlers/library.rs

use axum::{
    Extension, Json,
    extract::{Path, State},
    response::IntoResponse,
};
use serde_json::json;
use sqlx::PgPool;

use crate::{
    error::AppError,
    models::{
        favorite::FavoriteArticleResponse,
        reaction::{ReactedArticleResponse, ReactionKind},
        reading::ReadingResponse,
        subscription::SubscriptionResponse,
        user::MeResponse,
    },
    utils::{guard::ensure_owner, jwt::Claims},
};

/// Personal page of the logged-in user.
pub async fn personal_page(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = claims.user_id();

    let me = sqlx::query_as::<_, crate::models::user::User>(
        "SELECT id, username, email, password, user_image, created_at FROM users WHERE id = $1",
    )
    .bind(user_id)
    .fetch_optional(&pool)
    .await?
    .ok_or(AppError::NotFound("User not found".to_string()))?;

    let subscribers = super::authors::subscriber_count(&pool, user_id).await?;

    Ok(Json(MeResponse {
        id: me.id,
        username: me.username,
        email: me.email,
        user_image: me.user_image,
        created_at: me.created_at,
        subscribers,
    }))
}

/// Authors the current user is subscribed to.
pub async fn list_subscriptions(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let subscriptions = sqlx::query_as::<_, SubscriptionResponse>(
        r#"
        SELECT s.id, u.id AS author_id, u.username AS author_username, s.created_at
        FROM subscriptions s
        JOIN users u ON s.subscribe_to_id = u.id
        WHERE s.subscriber_id = $1
        ORDER BY s.created_at DESC
        "#,
    )
    .bind(claims.user_id())
    .fetch_all(&pool)
    .await?;

    Ok(Json(subscriptions))
}

/// Articles in the current user's favorites.
pub async fn list_favorites(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let favorites = sqlx::query_as::<_, FavoriteArticleResponse>(
        r#"
        SELECT
            fa.article_id, a.title, u.username AS author_username,
            fa.added_at
        FROM favorite_lists fl
        JOIN favorite_articles fa ON fa.favorite_id = fl.id
        JOIN articles a ON fa.article_id = a.id
        JOIN users u ON a.author_id = u.id
        WHERE fl.user_id = $1
        ORDER BY a.id
        "#,
    )
    .bind(claims.user_id())
    .fetch_all(&pool)
    .await?;

    Ok(Json(favorites))
}

/// Remove a single article from Favorites.
///
/// Unlike the public toggle, this never creates a favorites list for a
/// user who has none; it only reports there is nothing to remove.
pub async fn remove_favorite(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
    Path(article_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let exists =
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM articles WHERE id = $1)")
            .bind(article_id)
            .fetch_one(&pool)
            .await?;

    if !exists {
        return Err(AppError::NotFound("Article not found".to_string()));
    }

    let list_id =
        sqlx::query_scalar::<_, i64>("SELECT id FROM favorite_lists WHERE user_id = $1")
            .bind(claims.user_id())
            .fetch_optional(&pool)
            .await?;

    let Some(list_id) = list_id else {
        return Ok(Json(json!({
            "message": "You do not have any articles to remove from Favorites",
            "removed": false,
        })));
    };

    let deleted = sqlx::query(
        "DELETE FROM favorite_articles WHERE favorite_id = $1 AND article_id = $2",
    )
    .bind(list_id)
    .bind(article_id)
    .execute(&pool)
    .await?
    .rows_affected();

    if deleted == 0 {
        return Ok(Json(json!({
            "message": "This article is not in your Favorites",
            "removed": false,
        })));
    }

    Ok(Json(json!({
        "message": "You successfully removed an article from your Favorites",
        "removed": true,
    })))
}

/// Empty the current user's favorites.
/// A user who never favorited anything gets the same success answer.
pub async fn clear_favorites(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    sqlx::query(
        r#"
        DELETE FROM favorite_articles
        WHERE favorite_id IN (SELECT id FROM favorite_lists WHERE user_id = $1)
        "#,
    )
    .bind(claims.user_id())
    .execute(&pool)
    .await?;

    Ok(Json(json!({
        "message": "All your Favorites were successfully deleted",
    })))
}

/// Reading history, latest first.
pub async fn reading_history(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let readings = sqlx::query_as::<_, ReadingResponse>(
        r#"
        SELECT
            r.id, r.article_id, a.title, u.username AS author_username,
            r.date_read
        FROM user_readings r
        JOIN articles a ON r.article_id = a.id
        JOIN users u ON a.author_id = u.id
        WHERE r.user_id = $1
        ORDER BY r.date_read DESC
        "#,
    )
    .bind(claims.user_id())
    .fetch_all(&pool)
    .await?;

    Ok(Json(readings))
}

/// Forget everything the user has read.
pub async fn clear_reading_history(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    sqlx::query("DELETE FROM user_readings WHERE user_id = $1")
        .bind(claims.user_id())
        .execute(&pool)
        .await?;

    Ok(Json(json!({
        "message": "You successfully cleared your reading history",
    })))
}

/// Delete a single reading-history entry.
pub async fn delete_reading(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let owner_id = sqlx::query_scalar::<_, i64>("SELECT user_id FROM user_readings WHERE id = $1")
        .bind(id)
        .fetch_optional(&pool)
        .await?
        .ok_or(AppError::NotFound("Reading not found".to_string()))?;

    ensure_owner(claims.user_id(), owner_id)?;

    sqlx::query("DELETE FROM user_readings WHERE id = $1")
        .bind(id)
        .execute(&pool)
        .await?;

    Ok(Json(json!({
        "message": "You successfully deleted info about reading this article from your reading history",
    })))
}

async fn reacted_articles(
    pool: &PgPool,
    user_id: i64,
    kind: ReactionKind,
) -> Result<Vec<ReactedArticleResponse>, AppError> {
    Ok(sqlx::query_as::<_, ReactedArticleResponse>(
        r#"
        SELECT
            r.id AS reaction_id, r.article_id, a.title,
            u.username AS author_username, r.reaction_date
        FROM reactions r
        JOIN articles a ON r.article_id = a.id
        JOIN users u ON a.author_id = u.id
        WHERE r.user_id = $1 AND r.value = $2
        ORDER BY r.reaction_date DESC
        "#,
    )
    .bind(user_id)
    .bind(kind.value())
    .fetch_all(pool)
    .await?)
}

/// Articles the user liked, latest reaction first.
pub async fn liked_articles(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let list = reacted_articles(&pool, claims.user_id(), ReactionKind::Like).await?;
    Ok(Json(list))
}

/// Articles the user disliked, latest reaction first.
pub async fn disliked_articles(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let list = reacted_articles(&pool, claims.user_id(), ReactionKind::Dislike).await?;
    Ok(Json(list))
}

async fn clear_reactions(
    pool: &PgPool,
    user_id: i64,
    kind: ReactionKind,
) -> Result<(), AppError> {
    sqlx::query("DELETE FROM reactions WHERE user_id = $1 AND value = $2")
        .bind(user_id)
        .bind(kind.value())
        .execute(pool)
        .await?;
    Ok(())
}

/// Drop all of the user's likes.
pub async fn clear_likes(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    clear_reactions(&pool, claims.user_id(), ReactionKind::Like).await?;

    Ok(Json(json!({
        "message": "You successfully cleared your likes",
    })))
}

/// Drop all of the user's dislikes.
pub async fn clear_dislikes(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    clear_reactions(&pool, claims.user_id(), ReactionKind::Dislike).await?;

    Ok(Json(json!({
        "message": "You successfully cleared your dislikes",
    })))
}

/// Delete a single reaction by id.
pub async fn delete_reaction(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let row = sqlx::query_as::<_, (i64, i16)>(
        "SELECT user_id, value FROM reactions WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(&pool)
    .await?
    .ok_or(AppError::NotFound("Reaction not found".to_string()))?;

    ensure_owner(claims.user_id(), row.0)?;

    sqlx::query("DELETE FROM reactions WHERE id = $1")
        .bind(id)
        .execute(&pool)
        .await?;

    let message = if row.1 > 0 {
        "You successfully deleted one like reaction"
    } else {
        "You successfully deleted one dislike reaction"
    };

    Ok(Json(json!({ "message": message })))
}
