// src/handlers/interaction.rs

use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};
use serde_json::json;
use sqlx::PgPool;

use crate::{
    error::AppError,
    models::{
        reaction::{ReactionChange, ReactionKind, ReactionState},
        subscription::SubscriptionState,
    },
    utils::jwt::{Claims, OptionalClaims},
};

async fn article_author(pool: &PgPool, article_id: i64) -> Result<i64, AppError> {
    sqlx::query_scalar::<_, i64>("SELECT author_id FROM articles WHERE id = $1")
        .bind(article_id)
        .fetch_optional(pool)
        .await?
        .ok_or(AppError::NotFound("Article not found".to_string()))
}

/// Applies one reaction toggle for (user, article).
///
/// Hitting the same endpoint twice returns the pair to no reaction;
/// hitting the opposite endpoint flips the stored value. The state is
/// read and mutated inside one transaction, and the unique constraint on
/// (user_id, article_id) turns a lost insert race into a 409.
async fn react(
    pool: &PgPool,
    claims: Option<Claims>,
    article_id: i64,
    kind: ReactionKind,
) -> Result<impl IntoResponse + use<>, AppError> {
    article_author(pool, article_id).await?;

    let claims = claims.ok_or_else(|| {
        let action = match kind {
            ReactionKind::Like => "like",
            ReactionKind::Dislike => "dislike",
        };
        AppError::AuthError(format!(
            "You cannot leave {} while you are not authenticated",
            action
        ))
    })?;
    let user_id = claims.user_id();

    let mut tx = pool.begin().await?;

    let stored = sqlx::query_scalar::<_, i16>(
        "SELECT value FROM reactions WHERE user_id = $1 AND article_id = $2",
    )
    .bind(user_id)
    .bind(article_id)
    .fetch_optional(&mut *tx)
    .await?;

    let change = ReactionState::from_stored(stored).toggle(kind);

    match change {
        ReactionChange::Insert(value) => {
            sqlx::query(
                "INSERT INTO reactions (user_id, article_id, value) VALUES ($1, $2, $3)",
            )
            .bind(user_id)
            .bind(article_id)
            .bind(value)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                if e.to_string().contains("unique constraint") {
                    // Concurrent request handled gracefully
                    return AppError::Conflict("Already reacted".to_string());
                }
                AppError::InternalServerError(e.to_string())
            })?;
        }
        ReactionChange::Flip(value) => {
            sqlx::query(
                r#"
                UPDATE reactions SET value = $1, reaction_date = NOW()
                WHERE user_id = $2 AND article_id = $3
                "#,
            )
            .bind(value)
            .bind(user_id)
            .bind(article_id)
            .execute(&mut *tx)
            .await?;
        }
        ReactionChange::Clear => {
            sqlx::query("DELETE FROM reactions WHERE user_id = $1 AND article_id = $2")
                .bind(user_id)
                .bind(article_id)
                .execute(&mut *tx)
                .await?;
        }
    }

    tx.commit().await?;

    let resulting = match change {
        ReactionChange::Clear => None,
        ReactionChange::Insert(_) | ReactionChange::Flip(_) => Some(kind),
    };

    Ok(Json(json!({ "reaction": resulting })))
}

/// Toggle a like on an article.
pub async fn leave_like(
    State(pool): State<PgPool>,
    OptionalClaims(claims): OptionalClaims,
    Path(article_id): Path<i64>,
) -> Result<impl IntoResponse + use<>, AppError> {
    react(&pool, claims, article_id, ReactionKind::Like).await
}

/// Toggle a dislike on an article.
pub async fn leave_dislike(
    State(pool): State<PgPool>,
    OptionalClaims(claims): OptionalClaims,
    Path(article_id): Path<i64>,
) -> Result<impl IntoResponse + use<>, AppError> {
    react(&pool, claims, article_id, ReactionKind::Dislike).await
}

/// Toggle Favorite membership for an article.
///
/// The first favorite a user ever adds also creates their favorites
/// list; after that the article's membership flips on each call.
pub async fn toggle_favorite(
    State(pool): State<PgPool>,
    OptionalClaims(claims): OptionalClaims,
    Path(article_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    article_author(&pool, article_id).await?;

    let claims = claims.ok_or(AppError::AuthError(
        "Please, become an authenticated user to add this article to your Favorites".to_string(),
    ))?;
    let user_id = claims.user_id();

    let mut tx = pool.begin().await?;

    let list_id = sqlx::query_scalar::<_, i64>(
        "SELECT id FROM favorite_lists WHERE user_id = $1",
    )
    .bind(user_id)
    .fetch_optional(&mut *tx)
    .await?;

    let (message, favorited) = match list_id {
        None => {
            let list_id = sqlx::query_scalar::<_, i64>(
                "INSERT INTO favorite_lists (user_id) VALUES ($1) RETURNING id",
            )
            .bind(user_id)
            .fetch_one(&mut *tx)
            .await?;

            sqlx::query(
                "INSERT INTO favorite_articles (favorite_id, article_id) VALUES ($1, $2)",
            )
            .bind(list_id)
            .bind(article_id)
            .execute(&mut *tx)
            .await?;

            (
                "You successfully added this article to your Favorites",
                true,
            )
        }
        Some(list_id) => {
            let is_member = sqlx::query_scalar::<_, bool>(
                "SELECT EXISTS(SELECT 1 FROM favorite_articles WHERE favorite_id = $1 AND article_id = $2)",
            )
            .bind(list_id)
            .bind(article_id)
            .fetch_one(&mut *tx)
            .await?;

            if is_member {
                sqlx::query(
                    "DELETE FROM favorite_articles WHERE favorite_id = $1 AND article_id = $2",
                )
                .bind(list_id)
                .bind(article_id)
                .execute(&mut *tx)
                .await?;

                (
                    "You successfully removed this article from your Favorites",
                    false,
                )
            } else {
                sqlx::query(
                    "INSERT INTO favorite_articles (favorite_id, article_id) VALUES ($1, $2)",
                )
                .bind(list_id)
                .bind(article_id)
                .execute(&mut *tx)
                .await?;

                (
                    "You successfully added this article to your Favorites",
                    true,
                )
            }
        }
    };

    tx.commit().await?;

    Ok(Json(json!({ "message": message, "favorited": favorited })))
}

/// Flips the subscription row for (subscriber, author).
///
/// Both subscribe entry points funnel into this routine.
async fn toggle_subscription(
    pool: &PgPool,
    claims: Option<Claims>,
    author_id: i64,
) -> Result<Json<serde_json::Value>, AppError> {
    let claims = claims.ok_or(AppError::AuthError(
        "You cannot subscribe to this author while you are not authenticated".to_string(),
    ))?;
    let subscriber_id = claims.user_id();

    if subscriber_id == author_id {
        return Err(AppError::Conflict(
            "You cannot subscribe to yourself".to_string(),
        ));
    }

    let mut tx = pool.begin().await?;

    let existing = sqlx::query_scalar::<_, i64>(
        "SELECT id FROM subscriptions WHERE subscriber_id = $1 AND subscribe_to_id = $2",
    )
    .bind(subscriber_id)
    .bind(author_id)
    .fetch_optional(&mut *tx)
    .await?;

    let (message, subscribed) = match SubscriptionState::from_stored(existing.is_some()) {
        SubscriptionState::NotSubscribed => {
            sqlx::query(
                "INSERT INTO subscriptions (subscriber_id, subscribe_to_id) VALUES ($1, $2)",
            )
            .bind(subscriber_id)
            .bind(author_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                if e.to_string().contains("unique constraint") {
                    return AppError::Conflict("Already subscribed".to_string());
                }
                AppError::InternalServerError(e.to_string())
            })?;

            ("You successfully subscribed to this author", true)
        }
        SubscriptionState::Subscribed => {
            sqlx::query(
                "DELETE FROM subscriptions WHERE subscriber_id = $1 AND subscribe_to_id = $2",
            )
            .bind(subscriber_id)
            .bind(author_id)
            .execute(&mut *tx)
            .await?;

            ("You successfully unsubscribed from this author", false)
        }
    };

    tx.commit().await?;

    Ok(Json(json!({ "message": message, "subscribed": subscribed })))
}

/// Subscribe/unsubscribe to an article's author, keyed by article id.
pub async fn subscribe_through_article(
    State(pool): State<PgPool>,
    OptionalClaims(claims): OptionalClaims,
    Path(article_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let author_id = article_author(&pool, article_id).await?;
    toggle_subscription(&pool, claims, author_id).await
}

/// Subscribe/unsubscribe to an author, keyed by author id.
pub async fn subscribe_to_author(
    State(pool): State<PgPool>,
    OptionalClaims(claims): OptionalClaims,
    Path(author_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let exists = sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE id = $1)")
        .bind(author_id)
        .fetch_one(&pool)
        .await?;

    if !exists {
        return Err(AppError::NotFound("Author not found".to_string()));
    }

    toggle_subscription(&pool, claims, author_id).await
}
