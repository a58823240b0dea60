// src/handlers/profile.rs

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;
use sqlx::PgPool;
use url::Url;
use validator::Validate;

use crate::{
    error::AppError,
    models::profile::{CreateSocialMediaRequest, DescriptionRequest, SOCIAL_MEDIA_CODES},
    utils::{guard::ensure_owner, html::clean_html, jwt::Claims},
};

/// The current user's own about page.
pub async fn my_about(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let about = super::authors::build_about(&pool, claims.user_id()).await?;
    Ok(Json(about))
}

async fn description_exists(pool: &PgPool, user_id: i64) -> Result<bool, AppError> {
    Ok(sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM user_descriptions WHERE user_id = $1)",
    )
    .bind(user_id)
    .fetch_one(pool)
    .await?)
}

/// Publish the profile description. A user carries at most one.
pub async fn add_description(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<DescriptionRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let user_id = claims.user_id();

    if description_exists(&pool, user_id).await? {
        return Err(AppError::Conflict(
            "You already have a description, you can either delete or update it".to_string(),
        ));
    }

    let content = clean_html(&payload.content);

    sqlx::query("INSERT INTO user_descriptions (user_id, content) VALUES ($1, $2)")
        .bind(user_id)
        .bind(&content)
        .execute(&pool)
        .await
        .map_err(|e| {
            // Two concurrent first-time publishes race on the unique user_id.
            if e.to_string().contains("unique constraint") {
                return AppError::Conflict(
                    "You already have a description, you can either delete or update it"
                        .to_string(),
                );
            }
            AppError::InternalServerError(e.to_string())
        })?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "You successfully published your description",
        })),
    ))
}

/// Update the profile description.
pub async fn update_description(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<DescriptionRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let user_id = claims.user_id();

    if !description_exists(&pool, user_id).await? {
        return Err(AppError::NotFound(
            "You cannot update your description, as you do not have one".to_string(),
        ));
    }

    let content = clean_html(&payload.content);

    sqlx::query("UPDATE user_descriptions SET content = $1 WHERE user_id = $2")
        .bind(&content)
        .bind(user_id)
        .execute(&pool)
        .await?;

    Ok(Json(json!({
        "message": "You successfully updated your description",
    })))
}

/// Delete the profile description.
pub async fn delete_description(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let deleted = sqlx::query("DELETE FROM user_descriptions WHERE user_id = $1")
        .bind(claims.user_id())
        .execute(&pool)
        .await?
        .rows_affected();

    if deleted == 0 {
        return Err(AppError::NotFound(
            "You do not have a description, you cannot delete it".to_string(),
        ));
    }

    Ok(Json(json!({
        "message": "You successfully deleted your description",
    })))
}

/// Add a social media link to the profile.
pub async fn add_social_media(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<CreateSocialMediaRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    if !SOCIAL_MEDIA_CODES
        .iter()
        .any(|(code, _)| *code == payload.title)
    {
        return Err(AppError::BadRequest(format!(
            "Unknown social network code '{}'",
            payload.title
        )));
    }

    if Url::parse(&payload.link).is_err() {
        return Err(AppError::BadRequest("Enter a valid URL.".to_string()));
    }

    let new_id = sqlx::query_scalar::<_, i64>(
        r#"
        INSERT INTO social_media (user_id, title, link)
        VALUES ($1, $2, $3)
        RETURNING id
        "#,
    )
    .bind(claims.user_id())
    .bind(&payload.title)
    .bind(&payload.link)
    .fetch_one(&pool)
    .await
    .map_err(|e| {
        if e.to_string().contains("unique constraint") {
            return AppError::Conflict("This link is already in use".to_string());
        }
        AppError::InternalServerError(e.to_string())
    })?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "id": new_id,
            "message": "You successfully added new link to your social media",
        })),
    ))
}

/// Delete one of the profile's social media links.
pub async fn delete_social_media(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let owner_id = sqlx::query_scalar::<_, i64>("SELECT user_id FROM social_media WHERE id = $1")
        .bind(id)
        .fetch_optional(&pool)
        .await?
        .ok_or(AppError::NotFound("Social media link not found".to_string()))?;

    ensure_owner(claims.user_id(), owner_id)?;

    sqlx::query("DELETE FROM social_media WHERE id = $1")
        .bind(id)
        .execute(&pool)
        .await?;

    Ok(Json(json!({
        "message": "You successfully deleted this social media link",
    })))
}
