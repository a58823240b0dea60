// src/handlers/articles.rs

use axum::{
    Json,
    extract::{Path, Query, State},
    response::IntoResponse,
};
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, Transaction};

use crate::{
    error::AppError,
    models::{
        article::{ArticleDetailResponse, ArticleListParams, ArticleSummary, TagResponse},
        reaction::ReactionState,
    },
    utils::{jwt::OptionalClaims, slug::slugify, time::utc_day_bounds},
};

/// Article row with the author joined in; shared by detail and read views.
#[derive(sqlx::FromRow)]
struct ArticleAuthorRow {
    id: i64,
    author_id: i64,
    author_username: String,
    title: String,
    content: String,
    image: String,
    times_read: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

async fn fetch_article(pool: &PgPool, id: i64) -> Result<ArticleAuthorRow, AppError> {
    sqlx::query_as::<_, ArticleAuthorRow>(
        r#"
        SELECT
            a.id, a.author_id, u.username AS author_username,
            a.title, a.content, a.image, a.times_read,
            a.created_at, a.updated_at
        FROM articles a
        JOIN users u ON a.author_id = u.id
        WHERE a.id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or(AppError::NotFound("Article not found".to_string()))
}

/// Populates the `tags` field of listed summaries with one extra query.
pub(super) async fn attach_tags(
    pool: &PgPool,
    articles: &mut [ArticleSummary],
) -> Result<(), AppError> {
    if articles.is_empty() {
        return Ok(());
    }

    let ids: Vec<i64> = articles.iter().map(|a| a.id).collect();

    let rows = sqlx::query_as::<_, (i64, String)>(
        r#"
        SELECT at.article_id, t.name
        FROM article_tags at
        JOIN tags t ON at.tag_id = t.id
        WHERE at.article_id = ANY($1)
        ORDER BY t.name
        "#,
    )
    .bind(&ids)
    .fetch_all(pool)
    .await?;

    for (article_id, name) in rows {
        if let Some(article) = articles.iter_mut().find(|a| a.id == article_id) {
            article.tags.push(name);
        }
    }

    Ok(())
}

const SUMMARY_SELECT: &str = r#"
    SELECT
        a.id, a.author_id, u.username AS author_username,
        a.title, a.image, a.times_read, a.created_at
    FROM articles a
    JOIN users u ON a.author_id = u.id
"#;

async fn articles_by_tag(pool: &PgPool, slug: &str, limit: i64) -> Result<Vec<ArticleSummary>, AppError> {
    let query = format!(
        r#"{SUMMARY_SELECT}
        JOIN article_tags at ON at.article_id = a.id
        JOIN tags t ON t.id = at.tag_id
        WHERE t.slug = $1
        ORDER BY a.times_read DESC
        LIMIT $2
        "#
    );

    Ok(sqlx::query_as::<_, ArticleSummary>(&query)
        .bind(slug)
        .bind(limit)
        .fetch_all(pool)
        .await?)
}

/// List articles (Public).
///
/// * `?tag=slug` filters by tag, most read first.
/// * `?q=text` searches titles and author usernames, most read first;
///   a query starting with '#' or '%' is a tag search instead
///   ("#pop music" finds articles tagged "pop-music").
/// * With no filter: newest first with cursor-based pagination.
pub async fn list_articles(
    State(pool): State<PgPool>,
    Query(params): Query<ArticleListParams>,
) -> Result<impl IntoResponse, AppError> {
    let limit = params.limit.unwrap_or(20).min(100); // Default 20, max 100

    let mut articles = if let Some(tag) = &params.tag {
        articles_by_tag(&pool, &slugify(tag), limit).await?
    } else if let Some(q) = params.q.as_deref().map(str::trim).filter(|q| !q.is_empty()) {
        if let Some(tag_query) = q.strip_prefix('#').or_else(|| q.strip_prefix('%')) {
            let slug = slugify(tag_query);
            if slug.is_empty() {
                return Ok(Json(Vec::<ArticleSummary>::new()));
            }
            articles_by_tag(&pool, &slug, limit).await?
        } else {
            let query = format!(
                r#"{SUMMARY_SELECT}
                WHERE a.title ILIKE '%' || $1 || '%'
                   OR u.username ILIKE '%' || $1 || '%'
                ORDER BY a.times_read DESC
                LIMIT $2
                "#
            );
            sqlx::query_as::<_, ArticleSummary>(&query)
                .bind(q)
                .bind(limit)
                .fetch_all(&pool)
                .await?
        }
    } else {
        let query = format!(
            r#"{SUMMARY_SELECT}
            WHERE ($1::TIMESTAMPTZ IS NULL OR a.created_at < $1)
            ORDER BY a.created_at DESC
            LIMIT $2
            "#
        );
        sqlx::query_as::<_, ArticleSummary>(&query)
            .bind(params.cursor)
            .bind(limit)
            .fetch_all(&pool)
            .await?
    };

    attach_tags(&pool, &mut articles).await?;

    Ok(Json(articles))
}

/// Tags currently attached to at least one article (index page data).
pub async fn list_tags(State(pool): State<PgPool>) -> Result<impl IntoResponse, AppError> {
    let tags = sqlx::query_as::<_, TagResponse>(
        r#"
        SELECT DISTINCT t.name, t.slug
        FROM tags t
        JOIN article_tags at ON at.tag_id = t.id
        ORDER BY t.name
        "#,
    )
    .fetch_all(&pool)
    .await?;

    Ok(Json(tags))
}

async fn build_detail(
    pool: &PgPool,
    article: ArticleAuthorRow,
    user_id: Option<i64>,
    reveal_content: bool,
) -> Result<ArticleDetailResponse, AppError> {
    let likes = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM reactions WHERE article_id = $1 AND value = 1",
    )
    .bind(article.id)
    .fetch_one(pool)
    .await?;

    let dislikes = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM reactions WHERE article_id = $1 AND value = -1",
    )
    .bind(article.id)
    .fetch_one(pool)
    .await?;

    let subscribers = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM subscriptions WHERE subscribe_to_id = $1",
    )
    .bind(article.author_id)
    .fetch_one(pool)
    .await?;

    let tags = sqlx::query_scalar::<_, String>(
        r#"
        SELECT t.name
        FROM tags t
        JOIN article_tags at ON at.tag_id = t.id
        WHERE at.article_id = $1
        ORDER BY t.name
        "#,
    )
    .bind(article.id)
    .fetch_all(pool)
    .await?;

    // Caller-specific status; anonymous visitors get the defaults.
    let (is_favorited, is_subscribed, reaction) = match user_id {
        Some(user_id) => {
            let is_favorited = sqlx::query_scalar::<_, bool>(
                r#"
                SELECT EXISTS(
                    SELECT 1
                    FROM favorite_lists fl
                    JOIN favorite_articles fa ON fa.favorite_id = fl.id
                    WHERE fl.user_id = $1 AND fa.article_id = $2
                )
                "#,
            )
            .bind(user_id)
            .bind(article.id)
            .fetch_one(pool)
            .await?;

            let is_subscribed = sqlx::query_scalar::<_, bool>(
                r#"
                SELECT EXISTS(
                    SELECT 1 FROM subscriptions
                    WHERE subscriber_id = $1 AND subscribe_to_id = $2
                )
                "#,
            )
            .bind(user_id)
            .bind(article.author_id)
            .fetch_one(pool)
            .await?;

            let value = sqlx::query_scalar::<_, i16>(
                "SELECT value FROM reactions WHERE user_id = $1 AND article_id = $2",
            )
            .bind(user_id)
            .bind(article.id)
            .fetch_optional(pool)
            .await?;

            (is_favorited, is_subscribed, ReactionState::from_stored(value).kind())
        }
        None => (false, false, None),
    };

    Ok(ArticleDetailResponse {
        id: article.id,
        author_id: article.author_id,
        author_username: article.author_username,
        title: article.title,
        content: reveal_content.then_some(article.content),
        image: article.image,
        times_read: article.times_read,
        created_at: article.created_at,
        updated_at: article.updated_at,
        tags,
        likes,
        dislikes,
        subscribers,
        is_favorited,
        is_subscribed,
        reaction,
    })
}

/// Get a single article (Public). The body stays hidden; a plain view is
/// not a reading.
pub async fn get_article(
    State(pool): State<PgPool>,
    OptionalClaims(claims): OptionalClaims,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let article = fetch_article(&pool, id).await?;
    let user_id = claims.map(|c| c.user_id());

    let detail = build_detail(&pool, article, user_id, false).await?;

    Ok(Json(detail))
}

/// Reveal an article's content (Public).
///
/// For logged-in readers this counts the view: times_read goes up on
/// every call, while the reading history collapses to one row per UTC
/// calendar day, keeping the latest timestamp.
pub async fn read_article(
    State(pool): State<PgPool>,
    OptionalClaims(claims): OptionalClaims,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    // Existence check before any mutation.
    fetch_article(&pool, id).await?;

    let user_id = claims.map(|c| c.user_id());

    if let Some(user_id) = user_id {
        let mut tx = pool.begin().await?;

        sqlx::query("UPDATE articles SET times_read = times_read + 1 WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        record_reading(&mut tx, user_id, id, Utc::now()).await?;

        tx.commit().await?;
    }

    // Re-fetch so the response carries the updated counter.
    let article = fetch_article(&pool, id).await?;
    let detail = build_detail(&pool, article, user_id, true).await?;

    Ok(Json(detail))
}

/// Records that the user read the article "now".
///
/// If a reading row for this pair already falls on the current UTC day,
/// its timestamp moves forward instead of a second row appearing.
async fn record_reading(
    tx: &mut Transaction<'_, Postgres>,
    user_id: i64,
    article_id: i64,
    now: DateTime<Utc>,
) -> Result<(), AppError> {
    let (day_start, day_end) = utc_day_bounds(now);

    let todays_row = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT id FROM user_readings
        WHERE user_id = $1 AND article_id = $2
          AND date_read >= $3 AND date_read < $4
        "#,
    )
    .bind(user_id)
    .bind(article_id)
    .bind(day_start)
    .bind(day_end)
    .fetch_optional(&mut **tx)
    .await?;

    match todays_row {
        Some(reading_id) => {
            sqlx::query("UPDATE user_readings SET date_read = $1 WHERE id = $2")
                .bind(now)
                .bind(reading_id)
                .execute(&mut **tx)
                .await?;
        }
        None => {
            sqlx::query(
                "INSERT INTO user_readings (user_id, article_id, date_read) VALUES ($1, $2, $3)",
            )
            .bind(user_id)
            .bind(article_id)
            .bind(now)
            .execute(&mut **tx)
            .await?;
        }
    }

    Ok(())
}
