// tests/interaction_tests.rs

use inkline::{config::Config, routes, state::AppState};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

/// Helper function to spawn the app on a random port for testing.
/// Returns the base URL (e.g., "http://127.0.0.1:12345").
async fn spawn_app() -> String {
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = PgPoolOptions::new()
        .max_connections(1)
        .connect(&database_url)
        .await
        .expect("Failed to connect to Postgres for testing. Make sure DATABASE_URL is set.");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to migrate database");

    let config = Config {
        database_url: database_url.clone(),
        jwt_secret: "test_secret_for_integration_tests".to_string(),
        jwt_expiration: 600,
        rust_log: "error".to_string(),
        media_root: "media".to_string(),
    };

    let state = AppState { pool, config };
    let app = routes::create_router(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");

    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    address
}

async fn test_pool() -> PgPool {
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    PgPoolOptions::new()
        .max_connections(1)
        .connect(&database_url)
        .await
        .expect("Failed to connect to test DB")
}

/// Registers a fresh user and returns (user_id, token).
async fn register_and_login(client: &reqwest::Client, address: &str) -> (i64, String) {
    let username = format!("u_{}", &uuid::Uuid::new_v4().to_string()[..8]);
    let password = "password123";

    let user: serde_json::Value = client
        .post(&format!("{}/api/auth/register", address))
        .json(&serde_json::json!({
            "username": username,
            "email": format!("{}@example.com", username),
            "password": password
        }))
        .send()
        .await
        .expect("Register failed")
        .json()
        .await
        .expect("Failed to parse register json");

    let user_id = user["id"].as_i64().expect("User id missing");

    let login: serde_json::Value = client
        .post(&format!("{}/api/auth/login", address))
        .json(&serde_json::json!({
            "username": username,
            "password": password
        }))
        .send()
        .await
        .expect("Login failed")
        .json()
        .await
        .expect("Failed to parse login json");

    let token = login["token"].as_str().expect("Token missing").to_string();

    (user_id, token)
}

/// Publishes an article as the given user and returns its id.
async fn publish_article(client: &reqwest::Client, address: &str, token: &str) -> i64 {
    let response = client
        .post(&format!("{}/api/me/articles", address))
        .header("Authorization", format!("Bearer {}", token))
        .json(&serde_json::json!({
            "title": "Toggle Testing Grounds",
            "content": "Body",
            "image": "core/images/test.png",
            "tags": []
        }))
        .send()
        .await
        .expect("Publish failed");

    assert_eq!(response.status().as_u16(), 201);

    let body: serde_json::Value = response.json().await.unwrap();
    body["id"].as_i64().expect("Article id missing")
}

async fn article_detail(
    client: &reqwest::Client,
    address: &str,
    token: &str,
    article_id: i64,
) -> serde_json::Value {
    client
        .get(&format!("{}/api/articles/{}", address, article_id))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap()
}

#[tokio::test]
async fn like_twice_returns_to_none() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    let (_author_id, author_token) = register_and_login(&client, &address).await;
    let (_reader_id, reader_token) = register_and_login(&client, &address).await;
    let article_id = publish_article(&client, &address, &author_token).await;

    // First like
    let first: serde_json::Value = client
        .post(&format!("{}/api/articles/{}/like", address, article_id))
        .header("Authorization", format!("Bearer {}", reader_token))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(first["reaction"], "like");

    let detail = article_detail(&client, &address, &reader_token, article_id).await;
    assert_eq!(detail["likes"], 1);
    assert_eq!(detail["reaction"], "like");

    // Second like removes the reaction
    let second: serde_json::Value = client
        .post(&format!("{}/api/articles/{}/like", address, article_id))
        .header("Authorization", format!("Bearer {}", reader_token))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(second["reaction"], serde_json::Value::Null);

    let detail = article_detail(&client, &address, &reader_token, article_id).await;
    assert_eq!(detail["likes"], 0);
    assert_eq!(detail["reaction"], serde_json::Value::Null);
}

#[tokio::test]
async fn like_then_dislike_leaves_single_dislike() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();
    let pool = test_pool().await;

    let (_author_id, author_token) = register_and_login(&client, &address).await;
    let (reader_id, reader_token) = register_and_login(&client, &address).await;
    let article_id = publish_article(&client, &address, &author_token).await;

    client
        .post(&format!("{}/api/articles/{}/like", address, article_id))
        .header("Authorization", format!("Bearer {}", reader_token))
        .send()
        .await
        .unwrap();

    let flipped: serde_json::Value = client
        .post(&format!("{}/api/articles/{}/dislike", address, article_id))
        .header("Authorization", format!("Bearer {}", reader_token))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(flipped["reaction"], "dislike");

    // Never more than one row per (user, article)
    let rows: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM reactions WHERE user_id = $1 AND article_id = $2",
    )
    .bind(reader_id)
    .bind(article_id)
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(rows, 1);

    let detail = article_detail(&client, &address, &reader_token, article_id).await;
    assert_eq!(detail["likes"], 0);
    assert_eq!(detail["dislikes"], 1);
}

#[tokio::test]
async fn anonymous_like_mutates_nothing() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();
    let pool = test_pool().await;

    let (_author_id, author_token) = register_and_login(&client, &address).await;
    let article_id = publish_article(&client, &address, &author_token).await;

    let response = client
        .post(&format!("{}/api/articles/{}/like", address, article_id))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 401);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(
        body["error"],
        "You cannot leave like while you are not authenticated"
    );

    let rows: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM reactions WHERE article_id = $1")
        .bind(article_id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(rows, 0);
}

#[tokio::test]
async fn reacting_to_missing_article_is_404() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    let (_id, token) = register_and_login(&client, &address).await;

    let response = client
        .post(&format!("{}/api/articles/999999999/like", address))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 404);
}

#[tokio::test]
async fn subscription_toggle_alternates() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();
    let pool = test_pool().await;

    let (author_id, author_token) = register_and_login(&client, &address).await;
    let (reader_id, reader_token) = register_and_login(&client, &address).await;
    let article_id = publish_article(&client, &address, &author_token).await;

    // Subscribe through the author page
    let first: serde_json::Value = client
        .post(&format!("{}/api/authors/{}/subscribe", address, author_id))
        .header("Authorization", format!("Bearer {}", reader_token))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(first["subscribed"], true);
    assert_eq!(first["message"], "You successfully subscribed to this author");

    // Unsubscribe through the article detail entry point: both funnel
    // into the same toggle.
    let second: serde_json::Value = client
        .post(&format!(
            "{}/api/articles/{}/subscribe",
            address, article_id
        ))
        .header("Authorization", format!("Bearer {}", reader_token))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(second["subscribed"], false);

    let rows: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM subscriptions WHERE subscriber_id = $1 AND subscribe_to_id = $2",
    )
    .bind(reader_id)
    .bind(author_id)
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(rows, 0);

    // Odd number of calls flips the state
    let third: serde_json::Value = client
        .post(&format!("{}/api/authors/{}/subscribe", address, author_id))
        .header("Authorization", format!("Bearer {}", reader_token))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(third["subscribed"], true);
}

#[tokio::test]
async fn self_subscription_is_denied() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();
    let pool = test_pool().await;

    let (author_id, author_token) = register_and_login(&client, &address).await;

    let response = client
        .post(&format!("{}/api/authors/{}/subscribe", address, author_id))
        .header("Authorization", format!("Bearer {}", author_token))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 409);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["error"], "You cannot subscribe to yourself");

    let rows: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM subscriptions WHERE subscriber_id = $1")
            .bind(author_id)
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(rows, 0);
}

#[tokio::test]
async fn first_favorite_creates_the_list() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();
    let pool = test_pool().await;

    let (_author_id, author_token) = register_and_login(&client, &address).await;
    let (reader_id, reader_token) = register_and_login(&client, &address).await;
    let article_id = publish_article(&client, &address, &author_token).await;

    // No list yet
    let lists: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM favorite_lists WHERE user_id = $1")
        .bind(reader_id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(lists, 0);

    let added: serde_json::Value = client
        .post(&format!(
            "{}/api/articles/{}/favorite",
            address, article_id
        ))
        .header("Authorization", format!("Bearer {}", reader_token))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(added["favorited"], true);

    // List creation and membership happened in the same operation
    let lists: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM favorite_lists WHERE user_id = $1")
        .bind(reader_id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(lists, 1);

    let favorites: Vec<serde_json::Value> = client
        .get(&format!("{}/api/me/favorites", address))
        .header("Authorization", format!("Bearer {}", reader_token))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(favorites.len(), 1);
    assert_eq!(favorites[0]["title"], "Toggle Testing Grounds");

    // Toggling again removes the membership but keeps the list
    let removed: serde_json::Value = client
        .post(&format!(
            "{}/api/articles/{}/favorite",
            address, article_id
        ))
        .header("Authorization", format!("Bearer {}", reader_token))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(removed["favorited"], false);

    let lists: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM favorite_lists WHERE user_id = $1")
        .bind(reader_id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(lists, 1);
}

#[tokio::test]
async fn remove_favorite_never_creates_a_list() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();
    let pool = test_pool().await;

    let (_author_id, author_token) = register_and_login(&client, &address).await;
    let (reader_id, reader_token) = register_and_login(&client, &address).await;
    let article_id = publish_article(&client, &address, &author_token).await;

    let response: serde_json::Value = client
        .delete(&format!("{}/api/me/favorites/{}", address, article_id))
        .header("Authorization", format!("Bearer {}", reader_token))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(response["removed"], false);
    assert_eq!(
        response["message"],
        "You do not have any articles to remove from Favorites"
    );

    let lists: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM favorite_lists WHERE user_id = $1")
        .bind(reader_id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(lists, 0);
}

#[tokio::test]
async fn remove_favorite_reports_non_member_article() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    let (_author_id, author_token) = register_and_login(&client, &address).await;
    let (_reader_id, reader_token) = register_and_login(&client, &address).await;
    let favorited_id = publish_article(&client, &address, &author_token).await;
    let other_id = publish_article(&client, &address, &author_token).await;

    client
        .post(&format!(
            "{}/api/articles/{}/favorite",
            address, favorited_id
        ))
        .header("Authorization", format!("Bearer {}", reader_token))
        .send()
        .await
        .unwrap();

    let response: serde_json::Value = client
        .delete(&format!("{}/api/me/favorites/{}", address, other_id))
        .header("Authorization", format!("Bearer {}", reader_token))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(response["removed"], false);
    assert_eq!(response["message"], "This article is not in your Favorites");
}

#[tokio::test]
async fn clear_favorites_empties_membership() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    let (_author_id, author_token) = register_and_login(&client, &address).await;
    let (_reader_id, reader_token) = register_and_login(&client, &address).await;

    for _ in 0..2 {
        let article_id = publish_article(&client, &address, &author_token).await;
        client
            .post(&format!(
                "{}/api/articles/{}/favorite",
                address, article_id
            ))
            .header("Authorization", format!("Bearer {}", reader_token))
            .send()
            .await
            .unwrap();
    }

    let response = client
        .delete(&format!("{}/api/me/favorites", address))
        .header("Authorization", format!("Bearer {}", reader_token))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);

    let favorites: Vec<serde_json::Value> = client
        .get(&format!("{}/api/me/favorites", address))
        .header("Authorization", format!("Bearer {}", reader_token))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(favorites.is_empty());

    // Clearing again is a harmless no-op
    let again = client
        .delete(&format!("{}/api/me/favorites", address))
        .header("Authorization", format!("Bearer {}", reader_token))
        .send()
        .await
        .unwrap();
    assert_eq!(again.status().as_u16(), 200);
}
