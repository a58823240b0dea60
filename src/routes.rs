// src/routes.rs

use axum::{
    Router, http::Method, middleware,
    routing::{delete, get, post, put},
};
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

use crate::{
    handlers::{articles, auth, authors, comments, interaction, library, profile, publishing},
    state::AppState,
    utils::jwt::auth_middleware,
};

/// Assembles the main application router.
///
/// * Public sub-router: article browsing, author pages, toggles (the
///   toggles answer anonymous callers themselves, so they carry no auth
///   layer).
/// * Personal sub-router under /api/me behind the auth middleware.
/// * Global middleware (Trace, CORS) and the media file service.
pub fn create_router(state: AppState) -> Router {
    let origins = [
        "http://localhost:3000".parse().unwrap(),
        "http://127.0.0.1:3000".parse().unwrap(),
    ];

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([
            axum::http::header::AUTHORIZATION,
            axum::http::header::CONTENT_TYPE,
        ]);

    let auth_routes = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login));

    let public_routes = Router::new()
        .route("/articles", get(articles::list_articles))
        .route("/articles/{id}", get(articles::get_article))
        .route("/articles/{id}/read", post(articles::read_article))
        .route("/articles/{id}/comments", get(comments::list_comments))
        .route("/articles/{id}/like", post(interaction::leave_like))
        .route("/articles/{id}/dislike", post(interaction::leave_dislike))
        .route("/articles/{id}/favorite", post(interaction::toggle_favorite))
        .route(
            "/articles/{id}/subscribe",
            post(interaction::subscribe_through_article),
        )
        .route("/tags", get(articles::list_tags))
        .route("/authors/{id}", get(authors::author_page))
        .route("/authors/{id}/about", get(authors::about_page))
        .route("/authors/{id}/articles", get(authors::author_articles))
        .route(
            "/authors/{id}/subscribe",
            post(interaction::subscribe_to_author),
        );

    let comment_routes = Router::new()
        .route("/articles/{id}/comments", post(comments::create_comment))
        .route(
            "/comments/{id}",
            put(comments::update_comment).delete(comments::delete_comment),
        )
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let me_routes = Router::new()
        .route("/", get(library::personal_page))
        .route(
            "/articles",
            get(publishing::list_my_articles).post(publishing::publish_article),
        )
        .route(
            "/articles/{id}",
            get(publishing::get_my_article)
                .put(publishing::update_article)
                .delete(publishing::delete_article),
        )
        .route("/subscriptions", get(library::list_subscriptions))
        .route(
            "/favorites",
            get(library::list_favorites).delete(library::clear_favorites),
        )
        .route("/favorites/{article_id}", delete(library::remove_favorite))
        .route(
            "/readings",
            get(library::reading_history).delete(library::clear_reading_history),
        )
        .route("/readings/{id}", delete(library::delete_reading))
        .route(
            "/reactions/liked",
            get(library::liked_articles).delete(library::clear_likes),
        )
        .route(
            "/reactions/disliked",
            get(library::disliked_articles).delete(library::clear_dislikes),
        )
        .route("/reactions/{id}", delete(library::delete_reaction))
        .route("/about", get(profile::my_about))
        .route(
            "/about/description",
            post(profile::add_description)
                .put(profile::update_description)
                .delete(profile::delete_description),
        )
        .route("/about/social-media", post(profile::add_social_media))
        .route(
            "/about/social-media/{id}",
            delete(profile::delete_social_media),
        )
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let api_routes = Router::new()
        .nest("/auth", auth_routes)
        .nest("/me", me_routes)
        .merge(public_routes)
        .merge(comment_routes);

    Router::new()
        .nest("/api", api_routes)
        .nest_service("/media", ServeDir::new(&state.config.media_root))
        // Global Middleware (applied from outside in)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
