//! API layer - HTTP handlers and routing
//!
//! Route groups:
//! - public reads: articles, categories, tags, comments, settings, health
//! - public writes: comment submission, visit beacon, subscription signup
//! - admin surface: article/draft/tag mutations, uploads, dashboard
//!
//! The whole admin group sits behind one session-token guard. Routes are
//! registered statically here; there is no dynamic dispatch table.

pub mod articles;
pub mod comments;
pub mod drafts;
pub mod health;
pub mod middleware;
pub mod settings;
pub mod stats;
pub mod subscriptions;
pub mod taxonomy;
pub mod upload;

use axum::{
    http::{header, HeaderValue, Method},
    middleware as axum_middleware,
    routing::{delete, get, post, put},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub use middleware::{AdminSession, ApiError, AppState};

/// Build the main API router
pub fn build_api_router(state: AppState) -> Router<AppState> {
    let admin_routes = Router::new()
        .route("/articles", post(articles::create_article))
        .route("/articles", put(articles::update_article))
        .route("/articles", delete(articles::delete_article))
        .route("/admin/articles", get(articles::list_articles_admin))
        .route("/admin/dashboard", get(stats::dashboard))
        .route("/drafts", get(drafts::list_drafts))
        .route("/drafts/{id}", get(drafts::get_draft))
        .route("/drafts", post(drafts::save_draft))
        .route("/drafts", put(drafts::update_draft))
        .route("/drafts", delete(drafts::delete_draft))
        .route("/tags", post(taxonomy::create_tag))
        .route("/upload", post(upload::upload_image))
        .route_layer(axum_middleware::from_fn_with_state(
            state,
            middleware::require_admin,
        ));

    Router::new()
        .route("/articles", get(articles::list_articles))
        .route("/articles/{slug}", get(articles::get_article))
        .route("/categories", get(taxonomy::list_categories))
        .route("/tags", get(taxonomy::list_tags))
        .route("/comments/{article_id}", get(comments::get_comments))
        .route("/comments", post(comments::create_comment))
        .route("/settings", get(settings::get_settings))
        .route("/visits", post(stats::record_visit))
        .route("/subscriptions", post(subscriptions::create_subscription))
        .route("/health", get(health::health))
        .merge(admin_routes)
}

/// Build the complete router with CORS and request tracing
pub fn build_router(state: AppState, cors_origin: &str) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(cors_origin.parse::<HeaderValue>().unwrap())
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::COOKIE])
        .allow_credentials(true);

    Router::new()
        .nest("/api/v1", build_api_router(state.clone()))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
