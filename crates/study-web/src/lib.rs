//! Study Web
//!
//! HTTP/JSON API for the study service:
//!
//! - Public reads: topic list/detail, health
//! - Public auth: register, login
//! - Bearer-gated writes: topic create/update/delete, profile, quiz
//!
//! State is a single injected [`AppState`]; handlers never reach for
//! globals.

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod state;

use axum::{
    http::HeaderValue,
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use config::Config;
pub use state::AppState;

/// Create the main router with all routes
pub fn create_router(state: Arc<AppState>) -> Router {
    let cors = match state
        .config
        .cors_origin
        .as_deref()
        .and_then(|origin| origin.parse::<HeaderValue>().ok())
    {
        Some(origin) => CorsLayer::new()
            .allow_origin(origin)
            .allow_methods(Any)
            .allow_headers(Any),
        None => CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any),
    };

    // Public routes (no authentication required)
    let public_routes = Router::new()
        .route("/api/auth/register", post(handlers::auth::register))
        .route("/api/auth/login", post(handlers::auth::login))
        .route("/api/topics", get(handlers::topics::list_topics))
        .route("/api/topics/:slug", get(handlers::topics::get_topic))
        .route("/api/health", get(handlers::health::health));

    // Protected routes (bearer token checked by the AuthUser extractor)
    let protected_routes = Router::new()
        .route("/api/topics", post(handlers::topics::create_topic))
        .route(
            "/api/topics/:slug",
            put(handlers::topics::update_topic).delete(handlers::topics::delete_topic),
        )
        .route("/api/profile", put(handlers::profile::update_profile))
        .route("/api/quiz", post(handlers::quiz::generate_quiz));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Start the web server
pub async fn serve(state: Arc<AppState>, addr: &str) -> anyhow::Result<()> {
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("study API listening on http://{}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}
