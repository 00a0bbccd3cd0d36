//! Gitnote Backend
//!
//! REST backend for a single-page note/blog editor whose datastore is one
//! JSON document committed to a GitHub repository via the Contents API.

mod api;
mod auth;
mod config;
mod errors;
mod github;
mod models;
mod store;

use std::sync::Arc;

use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use config::Config;
use store::DocumentStore;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<DocumentStore>,
    pub config: Arc<Config>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env();

    // Initialize logging
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Gitnote Backend");
    tracing::info!("Document path: {}", config.doc_path);
    tracing::info!("GitHub API base: {}", config.api_base);
    tracing::info!("Bind address: {}", config.bind_addr);

    // Warn if PSK is not configured
    if config.api_psk.is_none() {
        tracing::warn!("No API PSK configured (GITNOTE_API_PSK). Authentication is disabled!");
    }

    // Initialize the document store and load the remote document. A missing
    // or unreachable repository is not fatal here; the server still starts
    // so the configuration can be fixed and the document reloaded.
    let store = Arc::new(DocumentStore::new(&config));
    if config.github_configured() {
        if let Err(e) = store.load().await {
            tracing::error!("Initial document load failed: {}", e);
        }
    } else {
        tracing::warn!(
            "GitHub not configured (GITNOTE_OWNER/GITNOTE_REPO/GITNOTE_TOKEN). \
             Load and save are disabled until configured."
        );
    }

    // Create application state
    let state = AppState {
        store,
        config: Arc::new(config.clone()),
    };

    // Build router
    let app = create_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Clone PSK for the auth layer
    let psk = state.config.api_psk.clone();

    // API routes
    let api_routes = Router::new()
        // Document
        .route("/document", get(api::get_document))
        .route("/document/revision", get(api::get_revision))
        .route("/document/reload", post(api::reload_document))
        .route("/sync", post(api::sync_document))
        // Categories
        .route("/categories", get(api::list_categories))
        .route("/categories", post(api::create_category))
        .route("/categories/{id}", delete(api::delete_category))
        .route("/categories/{id}/children", post(api::create_sub_category))
        .route(
            "/categories/{id}/children/reorder",
            put(api::reorder_children),
        )
        .route("/subcategories/{id}", delete(api::delete_sub_category))
        // Posts
        .route("/posts", get(api::list_posts))
        .route("/posts", post(api::create_post))
        .route("/posts/{id}", get(api::get_post))
        .route("/posts/{id}", put(api::update_post))
        .route("/posts/{id}", delete(api::delete_post))
        // Apply PSK auth middleware
        .layer(middleware::from_fn(move |req, next| {
            auth::psk_auth_layer(psk.clone(), req, next)
        }));

    // Health check (no auth required)
    let health_routes = Router::new().route("/health", get(health_check));

    Router::new()
        .nest("/api", api_routes)
        .merge(health_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}
