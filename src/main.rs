//! ClipSync Pro Blog Backend
//!
//! REST backend for the site blog: posts, comments, uploads and sitemaps,
//! kept in memory and snapshotted to a JSON file on every change.

mod api;
mod auth;
mod config;
mod errors;
mod models;
mod sitemap;
mod store;

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use config::Config;
use store::ContentStore;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<ContentStore>,
    pub config: Arc<Config>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting ClipSync Pro Blog Backend");
    tracing::info!("Data path: {:?}", config.data_path);
    tracing::info!("Upload directory: {:?}", config.upload_dir);
    tracing::info!("Bind address: {}", config.bind_addr);

    if config.admin_token.is_none() {
        tracing::warn!(
            "No admin token configured (CLIPSYNC_ADMIN_TOKEN). Admin routes are open!"
        );
    }

    let store = Arc::new(ContentStore::open(&config.data_path).await?);

    let state = AppState {
        store,
        config: Arc::new(config.clone()),
    };

    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let admin_token = state.config.admin_token.clone();

    // Readers and commenters
    let public_routes = Router::new()
        .route("/posts", get(api::list_posts))
        .route("/featured", get(api::list_featured))
        .route("/posts/featured", get(api::list_featured))
        .route("/post/{slug}", get(api::get_post_by_slug))
        .route("/categories", get(api::list_categories))
        .route(
            "/posts/{id}/comments",
            get(api::list_post_comments).post(api::create_comment),
        )
        .route("/login", post(api::login));

    // Editors
    let admin_routes = Router::new()
        .route("/admin/post/{id}", get(api::get_admin_post))
        .route("/admin/posts", get(api::list_admin_posts))
        .route("/posts", post(api::create_post))
        .route(
            "/posts/{id}",
            put(api::update_post).delete(api::delete_post),
        )
        .route("/admin/comments", get(api::list_all_comments))
        .route("/comments/{id}/approve", put(api::approve_comment))
        .route("/comments/{id}", delete(api::delete_comment))
        .route(
            "/admin/upload",
            post(api::upload_image).layer(DefaultBodyLimit::max(api::UPLOAD_BODY_LIMIT)),
        )
        .route("/admin/users", post(api::create_user))
        .route("/admin/users/{id}", get(api::get_user))
        .layer(middleware::from_fn(move |req, next| {
            auth::admin_auth_layer(admin_token.clone(), req, next)
        }));

    let site_routes = Router::new()
        .route("/sitemap.xml", get(sitemap::sitemap))
        .route("/blog-sitemap.xml", get(sitemap::blog_sitemap))
        .route("/sitemap-index.xml", get(sitemap::sitemap_index))
        .route("/robots.txt", get(sitemap::robots))
        .route("/api/contact", post(api::submit_contact))
        .route("/health", get(health_check));

    Router::new()
        .nest("/api/blog", public_routes.merge(admin_routes))
        .merge(site_routes)
        .nest_service(
            api::UPLOADS_URL_PREFIX,
            ServeDir::new(&state.config.upload_dir),
        )
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}
