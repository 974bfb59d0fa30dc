//! Route configuration and setup

use crate::auth::admin_auth_middleware;
use crate::constants::api_prefix;
use crate::handlers;
use crate::state::AppState;
use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;
use wora_core::Config;

/// Room for multipart boundaries and the folder field on top of the file itself
const MULTIPART_OVERHEAD_BYTES: u64 = 64 * 1024;

/// Setup all application routes
pub fn setup_routes(config: &Config, state: Arc<AppState>) -> Result<Router<()>, anyhow::Error> {
    let cors = setup_cors(config)?;
    let prefix = api_prefix(config.api_version());

    let admin_routes = admin_routes(&prefix).layer(axum::middleware::from_fn_with_state(
        state.auth.clone(),
        admin_auth_middleware,
    ));

    let body_limit =
        usize::try_from(config.max_file_size_bytes().saturating_add(MULTIPART_OVERHEAD_BYTES))
            .unwrap_or(usize::MAX);

    let app = public_routes(&prefix)
        .merge(admin_routes)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(RequestBodyLimitLayer::new(body_limit))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    tracing::info!(prefix = %prefix, body_limit, "Routes configured");
    Ok(app)
}

/// Setup CORS configuration
fn setup_cors(config: &Config) -> Result<CorsLayer, anyhow::Error> {
    let methods = [Method::GET, Method::POST, Method::DELETE, Method::OPTIONS];

    let cors = if config.cors_origins().iter().any(|o| o == "*") {
        tracing::warn!("CORS configured to allow all origins - not recommended for production");
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(methods)
            .allow_headers(Any)
    } else {
        let origins = config
            .cors_origins()
            .iter()
            .map(|o| o.parse::<HeaderValue>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| anyhow::anyhow!("Invalid CORS origin: {}", e))?;

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(methods)
            .allow_headers(Any)
    };
    Ok(cors)
}

/// Public routes (no authentication required)
fn public_routes(prefix: &str) -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(handlers::health::health_check))
        .route(
            &format!("{}/auth/login", prefix),
            post(handlers::auth::login),
        )
}

/// Admin routes (Bearer token or Basic credentials)
fn admin_routes(prefix: &str) -> Router<Arc<AppState>> {
    Router::new()
        .route(
            &format!("{}/admin/content/upload", prefix),
            post(handlers::upload::upload_content).delete(handlers::cleanup::delete_upload),
        )
        .route(
            &format!("{}/admin/analytics/storage", prefix),
            get(handlers::analytics::get_storage_analytics),
        )
}
