pub mod health;

use anyhow::{Context, Result};
use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    routing::{get, post},
    Router,
};
use tower_http::cors::{AllowHeaders, AllowOrigin, CorsLayer};

use crate::config::Config;
use crate::extraction::handlers as extraction;
use crate::generation::handlers as generation;
use crate::mail::handlers as mail;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let upload_limit = DefaultBodyLimit::max(state.config.max_upload_bytes);

    Router::new()
        .route("/health", get(health::health_handler))
        // Generation API
        .route("/search_jobs", post(generation::handle_search_jobs))
        .route("/generate_cover", post(generation::handle_generate_cover))
        .route("/generate_subject", post(generation::handle_generate_subject))
        // Documents
        .route(
            "/extract_text",
            post(extraction::handle_extract_text).layer(upload_limit),
        )
        // Mail
        .route("/send_email", post(mail::handle_send_email))
        .with_state(state)
}

/// CORS for the browser frontend: listed origins only, credentials allowed.
pub fn cors_layer(config: &Config) -> Result<CorsLayer> {
    let origins = config
        .cors_allowed_origins
        .iter()
        .map(|origin| {
            HeaderValue::from_str(origin)
                .with_context(|| format!("Invalid CORS origin '{origin}'"))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true))
}
