//! HTTP route handlers for the directory site.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Home page (brand strip, store count)
//! GET  /health                 - Liveness check
//! GET  /health/ready           - Readiness check (data backend reachable)
//!
//! # Pages
//! GET  /stores                 - Store listing (?keyword, ?area, ?prefecture, ?brand, ?sort)
//! GET  /brands                 - Brand listing (?keyword, ?category, ?sort)
//! GET  /brands/{id}            - Brand detail and carrying stores
//!
//! # JSON API (rate limited)
//! GET  /api/stores             - All stores
//! POST /api/stores/search      - Store search
//! GET  /api/brands             - Brand listing
//! GET  /api/brands/{id}        - Brand detail
//! ```

pub mod api;
pub mod brands;
pub mod health;
pub mod home;
pub mod stores;
pub mod views;

use axum::{
    Router,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};

use crate::config::StorefrontConfig;
use crate::middleware::api_rate_limiter;
use crate::state::AppState;

use brands::NotFoundTemplate;

/// Create the JSON API router.
pub fn api_routes(config: &StorefrontConfig) -> Router<AppState> {
    Router::new()
        .route("/stores", get(api::list_stores))
        .route("/stores/search", post(api::search_stores))
        .route("/brands", get(api::list_brands))
        .route("/brands/{id}", get(api::show_brand))
        .layer(api_rate_limiter(config.trust_proxy_headers))
}

/// Create all page and API routes.
pub fn routes(config: &StorefrontConfig) -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .route("/stores", get(stores::index))
        .route("/brands", get(brands::index))
        .route("/brands/{id}", get(brands::show))
        .nest("/api", api_routes(config))
        .fallback(not_found)
}

/// Fallback for unknown paths.
async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        NotFoundTemplate {
            message: "ページが見つかりませんでした".to_string(),
        },
    )
}
