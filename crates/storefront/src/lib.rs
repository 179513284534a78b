//! DABOT directory site library.
//!
//! This crate provides the directory site as a library so the router can
//! be built in tests and by the integration test crate.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod directory;
pub mod error;
pub mod filters;
pub mod middleware;
pub mod routes;
pub mod state;

use axum::{Router, middleware::from_fn};
use tower::ServiceBuilder;
use tower_http::{services::ServeDir, trace::TraceLayer};

use state::AppState;

/// Directory of static assets served under `/static`.
const STATIC_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/static");

/// Build the application router.
///
/// Layers run top to bottom: request tracing wraps everything so the
/// request ID middleware can record the ID on the request span.
pub fn app(state: AppState) -> Router {
    let routes = routes::routes(state.config());

    Router::new()
        .merge(routes)
        .nest_service("/static", ServeDir::new(STATIC_DIR))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http().make_span_with(
                    |request: &axum::http::Request<_>| {
                        tracing::info_span!(
                            "http_request",
                            method = %request.method(),
                            uri = %request.uri(),
                            request_id = tracing::field::Empty,
                        )
                    },
                ))
                .layer(from_fn(middleware::request_id_middleware))
                .layer(from_fn(middleware::security_headers_middleware)),
        )
        .with_state(state)
}
