//! HTTP layer: form extraction, route handlers, OpenAPI document, and
//! router composition.
//!
//! HTML CRUD pages live at `/hotel` and `/customer`; the read-only JSON
//! query surface is mounted under `/api/v1`.

pub mod form;
pub mod handlers;
pub mod openapi;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use tower_http::trace::TraceLayer;

use crate::app_state::AppState;

/// Builds the complete router with every endpoint.
pub fn build_router() -> Router<AppState> {
    Router::new()
        .merge(handlers::routes())
        .nest("/api/v1", handlers::schema::routes())
        .merge(handlers::system::routes())
        .merge(openapi::routes())
}

/// Builds the router, attaches `state`, and applies the body limit and
/// request tracing.
pub fn build_app(state: AppState, max_body_bytes: usize) -> Router {
    build_router()
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
