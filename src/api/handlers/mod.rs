//! Endpoint handlers organized by surface.

pub mod records;
pub mod schema;
pub mod system;

use axum::Router;

use crate::app_state::AppState;
use crate::domain::{Customer, Hotel};

/// Composes the HTML CRUD routes of both record kinds.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(records::routes::<Hotel>())
        .merge(records::routes::<Customer>())
}
