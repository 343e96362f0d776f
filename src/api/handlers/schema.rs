//! JSON endpoints of the read-only query surface.

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};

use crate::app_state::AppState;
use crate::error::{AppError, ErrorResponse};
use crate::schema::{self, CustomerApi, HotelApi};

/// `GET /hotels` — every hotel.
///
/// # Errors
///
/// Returns [`AppError::Persistence`] on database failure.
#[utoipa::path(
    get,
    path = "/api/v1/hotels",
    tag = "Query",
    summary = "List all hotels",
    description = "Returns every hotel ordered by name. No filtering or pagination.",
    responses(
        (status = 200, description = "All hotels", body = Vec<HotelApi>),
        (status = 500, description = "Database failure", body = ErrorResponse),
    )
)]
pub async fn list_hotels(State(state): State<AppState>) -> Result<Json<Vec<HotelApi>>, AppError> {
    Ok(Json(schema::resolve_hotels(&state).await?))
}

/// `GET /customers` — every customer.
///
/// # Errors
///
/// Returns [`AppError::Persistence`] on database failure.
#[utoipa::path(
    get,
    path = "/api/v1/customers",
    tag = "Query",
    summary = "List all customers",
    description = "Returns every customer ordered by last name, then first name.",
    responses(
        (status = 200, description = "All customers", body = Vec<CustomerApi>),
        (status = 500, description = "Database failure", body = ErrorResponse),
    )
)]
pub async fn list_customers(
    State(state): State<AppState>,
) -> Result<Json<Vec<CustomerApi>>, AppError> {
    Ok(Json(schema::resolve_customers(&state).await?))
}

/// Query routes, mounted under `/api/v1`.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/hotels", get(list_hotels))
        .route("/customers", get(list_customers))
}
