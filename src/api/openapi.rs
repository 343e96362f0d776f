//! OpenAPI document for the JSON endpoints.
//!
//! Served at `/api-docs/openapi.json`; with the `swagger-ui` feature the
//! interactive UI is mounted at `/swagger-ui`.

use axum::Router;
use utoipa::OpenApi;

use super::handlers;
use crate::app_state::AppState;
use crate::error::{ErrorBody, ErrorResponse};
use crate::schema::{CustomerApi, HotelApi};

/// Path of the generated document.
pub const OPENAPI_PATH: &str = "/api-docs/openapi.json";

/// Generated OpenAPI document.
#[derive(Debug, OpenApi)]
#[openapi(
    info(
        title = "hotel-crud",
        description = "Read-only query endpoints over hotels and customers."
    ),
    paths(
        handlers::schema::list_hotels,
        handlers::schema::list_customers,
        handlers::system::health_handler,
    ),
    components(schemas(
        HotelApi,
        CustomerApi,
        ErrorResponse,
        ErrorBody,
        handlers::system::HealthResponse,
    )),
    tags(
        (name = "Query", description = "List every record of a kind"),
        (name = "System", description = "Service health"),
    )
)]
pub struct ApiDoc;

/// Documentation routes.
#[cfg(feature = "swagger-ui")]
pub fn routes() -> Router<AppState> {
    Router::new().merge(
        utoipa_swagger_ui::SwaggerUi::new("/swagger-ui").url(OPENAPI_PATH, ApiDoc::openapi()),
    )
}

/// Documentation routes.
#[cfg(not(feature = "swagger-ui"))]
pub fn routes() -> Router<AppState> {
    use axum::Json;
    use axum::routing::get;

    Router::new().route(OPENAPI_PATH, get(|| async { Json(ApiDoc::openapi()) }))
}
