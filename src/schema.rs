//! Read-only query surface over both record kinds.
//!
//! Each kind has a fixed projection and one "list all" resolver with no
//! filtering, pagination, or write capability. It shares the record
//! services with the HTML handlers but nothing else.

use serde::Serialize;
use utoipa::ToSchema;

use crate::app_state::AppState;
use crate::domain::{Customer, Hotel, RecordId};
use crate::error::AppError;

/// Public projection of a hotel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct HotelApi {
    /// Primary key.
    pub id: RecordId,
    /// Hotel name.
    pub name: Option<String>,
    /// Street address.
    pub address: Option<String>,
    /// City.
    pub city: Option<String>,
    /// State or region.
    pub state: Option<String>,
}

impl From<Hotel> for HotelApi {
    fn from(hotel: Hotel) -> Self {
        Self {
            id: hotel.id,
            name: hotel.name,
            address: hotel.address,
            city: hotel.city,
            state: hotel.state,
        }
    }
}

/// Public projection of a customer. Payment references are not exposed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct CustomerApi {
    /// Primary key.
    pub id: RecordId,
    /// First name.
    pub fname: Option<String>,
    /// Last name.
    pub lname: Option<String>,
    /// Email address.
    pub email: Option<String>,
}

impl From<Customer> for CustomerApi {
    fn from(customer: Customer) -> Self {
        Self {
            id: customer.id,
            fname: customer.fname,
            lname: customer.lname,
            email: customer.email,
        }
    }
}

/// Resolves every hotel, in listing order.
///
/// # Errors
///
/// Returns a store error.
pub async fn resolve_hotels(state: &AppState) -> Result<Vec<HotelApi>, AppError> {
    Ok(state
        .hotels
        .list_all()
        .await?
        .into_iter()
        .map(HotelApi::from)
        .collect())
}

/// Resolves every customer, in listing order.
///
/// # Errors
///
/// Returns a store error.
pub async fn resolve_customers(state: &AppState) -> Result<Vec<CustomerApi>, AppError> {
    Ok(state
        .customers
        .list_all()
        .await?
        .into_iter()
        .map(CustomerApi::from)
        .collect())
}
