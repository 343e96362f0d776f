//! PostgreSQL implementation of the record stores.

use async_trait::async_trait;
use sqlx::PgPool;

use super::RecordStore;
use crate::domain::page::clamp_limit;
use crate::domain::{Customer, CustomerFields, Hotel, HotelFields, Page, PageCursor, RecordId};
use crate::error::AppError;

const HOTEL_COLUMNS: &str =
    "id, name, city, state, address, image_url, amenities, website, description";

const CUSTOMER_COLUMNS: &str = "id, fname, lname, email, payment_id";

// Byte-order collation, so listings match `MemoryStore` for mixed case.
const HOTEL_ORDER: &str = r#"name COLLATE "C" ASC NULLS LAST, id ASC"#;

const CUSTOMER_ORDER: &str =
    r#"lname COLLATE "C" ASC NULLS LAST, fname COLLATE "C" ASC NULLS LAST, id ASC"#;

/// PostgreSQL-backed record stores using `sqlx::PgPool`.
///
/// Implements [`RecordStore`] for both [`Hotel`] and [`Customer`].
#[derive(Debug, Clone)]
pub struct PostgresPersistence {
    pool: PgPool,
}

impl PostgresPersistence {
    /// Creates a new persistence layer with the given connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn offset(cursor: PageCursor) -> i64 {
    i64::try_from(cursor.offset()).unwrap_or(i64::MAX)
}

/// Binds for `payment_id = CASE WHEN $5 THEN $6 ELSE payment_id END`:
/// absent keeps the column, blank clears it, a number sets it.
fn payment_binding(payment_id: Option<Option<i64>>) -> (bool, Option<i64>) {
    (payment_id.is_some(), payment_id.flatten())
}

#[async_trait]
impl RecordStore<Hotel> for PostgresPersistence {
    async fn list(&self, limit: u32, cursor: PageCursor) -> Result<Page<Hotel>, AppError> {
        let limit = clamp_limit(limit);
        let rows = sqlx::query_as::<_, Hotel>(&format!(
            "SELECT {HOTEL_COLUMNS} FROM hotels ORDER BY {HOTEL_ORDER} LIMIT $1 OFFSET $2"
        ))
        .bind(i64::from(limit))
        .bind(offset(cursor))
        .fetch_all(&self.pool)
        .await?;

        Ok(Page::from_rows(rows, cursor, limit))
    }

    async fn read(&self, id: RecordId) -> Result<Option<Hotel>, AppError> {
        let row = sqlx::query_as::<_, Hotel>(&format!(
            "SELECT {HOTEL_COLUMNS} FROM hotels WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn create(&self, fields: HotelFields) -> Result<Hotel, AppError> {
        let hotel = sqlx::query_as::<_, Hotel>(&format!(
            "INSERT INTO hotels \
             (name, city, state, address, image_url, amenities, website, description) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING {HOTEL_COLUMNS}"
        ))
        .bind(fields.name)
        .bind(fields.city)
        .bind(fields.state)
        .bind(fields.address)
        .bind(fields.image_url)
        .bind(fields.amenities)
        .bind(fields.website)
        .bind(fields.description)
        .fetch_one(&self.pool)
        .await?;

        tracing::debug!(id = %hotel.id, "hotel inserted");
        Ok(hotel)
    }

    async fn update(&self, id: RecordId, fields: HotelFields) -> Result<Hotel, AppError> {
        let row = sqlx::query_as::<_, Hotel>(&format!(
            "UPDATE hotels SET \
             name = COALESCE($2, name), \
             city = COALESCE($3, city), \
             state = COALESCE($4, state), \
             address = COALESCE($5, address), \
             image_url = COALESCE($6, image_url), \
             amenities = COALESCE($7, amenities), \
             website = COALESCE($8, website), \
             description = COALESCE($9, description) \
             WHERE id = $1 RETURNING {HOTEL_COLUMNS}"
        ))
        .bind(id)
        .bind(fields.name)
        .bind(fields.city)
        .bind(fields.state)
        .bind(fields.address)
        .bind(fields.image_url)
        .bind(fields.amenities)
        .bind(fields.website)
        .bind(fields.description)
        .fetch_optional(&self.pool)
        .await?;

        row.ok_or(AppError::RecordNotFound { kind: "hotel", id })
    }

    async fn delete(&self, id: RecordId) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM hotels WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        tracing::debug!(%id, rows = result.rows_affected(), "hotel delete");
        Ok(())
    }
}

#[async_trait]
impl RecordStore<Customer> for PostgresPersistence {
    async fn list(&self, limit: u32, cursor: PageCursor) -> Result<Page<Customer>, AppError> {
        let limit = clamp_limit(limit);
        let rows = sqlx::query_as::<_, Customer>(&format!(
            "SELECT {CUSTOMER_COLUMNS} FROM customers ORDER BY {CUSTOMER_ORDER} LIMIT $1 OFFSET $2"
        ))
        .bind(i64::from(limit))
        .bind(offset(cursor))
        .fetch_all(&self.pool)
        .await?;

        Ok(Page::from_rows(rows, cursor, limit))
    }

    async fn read(&self, id: RecordId) -> Result<Option<Customer>, AppError> {
        let row = sqlx::query_as::<_, Customer>(&format!(
            "SELECT {CUSTOMER_COLUMNS} FROM customers WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn create(&self, fields: CustomerFields) -> Result<Customer, AppError> {
        let customer = sqlx::query_as::<_, Customer>(&format!(
            "INSERT INTO customers (fname, lname, email, payment_id) \
             VALUES ($1, $2, $3, $4) RETURNING {CUSTOMER_COLUMNS}"
        ))
        .bind(fields.fname)
        .bind(fields.lname)
        .bind(fields.email)
        .bind(fields.payment_id.flatten())
        .fetch_one(&self.pool)
        .await?;

        tracing::debug!(id = %customer.id, "customer inserted");
        Ok(customer)
    }

    async fn update(&self, id: RecordId, fields: CustomerFields) -> Result<Customer, AppError> {
        let (set_payment, payment_id) = payment_binding(fields.payment_id);
        let row = sqlx::query_as::<_, Customer>(&format!(
            "UPDATE customers SET \
             fname = COALESCE($2, fname), \
             lname = COALESCE($3, lname), \
             email = COALESCE($4, email), \
             payment_id = CASE WHEN $5 THEN $6 ELSE payment_id END \
             WHERE id = $1 RETURNING {CUSTOMER_COLUMNS}"
        ))
        .bind(id)
        .bind(fields.fname)
        .bind(fields.lname)
        .bind(fields.email)
        .bind(set_payment)
        .bind(payment_id)
        .fetch_optional(&self.pool)
        .await?;

        row.ok_or(AppError::RecordNotFound {
            kind: "customer",
            id,
        })
    }

    async fn delete(&self, id: RecordId) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM customers WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        tracing::debug!(%id, rows = result.rows_affected(), "customer delete");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_payment_id_keeps_column() {
        assert_eq!(payment_binding(None), (false, None));
    }

    #[test]
    fn blank_payment_id_clears_column() {
        assert_eq!(payment_binding(Some(None)), (true, None));
    }

    #[test]
    fn numeric_payment_id_sets_column() {
        assert_eq!(payment_binding(Some(Some(7))), (true, Some(7)));
    }

    #[test]
    fn listings_sort_by_byte_order() {
        assert!(HOTEL_ORDER.starts_with(r#"name COLLATE "C""#));
        assert_eq!(CUSTOMER_ORDER.matches(r#"COLLATE "C""#).count(), 2);
    }
}
