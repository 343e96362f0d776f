//! Type-safe record identifier.
//!
//! [`RecordId`] is a newtype wrapper around the `BIGSERIAL` primary key
//! shared by the `hotels` and `customers` tables.

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Primary key of a stored record.
///
/// Assigned by the store on create and immutable thereafter. Used as the
/// path parameter of every per-record route.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    sqlx::Type,
    ToSchema,
)]
#[serde(transparent)]
#[sqlx(transparent)]
pub struct RecordId(i64);

impl RecordId {
    /// Wraps a raw primary key value.
    #[must_use]
    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    /// Returns the raw primary key value.
    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn display_is_plain_integer() {
        assert_eq!(RecordId::new(42).to_string(), "42");
    }

    #[test]
    fn serializes_as_bare_number() {
        let json = serde_json::to_string(&RecordId::new(3)).ok();
        assert_eq!(json.as_deref(), Some("3"));

        let Ok(id) = serde_json::from_str::<RecordId>("9") else {
            panic!("deserialization failed");
        };
        assert_eq!(id.get(), 9);
    }

    #[test]
    fn orders_numerically() {
        assert!(RecordId::new(2) < RecordId::new(10));
    }
}
