//! The [`Record`] trait shared by every stored entity, and the helpers used
//! to turn a submitted form into a typed field set.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use super::RecordId;
use crate::error::AppError;

/// Flat mapping of submitted form field names to values.
pub type FormFields = BTreeMap<String, String>;

/// Column length of short text fields (`VARCHAR(255)`).
pub const SHORT_TEXT: usize = 255;

/// Column length of long text fields (`VARCHAR(999)`).
pub const LONG_TEXT: usize = 999;

/// A persisted entity type.
///
/// `Fields` is the typed set of mutable columns. Every member is optional:
/// on create an absent member stores `NULL`, on update an absent member
/// leaves the stored value untouched.
pub trait Record: fmt::Debug + Clone + Serialize + Send + Sync + 'static {
    /// Typed set of mutable columns.
    type Fields: fmt::Debug + Clone + Default + Send + Sync + 'static;

    /// Lower-case record kind, used in messages and routes.
    const KIND: &'static str;

    /// Text fields shown on the add/edit form, in display order.
    const FORM_FIELDS: &'static [&'static str];

    /// Whether the add/edit form offers an `image` upload.
    const ACCEPTS_IMAGE: bool;

    /// Returns the record's primary key.
    fn id(&self) -> RecordId;

    /// Builds a new record from a field set and a freshly assigned key.
    fn from_fields(id: RecordId, fields: Self::Fields) -> Self;

    /// Overwrites every column present in `fields`.
    fn apply(&mut self, fields: Self::Fields);

    /// Listing order: by name ascending, `NULL`s last, ties by id.
    fn listing_order(&self, other: &Self) -> Ordering;

    /// Validates a submitted form against the column allow-list.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] for an unknown field name, a value
    /// longer than its column, or a value of the wrong type.
    fn parse_fields(form: FormFields) -> Result<Self::Fields, AppError>;

    /// Points the field set at an uploaded image.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::InvalidUpload`] if the record has no image column.
    fn attach_image(fields: &mut Self::Fields, url: String) -> Result<(), AppError>;
}

/// Checks a text value against its column length.
///
/// # Errors
///
/// Returns [`AppError::Validation`] when `value` is longer than `max_len`
/// characters.
pub fn bounded_text(field: &str, value: String, max_len: usize) -> Result<String, AppError> {
    if value.chars().count() > max_len {
        return Err(AppError::Validation(format!(
            "`{field}` is longer than {max_len} characters"
        )));
    }
    Ok(value)
}

/// Parses an optional integer column. An empty value stores `NULL`.
///
/// # Errors
///
/// Returns [`AppError::Validation`] if the value is not an integer.
pub fn optional_integer(field: &str, value: &str) -> Result<Option<i64>, AppError> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }
    value
        .parse()
        .map(Some)
        .map_err(|_| AppError::Validation(format!("`{field}` must be an integer, got `{value}`")))
}

/// Builds the error for a field name outside the allow-list.
#[must_use]
pub fn unknown_field(kind: &str, field: &str) -> AppError {
    AppError::Validation(format!("unknown {kind} field `{field}`"))
}

/// Compares optional sort keys byte-wise with `NULL`s after every value,
/// matching PostgreSQL's `COLLATE "C" ASC NULLS LAST`.
#[must_use]
pub fn nulls_last(a: Option<&str>, b: Option<&str>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounded_text_counts_characters() {
        assert!(bounded_text("name", "é".repeat(255), SHORT_TEXT).is_ok());
        assert!(matches!(
            bounded_text("name", "x".repeat(256), SHORT_TEXT),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn optional_integer_accepts_blank() {
        assert_eq!(optional_integer("payment_id", "").ok(), Some(None));
        assert_eq!(optional_integer("payment_id", " 12 ").ok(), Some(Some(12)));
        assert!(optional_integer("payment_id", "twelve").is_err());
    }

    #[test]
    fn nulls_sort_last() {
        assert_eq!(nulls_last(Some("a"), None), Ordering::Less);
        assert_eq!(nulls_last(None, Some("a")), Ordering::Greater);
        assert_eq!(nulls_last(Some("a"), Some("b")), Ordering::Less);
        assert_eq!(nulls_last(None, None), Ordering::Equal);
    }

    #[test]
    fn uppercase_sorts_before_lowercase() {
        assert_eq!(nulls_last(Some("Banana"), Some("apple")), Ordering::Less);
    }
}
