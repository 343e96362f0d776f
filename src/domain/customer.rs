//! Customer record, stored in the `customers` table.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::RecordId;
use super::record::{
    FormFields, Record, SHORT_TEXT, bounded_text, nulls_last, optional_integer, unknown_field,
};
use crate::error::AppError;

/// A customer row.
///
/// `payment_id` references payment details kept elsewhere; it is not a
/// foreign key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Customer {
    /// Primary key.
    pub id: RecordId,
    /// First name.
    pub fname: Option<String>,
    /// Last name; the primary listing sort key.
    pub lname: Option<String>,
    /// Email address.
    pub email: Option<String>,
    /// Payment reference.
    pub payment_id: Option<i64>,
}

/// Mutable customer columns. `None` means "not submitted".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomerFields {
    /// First name.
    pub fname: Option<String>,
    /// Last name.
    pub lname: Option<String>,
    /// Email address.
    pub email: Option<String>,
    /// Payment reference. `Some(None)` clears the stored value.
    pub payment_id: Option<Option<i64>>,
}

impl Record for Customer {
    type Fields = CustomerFields;

    const KIND: &'static str = "customer";

    const FORM_FIELDS: &'static [&'static str] = &["fname", "lname", "email", "payment_id"];

    const ACCEPTS_IMAGE: bool = false;

    fn id(&self) -> RecordId {
        self.id
    }

    fn from_fields(id: RecordId, fields: CustomerFields) -> Self {
        Self {
            id,
            fname: fields.fname,
            lname: fields.lname,
            email: fields.email,
            payment_id: fields.payment_id.flatten(),
        }
    }

    fn apply(&mut self, fields: CustomerFields) {
        if fields.fname.is_some() {
            self.fname = fields.fname;
        }
        if fields.lname.is_some() {
            self.lname = fields.lname;
        }
        if fields.email.is_some() {
            self.email = fields.email;
        }
        if let Some(payment_id) = fields.payment_id {
            self.payment_id = payment_id;
        }
    }

    fn listing_order(&self, other: &Self) -> Ordering {
        nulls_last(self.lname.as_deref(), other.lname.as_deref())
            .then_with(|| nulls_last(self.fname.as_deref(), other.fname.as_deref()))
            .then(self.id.cmp(&other.id))
    }

    fn parse_fields(form: FormFields) -> Result<CustomerFields, AppError> {
        let mut fields = CustomerFields::default();
        for (key, value) in form {
            match key.as_str() {
                "fname" => fields.fname = Some(bounded_text(&key, value, SHORT_TEXT)?),
                "lname" => fields.lname = Some(bounded_text(&key, value, SHORT_TEXT)?),
                "email" => fields.email = Some(bounded_text(&key, value, SHORT_TEXT)?),
                "payment_id" => fields.payment_id = Some(optional_integer(&key, &value)?),
                other => return Err(unknown_field(Self::KIND, other)),
            }
        }
        Ok(fields)
    }

    fn attach_image(_fields: &mut CustomerFields, _url: String) -> Result<(), AppError> {
        Err(AppError::InvalidUpload(
            "customers have no image field".to_string(),
        ))
    }
}
