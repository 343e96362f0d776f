//! Hotel record, stored in the `hotels` table.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::RecordId;
use super::record::{
    FormFields, LONG_TEXT, Record, SHORT_TEXT, bounded_text, nulls_last, unknown_field,
};
use crate::error::AppError;

/// A hotel row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Hotel {
    /// Primary key.
    pub id: RecordId,
    /// Hotel name; the listing sort key.
    pub name: Option<String>,
    /// City.
    pub city: Option<String>,
    /// State or region.
    pub state: Option<String>,
    /// Street address.
    pub address: Option<String>,
    /// Public URL of the uploaded image.
    #[serde(rename = "imageUrl")]
    pub image_url: Option<String>,
    /// Free-text amenities.
    pub amenities: Option<String>,
    /// Website URL.
    pub website: Option<String>,
    /// Free-text description.
    pub description: Option<String>,
}

/// Mutable hotel columns. `None` means "not submitted".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HotelFields {
    /// Hotel name.
    pub name: Option<String>,
    /// City.
    pub city: Option<String>,
    /// State or region.
    pub state: Option<String>,
    /// Street address.
    pub address: Option<String>,
    /// Public image URL (form field `imageUrl`).
    pub image_url: Option<String>,
    /// Free-text amenities.
    pub amenities: Option<String>,
    /// Website URL.
    pub website: Option<String>,
    /// Free-text description.
    pub description: Option<String>,
}

fn overwrite(slot: &mut Option<String>, value: Option<String>) {
    if value.is_some() {
        *slot = value;
    }
}

impl Record for Hotel {
    type Fields = HotelFields;

    const KIND: &'static str = "hotel";

    const FORM_FIELDS: &'static [&'static str] = &[
        "name",
        "city",
        "state",
        "address",
        "amenities",
        "website",
        "description",
    ];

    const ACCEPTS_IMAGE: bool = true;

    fn id(&self) -> RecordId {
        self.id
    }

    fn from_fields(id: RecordId, fields: HotelFields) -> Self {
        Self {
            id,
            name: fields.name,
            city: fields.city,
            state: fields.state,
            address: fields.address,
            image_url: fields.image_url,
            amenities: fields.amenities,
            website: fields.website,
            description: fields.description,
        }
    }

    fn apply(&mut self, fields: HotelFields) {
        overwrite(&mut self.name, fields.name);
        overwrite(&mut self.city, fields.city);
        overwrite(&mut self.state, fields.state);
        overwrite(&mut self.address, fields.address);
        overwrite(&mut self.image_url, fields.image_url);
        overwrite(&mut self.amenities, fields.amenities);
        overwrite(&mut self.website, fields.website);
        overwrite(&mut self.description, fields.description);
    }

    fn listing_order(&self, other: &Self) -> Ordering {
        nulls_last(self.name.as_deref(), other.name.as_deref()).then(self.id.cmp(&other.id))
    }

    fn parse_fields(form: FormFields) -> Result<HotelFields, AppError> {
        let mut fields = HotelFields::default();
        for (key, value) in form {
            let slot = match key.as_str() {
                "name" => (&mut fields.name, SHORT_TEXT),
                "city" => (&mut fields.city, SHORT_TEXT),
                "state" => (&mut fields.state, SHORT_TEXT),
                "address" => (&mut fields.address, SHORT_TEXT),
                "imageUrl" => (&mut fields.image_url, LONG_TEXT),
                "amenities" => (&mut fields.amenities, LONG_TEXT),
                "website" => (&mut fields.website, SHORT_TEXT),
                "description" => (&mut fields.description, LONG_TEXT),
                other => return Err(unknown_field(Self::KIND, other)),
            };
            *slot.0 = Some(bounded_text(&key, value, slot.1)?);
        }
        Ok(fields)
    }

    fn attach_image(fields: &mut HotelFields, url: String) -> Result<(), AppError> {
        fields.image_url = Some(url);
        Ok(())
    }
}
