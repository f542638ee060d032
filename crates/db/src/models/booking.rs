//! Booking entity model and DTOs.

use serde::Serialize;
use sqlx::FromRow;

use sejour_core::types::{Day, DbId, Timestamp};

use crate::models::property::PropertySummary;

/// A booking row from the `bookings` table. Nights span `[start_date,
/// end_date)`; availability blocks both endpoint days.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Booking {
    pub id: DbId,
    pub property_id: DbId,
    pub client_id: DbId,
    pub start_date: Day,
    pub end_date: Day,
    pub nights: i32,
    pub guests: i32,
    pub message: Option<String>,
    pub total_price: f64,
    pub status: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for inserting a booking. Nights and total price are computed by the
/// lifecycle service, never trusted from the request.
#[derive(Debug, Clone)]
pub struct CreateBooking {
    pub property_id: DbId,
    pub client_id: DbId,
    pub start_date: Day,
    pub end_date: Day,
    pub nights: i32,
    pub guests: i32,
    pub message: Option<String>,
    pub total_price: f64,
}

/// A booking joined with a compact property summary for list views.
#[derive(Debug, Clone, Serialize)]
pub struct BookingWithProperty {
    #[serde(flatten)]
    pub booking: Booking,
    pub property: Option<PropertySummary>,
}

/// Flat join row fetched by the repository and split into
/// [`BookingWithProperty`].
#[derive(Debug, Clone, FromRow)]
pub struct BookingPropertyRow {
    pub id: DbId,
    pub property_id: DbId,
    pub client_id: DbId,
    pub start_date: Day,
    pub end_date: Day,
    pub nights: i32,
    pub guests: i32,
    pub message: Option<String>,
    pub total_price: f64,
    pub status: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub property_title: Option<String>,
    pub property_city: Option<String>,
    pub property_image_urls: Option<Vec<String>>,
}

impl From<BookingPropertyRow> for BookingWithProperty {
    fn from(row: BookingPropertyRow) -> Self {
        let property = row.property_title.as_ref().map(|title| PropertySummary {
            id: row.property_id,
            title: title.clone(),
            city: row.property_city.clone().unwrap_or_default(),
            image_urls: row.property_image_urls.clone().unwrap_or_default(),
        });
        BookingWithProperty {
            booking: Booking {
                id: row.id,
                property_id: row.property_id,
                client_id: row.client_id,
                start_date: row.start_date,
                end_date: row.end_date,
                nights: row.nights,
                guests: row.guests,
                message: row.message,
                total_price: row.total_price,
                status: row.status,
                created_at: row.created_at,
                updated_at: row.updated_at,
            },
            property,
        }
    }
}
