//! Property entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use sejour_core::types::{DbId, Timestamp};

/// A property row from the `properties` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Property {
    pub id: DbId,
    pub owner_id: DbId,
    pub title: String,
    pub description: Option<String>,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub property_type: String,
    pub furnished: bool,
    pub price_per_night: f64,
    pub address: String,
    pub city: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// 1 = studio, 2 = two rooms, etc.
    pub room_count: Option<i32>,
    pub image_urls: Vec<String>,
    pub amenities: Vec<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a property. `owner_id` and `image_urls` are supplied by
/// the handler, not the request body.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateProperty {
    pub title: String,
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub property_type: String,
    pub furnished: Option<bool>,
    pub price_per_night: f64,
    pub address: String,
    pub city: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub room_count: Option<i32>,
    pub amenities: Option<Vec<String>>,
}

/// DTO for updating a property. Only non-`None` fields are applied.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateProperty {
    pub title: Option<String>,
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub property_type: Option<String>,
    pub furnished: Option<bool>,
    pub price_per_night: Option<f64>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub room_count: Option<i32>,
    pub image_urls: Option<Vec<String>>,
    pub amenities: Option<Vec<String>>,
}

/// Search filters for the property directory.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PropertyFilters {
    pub city: Option<String>,
    #[serde(rename = "type")]
    pub property_type: Option<String>,
    pub furnished: Option<bool>,
    pub price_min: Option<f64>,
    pub price_max: Option<f64>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

/// Compact property info embedded in booking listings.
#[derive(Debug, Clone, Serialize)]
pub struct PropertySummary {
    pub id: DbId,
    pub title: String,
    pub city: String,
    pub image_urls: Vec<String>,
}
