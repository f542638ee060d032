//! Handlers for the `/properties` resource.

use std::sync::Arc;

use axum::extract::{Multipart, Path, Query, RawQuery, State};
use axum::http::StatusCode;
use axum::Json;
use serde_json::Value;

use sejour_cache::{keys, PROPERTY_DETAIL_TTL_SECS, PROPERTY_LIST_TTL_SECS};
use sejour_core::error::CoreError;
use sejour_core::pagination::{clamp_page, PaginationMeta};
use sejour_core::roles::ROLE_ADMIN;
use sejour_core::types::DbId;
use sejour_db::models::booking::Booking;
use sejour_db::models::property::{
    CreateProperty, Property, PropertyFilters, UpdateProperty,
};
use sejour_db::repositories::{BookingRepo, PropertyRepo};
use sejour_storage::{image as img, ObjectStore};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireOwner;
use crate::response::ApiResponse;
use crate::state::AppState;

/// Maximum images accepted per property create.
const MAX_IMAGES_PER_PROPERTY: usize = 10;

/// Maximum size per uploaded image, in bytes (10 MB).
pub const MAX_IMAGE_BYTES: usize = 10 * 1024 * 1024;

type CachedJson = ([(&'static str, &'static str); 1], Json<Value>);

fn cache_hit(value: Value) -> CachedJson {
    ([("x-cache-status", "HIT")], Json(value))
}

fn cache_miss(value: Value) -> CachedJson {
    ([("x-cache-status", "MISS")], Json(value))
}

/// GET /api/properties
///
/// Filtered, paginated search. Pages are cached for five minutes keyed by
/// the raw query string; `X-Cache-Status` reports `HIT`/`MISS`.
pub async fn list(
    State(state): State<AppState>,
    RawQuery(raw_query): RawQuery,
    Query(filters): Query<PropertyFilters>,
) -> AppResult<CachedJson> {
    let key = keys::property_list(raw_query.as_deref().unwrap_or(""));
    if let Some(cached) = state.cache.get_json::<Value>(&key).await {
        return Ok(cache_hit(cached));
    }

    let (page, limit, offset) = clamp_page(filters.page, filters.limit);
    let (rows, total) = PropertyRepo::search(&state.pool, &filters, limit, offset).await?;

    let envelope = ApiResponse::paginated(rows, PaginationMeta::new(page, limit, total));
    let value = serde_json::to_value(&envelope)
        .map_err(|e| AppError::InternalError(format!("Serialization error: {e}")))?;
    state
        .cache
        .set_json(&key, &value, PROPERTY_LIST_TTL_SECS)
        .await;

    Ok(cache_miss(value))
}

/// GET /api/properties/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<CachedJson> {
    let key = keys::property_detail(&id.to_string());
    if let Some(cached) = state.cache.get_json::<Value>(&key).await {
        return Ok(cache_hit(cached));
    }

    let property = PropertyRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "property",
            id,
        }))?;

    let value = serde_json::to_value(ApiResponse::new(property))
        .map_err(|e| AppError::InternalError(format!("Serialization error: {e}")))?;
    state
        .cache
        .set_json(&key, &value, PROPERTY_DETAIL_TTL_SECS)
        .await;

    Ok(cache_miss(value))
}

/// GET /api/properties/{id}/bookings
///
/// Active (pending/accepted) bookings for a property, for calendar display.
pub async fn active_bookings(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<ApiResponse<Vec<Booking>>>> {
    if PropertyRepo::find_by_id(&state.pool, id).await?.is_none() {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "property",
            id,
        }));
    }
    let bookings = BookingRepo::list_active_for_property(&state.pool, id).await?;
    Ok(Json(ApiResponse::new(bookings)))
}

/// GET /api/properties/owner/{owner_id}
pub async fn list_by_owner(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(owner_id): Path<DbId>,
) -> AppResult<Json<ApiResponse<Vec<Property>>>> {
    let rows = PropertyRepo::list_by_owner(&state.pool, owner_id).await?;
    Ok(Json(ApiResponse::new(rows)))
}

/// POST /api/properties
///
/// Multipart create: text fields describe the property, `images` parts
/// (at most 10, 10 MB each) run through the resize pipeline. The row is
/// inserted first so the pipeline can namespace object keys by property id.
pub async fn create(
    State(state): State<AppState>,
    RequireOwner(user): RequireOwner,
    mut multipart: Multipart,
) -> AppResult<(StatusCode, Json<ApiResponse<Property>>)> {
    let mut fields = PropertyForm::default();
    let mut images: Vec<Vec<u8>> = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        let name = field.name().unwrap_or("").to_string();
        if name == "images" {
            let data = field
                .bytes()
                .await
                .map_err(|e| AppError::BadRequest(e.to_string()))?;
            if data.len() > MAX_IMAGE_BYTES {
                return Err(AppError::Core(CoreError::Validation(
                    "Chaque image ne peut pas dépasser 10 Mo".into(),
                )));
            }
            if images.len() >= MAX_IMAGES_PER_PROPERTY {
                return Err(AppError::Core(CoreError::Validation(
                    "Au maximum 10 images par propriété".into(),
                )));
            }
            images.push(data.to_vec());
        } else {
            let text = field
                .text()
                .await
                .map_err(|e| AppError::BadRequest(e.to_string()))?;
            fields.set(&name, text);
        }
    }

    let input = fields.into_create()?;

    // Storage must be resolvable before the row exists, so a missing
    // configuration never leaves an image-less listing behind.
    let store = if images.is_empty() {
        None
    } else {
        Some(require_store(&state.store)?)
    };

    let property = PropertyRepo::create(&state.pool, user.user_id, &input, &[]).await?;

    let property = match store {
        None => property,
        Some(store) => match upload_images(&store, &property, &images).await {
            Ok(urls) => PropertyRepo::update(
                &state.pool,
                property.id,
                &UpdateProperty {
                    image_urls: Some(urls),
                    ..Default::default()
                },
            )
            .await?
            .unwrap_or(property),
            Err(e) => {
                // Roll the insert back; the pipeline failing must not
                // publish a listing without its images.
                if let Err(del_err) = PropertyRepo::delete(&state.pool, property.id).await {
                    tracing::warn!(
                        property_id = %property.id,
                        error = %del_err,
                        "failed to remove property after image upload error"
                    );
                }
                return Err(e);
            }
        },
    };

    state.cache.invalidate_properties().await;

    Ok((StatusCode::CREATED, Json(ApiResponse::new(property))))
}

/// PUT /api/properties/{id}
///
/// Partial update; only provided fields change. Owners may only edit their
/// own listings.
pub async fn update(
    State(state): State<AppState>,
    RequireOwner(user): RequireOwner,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateProperty>,
) -> AppResult<Json<ApiResponse<Property>>> {
    let existing = PropertyRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "property",
            id,
        }))?;

    if user.role != ROLE_ADMIN && existing.owner_id != user.user_id {
        return Err(AppError::Core(CoreError::Forbidden(
            "Vous ne pouvez modifier que vos propres propriétés".into(),
        )));
    }

    if let Some(price) = input.price_per_night {
        if price <= 0.0 {
            return Err(AppError::Core(CoreError::Validation(
                "Le prix par nuit doit être positif".into(),
            )));
        }
    }

    let updated = PropertyRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "property",
            id,
        }))?;

    state.cache.invalidate_properties().await;

    Ok(Json(ApiResponse::new(updated)))
}

/// DELETE /api/properties/{id}
///
/// Removes stored image variants first (best-effort), then the row.
pub async fn delete(
    State(state): State<AppState>,
    RequireOwner(user): RequireOwner,
    Path(id): Path<DbId>,
) -> AppResult<Json<ApiResponse<()>>> {
    let existing = PropertyRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "property",
            id,
        }))?;

    if user.role != ROLE_ADMIN && existing.owner_id != user.user_id {
        return Err(AppError::Core(CoreError::Forbidden(
            "Vous ne pouvez supprimer que vos propres propriétés".into(),
        )));
    }

    if let Some(store) = &state.store {
        store.delete_urls(&existing.image_urls).await;
    }

    PropertyRepo::delete(&state.pool, id).await?;
    state.cache.invalidate_properties().await;

    Ok(Json(ApiResponse::with_message((), "Propriété supprimée")))
}

fn require_store(store: &Option<Arc<ObjectStore>>) -> AppResult<Arc<ObjectStore>> {
    store.clone().ok_or_else(|| {
        AppError::InternalError("Object storage is not configured".to_string())
    })
}

/// Run the variant pipeline for every uploaded image, collecting the
/// resulting URLs in upload order.
async fn upload_images(
    store: &Arc<ObjectStore>,
    property: &Property,
    images: &[Vec<u8>],
) -> AppResult<Vec<String>> {
    let mut urls = Vec::new();
    for bytes in images {
        let variant_urls =
            img::upload_property_image(store, &property.id.to_string(), bytes).await?;
        urls.extend(variant_urls);
    }
    Ok(urls)
}

// ---------------------------------------------------------------------------
// Multipart form assembly
// ---------------------------------------------------------------------------

/// Text fields collected from the property create form.
#[derive(Default)]
struct PropertyForm {
    title: Option<String>,
    description: Option<String>,
    property_type: Option<String>,
    furnished: Option<String>,
    price_per_night: Option<String>,
    address: Option<String>,
    city: Option<String>,
    latitude: Option<String>,
    longitude: Option<String>,
    room_count: Option<String>,
    amenities: Option<String>,
}

impl PropertyForm {
    fn set(&mut self, name: &str, value: String) {
        match name {
            "title" => self.title = Some(value),
            "description" => self.description = Some(value),
            "type" => self.property_type = Some(value),
            "furnished" => self.furnished = Some(value),
            "price_per_night" => self.price_per_night = Some(value),
            "address" => self.address = Some(value),
            "city" => self.city = Some(value),
            "latitude" => self.latitude = Some(value),
            "longitude" => self.longitude = Some(value),
            "room_count" => self.room_count = Some(value),
            "amenities" => self.amenities = Some(value),
            // Unknown fields are ignored rather than rejected.
            _ => {}
        }
    }

    fn into_create(self) -> AppResult<CreateProperty> {
        let title = required(self.title, "title")?;
        let property_type = required(self.property_type, "type")?;
        if property_type != "apartment" && property_type != "villa" {
            return Err(AppError::Core(CoreError::Validation(format!(
                "Type de propriété invalide: {property_type}"
            ))));
        }
        let price_per_night: f64 = required(self.price_per_night, "price_per_night")?
            .parse()
            .map_err(|_| {
                AppError::Core(CoreError::Validation("price_per_night invalide".into()))
            })?;
        if price_per_night <= 0.0 {
            return Err(AppError::Core(CoreError::Validation(
                "Le prix par nuit doit être positif".into(),
            )));
        }
        let address = required(self.address, "address")?;
        let city = required(self.city, "city")?;

        // Amenities arrive either as a JSON array or a comma-separated list.
        let amenities = match self.amenities {
            None => None,
            Some(raw) => Some(parse_string_list(&raw)),
        };

        Ok(CreateProperty {
            title,
            description: self.description,
            property_type,
            furnished: parse_opt(self.furnished, "furnished")?,
            price_per_night,
            address,
            city,
            latitude: parse_opt(self.latitude, "latitude")?,
            longitude: parse_opt(self.longitude, "longitude")?,
            room_count: parse_opt(self.room_count, "room_count")?,
            amenities,
        })
    }
}

fn required(value: Option<String>, name: &str) -> AppResult<String> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(AppError::Core(CoreError::Validation(format!(
            "Le champ {name} est requis"
        )))),
    }
}

fn parse_opt<T: std::str::FromStr>(value: Option<String>, name: &str) -> AppResult<Option<T>> {
    match value {
        None => Ok(None),
        Some(v) => v.parse().map(Some).map_err(|_| {
            AppError::Core(CoreError::Validation(format!("Le champ {name} est invalide")))
        }),
    }
}

fn parse_string_list(raw: &str) -> Vec<String> {
    if let Ok(list) = serde_json::from_str::<Vec<String>>(raw) {
        return list;
    }
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
