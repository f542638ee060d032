//! Handlers for the standalone `/images` endpoints.

use axum::extract::{Multipart, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use sejour_core::error::CoreError;
use sejour_storage::image as img;

use crate::error::{AppError, AppResult};
use crate::handlers::property::MAX_IMAGE_BYTES;
use crate::middleware::auth::AuthUser;
use crate::response::ApiResponse;
use crate::state::AppState;

/// Query for `POST /images/upload`.
#[derive(Debug, Deserialize)]
pub struct UploadQuery {
    /// Destination folder prefix; defaults to `uploads`.
    pub folder: Option<String>,
}

/// Query for `GET /images/optimize`.
#[derive(Debug, Deserialize)]
pub struct OptimizeQuery {
    pub url: String,
}

#[derive(Debug, Serialize)]
pub struct UploadedImage {
    pub url: String,
}

/// POST /api/images/upload
///
/// Generic single-image upload: re-encoded to JPEG, fit inside 1920×1080.
pub async fn upload(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(query): Query<UploadQuery>,
    mut multipart: Multipart,
) -> AppResult<(StatusCode, Json<ApiResponse<UploadedImage>>)> {
    let store = state.store.clone().ok_or_else(|| {
        AppError::InternalError("Object storage is not configured".to_string())
    })?;

    let folder = query.folder.unwrap_or_else(|| "uploads".to_string());

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        if field.name() != Some("image") {
            continue;
        }
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(e.to_string()))?;
        if data.len() > MAX_IMAGE_BYTES {
            return Err(AppError::Core(CoreError::Validation(
                "L'image ne peut pas dépasser 10 Mo".into(),
            )));
        }

        let url = img::upload_single(&store, &folder, &data).await?;
        return Ok((
            StatusCode::CREATED,
            Json(ApiResponse::new(UploadedImage { url })),
        ));
    }

    Err(AppError::BadRequest(
        "Aucune image reçue dans la requête multipart".to_string(),
    ))
}

/// GET /api/images/optimize
///
/// Passthrough: variants are produced at upload time, so the optimized URL
/// is the stored URL itself. Kept for frontend compatibility.
pub async fn optimize(
    Query(query): Query<OptimizeQuery>,
) -> Json<ApiResponse<UploadedImage>> {
    Json(ApiResponse::new(UploadedImage { url: query.url }))
}
