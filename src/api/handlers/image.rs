use crate::api::types::{AppError, AppJson, AppState};
use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, HeaderValue},
    response::IntoResponse,
    Json,
};
use base64::{engine::general_purpose, Engine as _};
use serde::{Deserialize, Serialize};

pub fn detect_mime_type(data: &[u8]) -> Option<&'static str> {
    if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
        Some("image/jpeg")
    } else if data.starts_with(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]) {
        Some("image/png")
    } else if data.starts_with(&[0x47, 0x49, 0x46, 0x38]) {
        Some("image/gif")
    } else if data.starts_with(&[0x52, 0x49, 0x46, 0x46])
        && data.len() > 12
        && &data[8..12] == b"WEBP"
    {
        Some("image/webp")
    } else {
        None
    }
}

/// Decodes base64 image content, with or without a data-URI prefix.
pub fn decode_base64_image(content: &str) -> Result<Vec<u8>, AppError> {
    // Handle Data URI scheme
    let clean_base64 = match content.find(',') {
        Some(index) => &content[index + 1..],
        None => content,
    };

    let clean_base64: String = clean_base64
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();

    if clean_base64.is_empty() {
        return Err(AppError::BadRequest("Image content is empty".to_string()));
    }

    general_purpose::STANDARD
        .decode(&clean_base64)
        .map_err(|e| AppError::BadRequest(format!("Invalid Base64 image: {}", e)))
}

pub async fn get_image(
    State(state): State<AppState>,
    Path(hash): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    match state.storage.get_image(&hash).await {
        Ok(Some(data)) => {
            let mime_type = detect_mime_type(&data).unwrap_or("application/octet-stream");
            tracing::debug!(
                "Serving image {}: {} bytes, type: {}",
                hash,
                data.len(),
                mime_type
            );

            let headers = [
                (header::CONTENT_TYPE, HeaderValue::from_static(mime_type)),
                (
                    header::CACHE_CONTROL,
                    HeaderValue::from_static("public, max-age=31536000, immutable"),
                ),
            ];
            Ok((headers, Body::from(data)))
        }
        Ok(None) => Err(AppError::NotFound("Image not found".to_string())),
        Err(e) => Err(AppError::store("read image", e)),
    }
}

#[derive(Deserialize)]
pub struct UploadImageRequest {
    pub content: String,
}

#[derive(Serialize)]
pub struct UploadImageResponse {
    pub hash: String,
    pub reference: String,
}

pub async fn upload_image(
    State(state): State<AppState>,
    AppJson(payload): AppJson<UploadImageRequest>,
) -> Result<Json<UploadImageResponse>, AppError> {
    let data = decode_base64_image(&payload.content)?;
    if detect_mime_type(&data).is_none() {
        return Err(AppError::BadRequest(
            "Unsupported image format (expected JPEG, PNG, GIF or WebP)".to_string(),
        ));
    }

    match state.storage.store_image(&data).await {
        Ok(hash) => Ok(Json(UploadImageResponse {
            reference: format!("/images/{}", hash),
            hash,
        })),
        Err(e) => Err(AppError::store("store image", e)),
    }
}
