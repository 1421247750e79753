//! Image upload endpoint.

use std::path::Path;

use axum::{
    extract::{multipart::MultipartError, Multipart, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;

use super::ApiResult;
use crate::errors::AppError;
use crate::AppState;

/// Largest accepted image.
pub const MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

/// Request body limit for the upload route; leaves room for multipart framing.
pub const UPLOAD_BODY_LIMIT: usize = MAX_UPLOAD_BYTES + 64 * 1024;

const UPLOAD_FIELD: &str = "image";
const ALLOWED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp"];

/// Public URL prefix uploaded files are served from.
pub const UPLOADS_URL_PREFIX: &str = "/uploads";

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub url: String,
}

/// Lowercased extension if it is one we accept.
fn allowed_extension(file_name: &str) -> Option<String> {
    let ext = Path::new(file_name)
        .extension()?
        .to_str()?
        .to_ascii_lowercase();
    ALLOWED_EXTENSIONS.contains(&ext.as_str()).then_some(ext)
}

fn multipart_error(e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        too_large()
    } else {
        AppError::BadRequest(format!("Invalid multipart body: {}", e.body_text()))
    }
}

fn too_large() -> AppError {
    AppError::BadRequest(format!(
        "Image exceeds the {} MB limit",
        MAX_UPLOAD_BYTES / (1024 * 1024)
    ))
}

/// POST /api/blog/admin/upload - Store one image under a random name.
pub async fn upload_image(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ApiResult<Json<UploadResponse>> {
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }

        let original_name = field.file_name().unwrap_or_default().to_string();
        let ext = allowed_extension(&original_name).ok_or_else(|| {
            AppError::BadRequest(format!(
                "Only image files are allowed ({})",
                ALLOWED_EXTENSIONS.join(", ")
            ))
        })?;
        if let Some(content_type) = field.content_type() {
            if !content_type.starts_with("image/") {
                return Err(AppError::BadRequest(format!(
                    "Unsupported content type {}",
                    content_type
                )));
            }
        }

        let bytes = field.bytes().await.map_err(multipart_error)?;
        if bytes.len() > MAX_UPLOAD_BYTES {
            return Err(too_large());
        }

        let upload_dir = &state.config.upload_dir;
        tokio::fs::create_dir_all(upload_dir).await?;
        let file_name = format!("{}.{}", uuid::Uuid::new_v4(), ext);
        tokio::fs::write(upload_dir.join(&file_name), &bytes).await?;

        tracing::info!(
            "Stored upload {} ({} bytes) as {}",
            original_name,
            bytes.len(),
            file_name
        );
        return Ok(Json(UploadResponse {
            url: format!("{}/{}", UPLOADS_URL_PREFIX, file_name),
        }));
    }

    Err(AppError::BadRequest(format!(
        "No file uploaded in field \"{}\"",
        UPLOAD_FIELD
    )))
}
