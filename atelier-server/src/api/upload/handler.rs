//! Image Upload Handler
//!
//! Handles image uploads from authenticated admins. Files are stored under a
//! content-addressed name (sha256 of the bytes), so uploading the same image
//! twice yields the same URL and no duplicate blob.

use axum::Json;
use axum::extract::{Multipart, State};
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::path::PathBuf;

use crate::auth::CurrentAdmin;
use crate::core::ServerState;
use crate::utils::{AppError, AppResult};

/// Maximum file size (5MB)
const MAX_FILE_SIZE: usize = 5 * 1024 * 1024;

/// Accepted upload content types
const ALLOWED_CONTENT_TYPES: &[&str] = &["image/jpeg", "image/png", "image/gif", "image/webp"];

/// Upload response
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub success: bool,
    pub filename: String,
    pub url: String,
    pub size: usize,
}

/// Calculate SHA256 hash of data
fn calculate_hash(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

/// Validate the upload: size cap, content-type whitelist, image sniffing
fn validate_image(data: &[u8], content_type: &str) -> Result<(), AppError> {
    if data.len() > MAX_FILE_SIZE {
        return Err(AppError::validation(format!(
            "File too large. Maximum size is {} bytes ({}MB)",
            MAX_FILE_SIZE,
            MAX_FILE_SIZE / 1024 / 1024
        )));
    }

    if !ALLOWED_CONTENT_TYPES.contains(&content_type) {
        return Err(AppError::validation(format!(
            "Invalid file type '{}'. Supported: {}",
            content_type,
            ALLOWED_CONTENT_TYPES.join(", ")
        )));
    }

    // The declared type is not trusted; the bytes must actually be an image
    if image::guess_format(data).is_err() {
        return Err(AppError::validation("File content is not a valid image"));
    }

    Ok(())
}

/// POST /admin/upload - 上传图片 (仅管理员)
pub async fn upload(
    State(state): State<ServerState>,
    _admin: CurrentAdmin,
    mut multipart: Multipart,
) -> AppResult<Json<UploadResponse>> {
    // Find the file field
    let mut field_data: Option<Vec<u8>> = None;
    let mut original_filename = None;
    let mut declared_type = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::validation(format!("Invalid multipart request: {}", e)))?
    {
        let name = field.name().map(|s| s.to_string());
        if name.as_deref() == Some("file") || name.as_deref() == Some("") {
            original_filename = field.file_name().map(|s| s.to_string());
            declared_type = field.content_type().map(|s| s.to_string());
            field_data = Some(
                field
                    .bytes()
                    .await
                    .map_err(|e| AppError::validation(format!("Multipart error: {}", e)))?
                    .to_vec(),
            );
            break;
        }
    }

    let data = field_data.ok_or_else(|| {
        AppError::validation("No 'file' field found. Field name must be 'file'")
    })?;

    let filename = original_filename
        .ok_or_else(|| AppError::validation("No filename provided in file field"))?;

    if data.is_empty() {
        return Err(AppError::validation("Empty file provided"));
    }

    // Extract file extension
    let ext = PathBuf::from(&filename)
        .extension()
        .and_then(|ext| ext.to_str().map(|s| s.to_lowercase()))
        .ok_or_else(|| {
            AppError::validation(format!("Invalid file extension for: {}", filename))
        })?;

    // Content type: prefer the multipart declaration, fall back to the extension
    let content_type = declared_type
        .unwrap_or_else(|| mime_guess::from_ext(&ext).first_or_octet_stream().to_string());

    validate_image(&data, &content_type)?;

    // Content-addressed name: same bytes, same blob
    let file_hash = calculate_hash(&data);
    let stored_name = format!("{}.{}", file_hash, ext);

    let url = state
        .blob_service()
        .put(&data, &stored_name, &content_type)
        .await?;

    tracing::info!(
        original_name = %filename,
        stored_name = %stored_name,
        size = data.len(),
        "Image uploaded"
    );

    Ok(Json(UploadResponse {
        success: true,
        filename: stored_name,
        url,
        size: data.len(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    // Minimal valid PNG header + IHDR chunk, enough for format sniffing
    const PNG_BYTES: &[u8] = &[
        0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48,
        0x44, 0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x02, 0x00, 0x00,
        0x00,
    ];

    #[test]
    fn test_valid_png_accepted() {
        assert!(validate_image(PNG_BYTES, "image/png").is_ok());
    }

    #[test]
    fn test_disallowed_content_type_rejected() {
        assert!(validate_image(PNG_BYTES, "application/pdf").is_err());
        assert!(validate_image(PNG_BYTES, "image/svg+xml").is_err());
    }

    #[test]
    fn test_non_image_bytes_rejected() {
        assert!(validate_image(b"<html>not an image</html>", "image/png").is_err());
    }

    #[test]
    fn test_oversized_file_rejected() {
        let big = vec![0u8; MAX_FILE_SIZE + 1];
        assert!(validate_image(&big, "image/png").is_err());
    }

    #[test]
    fn test_hash_is_stable() {
        assert_eq!(calculate_hash(b"abc"), calculate_hash(b"abc"));
        assert_ne!(calculate_hash(b"abc"), calculate_hash(b"abd"));
    }
}
