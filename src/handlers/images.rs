//! Image upload for product and identity photos.

use crate::error::AppError;
use crate::extractors::SellerSession;
use crate::response;
use crate::state::AppState;
use axum::{
    extract::{Multipart, State},
    response::IntoResponse,
};
use serde::Serialize;
use utoipa::ToSchema;

pub const MAX_IMAGE_BYTES: usize = 1024 * 1024;

#[derive(Debug, Serialize, ToSchema)]
pub struct UploadedImage {
    /// Object-storage key, used as `imageKeys` entry or identity photo reference.
    pub key: String,
    /// Public URL of the object when `S3_PUBLIC_URL` is configured.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// Storage key for a seller's upload.
pub fn image_key(seller_id: i64, id: uuid::Uuid) -> String {
    format!("{}/{}.jpeg", seller_id, id)
}

/// Multipart field `file`, `image/*`, at most 1 MiB. Stored as `image/jpeg`.
pub async fn upload(
    State(state): State<AppState>,
    SellerSession(seller): SellerSession,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let invalid_type = || AppError::BadRequest("Invalid file type. Only images are allowed.".into());
    let mut data = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("invalid multipart body: {}", e)))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let is_image = field.content_type().map(|t| t.starts_with("image/")).unwrap_or(false);
        if !is_image {
            return Err(invalid_type());
        }
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(format!("invalid multipart body: {}", e)))?;
        data = Some(bytes);
        break;
    }
    let data = data.ok_or_else(invalid_type)?;
    if data.len() > MAX_IMAGE_BYTES {
        return Err(AppError::BadRequest("File size exceeds maximum of 1MB".into()));
    }

    let key = image_key(seller.id, uuid::Uuid::new_v4());
    state.storage.put(&key, data.to_vec(), "image/jpeg").await?;
    tracing::info!(seller_id = seller.id, key = %key, size = data.len(), "image uploaded");
    let url = state
        .image_base_url
        .as_deref()
        .map(|base| format!("{}/{}", base.trim_end_matches('/'), key));
    Ok(response::created(UploadedImage { key, url }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_is_scoped_to_seller() {
        let id = uuid::Uuid::nil();
        assert_eq!(image_key(42, id), "42/00000000-0000-0000-0000-000000000000.jpeg");
    }
}
