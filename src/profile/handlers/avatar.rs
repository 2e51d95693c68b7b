// src/profile/handlers/avatar.rs

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{error, info, warn};

use super::super::models::AvatarUpload;
use crate::common::helpers::{
    content_type_from_extension, image_extension_from_filename, is_valid_image_type,
};
use crate::common::{ApiError, AppState};
use crate::services::media::{MediaError, MediaService};

/// GET /api/avatars/:filename - Serve avatar files
pub async fn serve_avatar(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    Path(filename): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let state = state_lock.read().await.clone();

    let content = state.media_service.read(&filename).await.map_err(|e| match e {
        MediaError::NotFound => ApiError::NotFound("Avatar not found".to_string()),
        MediaError::Io(_) => ApiError::InternalServer("Failed to read avatar file".to_string()),
    })?;

    let content_type = content_type_from_extension(&filename);

    Ok((
        StatusCode::OK,
        [
            ("Content-Type", content_type),
            ("Cache-Control", "public, max-age=31536000"), // 1 year cache
        ],
        content,
    ))
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Media key for a new avatar: `{identity_id}-{unix_millis}.{extension}`.
/// At most one uploader ever writes a given key - the identity's own form.
pub(crate) fn avatar_key(
    identity_id: &str,
    filename: &str,
    now_millis: i64,
) -> Result<String, ApiError> {
    let extension = image_extension_from_filename(filename).ok_or_else(|| {
        ApiError::BadRequest(
            "Unsupported image extension. Use jpg, jpeg, png, gif or webp".to_string(),
        )
    })?;

    Ok(format!("{}-{}.{}", identity_id, now_millis, extension))
}

/// Validates and uploads a new avatar, returning its public URL. Failure
/// here must abort the surrounding submission before any profile write.
pub(crate) async fn store_avatar(
    state: &AppState,
    identity_id: &str,
    upload: &AvatarUpload,
) -> Result<String, ApiError> {
    if !is_valid_image_type(&upload.data) {
        return Err(ApiError::BadRequest(
            "Invalid image type. Only JPEG, PNG, GIF, and WebP are supported".to_string(),
        ));
    }

    let key = avatar_key(identity_id, &upload.filename, Utc::now().timestamp_millis())?;

    state
        .media_service
        .upload(&key, &upload.data)
        .await
        .map_err(|e| {
            error!(error = %e, user_id = %identity_id, key = %key, "Avatar upload failed");
            ApiError::Upstream("Failed to upload avatar".to_string())
        })?;

    info!(user_id = %identity_id, key = %key, "Avatar stored");

    Ok(state.media_service.public_url(&key))
}

/// Best-effort delete of the previous avatar object. Failure is logged and
/// never surfaced; it does not block the replacement upload.
pub(crate) async fn remove_previous_avatar(state: &AppState, user_id: &str, avatar_url: &str) {
    let Some(key) = MediaService::key_from_public_url(avatar_url) else {
        return;
    };

    if let Err(e) = state.media_service.delete(&key).await {
        warn!(error = %e, user_id = %user_id, key = %key, "Failed to delete previous avatar");
    }
}
