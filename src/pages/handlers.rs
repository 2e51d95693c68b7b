// src/pages/handlers.rs

use axum::extract::{Extension, Json, Path};
use sqlx::SqlitePool;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::warn;

use super::models::{Playlist, ProfilePageResponse};
use crate::common::{ApiError, AppState};
use crate::profile::models::Profile;

/// GET /:username - Public profile page
///
/// Point read by username; an unknown handle is a not-found response, not
/// an error.
pub async fn profile_page_handler(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    Path(username): Path<String>,
) -> Result<Json<ProfilePageResponse>, ApiError> {
    let state = state_lock.read().await.clone();

    let profile = sqlx::query_as::<_, Profile>("SELECT * FROM profiles WHERE username = ?")
        .bind(&username)
        .fetch_optional(&state.db)
        .await
        .map_err(ApiError::DatabaseError)?
        .ok_or_else(|| ApiError::NotFound("No profile with that username".to_string()))?;

    let playlists = playlists_for(&state.db, &profile.id).await;

    Ok(Json(ProfilePageResponse {
        profile: profile.into(),
        playlists,
    }))
}

/// Playlists for a profile, newest first. A read failure degrades to an
/// empty list rather than failing the page.
pub(crate) async fn playlists_for(db: &SqlitePool, user_id: &str) -> Vec<Playlist> {
    match sqlx::query_as::<_, Playlist>(
        "SELECT * FROM playlists WHERE user_id = ? ORDER BY created_at DESC",
    )
    .bind(user_id)
    .fetch_all(db)
    .await
    {
        Ok(playlists) => playlists,
        Err(e) => {
            warn!(error = %e, user_id = %user_id, "Failed to load playlists for profile page");
            Vec::new()
        }
    }
}
