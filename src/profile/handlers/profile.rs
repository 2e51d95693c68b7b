// src/profile/handlers/profile.rs

use axum::extract::{Extension, Json, Multipart};
use sqlx::SqlitePool;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{error, info};

use super::super::models::{AvatarUpload, ClaimProfileResponse, Profile, ProfileForm};
use super::super::validators::{
    normalize_claim_username, normalize_edit_username, ProfileFormValidator,
};
use super::avatar::{remove_previous_avatar, store_avatar};
use crate::auth::AuthedIdentity;
use crate::common::helpers::profile_path;
use crate::common::{ApiError, AppState, Validator};

/// POST /api/profile/claim - First-time claim from the completion form
///
/// Collects name, username, optional bio and optional avatar, and performs
/// the single upsert that transitions the profile from unclaimed to
/// claimed. The avatar upload happens first; if it fails nothing is
/// written and the prior unclaimed state is untouched.
pub async fn claim_profile_handler(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedIdentity,
    mut multipart: Multipart,
) -> Result<Json<ClaimProfileResponse>, ApiError> {
    let state = state_lock.read().await.clone();

    info!(user_id = %authed.id, "Profile claim initiated");

    let mut form = read_profile_form(&mut multipart).await?;
    // The completion form only lower-cases; illegal characters survive
    form.username = normalize_claim_username(&form.username);

    let result = ProfileFormValidator.validate(&form);
    if !result.is_valid {
        return Err(result.into());
    }

    let avatar_url = match &form.avatar {
        Some(upload) => Some(store_avatar(&state, &authed.id, upload).await?),
        None => None,
    };

    let profile = persist_claim(
        &state.db,
        &authed.id,
        authed.email.as_deref(),
        &form,
        avatar_url.as_deref(),
    )
    .await?;

    info!(user_id = %authed.id, username = %form.username, "Profile claimed");

    Ok(Json(ClaimProfileResponse {
        redirect_to: profile_path(&form.username),
        profile,
    }))
}

/// GET /api/profile - Load the caller's profile for the edit form
pub async fn profile_handler(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedIdentity,
) -> Result<Json<Profile>, ApiError> {
    let state = state_lock.read().await.clone();

    let profile = sqlx::query_as::<_, Profile>("SELECT * FROM profiles WHERE id = ?")
        .bind(&authed.id)
        .fetch_optional(&state.db)
        .await
        .map_err(ApiError::DatabaseError)?
        .ok_or_else(|| ApiError::NotFound("Profile not found".to_string()))?;

    Ok(Json(profile))
}

/// PUT /api/profile - Owner edit of an existing profile
///
/// If a new avatar is supplied, the previous media object is deleted
/// best-effort before the upload; a successful delete is never rolled back
/// when the upload then fails. The profile row itself changes in a single
/// UPDATE or not at all.
pub async fn update_profile_handler(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedIdentity,
    mut multipart: Multipart,
) -> Result<Json<Profile>, ApiError> {
    let state = state_lock.read().await.clone();

    info!(user_id = %authed.id, "Profile update initiated");

    let current = sqlx::query_as::<_, Profile>("SELECT * FROM profiles WHERE id = ?")
        .bind(&authed.id)
        .fetch_optional(&state.db)
        .await
        .map_err(ApiError::DatabaseError)?
        .ok_or_else(|| ApiError::NotFound("Profile not found".to_string()))?;

    let mut form = read_profile_form(&mut multipart).await?;
    // The edit form is strict: lower-case plus [a-z0-9_] stripping
    form.username = normalize_edit_username(&form.username);

    let result = ProfileFormValidator.validate(&form);
    if !result.is_valid {
        return Err(result.into());
    }

    let avatar_url = match &form.avatar {
        Some(upload) => {
            if let Some(current_url) = current.avatar_url.as_deref() {
                remove_previous_avatar(&state, &authed.id, current_url).await;
            }
            Some(store_avatar(&state, &authed.id, upload).await?)
        }
        None => current.avatar_url.clone(),
    };

    let profile = persist_update(&state.db, &authed.id, &form, avatar_url.as_deref()).await?;

    info!(user_id = %authed.id, username = %form.username, "Profile updated");

    Ok(Json(profile))
}

// ============================================================================
// Persistence Helpers
// ============================================================================

/// The claim upsert: one statement keyed by id. Username uniqueness is
/// enforced solely by the store's constraint; a violation comes back as a
/// recoverable validation error.
pub(crate) async fn persist_claim(
    db: &SqlitePool,
    identity_id: &str,
    email: Option<&str>,
    form: &ProfileForm,
    avatar_url: Option<&str>,
) -> Result<Profile, ApiError> {
    sqlx::query(
        r#"
        INSERT INTO profiles (id, email, name, username, bio, avatar_url)
        VALUES (?, ?, ?, ?, ?, ?)
        ON CONFLICT(id) DO UPDATE SET
            email = excluded.email,
            name = excluded.name,
            username = excluded.username,
            bio = excluded.bio,
            avatar_url = excluded.avatar_url,
            updated_at = datetime('now')
        "#,
    )
    .bind(identity_id)
    .bind(email)
    .bind(&form.name)
    .bind(&form.username)
    .bind(form.bio.as_deref())
    .bind(avatar_url)
    .execute(db)
    .await
    .map_err(map_profile_write_error)?;

    fetch_profile(db, identity_id).await
}

/// The edit update: a single statement filtered by id
pub(crate) async fn persist_update(
    db: &SqlitePool,
    identity_id: &str,
    form: &ProfileForm,
    avatar_url: Option<&str>,
) -> Result<Profile, ApiError> {
    sqlx::query(
        r#"
        UPDATE profiles
        SET name = ?, username = ?, bio = ?, avatar_url = ?, updated_at = datetime('now')
        WHERE id = ?
        "#,
    )
    .bind(&form.name)
    .bind(&form.username)
    .bind(form.bio.as_deref())
    .bind(avatar_url)
    .bind(identity_id)
    .execute(db)
    .await
    .map_err(map_profile_write_error)?;

    fetch_profile(db, identity_id).await
}

async fn fetch_profile(db: &SqlitePool, identity_id: &str) -> Result<Profile, ApiError> {
    sqlx::query_as::<_, Profile>("SELECT * FROM profiles WHERE id = ?")
        .bind(identity_id)
        .fetch_one(db)
        .await
        .map_err(|e| {
            error!(error = %e, user_id = %identity_id, "Database error fetching profile after write");
            ApiError::DatabaseError(e)
        })
}

pub(crate) fn map_profile_write_error(e: sqlx::Error) -> ApiError {
    if is_username_conflict(&e) {
        return ApiError::ValidationError("username: That username is already taken".to_string());
    }

    error!(error = %e, "Database error writing profile");
    ApiError::DatabaseError(e)
}

pub(crate) fn is_username_conflict(e: &sqlx::Error) -> bool {
    match e {
        sqlx::Error::Database(db) => db
            .message()
            .contains("UNIQUE constraint failed: profiles.username"),
        _ => false,
    }
}

// ============================================================================
// Multipart Form Reading
// ============================================================================

/// Reads the fields shared by the completion and edit forms. An avatar part
/// with no bytes is treated as "no new image".
pub(crate) async fn read_profile_form(multipart: &mut Multipart) -> Result<ProfileForm, ApiError> {
    let mut form = ProfileForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| ApiError::BadRequest("Malformed multipart form".to_string()))?
    {
        let field_name = field.name().map(str::to_string);
        match field_name.as_deref() {
            Some("name") => {
                form.name = field
                    .text()
                    .await
                    .map_err(|_| ApiError::BadRequest("Failed to read name field".to_string()))?;
            }
            Some("username") => {
                form.username = field.text().await.map_err(|_| {
                    ApiError::BadRequest("Failed to read username field".to_string())
                })?;
            }
            Some("bio") => {
                let bio = field
                    .text()
                    .await
                    .map_err(|_| ApiError::BadRequest("Failed to read bio field".to_string()))?;
                form.bio = if bio.is_empty() { None } else { Some(bio) };
            }
            Some("avatar") => {
                let filename = field
                    .file_name()
                    .ok_or_else(|| ApiError::BadRequest("No filename provided".to_string()))?
                    .to_string();

                let data = field
                    .bytes()
                    .await
                    .map_err(|_| ApiError::BadRequest("Failed to read file data".to_string()))?;

                if !data.is_empty() {
                    form.avatar = Some(AvatarUpload {
                        filename,
                        data: data.to_vec(),
                    });
                }
            }
            _ => {}
        }
    }

    Ok(form)
}
