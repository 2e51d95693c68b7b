// src/profile/models.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Profile database model
///
/// One row per identity, keyed by the provider's user id. A NULL username
/// means the profile is an unclaimed stub.
#[derive(FromRow, Serialize, Deserialize, Debug, Clone)]
pub struct Profile {
    pub id: String,
    pub email: Option<String>,
    pub name: Option<String>,
    pub username: Option<String>,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

/// Fields collected from the completion and edit forms (multipart)
#[derive(Debug, Default)]
pub struct ProfileForm {
    pub name: String,
    pub username: String,
    pub bio: Option<String>,
    pub avatar: Option<AvatarUpload>,
}

/// A new avatar image carried in the form
#[derive(Debug)]
pub struct AvatarUpload {
    pub filename: String,
    pub data: Vec<u8>,
}

/// Response to a successful first-time claim
#[derive(Serialize, Debug)]
pub struct ClaimProfileResponse {
    pub profile: Profile,
    pub redirect_to: String,
}
