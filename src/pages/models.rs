// src/pages/models.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::profile::models::Profile;

/// Playlist database model. Written by another system; read-only here.
#[derive(FromRow, Serialize, Deserialize, Debug, Clone)]
pub struct Playlist {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub description: Option<String>,
    pub created_at: Option<String>,
}

/// Public view of a claimed profile. The email never appears on the
/// public page.
#[derive(Serialize, Debug)]
pub struct PublicProfile {
    pub id: String,
    pub name: Option<String>,
    pub username: String,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
    pub created_at: Option<String>,
}

impl From<Profile> for PublicProfile {
    fn from(profile: Profile) -> Self {
        PublicProfile {
            id: profile.id,
            name: profile.name,
            username: profile.username.unwrap_or_default(),
            bio: profile.bio,
            avatar_url: profile.avatar_url,
            created_at: profile.created_at,
        }
    }
}

/// Everything the public profile page renders
#[derive(Serialize, Debug)]
pub struct ProfilePageResponse {
    pub profile: PublicProfile,
    pub playlists: Vec<Playlist>,
}
