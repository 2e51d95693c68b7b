// Application state shared across all modules

use reqwest::Client;
use sqlx::SqlitePool;
use std::sync::Arc;

use crate::services::{IdentityService, MediaService, PlacesService};

/// Application state containing the database pool, the shared HTTP client
/// and the external-collaborator services
#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub http: Client,
    pub identity_service: Arc<IdentityService>,
    pub media_service: Arc<MediaService>,
    pub places_service: Arc<PlacesService>,
}
