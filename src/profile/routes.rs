// src/profile/routes.rs

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{avatar, profile};

pub fn profile_routes() -> Router {
    Router::new()
        // Profile routes
        .route(
            "/api/profile",
            get(profile::profile_handler).put(profile::update_profile_handler),
        )
        .route("/api/profile/claim", post(profile::claim_profile_handler))
        // Avatar routes
        .route("/api/avatars/:filename", get(avatar::serve_avatar))
}
