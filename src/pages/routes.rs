// src/pages/routes.rs

use axum::{routing::get, Router};

use super::handlers;

/// The public profile page. Registered last in the router; every static
/// route wins over this single-segment capture.
pub fn pages_routes() -> Router {
    Router::new().route("/:username", get(handlers::profile_page_handler))
}
