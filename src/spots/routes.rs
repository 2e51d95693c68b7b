// src/spots/routes.rs

use axum::{routing::get, Router};

use super::handlers;

pub fn spots_routes() -> Router {
    Router::new().route("/api/spots/search", get(handlers::search_spots_handler))
}
