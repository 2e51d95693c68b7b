// src/users/routes.rs

use axum::{routing::get, Router};

use super::handlers;

pub fn users_routes() -> Router {
    Router::new().route(
        "/api/user",
        get(handlers::first_user_handler).post(handlers::create_user_handler),
    )
}
