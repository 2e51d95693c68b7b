//! Authentication routes

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers;

/// Creates and returns the authentication router
///
/// # Routes
/// - `GET /auth/callback` - identity-provider redirect (account-claim workflow)
/// - `GET /api/me` - current identity
/// - `POST /api/auth/resend-confirmation` - re-send signup confirmation email
/// - `POST /api/auth/signout` - revoke session and clear cookie
pub fn auth_routes() -> Router {
    Router::new()
        .route("/auth/callback", get(handlers::auth_callback))
        .route("/api/me", get(handlers::me_handler))
        .route(
            "/api/auth/resend-confirmation",
            post(handlers::resend_confirmation_handler),
        )
        .route("/api/auth/signout", post(handlers::signout_handler))
}
