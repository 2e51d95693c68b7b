//! Authentication handlers
//!
//! `auth_callback` is the account-claim workflow: it turns a freshly
//! authenticated identity into a claimed or stub profile exactly once and
//! routes the browser to the right next screen. Every failure on this path
//! is converted to a `/login` redirect and logged; nothing is retried.

use axum::{
    extract::{Extension, Query},
    http::{header::SET_COOKIE, HeaderValue},
    response::{IntoResponse, Redirect, Response},
    Json,
};
use sqlx::SqlitePool;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{error, info, warn};

use super::extractors::AuthedIdentity;
use super::models::{CallbackParams, SESSION_COOKIE};
use crate::common::helpers::profile_path;
use crate::common::{safe_email_log, ApiError, AppState};
use crate::services::identity::Identity;

/// Where the browser goes after a successful authentication
#[derive(Debug, PartialEq)]
pub(crate) enum PostAuthDestination {
    /// No claimed username yet - on to the completion form
    CompleteProfile,
    /// Already claimed - straight to the public page
    Profile(String),
}

/// GET /auth/callback - identity-provider redirect target
///
/// Exchange the authorization code for a session, fetch the identity behind
/// it, then establish or confirm the profile row. Redirects to
/// `/create-account`, the claimed profile page, or `/login` on any failure.
pub async fn auth_callback(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    Query(params): Query<CallbackParams>,
) -> Response {
    let state = state_lock.read().await.clone();

    let Some(code) = params.code else {
        warn!("Auth callback invoked without an authorization code");
        return Redirect::to("/login").into_response();
    };

    let session = match state.identity_service.exchange_code(&code).await {
        Ok(session) => session,
        Err(e) => {
            error!(error = %e, "Session exchange failed");
            return Redirect::to("/login").into_response();
        }
    };

    let identity = match state.identity_service.get_user(&session.access_token).await {
        Ok(identity) => identity,
        Err(e) => {
            // A missing identity after a successful exchange is treated the
            // same as an exchange failure
            error!(error = %e, "Identity fetch failed after session exchange");
            return Redirect::to("/login").into_response();
        }
    };

    match establish_profile(&state.db, &identity).await {
        Ok(PostAuthDestination::CompleteProfile) => {
            info!(
                user_id = %identity.id,
                email = %identity.email.as_deref().map(safe_email_log).unwrap_or_default(),
                "Unclaimed identity, routing to profile completion"
            );
            redirect_with_session("/create-account", &session.access_token)
        }
        Ok(PostAuthDestination::Profile(username)) => {
            info!(user_id = %identity.id, username = %username, "Claimed identity, routing to profile");
            redirect_with_session(&profile_path(&username), &session.access_token)
        }
        Err(e) => {
            error!(error = %e, user_id = %identity.id, "Profile store error during auth callback");
            Redirect::to("/login").into_response()
        }
    }
}

/// Looks up the profile for an identity and creates the minimal stub row if
/// the identity has not claimed a username yet. Insert-if-absent semantics:
/// re-invoking for an already-claimed identity never alters the row.
pub(crate) async fn establish_profile(
    db: &SqlitePool,
    identity: &Identity,
) -> Result<PostAuthDestination, sqlx::Error> {
    let existing: Option<(Option<String>,)> =
        sqlx::query_as("SELECT username FROM profiles WHERE id = ?")
            .bind(&identity.id)
            .fetch_optional(db)
            .await?;

    match existing {
        Some((Some(username),)) if !username.is_empty() => {
            Ok(PostAuthDestination::Profile(username))
        }
        _ => {
            sqlx::query(
                "INSERT INTO profiles (id, email, name) VALUES (?, ?, ?) ON CONFLICT(id) DO NOTHING",
            )
            .bind(&identity.id)
            .bind(identity.email.as_deref())
            .bind(identity.display_name().as_deref())
            .execute(db)
            .await?;

            Ok(PostAuthDestination::CompleteProfile)
        }
    }
}

/// GET /api/me
/// Returns the caller's identity as seen by the provider
///
/// # Response
/// ```json
/// {
///   "user": { "id": "...", "email": "...", "email_confirmed": false, "name": "..." }
/// }
/// ```
pub async fn me_handler(authed: AuthedIdentity) -> Result<Json<serde_json::Value>, ApiError> {
    let resp = serde_json::json!({
        "user": {
            "id": authed.id,
            "email": authed.email,
            "email_confirmed": authed.email_confirmed,
            "name": authed.name,
        },
    });
    Ok(Json(resp))
}

/// POST /api/auth/resend-confirmation
/// Asks the provider to re-send the signup confirmation email. Side
/// affordance of the completion form; has no effect on the claim flow.
pub async fn resend_confirmation_handler(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedIdentity,
) -> Result<Json<serde_json::Value>, ApiError> {
    let state = state_lock.read().await.clone();

    let email = authed
        .email
        .ok_or_else(|| ApiError::BadRequest("No email address on identity".to_string()))?;

    state
        .identity_service
        .resend_confirmation(&email)
        .await
        .map_err(|e| {
            error!(error = %e, email = %safe_email_log(&email), "Failed to resend confirmation email");
            ApiError::Upstream("Failed to send confirmation email".to_string())
        })?;

    info!(email = %safe_email_log(&email), "Confirmation email resent");

    Ok(Json(serde_json::json!({
        "message": "Confirmation email sent"
    })))
}

/// POST /api/auth/signout
/// Revokes the provider session (best-effort) and clears the session cookie
pub async fn signout_handler(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedIdentity,
) -> Response {
    let state = state_lock.read().await.clone();

    if let Err(e) = state.identity_service.sign_out(&authed.access_token).await {
        warn!(error = %e, user_id = %authed.id, "Provider sign-out failed, clearing session anyway");
    }

    info!(user_id = %authed.id, "User signed out");

    let mut response = Json(serde_json::json!({
        "message": "Signed out"
    }))
    .into_response();

    let cleared = format!("{}=; Path=/; HttpOnly; Max-Age=0", SESSION_COOKIE);
    if let Ok(cookie) = HeaderValue::from_str(&cleared) {
        response.headers_mut().append(SET_COOKIE, cookie);
    }

    response
}

// ---- Helper Functions ----

/// Redirect carrying the provider session as an HTTP-only cookie, so the
/// completion and edit forms arrive authenticated
fn redirect_with_session(to: &str, access_token: &str) -> Response {
    let mut response = Redirect::to(to).into_response();

    let cookie = format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax",
        SESSION_COOKIE, access_token
    );
    match HeaderValue::from_str(&cookie) {
        Ok(value) => {
            response.headers_mut().append(SET_COOKIE, value);
        }
        Err(e) => {
            warn!(error = %e, "Failed to attach session cookie to redirect");
        }
    }

    response
}
