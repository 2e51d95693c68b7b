//! Authentication extractors for Axum

use async_trait::async_trait;
use axum::{
    extract::{Extension, FromRequestParts},
    http::{
        header::{AUTHORIZATION, COOKIE},
        request::Parts,
    },
};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use super::models::SESSION_COOKIE;
use crate::common::{safe_email_log, ApiError, AppState};
use crate::services::identity::IdentityError;

/// Authenticated identity extractor
///
/// Takes the provider access token from the Authorization header or the
/// session cookie and resolves it through the identity provider. The token
/// is never decoded locally; the provider is the sole authority on it.
#[derive(Debug)]
pub struct AuthedIdentity {
    pub id: String,
    pub email: Option<String>,
    pub email_confirmed: bool,
    pub name: Option<String>,
    pub access_token: String,
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthedIdentity
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        // Extract the Extension containing the AppState
        let Extension(state_lock): Extension<Arc<RwLock<AppState>>> =
            Extension::from_request_parts(parts, state)
                .await
                .map_err(|_| ApiError::InternalServer("missing app state".to_string()))?;

        let app_state = state_lock.read().await.clone();

        // Bearer token takes precedence over the session cookie
        let bearer = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .map(|s| match s.strip_prefix("Bearer ") {
                Some(rest) => rest.to_string(),
                None => s.to_string(),
            });

        let cookie_token = parts
            .headers
            .get(COOKIE)
            .and_then(|h| h.to_str().ok())
            .and_then(session_token_from_cookie_header);

        let token = match bearer.or(cookie_token) {
            Some(t) => t,
            None => {
                warn!("Authentication failed: no session token on request");
                return Err(ApiError::Unauthorized("missing auth".into()));
            }
        };

        // Resolve the token through the identity provider
        let identity = match app_state.identity_service.get_user(&token).await {
            Ok(identity) => identity,
            Err(IdentityError::NotConfigured) => {
                return Err(ApiError::InternalServer(
                    "identity provider not configured".to_string(),
                ));
            }
            Err(e) => {
                warn!(error = %e, "Session token rejected by identity provider");
                return Err(ApiError::Unauthorized("invalid session".into()));
            }
        };

        debug!(
            user_id = %identity.id,
            email = %identity.email.as_deref().map(safe_email_log).unwrap_or_default(),
            "Identity resolved via extractor"
        );

        let email_confirmed = identity.email_confirmed();
        let name = identity.display_name();
        Ok(AuthedIdentity {
            id: identity.id,
            email_confirmed,
            name,
            email: identity.email,
            access_token: token,
        })
    }
}

/// Pulls the session token out of a raw Cookie header value
pub(crate) fn session_token_from_cookie_header(header: &str) -> Option<String> {
    header
        .split(';')
        .map(str::trim)
        .find_map(|pair| pair.strip_prefix(SESSION_COOKIE).and_then(|rest| rest.strip_prefix('=')))
        .filter(|token| !token.is_empty())
        .map(str::to_string)
}
