// src/services/identity.rs
//! Client for the external identity provider (GoTrue-style HTTP API)
//!
//! The provider owns sign-up, sessions and confirmation emails. This client
//! treats its responses as opaque success/failure plus the identity record;
//! session tokens are never decoded locally.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("identity provider not configured")]
    NotConfigured,

    #[error("HTTP request failed: {0}")]
    RequestFailed(String),

    #[error("provider rejected the request with status {0}")]
    Denied(u16),

    #[error("malformed provider response: {0}")]
    MalformedResponse(String),
}

/// An authenticated principal as reported by the provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Identity {
    pub id: String,
    pub email: Option<String>,
    pub email_confirmed_at: Option<String>,
    #[serde(default)]
    pub user_metadata: serde_json::Value,
}

impl Identity {
    pub fn email_confirmed(&self) -> bool {
        self.email_confirmed_at.is_some()
    }

    /// Best-effort display name from the provider's metadata bag
    pub fn display_name(&self) -> Option<String> {
        self.user_metadata
            .get("full_name")
            .and_then(|v| v.as_str())
            .or_else(|| self.user_metadata.get("name").and_then(|v| v.as_str()))
            .map(str::to_string)
    }
}

/// Session returned by the authorization-code exchange
#[derive(Debug, Clone, Deserialize)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_in: Option<i64>,
}

#[derive(Serialize)]
struct ExchangeCodeRequest<'a> {
    auth_code: &'a str,
}

#[derive(Serialize)]
struct ResendConfirmationRequest<'a> {
    #[serde(rename = "type")]
    kind: &'a str,
    email: &'a str,
}

/// HTTP client for the identity provider
pub struct IdentityService {
    http: Client,
    base_url: Option<String>,
    anon_key: Option<String>,
}

impl IdentityService {
    pub fn new(http: Client, base_url: Option<String>, anon_key: Option<String>) -> Self {
        Self {
            http,
            base_url,
            anon_key,
        }
    }

    fn config(&self) -> Result<(&str, &str), IdentityError> {
        match (self.base_url.as_deref(), self.anon_key.as_deref()) {
            (Some(url), Some(key)) => Ok((url.trim_end_matches('/'), key)),
            _ => Err(IdentityError::NotConfigured),
        }
    }

    /// Exchanges an authorization code from the provider's redirect for a
    /// session. Failure here is terminal for the calling request.
    pub async fn exchange_code(&self, code: &str) -> Result<Session, IdentityError> {
        let (base_url, anon_key) = self.config()?;

        let response = self
            .http
            .post(format!("{}/auth/v1/token?grant_type=pkce", base_url))
            .header("apikey", anon_key)
            .json(&ExchangeCodeRequest { auth_code: code })
            .send()
            .await
            .map_err(|e| IdentityError::RequestFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            warn!(http_status = %status, "Code exchange rejected by identity provider");
            return Err(IdentityError::Denied(status.as_u16()));
        }

        response
            .json::<Session>()
            .await
            .map_err(|e| IdentityError::MalformedResponse(e.to_string()))
    }

    /// Fetches the identity behind a session access token
    pub async fn get_user(&self, access_token: &str) -> Result<Identity, IdentityError> {
        let (base_url, anon_key) = self.config()?;

        let response = self
            .http
            .get(format!("{}/auth/v1/user", base_url))
            .header("apikey", anon_key)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| IdentityError::RequestFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            debug!(http_status = %status, "Identity lookup rejected by provider");
            return Err(IdentityError::Denied(status.as_u16()));
        }

        response
            .json::<Identity>()
            .await
            .map_err(|e| IdentityError::MalformedResponse(e.to_string()))
    }

    /// Asks the provider to re-send the signup confirmation email
    pub async fn resend_confirmation(&self, email: &str) -> Result<(), IdentityError> {
        let (base_url, anon_key) = self.config()?;

        let response = self
            .http
            .post(format!("{}/auth/v1/resend", base_url))
            .header("apikey", anon_key)
            .json(&ResendConfirmationRequest {
                kind: "signup",
                email,
            })
            .send()
            .await
            .map_err(|e| IdentityError::RequestFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(IdentityError::Denied(status.as_u16()));
        }

        Ok(())
    }

    /// Revokes the provider session behind an access token
    pub async fn sign_out(&self, access_token: &str) -> Result<(), IdentityError> {
        let (base_url, anon_key) = self.config()?;

        let response = self
            .http
            .post(format!("{}/auth/v1/logout", base_url))
            .header("apikey", anon_key)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| IdentityError::RequestFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(IdentityError::Denied(status.as_u16()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_display_name_prefers_full_name() {
        let identity: Identity = serde_json::from_value(serde_json::json!({
            "id": "u1",
            "email": "ada@example.com",
            "email_confirmed_at": null,
            "user_metadata": { "full_name": "Ada Lovelace", "name": "ada" }
        }))
        .unwrap();

        assert_eq!(identity.display_name(), Some("Ada Lovelace".to_string()));
        assert!(!identity.email_confirmed());
    }

    #[test]
    fn identity_display_name_falls_back_to_name() {
        let identity: Identity = serde_json::from_value(serde_json::json!({
            "id": "u1",
            "email": "ada@example.com",
            "email_confirmed_at": "2024-01-01T00:00:00Z",
            "user_metadata": { "name": "ada" }
        }))
        .unwrap();

        assert_eq!(identity.display_name(), Some("ada".to_string()));
        assert!(identity.email_confirmed());
    }

    #[test]
    fn identity_tolerates_missing_metadata() {
        let identity: Identity = serde_json::from_value(serde_json::json!({
            "id": "u1",
            "email": "ada@example.com"
        }))
        .unwrap();

        assert_eq!(identity.display_name(), None);
    }

    #[test]
    fn unconfigured_service_reports_not_configured() {
        let service = IdentityService::new(Client::new(), None, None);
        assert!(matches!(
            service.config(),
            Err(IdentityError::NotConfigured)
        ));
    }
}
