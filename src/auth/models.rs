//! Authentication data models

use serde::Deserialize;

/// Name of the session cookie carrying the provider's access token.
/// The token itself is opaque to this system.
pub const SESSION_COOKIE: &str = "spotlist_session";

/// Query parameters on the identity provider's redirect
#[derive(Deserialize)]
pub struct CallbackParams {
    pub code: Option<String>,
}
