// src/spots/models.rs

use serde::{Deserialize, Serialize};

use crate::services::places::Spot;

/// Query parameters for the spot search endpoint. `query` stays optional so
/// the handler can tell an absent parameter (client error) apart from an
/// empty one (forwarded upstream).
#[derive(Deserialize, Debug)]
pub struct SpotSearchParams {
    pub query: Option<String>,
}

/// Response envelope for the search endpoint
#[derive(Serialize, Debug)]
pub struct SpotSearchResponse {
    pub places: Vec<Spot>,
}
