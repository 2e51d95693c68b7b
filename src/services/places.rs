// src/services/places.rs
//! Google Places text-search client
//!
//! Pure passthrough: one upstream call per request, no retries, no caching,
//! no pagination. The wire result is reshaped into the `Spot` records the
//! search endpoint returns.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

const TEXT_SEARCH_URL: &str = "https://maps.googleapis.com/maps/api/place/textsearch/json";

#[derive(Debug, Error)]
pub enum PlacesError {
    #[error("places API not configured")]
    NotConfigured,

    #[error("HTTP request failed: {0}")]
    RequestFailed(String),

    #[error("places API returned HTTP status {0}")]
    UpstreamStatus(u16),

    #[error("malformed places response: {0}")]
    MalformedResponse(String),

    #[error("places API rejected the search: {0}")]
    UpstreamRejected(String),
}

/// A reshaped place record
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Spot {
    pub spot_id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub types: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photos: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct TextSearchResponse {
    status: String,
    #[serde(default)]
    results: Vec<PlaceResult>,
}

#[derive(Debug, Deserialize)]
struct PlaceResult {
    place_id: String,
    name: String,
    formatted_address: Option<String>,
    rating: Option<f64>,
    types: Option<Vec<String>>,
    photos: Option<Vec<PlacePhoto>>,
}

#[derive(Debug, Deserialize)]
struct PlacePhoto {
    photo_reference: String,
}

impl From<PlaceResult> for Spot {
    fn from(place: PlaceResult) -> Self {
        Spot {
            spot_id: place.place_id,
            name: place.name,
            address: place.formatted_address,
            rating: place.rating,
            types: place.types,
            photos: place
                .photos
                .map(|photos| photos.into_iter().map(|p| p.photo_reference).collect()),
        }
    }
}

/// HTTP client for the places API
pub struct PlacesService {
    http: Client,
    api_key: Option<String>,
}

impl PlacesService {
    pub fn new(http: Client, api_key: Option<String>) -> Self {
        Self { http, api_key }
    }

    /// Free-text search. An empty query is forwarded like any other; the
    /// upstream decides what to make of it.
    pub async fn text_search(&self, query: &str) -> Result<Vec<Spot>, PlacesError> {
        let api_key = self.api_key.as_deref().ok_or(PlacesError::NotConfigured)?;

        let response = self
            .http
            .get(TEXT_SEARCH_URL)
            .query(&[("query", query), ("key", api_key)])
            .send()
            .await
            .map_err(|e| PlacesError::RequestFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(PlacesError::UpstreamStatus(status.as_u16()));
        }

        let body = response
            .json::<TextSearchResponse>()
            .await
            .map_err(|e| PlacesError::MalformedResponse(e.to_string()))?;

        debug!(
            upstream_status = %body.status,
            result_count = body.results.len(),
            "Places text search completed"
        );

        match body.status.as_str() {
            "OK" | "ZERO_RESULTS" => Ok(body.results.into_iter().map(Spot::from).collect()),
            other => Err(PlacesError::UpstreamRejected(other.to_string())),
        }
    }
}
