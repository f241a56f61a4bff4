//! Clothing store search (OpenStreetMap Nominatim).

use serde::Deserialize;

use crate::models::{Coordinate, Place};

pub const DEFAULT_BASE_URL: &str = "https://nominatim.openstreetmap.org";
pub const DEFAULT_LIMIT: u32 = 10;

/// Sent with every request; Nominatim's usage policy requires an
/// identifying User-Agent.
pub const USER_AGENT: &str = concat!("wardrobe/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, thiserror::Error)]
pub enum PlaceError {
    #[error("could not build HTTP client: {0}")]
    Client(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("place search failed with status {0}")]
    Status(u16),
    #[error("error decoding place search response: {0}")]
    Decode(String),
}

/// One Nominatim result; coordinates arrive as strings.
#[derive(Debug, Deserialize)]
struct SearchHit {
    #[serde(default)]
    name: String,
    #[serde(default)]
    display_name: String,
    lat: String,
    lon: String,
}

impl SearchHit {
    fn into_place(self) -> Option<Place> {
        let latitude = self.lat.parse::<f64>().ok()?;
        let longitude = self.lon.parse::<f64>().ok()?;
        let name = if self.name.is_empty() {
            // Unnamed features: fall back to the first address component
            self.display_name
                .split(',')
                .next()
                .unwrap_or_default()
                .trim()
                .to_string()
        } else {
            self.name
        };
        Some(Place {
            name,
            address: self.display_name,
            coordinate: Coordinate::new(latitude, longitude),
        })
    }
}

/// Parses a search response, dropping hits with unusable coordinates.
pub fn parse_places(body: &str) -> Result<Vec<Place>, PlaceError> {
    let hits: Vec<SearchHit> =
        serde_json::from_str(body).map_err(|e| PlaceError::Decode(e.to_string()))?;
    Ok(hits.into_iter().filter_map(SearchHit::into_place).collect())
}

pub struct PlaceSearchClient {
    client: reqwest::Client,
    base_url: String,
    limit: u32,
}

impl PlaceSearchClient {
    pub fn new(base_url: impl Into<String>, limit: u32) -> Result<Self, PlaceError> {
        let base_url: String = base_url.into();
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| PlaceError::Client(e.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            limit,
        })
    }

    pub async fn search(&self, query: &str) -> Result<Vec<Place>, PlaceError> {
        let limit = self.limit.to_string();
        let response = self
            .client
            .get(format!("{}/search", self.base_url))
            .query(&[("q", query), ("format", "jsonv2"), ("limit", limit.as_str())])
            .send()
            .await
            .map_err(|e| PlaceError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(PlaceError::Status(response.status().as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| PlaceError::Network(e.to_string()))?;
        parse_places(&body)
    }
}
