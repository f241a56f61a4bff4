//! Photo search for the inspiration feed (Unsplash).

use serde::Deserialize;

pub const DEFAULT_BASE_URL: &str = "https://api.unsplash.com";
pub const DEFAULT_QUERY: &str = "clothing";
pub const DEFAULT_PER_PAGE: u32 = 30;

#[derive(Debug, thiserror::Error)]
pub enum PhotoError {
    #[error("photo search needs an access key (photos.access_key or WARDROBE_UNSPLASH_ACCESS_KEY)")]
    MissingAccessKey,
    #[error("network error: {0}")]
    Network(String),
    #[error("photo search failed with status {0}")]
    Status(u16),
    #[error("error decoding photo search response: {0}")]
    Decode(String),
}

#[derive(Debug, Deserialize, Default)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<PhotoResult>,
}

#[derive(Debug, Deserialize)]
struct PhotoResult {
    #[serde(default)]
    urls: Option<PhotoUrls>,
}

#[derive(Debug, Deserialize)]
struct PhotoUrls {
    #[serde(default)]
    regular: Option<String>,
}

/// Flattens a search response body into its "regular" image URLs,
/// skipping results without one.
pub fn regular_urls(body: &str) -> Result<Vec<String>, PhotoError> {
    let response: SearchResponse =
        serde_json::from_str(body).map_err(|e| PhotoError::Decode(e.to_string()))?;

    Ok(response
        .results
        .into_iter()
        .filter_map(|r| r.urls.and_then(|u| u.regular))
        .filter(|url| reqwest::Url::parse(url).is_ok())
        .collect())
}

pub struct PhotoSearchClient {
    client: reqwest::Client,
    base_url: String,
    access_key: String,
}

impl PhotoSearchClient {
    pub fn new(base_url: impl Into<String>, access_key: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            access_key: access_key.into(),
        }
    }

    /// Returns image URLs for one page of results.
    pub async fn search(
        &self,
        query: &str,
        per_page: u32,
        page: u32,
    ) -> Result<Vec<String>, PhotoError> {
        if self.access_key.is_empty() {
            return Err(PhotoError::MissingAccessKey);
        }

        let per_page = per_page.to_string();
        let page = page.to_string();
        let response = self
            .client
            .get(format!("{}/search/photos", self.base_url))
            .query(&[
                ("query", query),
                ("client_id", self.access_key.as_str()),
                ("per_page", per_page.as_str()),
                ("page", page.as_str()),
            ])
            .send()
            .await
            .map_err(|e| PhotoError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(PhotoError::Status(response.status().as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| PhotoError::Network(e.to_string()))?;
        regular_urls(&body)
    }
}
