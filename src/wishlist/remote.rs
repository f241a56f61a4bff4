//! HTTP client for the document endpoints of `wardrobe-server`.

use async_trait::async_trait;
use reqwest::{Response, StatusCode};
use serde_json::Value;

use super::{Document, DocumentRef, ItemStore, Record, StoreError};
use crate::api::ErrorBody;

/// Document store reached over HTTP with a bearer session token.
#[derive(Debug, Clone)]
pub struct RemoteItemStore {
    client: reqwest::Client,
    base_url: String,
    token: String,
}

impl RemoteItemStore {
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url, token)
    }

    pub fn with_client(
        client: reqwest::Client,
        base_url: impl Into<String>,
        token: impl Into<String>,
    ) -> Self {
        let base_url: String = base_url.into();
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.into(),
        }
    }

    fn documents_url(&self, collection: &str) -> String {
        format!(
            "{}/collections/{}/documents",
            self.base_url,
            urlencoding::encode(collection)
        )
    }

    fn document_url(&self, reference: &DocumentRef) -> String {
        format!(
            "{}/{}",
            self.documents_url(&reference.collection),
            urlencoding::encode(&reference.id)
        )
    }

    async fn fetch_documents(&self, request: reqwest::RequestBuilder) -> Result<Vec<Document>, StoreError> {
        let response = request
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(|e| StoreError::Network(e.to_string()))?;
        let response = check_status(response).await?;
        response
            .json()
            .await
            .map_err(|e| StoreError::Malformed(e.to_string()))
    }
}

/// Maps non-success statuses onto store errors.
async fn check_status(response: Response) -> Result<Response, StoreError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let message = match response.json::<ErrorBody>().await {
        Ok(body) => body.message,
        Err(_) => status
            .canonical_reason()
            .unwrap_or("unknown error")
            .to_string(),
    };

    Err(match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => StoreError::PermissionDenied(message),
        StatusCode::BAD_REQUEST => StoreError::InvalidQuery(message),
        _ => StoreError::Server {
            status: status.as_u16(),
            message,
        },
    })
}

#[async_trait]
impl ItemStore for RemoteItemStore {
    async fn insert(&self, collection: &str, fields: Record) -> Result<DocumentRef, StoreError> {
        let response = self
            .client
            .post(self.documents_url(collection))
            .bearer_auth(&self.token)
            .json(&fields)
            .send()
            .await
            .map_err(|e| StoreError::Network(e.to_string()))?;

        check_status(response)
            .await?
            .json()
            .await
            .map_err(|e| StoreError::Malformed(e.to_string()))
    }

    async fn list_all(&self, collection: &str) -> Result<Vec<Document>, StoreError> {
        self.fetch_documents(self.client.get(self.documents_url(collection)))
            .await
    }

    async fn query_eq(
        &self,
        collection: &str,
        field: &str,
        value: &Value,
    ) -> Result<Vec<Document>, StoreError> {
        let equals = value.to_string();
        let request = self
            .client
            .get(self.documents_url(collection))
            .query(&[("field", field), ("equals", equals.as_str())]);
        self.fetch_documents(request).await
    }

    async fn delete(&self, reference: &DocumentRef) -> Result<(), StoreError> {
        let response = self
            .client
            .delete(self.document_url(reference))
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(|e| StoreError::Network(e.to_string()))?;
        check_status(response).await?;
        Ok(())
    }
}
