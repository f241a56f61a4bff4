use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A flat document body as stored remotely.
pub type Record = serde_json::Map<String, Value>;

/// Address of a single stored document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DocumentRef {
    pub collection: String,
    pub id: String,
}

/// A stored document and its fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(flatten)]
    pub reference: DocumentRef,
    pub fields: Record,
}

/// Errors a document store can report.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The store could not be reached.
    #[error("network error: {0}")]
    Network(String),
    /// Missing or rejected credentials.
    #[error("permission denied: {0}")]
    PermissionDenied(String),
    /// The query was malformed (bad field name or value).
    #[error("invalid query: {0}")]
    InvalidQuery(String),
    /// The store answered with an unexpected status.
    #[error("store error ({status}): {message}")]
    Server { status: u16, message: String },
    /// Storage backend failure.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    /// The response body could not be decoded.
    #[error("malformed response: {0}")]
    Malformed(String),
}

/// Operations the wishlist needs from a document store.
///
/// Listing and querying return documents in the store's own order;
/// callers must not assume anything beyond that order being stable for a
/// single response.
#[async_trait]
pub trait ItemStore: Send + Sync {
    async fn insert(&self, collection: &str, fields: Record) -> Result<DocumentRef, StoreError>;

    async fn list_all(&self, collection: &str) -> Result<Vec<Document>, StoreError>;

    async fn query_eq(
        &self,
        collection: &str,
        field: &str,
        value: &Value,
    ) -> Result<Vec<Document>, StoreError>;

    async fn delete(&self, reference: &DocumentRef) -> Result<(), StoreError>;
}
