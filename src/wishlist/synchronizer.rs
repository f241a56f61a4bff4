use serde_json::Value;
use std::sync::Arc;
use tokio::task::JoinHandle;

use super::{validate_record, ItemStore};
use crate::models::{fields, ClothingItem};

/// Collection holding wishlist documents.
pub const WISHLIST_COLLECTION: &str = "wishlist";

/// Mediates reads and writes of the wishlist collection and owns the
/// in-memory snapshot.
///
/// Store failures never reach the caller: each operation logs the error and
/// returns. Only [`fetch_all`](Self::fetch_all) replaces the snapshot, so
/// after an add the snapshot is stale until the caller fetches again.
pub struct WishlistSynchronizer<S: ?Sized> {
    store: Arc<S>,
    collection: String,
    items: Vec<ClothingItem>,
}

impl<S> WishlistSynchronizer<S>
where
    S: ItemStore + ?Sized + 'static,
{
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            collection: WISHLIST_COLLECTION.to_string(),
            items: Vec::new(),
        }
    }

    pub fn with_collection(mut self, collection: impl Into<String>) -> Self {
        self.collection = collection.into();
        self
    }

    /// Current snapshot, in the order the store last returned it.
    pub fn items(&self) -> &[ClothingItem] {
        &self.items
    }

    /// First item in the snapshot with the given name.
    pub fn find(&self, item_name: &str) -> Option<&ClothingItem> {
        self.items.iter().find(|i| i.item_name == item_name)
    }

    /// Number of items in the snapshot with the given name.
    pub fn count_named(&self, item_name: &str) -> usize {
        self.items.iter().filter(|i| i.item_name == item_name).count()
    }

    /// Inserts the item. Duplicates are allowed.
    pub async fn add(&self, item: &ClothingItem) {
        insert_item(self.store.as_ref(), &self.collection, item).await;
    }

    /// Like [`add`](Self::add) but runs on the tokio runtime so the caller
    /// can move on immediately.
    pub fn spawn_add(&self, item: ClothingItem) -> JoinHandle<()> {
        let store = Arc::clone(&self.store);
        let collection = self.collection.clone();
        tokio::spawn(async move {
            insert_item(store.as_ref(), &collection, &item).await;
        })
    }

    /// Replaces the snapshot with the valid documents currently in the
    /// store. On error the snapshot is left as it was.
    pub async fn fetch_all(&mut self) {
        match self.store.list_all(&self.collection).await {
            Ok(documents) => {
                self.items = documents
                    .iter()
                    .filter_map(|doc| validate_record(&doc.fields))
                    .collect();
                tracing::debug!(
                    "Fetched {} clothing item(s) from {} document(s)",
                    self.items.len(),
                    documents.len()
                );
            }
            Err(e) => {
                tracing::error!("Error fetching clothing items: {}", e);
            }
        }
    }

    /// Deletes the first stored document whose `itemName` matches, then
    /// refreshes the snapshot. No match is a no-op.
    pub async fn delete(&mut self, item: &ClothingItem) {
        let name = Value::from(item.item_name.clone());
        let documents = match self
            .store
            .query_eq(&self.collection, fields::ITEM_NAME, &name)
            .await
        {
            Ok(documents) => documents,
            Err(e) => {
                tracing::error!("Error getting documents: {}", e);
                return;
            }
        };

        let Some(document) = documents.first() else {
            tracing::debug!("No documents named '{}'", item.item_name);
            return;
        };

        match self.store.delete(&document.reference).await {
            Ok(()) => {
                tracing::info!("Document {} successfully deleted", document.reference.id);
                self.fetch_all().await;
            }
            Err(e) => {
                tracing::error!("Error deleting document: {}", e);
            }
        }
    }
}

async fn insert_item<S: ItemStore + ?Sized>(store: &S, collection: &str, item: &ClothingItem) {
    match store.insert(collection, item.to_record()).await {
        Ok(reference) => {
            tracing::info!("Clothing item added successfully ({})", reference.id);
        }
        Err(e) => {
            tracing::error!("Error adding clothing item: {}", e);
        }
    }
}
