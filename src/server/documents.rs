//! SQLite-backed document collections.
//!
//! Documents are flat JSON objects stored per collection. Listing and
//! field queries return documents in insertion order.

use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::wishlist::{Document, DocumentRef, ItemStore, Record, StoreError};

#[derive(Debug, Clone)]
pub struct SqliteItemStore {
    pool: SqlitePool,
}

#[derive(sqlx::FromRow)]
struct DocumentRow {
    id: String,
    collection: String,
    fields: String,
}

impl From<DocumentRow> for Document {
    fn from(row: DocumentRow) -> Self {
        // Stored bodies are written by insert and always objects; anything
        // else decodes as an empty record and fails validation downstream.
        let fields = serde_json::from_str::<Record>(&row.fields).unwrap_or_default();
        Document {
            reference: DocumentRef {
                collection: row.collection,
                id: row.id,
            },
            fields,
        }
    }
}

/// Builds the `json_extract` path for a top-level field.
fn field_path(field: &str) -> Result<String, StoreError> {
    let valid = !field.is_empty()
        && field
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_');
    if !valid {
        return Err(StoreError::InvalidQuery(format!(
            "invalid field name '{}'",
            field
        )));
    }
    Ok(format!("$.{}", field))
}

impl SqliteItemStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ItemStore for SqliteItemStore {
    async fn insert(&self, collection: &str, fields: Record) -> Result<DocumentRef, StoreError> {
        let id = Uuid::new_v4().to_string();
        let body = Value::Object(fields).to_string();

        sqlx::query("INSERT INTO documents (id, collection, fields, created_at) VALUES (?, ?, ?, ?)")
            .bind(&id)
            .bind(collection)
            .bind(&body)
            .bind(Utc::now().to_rfc3339())
            .execute(&self.pool)
            .await?;

        Ok(DocumentRef {
            collection: collection.to_string(),
            id,
        })
    }

    async fn list_all(&self, collection: &str) -> Result<Vec<Document>, StoreError> {
        let rows: Vec<DocumentRow> = sqlx::query_as(
            "SELECT id, collection, fields FROM documents WHERE collection = ? ORDER BY seq",
        )
        .bind(collection)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Document::from).collect())
    }

    /// Equality against a scalar; objects and arrays are rejected and
    /// `null` matches nothing. `json_extract` yields 1/0 for booleans, so
    /// booleans only match booleans.
    async fn query_eq(
        &self,
        collection: &str,
        field: &str,
        value: &Value,
    ) -> Result<Vec<Document>, StoreError> {
        let path = field_path(field)?;
        if value.is_object() || value.is_array() {
            return Err(StoreError::InvalidQuery(
                "only scalar values can be compared".to_string(),
            ));
        }

        let rows: Vec<DocumentRow> = sqlx::query_as(
            r#"
            SELECT id, collection, fields FROM documents
            WHERE collection = ?1
              AND json_extract(fields, ?2) = json_extract(?3, '$')
              AND (json_type(fields, ?2) IN ('true', 'false'))
                = (json_type(?3, '$') IN ('true', 'false'))
            ORDER BY seq
            "#,
        )
        .bind(collection)
        .bind(&path)
        .bind(value.to_string())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Document::from).collect())
    }

    async fn delete(&self, reference: &DocumentRef) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM documents WHERE collection = ? AND id = ?")
            .bind(&reference.collection)
            .bind(&reference.id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            tracing::debug!(
                "Delete of missing document {}/{}",
                reference.collection,
                reference.id
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::init_db;
    use serde_json::json;
    use tempfile::TempDir;

    struct TestContext {
        store: SqliteItemStore,
        _temp_dir: TempDir,
    }

    async fn setup_store() -> TestContext {
        let temp_dir = TempDir::new().unwrap();
        let pool = init_db(&temp_dir.path().join("test.db")).await.unwrap();
        TestContext {
            store: SqliteItemStore::new(pool),
            _temp_dir: temp_dir,
        }
    }

    fn record(value: Value) -> Record {
        match value {
            Value::Object(map) => map,
            _ => panic!("test record must be an object"),
        }
    }

    fn names(documents: &[Document]) -> Vec<&str> {
        documents
            .iter()
            .map(|d| d.fields["itemName"].as_str().unwrap())
            .collect()
    }

    #[tokio::test]
    async fn test_insert_and_list_in_order() {
        let ctx = setup_store().await;
        let store = &ctx.store;

        for name in ["Zip Hoodie", "Anorak", "Moccasin"] {
            store
                .insert("wishlist", record(json!({"itemName": name, "brand": "X"})))
                .await
                .unwrap();
        }

        let documents = store.list_all("wishlist").await.unwrap();
        assert_eq!(names(&documents), vec!["Zip Hoodie", "Anorak", "Moccasin"]);
        assert!(documents.iter().all(|d| d.reference.collection == "wishlist"));
    }

    #[tokio::test]
    async fn test_collections_are_isolated() {
        let ctx = setup_store().await;
        let store = &ctx.store;

        store
            .insert("wishlist", record(json!({"itemName": "Coat"})))
            .await
            .unwrap();
        store
            .insert("outfits", record(json!({"itemName": "Look 1"})))
            .await
            .unwrap();

        assert_eq!(names(&store.list_all("wishlist").await.unwrap()), vec!["Coat"]);
        assert!(store.list_all("empty").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_fields_round_trip() {
        let ctx = setup_store().await;
        let store = &ctx.store;

        let fields = record(json!({"itemName": "Coat", "price": 500.0, "size": "M"}));
        let reference = store.insert("wishlist", fields.clone()).await.unwrap();

        let documents = store.list_all("wishlist").await.unwrap();
        assert_eq!(documents[0].reference, reference);
        assert_eq!(documents[0].fields, fields);
    }

    #[tokio::test]
    async fn test_query_eq_by_string() {
        let ctx = setup_store().await;
        let store = &ctx.store;

        store
            .insert("wishlist", record(json!({"itemName": "Hat", "brand": "Nike"})))
            .await
            .unwrap();
        store
            .insert("wishlist", record(json!({"itemName": "Coat", "brand": "Staud"})))
            .await
            .unwrap();
        store
            .insert("wishlist", record(json!({"itemName": "Hat", "brand": "Kangol"})))
            .await
            .unwrap();

        let hats = store
            .query_eq("wishlist", "itemName", &json!("Hat"))
            .await
            .unwrap();
        assert_eq!(hats.len(), 2);
        assert_eq!(hats[0].fields["brand"], "Nike");
        assert_eq!(hats[1].fields["brand"], "Kangol");

        let none = store
            .query_eq("wishlist", "itemName", &json!("Scarf"))
            .await
            .unwrap();
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn test_query_eq_distinguishes_types() {
        let ctx = setup_store().await;
        let store = &ctx.store;

        store
            .insert("wishlist", record(json!({"itemName": "A", "price": 500})))
            .await
            .unwrap();
        store
            .insert("wishlist", record(json!({"itemName": "B", "price": "500"})))
            .await
            .unwrap();

        let numeric = store
            .query_eq("wishlist", "price", &json!(500))
            .await
            .unwrap();
        assert_eq!(names(&numeric), vec!["A"]);

        let text = store
            .query_eq("wishlist", "price", &json!("500"))
            .await
            .unwrap();
        assert_eq!(names(&text), vec!["B"]);
    }

    #[tokio::test]
    async fn test_query_eq_keeps_booleans_apart_from_numbers() {
        let ctx = setup_store().await;
        let store = &ctx.store;

        store
            .insert("wishlist", record(json!({"itemName": "A", "flag": 1})))
            .await
            .unwrap();
        store
            .insert("wishlist", record(json!({"itemName": "B", "flag": true})))
            .await
            .unwrap();
        store
            .insert("wishlist", record(json!({"itemName": "C", "flag": false})))
            .await
            .unwrap();
        store
            .insert("wishlist", record(json!({"itemName": "D", "flag": 0})))
            .await
            .unwrap();

        let truthy = store
            .query_eq("wishlist", "flag", &json!(true))
            .await
            .unwrap();
        assert_eq!(names(&truthy), vec!["B"]);

        let falsy = store
            .query_eq("wishlist", "flag", &json!(false))
            .await
            .unwrap();
        assert_eq!(names(&falsy), vec!["C"]);

        let one = store.query_eq("wishlist", "flag", &json!(1)).await.unwrap();
        assert_eq!(names(&one), vec!["A"]);

        let zero = store
            .query_eq("wishlist", "flag", &json!(0.0))
            .await
            .unwrap();
        assert_eq!(names(&zero), vec!["D"]);
    }

    #[tokio::test]
    async fn test_query_eq_rejects_bad_input() {
        let ctx = setup_store().await;
        let store = &ctx.store;

        let bad_field = store
            .query_eq("wishlist", "item.name", &json!("Hat"))
            .await;
        assert!(matches!(bad_field, Err(StoreError::InvalidQuery(_))));

        let empty_field = store.query_eq("wishlist", "", &json!("Hat")).await;
        assert!(matches!(empty_field, Err(StoreError::InvalidQuery(_))));

        let object = store
            .query_eq("wishlist", "itemName", &json!({"a": 1}))
            .await;
        assert!(matches!(object, Err(StoreError::InvalidQuery(_))));
    }

    #[tokio::test]
    async fn test_delete_single_document() {
        let ctx = setup_store().await;
        let store = &ctx.store;

        let first = store
            .insert("wishlist", record(json!({"itemName": "Hat"})))
            .await
            .unwrap();
        store
            .insert("wishlist", record(json!({"itemName": "Hat"})))
            .await
            .unwrap();

        store.delete(&first).await.unwrap();

        let remaining = store.list_all("wishlist").await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_ne!(remaining[0].reference, first);
    }

    #[tokio::test]
    async fn test_delete_missing_is_ok() {
        let ctx = setup_store().await;
        let reference = DocumentRef {
            collection: "wishlist".into(),
            id: "missing".into(),
        };
        ctx.store.delete(&reference).await.unwrap();
    }
}
