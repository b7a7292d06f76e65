//! In-process document store
//!
//! One ordered map per collection behind a `DashMap`, so writers to different
//! collections never contend. Ids are ULIDs, which keeps `list` in creation
//! order.

use crate::document::{apply_patch, get_path, Document};
use crate::error::StoreError;
use crate::traits::{DocumentStore, BATCH_LIMIT};
use dashmap::DashMap;
use serde_json::{Map, Value};
use spss_model::RecordId;
use std::collections::BTreeMap;
use tracing::debug;

/// Collection name -> document id -> body
pub type Collections = BTreeMap<String, BTreeMap<String, Value>>;

/// Concurrent in-memory [`DocumentStore`]
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: DashMap<String, BTreeMap<String, Value>>,
}

impl MemoryStore {
    /// Create empty store
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create store pre-filled with collections
    #[must_use]
    pub fn from_collections(collections: Collections) -> Self {
        Self {
            collections: collections.into_iter().collect(),
        }
    }

    /// Copy of every collection, for snapshots
    #[must_use]
    pub fn export(&self) -> Collections {
        self.collections
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect()
    }

    /// Number of documents in a collection
    #[must_use]
    pub fn len(&self, collection: &str) -> usize {
        self.collections.get(collection).map_or(0, |c| c.len())
    }

    /// Whether a collection is empty or missing
    #[must_use]
    pub fn is_empty(&self, collection: &str) -> bool {
        self.len(collection) == 0
    }

    fn insert(&self, collection: &str, id: String, data: Value) {
        self.collections
            .entry(collection.to_string())
            .or_default()
            .insert(id, data);
    }
}

#[async_trait::async_trait]
impl DocumentStore for MemoryStore {
    async fn add(&self, collection: &str, data: Value) -> Result<String, StoreError> {
        let id = RecordId::generate().0;
        self.insert(collection, id.clone(), data);
        debug!(collection, id = %id, "document added");
        Ok(id)
    }

    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError> {
        Ok(self
            .collections
            .get(collection)
            .and_then(|c| c.get(id).map(|data| Document::new(id, data.clone()))))
    }

    async fn set(&self, collection: &str, id: &str, data: Value) -> Result<(), StoreError> {
        self.insert(collection, id.to_string(), data);
        Ok(())
    }

    async fn update(
        &self,
        collection: &str,
        id: &str,
        patch: Map<String, Value>,
    ) -> Result<(), StoreError> {
        let mut docs = self
            .collections
            .get_mut(collection)
            .ok_or_else(|| StoreError::not_found(collection, id))?;
        let doc = docs
            .get_mut(id)
            .ok_or_else(|| StoreError::not_found(collection, id))?;
        apply_patch(doc, &patch);
        Ok(())
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError> {
        if let Some(mut docs) = self.collections.get_mut(collection) {
            docs.remove(id);
        }
        Ok(())
    }

    async fn list(&self, collection: &str) -> Result<Vec<Document>, StoreError> {
        Ok(self
            .collections
            .get(collection)
            .map(|c| {
                c.iter()
                    .map(|(id, data)| Document::new(id.clone(), data.clone()))
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn query_eq(
        &self,
        collection: &str,
        field_path: &str,
        value: &Value,
    ) -> Result<Vec<Document>, StoreError> {
        Ok(self
            .list(collection)
            .await?
            .into_iter()
            .filter(|doc| get_path(&doc.data, field_path) == Some(value))
            .collect())
    }

    async fn batch_write(&self, collection: &str, docs: Vec<Value>) -> Result<usize, StoreError> {
        let mut written = 0;
        for chunk in docs.chunks(BATCH_LIMIT) {
            let mut target = self.collections.entry(collection.to_string()).or_default();
            for data in chunk {
                target.insert(RecordId::generate().0, data.clone());
            }
            written += chunk.len();
            debug!(collection, batch = chunk.len(), "batch committed");
        }
        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn add_get_delete() {
        let store = MemoryStore::new();
        let id = store.add("member_details", json!({ "a": 1 })).await.unwrap();

        let doc = store.get("member_details", &id).await.unwrap().unwrap();
        assert_eq!(doc.data, json!({ "a": 1 }));

        store.delete("member_details", &id).await.unwrap();
        assert!(store.get("member_details", &id).await.unwrap().is_none());
        // Deleting again is fine
        store.delete("member_details", &id).await.unwrap();
    }

    #[tokio::test]
    async fn update_missing_is_not_found() {
        let store = MemoryStore::new();
        let err = store
            .update("member_details", "nope", Map::new())
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
    }

    #[tokio::test]
    async fn update_merges_dotted_keys() {
        let store = MemoryStore::new();
        store
            .set("users", "u1", json!({ "email": "a@b.in", "meta": { "x": 1, "y": 2 } }))
            .await
            .unwrap();
        let patch = json!({ "meta.y": 3 }).as_object().cloned().unwrap();
        store.update("users", "u1", patch).await.unwrap();

        let doc = store.get("users", "u1").await.unwrap().unwrap();
        assert_eq!(doc.data, json!({ "email": "a@b.in", "meta": { "x": 1, "y": 3 } }));
    }

    #[tokio::test]
    async fn list_keeps_creation_order() {
        let store = MemoryStore::new();
        let first = store.add("c", json!(1)).await.unwrap();
        std::thread::sleep(std::time::Duration::from_millis(2));
        let second = store.add("c", json!(2)).await.unwrap();

        let ids: Vec<String> = store.list("c").await.unwrap().into_iter().map(|d| d.id).collect();
        assert_eq!(ids, vec![first, second]);
        assert!(store.list("missing").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn query_by_nested_field() {
        let store = MemoryStore::new();
        store.add("c", json!({ "pd": { "sabha": "kollam" } })).await.unwrap();
        store.add("c", json!({ "pd": { "sabha": "thrissur" } })).await.unwrap();

        let hits = store.query_eq("c", "pd.sabha", &json!("kollam")).await.unwrap();
        assert_eq!(hits.len(), 1);
    }

    #[tokio::test]
    async fn batch_write_spans_chunks() {
        let store = MemoryStore::new();
        let docs: Vec<Value> = (0..1_234).map(|i| json!({ "i": i })).collect();
        assert_eq!(store.batch_write("c", docs).await.unwrap(), 1_234);
        assert_eq!(store.len("c"), 1_234);
    }

    #[tokio::test]
    async fn export_round_trips() {
        let store = MemoryStore::new();
        store.set("users", "u1", json!({ "role": "admin" })).await.unwrap();

        let copy = MemoryStore::from_collections(store.export());
        assert_eq!(copy.get("users", "u1").await.unwrap().unwrap().data["role"], "admin");
    }
}
