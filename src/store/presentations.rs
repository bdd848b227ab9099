//! Owner-gated presentation operations
//!
//! Every read and mutation except `create` checks that the requester owns
//! the record. Authorization failures are classified internally as
//! [`StoreError::NotAuthorized`] but folded to [`StoreError::NotFound`] at
//! this public boundary, so a non-owner cannot learn whether a record
//! exists.

use chrono::Utc;
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

use super::documents::{Document, DocumentError, DocumentStore, Query};
use super::models::{Presentation, PresentationDraft, PresentationSummary};
use crate::storage::ObjectStore;

/// Collection holding presentation documents
pub const COLLECTION: &str = "presentations";

/// Default cap for listings
pub const DEFAULT_LIST_LIMIT: usize = 50;

/// Errors from presentation operations
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Presentation not found: {0}")]
    NotFound(String),

    /// Requester does not own the record. Never returned by the public
    /// operations, which fold it to [`StoreError::NotFound`]; kept as a
    /// distinct variant so internal callers and logs can tell the cases
    /// apart.
    #[error("Not authorized for presentation: {0}")]
    NotAuthorized(String),

    #[error("Malformed presentation document: {0}")]
    Malformed(String),

    #[error(transparent)]
    Document(#[from] DocumentError),
}

impl StoreError {
    /// Collapse authorization failure into not-found for external callers
    fn folded(self) -> StoreError {
        match self {
            StoreError::NotAuthorized(id) => StoreError::NotFound(id),
            other => other,
        }
    }
}

/// Presentation CRUD over a document store, with asset cleanup on delete
#[derive(Clone)]
pub struct PresentationStore {
    docs: Arc<dyn DocumentStore>,
    assets: Arc<dyn ObjectStore>,
}

impl PresentationStore {
    pub fn new(docs: Arc<dyn DocumentStore>, assets: Arc<dyn ObjectStore>) -> Self {
        PresentationStore { docs, assets }
    }

    /// Create a new presentation and return its id
    ///
    /// The one operation that fails loudly: callers need to know creation
    /// failed, so backend errors propagate instead of being folded.
    pub async fn create(
        &self,
        owner_id: &str,
        draft: PresentationDraft,
    ) -> Result<String, StoreError> {
        let record = Presentation::from_draft(owner_id, draft, Utc::now());
        let id = record.id.clone();

        self.docs
            .set(COLLECTION, &id, record.into_document())
            .await?;

        info!(id = %id, owner_id = %owner_id, "Created presentation");
        Ok(id)
    }

    /// Fetch a presentation by id
    ///
    /// When `requester_id` is supplied and does not match the stored owner,
    /// the result is indistinguishable from the record not existing.
    pub async fn get(
        &self,
        id: &str,
        requester_id: Option<&str>,
    ) -> Result<Presentation, StoreError> {
        self.fetch_checked(id, requester_id)
            .await
            .map_err(StoreError::folded)
    }

    /// Shallow-overwrite named fields of an owned presentation
    ///
    /// Fields in `patch` replace stored fields whole (no deep merge, no
    /// unsetting); `updated_at` is stamped on every successful update.
    pub async fn update(
        &self,
        id: &str,
        requester_id: &str,
        patch: Document,
    ) -> Result<(), StoreError> {
        self.apply_update(id, requester_id, patch)
            .await
            .map_err(StoreError::folded)
    }

    /// Delete an owned presentation and its slide assets
    ///
    /// Asset deletion is best-effort: a failed image delete is logged and
    /// does not abort the record delete.
    pub async fn delete(&self, id: &str, requester_id: &str) -> Result<(), StoreError> {
        self.apply_delete(id, requester_id)
            .await
            .map_err(StoreError::folded)
    }

    /// List an owner's presentations, newest first, capped at `limit`
    pub async fn list_by_owner(
        &self,
        owner_id: &str,
        limit: Option<usize>,
    ) -> Result<Vec<PresentationSummary>, StoreError> {
        let query = Query::where_eq("owner_id", owner_id)
            .order_by_desc("created_at")
            .limit(limit.unwrap_or(DEFAULT_LIST_LIMIT));

        let documents = self.docs.query(COLLECTION, &query).await?;

        let mut summaries = Vec::with_capacity(documents.len());
        for doc in documents {
            match Presentation::from_document(doc) {
                Ok(record) => summaries.push(record.summary()),
                Err(e) => {
                    warn!(owner_id = %owner_id, "Skipping malformed presentation document: {}", e);
                }
            }
        }

        Ok(summaries)
    }

    /// Fetch and verify ownership, with the internal error taxonomy
    async fn fetch_checked(
        &self,
        id: &str,
        requester_id: Option<&str>,
    ) -> Result<Presentation, StoreError> {
        let doc = self
            .docs
            .get(COLLECTION, id)
            .await?
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;

        let record = Presentation::from_document(doc)
            .map_err(|e| StoreError::Malformed(e.to_string()))?;

        if let Some(requester) = requester_id {
            if record.owner_id != requester {
                warn!(
                    requester_id = %requester,
                    id = %id,
                    "Requester attempted to access another owner's presentation"
                );
                return Err(StoreError::NotAuthorized(id.to_string()));
            }
        }

        Ok(record)
    }

    async fn apply_update(
        &self,
        id: &str,
        requester_id: &str,
        mut patch: Document,
    ) -> Result<(), StoreError> {
        self.fetch_checked(id, Some(requester_id)).await?;

        patch.insert(
            "updated_at".to_string(),
            serde_json::to_value(Utc::now()).unwrap_or(Value::Null),
        );
        self.docs.update(COLLECTION, id, patch).await?;

        info!(id = %id, "Updated presentation");
        Ok(())
    }

    async fn apply_delete(&self, id: &str, requester_id: &str) -> Result<(), StoreError> {
        let record = self.fetch_checked(id, Some(requester_id)).await?;

        for slide in &record.slides {
            if let Some(path) = slide.get("image_storage_path").and_then(Value::as_str) {
                if let Err(e) = self.assets.delete(path).await {
                    warn!(id = %id, path = %path, "Failed to delete slide asset: {}", e);
                }
            }
        }

        self.docs.delete(COLLECTION, id).await?;

        info!(id = %id, "Deleted presentation");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{user_image_key, MemoryObjectStore, StorageError};
    use crate::store::memory::MemoryDocumentStore;
    use async_trait::async_trait;
    use bytes::Bytes;
    use parking_lot::Mutex;
    use serde_json::json;

    fn store_with_assets() -> (PresentationStore, Arc<MemoryObjectStore>) {
        let assets = Arc::new(MemoryObjectStore::new());
        let store = PresentationStore::new(Arc::new(MemoryDocumentStore::new()), assets.clone());
        (store, assets)
    }

    fn doc(pairs: serde_json::Value) -> Document {
        match pairs {
            serde_json::Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    fn draft_with_slides(slides: serde_json::Value) -> PresentationDraft {
        serde_json::from_value(json!({ "slides": slides })).unwrap()
    }

    #[tokio::test]
    async fn test_create_sets_slide_count_and_fresh_ids() {
        let (store, _) = store_with_assets();

        let draft = draft_with_slides(json!([{"title": "a"}, {"title": "b"}]));
        let first = store.create("u1", draft).await.unwrap();
        let second = store.create("u1", PresentationDraft::default()).await.unwrap();

        assert_ne!(first, second);

        let record = store.get(&first, Some("u1")).await.unwrap();
        assert_eq!(record.slide_count, 2);
        assert_eq!(record.theme, "modern");
        assert_eq!(record.owner_id, "u1");
    }

    #[tokio::test]
    async fn test_get_not_found_and_not_owned_are_indistinguishable() {
        let (store, _) = store_with_assets();
        let id = store.create("u1", PresentationDraft::default()).await.unwrap();

        let missing = store.get("no-such-id", Some("u1")).await.unwrap_err();
        let not_owned = store.get(&id, Some("u2")).await.unwrap_err();

        assert!(matches!(missing, StoreError::NotFound(_)));
        assert!(matches!(not_owned, StoreError::NotFound(_)));

        // Without a requester the fetch is ungated
        assert!(store.get(&id, None).await.is_ok());
    }

    #[tokio::test]
    async fn test_update_gates_and_stamps_updated_at() {
        let (store, _) = store_with_assets();
        let id = store.create("u1", PresentationDraft::default()).await.unwrap();
        let before = store.get(&id, Some("u1")).await.unwrap().updated_at;

        let err = store
            .update("no-such-id", "u1", doc(json!({"topic": "x"})))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));

        let err = store
            .update(&id, "u2", doc(json!({"topic": "x"})))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));

        store
            .update(&id, "u1", doc(json!({"topic": "Rust in Prod"})))
            .await
            .unwrap();

        let after = store.get(&id, Some("u1")).await.unwrap();
        assert_eq!(after.topic, "Rust in Prod");
        assert!(after.updated_at >= before);
    }

    #[tokio::test]
    async fn test_update_is_shallow_and_leaves_slide_count_stale() {
        let (store, _) = store_with_assets();
        let id = store
            .create("u1", draft_with_slides(json!([{"title": "a"}])))
            .await
            .unwrap();

        store
            .update(&id, "u1", doc(json!({"slides": [{"title": "a"}, {"title": "b"}]})))
            .await
            .unwrap();

        // slide_count is written at create time and not recomputed here
        let record = store.get(&id, Some("u1")).await.unwrap();
        assert_eq!(record.slides.len(), 2);
        assert_eq!(record.slide_count, 1);
    }

    #[tokio::test]
    async fn test_delete_removes_record_and_slide_assets() {
        let (store, assets) = store_with_assets();
        let first = user_image_key("u1", "s1.png");
        let second = user_image_key("u1", "s2.png");

        assets
            .upload(&first, Bytes::from_static(b"1"), "image/png")
            .await
            .unwrap();
        assets
            .upload(&second, Bytes::from_static(b"2"), "image/png")
            .await
            .unwrap();

        let id = store
            .create(
                "u1",
                draft_with_slides(json!([
                    {"image_storage_path": first},
                    {"title": "no image"},
                    {"image_storage_path": second}
                ])),
            )
            .await
            .unwrap();

        store.delete(&id, "u1").await.unwrap();

        assert!(matches!(
            store.get(&id, Some("u1")).await.unwrap_err(),
            StoreError::NotFound(_)
        ));
        assert!(assets.is_empty());
    }

    #[tokio::test]
    async fn test_delete_is_gated_like_get() {
        let (store, _) = store_with_assets();
        let id = store.create("u1", PresentationDraft::default()).await.unwrap();

        let err = store.delete(&id, "u2").await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));

        // Record survives the denied delete
        assert!(store.get(&id, Some("u1")).await.is_ok());
    }

    /// Object store that fails every delete, recording the attempted paths
    struct FailingObjectStore {
        attempted: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl ObjectStore for FailingObjectStore {
        async fn upload(
            &self,
            path: &str,
            _data: Bytes,
            _content_type: &str,
        ) -> Result<String, StorageError> {
            Ok(self.public_url(path))
        }

        async fn download(&self, path: &str) -> Result<Bytes, StorageError> {
            Err(StorageError::NotFound(path.to_string()))
        }

        async fn delete(&self, path: &str) -> Result<(), StorageError> {
            self.attempted.lock().push(path.to_string());
            Err(StorageError::DeleteFailed("bucket unavailable".to_string()))
        }

        fn public_url(&self, path: &str) -> String {
            format!("fail://{}", path)
        }
    }

    #[tokio::test]
    async fn test_delete_proceeds_when_asset_deletes_fail() {
        let assets = Arc::new(FailingObjectStore {
            attempted: Mutex::new(Vec::new()),
        });
        let store = PresentationStore::new(Arc::new(MemoryDocumentStore::new()), assets.clone());

        let first = user_image_key("u1", "s1.png");
        let second = user_image_key("u1", "s2.png");
        let id = store
            .create(
                "u1",
                draft_with_slides(json!([
                    {"image_storage_path": first},
                    {"image_storage_path": second}
                ])),
            )
            .await
            .unwrap();

        store.delete(&id, "u1").await.unwrap();

        // Every slide asset was attempted despite the failures
        assert_eq!(*assets.attempted.lock(), vec![first, second]);
        assert!(matches!(
            store.get(&id, Some("u1")).await.unwrap_err(),
            StoreError::NotFound(_)
        ));
    }

    #[tokio::test]
    async fn test_list_by_owner_orders_caps_and_filters() {
        let (store, _) = store_with_assets();

        let mut ids = Vec::new();
        for _ in 0..3 {
            ids.push(store.create("u1", PresentationDraft::default()).await.unwrap());
            // Distinct created_at values so the ordering is strict
            tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        }
        store.create("u2", PresentationDraft::default()).await.unwrap();

        let all = store.list_by_owner("u1", None).await.unwrap();
        assert_eq!(all.len(), 3);
        // Newest first
        assert_eq!(all[0].id, ids[2]);
        assert_eq!(all[1].id, ids[1]);
        assert_eq!(all[2].id, ids[0]);
        assert!(all.windows(2).all(|w| w[0].created_at >= w[1].created_at));

        let capped = store.list_by_owner("u1", Some(2)).await.unwrap();
        assert_eq!(capped.len(), 2);
        assert_eq!(capped[0].id, ids[2]);

        let other = store.list_by_owner("u3", None).await.unwrap();
        assert!(other.is_empty());
    }

    #[tokio::test]
    async fn test_list_includes_thumbnail() {
        let (store, _) = store_with_assets();

        store
            .create(
                "u1",
                draft_with_slides(json!([
                    {"image_url": "https://cdn.slidecloud.dev/u1/first.png"},
                    {"image_url": "https://cdn.slidecloud.dev/u1/second.png"}
                ])),
            )
            .await
            .unwrap();

        let listed = store.list_by_owner("u1", None).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(
            listed[0].thumbnail.as_deref(),
            Some("https://cdn.slidecloud.dev/u1/first.png")
        );
        assert_eq!(listed[0].slide_count, 2);
    }
}
