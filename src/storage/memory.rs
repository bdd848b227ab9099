//! In-process object store for tests and local embedding

use async_trait::async_trait;
use bytes::Bytes;
use parking_lot::RwLock;
use std::collections::HashMap;

use super::{ObjectStore, StorageError};

#[derive(Clone)]
struct StoredObject {
    data: Bytes,
    content_type: String,
}

/// Object store holding everything in a process-local map
pub struct MemoryObjectStore {
    objects: RwLock<HashMap<String, StoredObject>>,
    public_url_prefix: String,
}

impl MemoryObjectStore {
    pub fn new() -> Self {
        MemoryObjectStore {
            objects: RwLock::new(HashMap::new()),
            public_url_prefix: "memory://assets".to_string(),
        }
    }

    /// Number of stored objects
    pub fn len(&self) -> usize {
        self.objects.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.read().is_empty()
    }

    /// Content type recorded for the object at `path`, if present
    pub fn content_type(&self, path: &str) -> Option<String> {
        self.objects.read().get(path).map(|o| o.content_type.clone())
    }
}

impl Default for MemoryObjectStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    async fn upload(
        &self,
        path: &str,
        data: Bytes,
        content_type: &str,
    ) -> Result<String, StorageError> {
        self.objects.write().insert(
            path.to_string(),
            StoredObject {
                data,
                content_type: content_type.to_string(),
            },
        );
        Ok(self.public_url(path))
    }

    async fn download(&self, path: &str) -> Result<Bytes, StorageError> {
        self.objects
            .read()
            .get(path)
            .map(|o| o.data.clone())
            .ok_or_else(|| StorageError::NotFound(path.to_string()))
    }

    async fn delete(&self, path: &str) -> Result<(), StorageError> {
        self.objects
            .write()
            .remove(path)
            .map(|_| ())
            .ok_or_else(|| StorageError::NotFound(path.to_string()))
    }

    fn public_url(&self, path: &str) -> String {
        format!("{}/{}", self.public_url_prefix, path)
    }
}
