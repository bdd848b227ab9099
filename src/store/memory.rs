//! In-process document store for tests and local embedding

use async_trait::async_trait;
use chrono::DateTime;
use parking_lot::RwLock;
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::HashMap;

use super::documents::{Document, DocumentError, DocumentStore, Query};

/// Document store holding collections in a process-local map
pub struct MemoryDocumentStore {
    collections: RwLock<HashMap<String, HashMap<String, Document>>>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        MemoryDocumentStore {
            collections: RwLock::new(HashMap::new()),
        }
    }

    /// Number of documents in a collection
    pub fn len(&self, collection: &str) -> usize {
        self.collections
            .read()
            .get(collection)
            .map(|c| c.len())
            .unwrap_or(0)
    }

    pub fn is_empty(&self, collection: &str) -> bool {
        self.len(collection) == 0
    }
}

impl Default for MemoryDocumentStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Compare two JSON values for ordering purposes
///
/// RFC 3339 timestamp strings are compared as instants so that ordering
/// does not depend on subsecond formatting; other strings compare
/// lexicographically and numbers numerically.
fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::String(a), Value::String(b)) => {
            match (
                DateTime::parse_from_rfc3339(a),
                DateTime::parse_from_rfc3339(b),
            ) {
                (Ok(a), Ok(b)) => a.cmp(&b),
                _ => a.cmp(b),
            }
        }
        (Value::Number(a), Value::Number(b)) => a
            .as_f64()
            .partial_cmp(&b.as_f64())
            .unwrap_or(Ordering::Equal),
        _ => Ordering::Equal,
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, DocumentError> {
        Ok(self
            .collections
            .read()
            .get(collection)
            .and_then(|c| c.get(id))
            .cloned())
    }

    async fn set(&self, collection: &str, id: &str, doc: Document) -> Result<(), DocumentError> {
        self.collections
            .write()
            .entry(collection.to_string())
            .or_default()
            .insert(id.to_string(), doc);
        Ok(())
    }

    async fn update(
        &self,
        collection: &str,
        id: &str,
        fields: Document,
    ) -> Result<(), DocumentError> {
        let mut collections = self.collections.write();
        let doc = collections
            .get_mut(collection)
            .and_then(|c| c.get_mut(id))
            .ok_or_else(|| DocumentError::NotFound {
                collection: collection.to_string(),
                id: id.to_string(),
            })?;

        // Shallow overwrite: named fields replaced whole, others untouched
        for (key, value) in fields {
            doc.insert(key, value);
        }
        Ok(())
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<(), DocumentError> {
        if let Some(c) = self.collections.write().get_mut(collection) {
            c.remove(id);
        }
        Ok(())
    }

    async fn query(&self, collection: &str, query: &Query) -> Result<Vec<Document>, DocumentError> {
        let collections = self.collections.read();

        let mut matches: Vec<Document> = collections
            .get(collection)
            .map(|c| {
                c.values()
                    .filter(|doc| doc.get(&query.field) == Some(&query.equals))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        matches.sort_by(|a, b| {
            let ordering = compare_values(
                a.get(&query.order_by).unwrap_or(&Value::Null),
                b.get(&query.order_by).unwrap_or(&Value::Null),
            );
            if query.descending {
                ordering.reverse()
            } else {
                ordering
            }
        });

        matches.truncate(query.limit);
        Ok(matches)
    }
}
