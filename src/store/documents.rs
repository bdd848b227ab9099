//! Document-collection protocol
//!
//! The platform stores schemaless JSON documents in named collections and
//! supports a single-filter query with ordering and a result cap. This trait
//! is the seam between the presentation operations and the wire client.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// A stored document: an open-ended JSON object
pub type Document = serde_json::Map<String, Value>;

/// Errors from the document store
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("Document not found: {collection}/{id}")]
    NotFound { collection: String, id: String },

    #[error("Document backend error: {0}")]
    Backend(String),
}

/// Equality-filtered query with ordering and a result cap
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Query {
    /// Field the equality filter applies to
    pub field: String,
    /// Value the field must equal
    pub equals: Value,
    /// Field to order results by
    pub order_by: String,
    /// Order direction
    pub descending: bool,
    /// Maximum number of documents returned
    pub limit: usize,
}

impl Query {
    /// Query for documents whose `field` equals `value`
    pub fn where_eq(field: &str, value: impl Into<Value>) -> Self {
        Query {
            field: field.to_string(),
            equals: value.into(),
            order_by: field.to_string(),
            descending: false,
            limit: 50,
        }
    }

    pub fn order_by_desc(mut self, field: &str) -> Self {
        self.order_by = field.to_string();
        self.descending = true;
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }
}

/// Document-collection operations exposed by the platform
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Fetch a document, `None` if it does not exist
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, DocumentError>;

    /// Write a document at `id`, replacing any existing document
    async fn set(&self, collection: &str, id: &str, doc: Document) -> Result<(), DocumentError>;

    /// Shallow-overwrite the named fields of an existing document
    ///
    /// Fields absent from `fields` are left untouched; nested values are
    /// replaced whole, never merged. Fails with [`DocumentError::NotFound`]
    /// when the document does not exist.
    async fn update(&self, collection: &str, id: &str, fields: Document)
        -> Result<(), DocumentError>;

    /// Delete a document; deleting a missing document is not an error
    async fn delete(&self, collection: &str, id: &str) -> Result<(), DocumentError>;

    /// Run an equality-filtered, ordered, capped query over a collection
    async fn query(&self, collection: &str, query: &Query) -> Result<Vec<Document>, DocumentError>;
}
