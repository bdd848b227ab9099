//! Platform document API client
//!
//! Wire layout:
//! - `GET    /v1/documents/{collection}/{id}`
//! - `PUT    /v1/documents/{collection}/{id}`
//! - `PATCH  /v1/documents/{collection}/{id}`
//! - `DELETE /v1/documents/{collection}/{id}`
//! - `POST   /v1/documents/{collection}:query`

use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;
use tracing::debug;

use super::documents::{Document, DocumentError, DocumentStore, Query};
use crate::platform::{ApiClient, ApiError};

/// Response wrapper for query results
#[derive(Deserialize)]
struct QueryResponse {
    documents: Vec<Document>,
}

/// Document store backed by the platform REST API
#[derive(Clone)]
pub struct HttpDocumentStore {
    api: Arc<ApiClient>,
}

impl HttpDocumentStore {
    pub fn new(api: Arc<ApiClient>) -> Self {
        HttpDocumentStore { api }
    }

    fn document_path(collection: &str, id: &str) -> String {
        format!("/v1/documents/{}/{}", collection, id)
    }
}

fn backend(err: ApiError) -> DocumentError {
    DocumentError::Backend(err.to_string())
}

#[async_trait]
impl DocumentStore for HttpDocumentStore {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, DocumentError> {
        match self
            .api
            .get_json::<Document>(&Self::document_path(collection, id))
            .await
        {
            Ok(doc) => Ok(Some(doc)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(backend(e)),
        }
    }

    async fn set(&self, collection: &str, id: &str, doc: Document) -> Result<(), DocumentError> {
        debug!(collection, id, "Writing document");
        self.api
            .put_json(&Self::document_path(collection, id), &doc)
            .await
            .map_err(backend)
    }

    async fn update(
        &self,
        collection: &str,
        id: &str,
        fields: Document,
    ) -> Result<(), DocumentError> {
        debug!(collection, id, "Patching document");
        match self
            .api
            .patch_json(&Self::document_path(collection, id), &fields)
            .await
        {
            Ok(()) => Ok(()),
            Err(e) if e.is_not_found() => Err(DocumentError::NotFound {
                collection: collection.to_string(),
                id: id.to_string(),
            }),
            Err(e) => Err(backend(e)),
        }
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<(), DocumentError> {
        debug!(collection, id, "Deleting document");
        match self.api.delete(&Self::document_path(collection, id)).await {
            Ok(()) => Ok(()),
            // Already gone counts as deleted
            Err(e) if e.is_not_found() => Ok(()),
            Err(e) => Err(backend(e)),
        }
    }

    async fn query(&self, collection: &str, query: &Query) -> Result<Vec<Document>, DocumentError> {
        let response: QueryResponse = self
            .api
            .post_json(&format!("/v1/documents/{}:query", collection), query)
            .await
            .map_err(backend)?;
        Ok(response.documents)
    }
}
