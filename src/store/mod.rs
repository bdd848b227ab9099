//! Presentation document store
//!
//! [`documents`] defines the document-collection protocol the platform
//! exposes (get/set/update/delete/query); [`presentations`] layers the
//! owner-gated presentation operations on top of it.

pub mod documents;
pub mod http;
pub mod memory;
pub mod models;
pub mod presentations;

pub use documents::{Document, DocumentError, DocumentStore, Query};
pub use http::HttpDocumentStore;
pub use memory::MemoryDocumentStore;
pub use models::{Presentation, PresentationDraft, PresentationSummary, Slide};
pub use presentations::{PresentationStore, StoreError};
