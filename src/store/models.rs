//! Presentation models and document field mapping

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use super::documents::Document;

/// Default theme applied when the caller supplies none
pub const DEFAULT_THEME: &str = "modern";

/// A slide is an open-ended map; `image_url` and `image_storage_path` are
/// the only fields this crate itself reads
pub type Slide = serde_json::Map<String, Value>;

/// Caller-supplied fields for a new presentation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PresentationDraft {
    pub topic: Option<String>,
    pub theme: Option<String>,
    #[serde(default)]
    pub slides: Vec<Slide>,
    #[serde(default)]
    pub content_sources: Vec<Value>,
    pub brand_colors: Option<Value>,
}

/// A stored presentation record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Presentation {
    pub id: String,
    pub owner_id: String,
    #[serde(default)]
    pub topic: String,
    #[serde(default = "default_theme")]
    pub theme: String,
    #[serde(default)]
    pub slides: Vec<Slide>,
    /// Count of `slides` at write time; not recomputed by updates that
    /// change `slides` without also passing `slide_count`
    #[serde(default)]
    pub slide_count: usize,
    #[serde(default)]
    pub content_sources: Vec<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand_colors: Option<Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn default_theme() -> String {
    DEFAULT_THEME.to_string()
}

impl Presentation {
    /// Build a new record from a draft with defaults applied
    ///
    /// Generates a fresh id; both timestamps are set to `now`.
    pub fn from_draft(owner_id: &str, draft: PresentationDraft, now: DateTime<Utc>) -> Self {
        let slide_count = draft.slides.len();
        Presentation {
            id: Uuid::new_v4().to_string(),
            owner_id: owner_id.to_string(),
            topic: draft.topic.unwrap_or_default(),
            theme: draft.theme.unwrap_or_else(default_theme),
            slides: draft.slides,
            slide_count,
            content_sources: draft.content_sources,
            brand_colors: draft.brand_colors,
            created_at: now,
            updated_at: now,
        }
    }

    /// Parse a stored document into a record
    pub fn from_document(doc: Document) -> Result<Self, serde_json::Error> {
        serde_json::from_value(Value::Object(doc))
    }

    /// Serialize the record into a stored document
    pub fn into_document(self) -> Document {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map,
            // A struct with named fields always serializes to an object
            _ => unreachable!("presentation serializes to a JSON object"),
        }
    }

    /// Project to the listing summary
    pub fn summary(&self) -> PresentationSummary {
        let thumbnail = self
            .slides
            .first()
            .and_then(|slide| slide.get("image_url"))
            .and_then(Value::as_str)
            .map(String::from);

        PresentationSummary {
            id: self.id.clone(),
            topic: self.topic.clone(),
            theme: self.theme.clone(),
            slide_count: self.slide_count,
            created_at: self.created_at,
            updated_at: self.updated_at,
            thumbnail,
        }
    }
}

/// Listing projection without full slide content
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PresentationSummary {
    pub id: String,
    pub topic: String,
    pub theme: String,
    pub slide_count: usize,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
}
