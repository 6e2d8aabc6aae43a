use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::modules::storage::Record;

pub const DEFAULT_GALLERY_CATEGORY: &str = "general";

/// A named, ordered selection of photo ids, as stored in `galleries.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GalleryEntity {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    /// Photo ids; may reference photos that no longer exist.
    #[serde(default)]
    pub photos: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_photo: Option<String>,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub order: i64,
    pub slug: String,
}

impl Record for GalleryEntity {
    fn id(&self) -> &str {
        &self.id
    }
}
