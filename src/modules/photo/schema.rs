use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::modules::storage::Record;

pub const DEFAULT_CATEGORY: &str = "uncategorized";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum License {
    Personal,
    Commercial,
    Editorial,
    RoyaltyFree,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExposureSettings {
    pub aperture: Option<String>,
    pub shutter: Option<String>,
    pub iso: Option<String>,
    pub focal_length: Option<String>,
}

/// One uploaded image and its editorial metadata, as stored in `photos.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotoEntity {
    pub id: String,
    pub filename: String,
    pub path: String,
    pub size: u64,
    #[serde(rename = "type")]
    pub mime_type: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub featured: bool,
    #[serde(default = "default_true")]
    pub published: bool,
    #[serde(default)]
    pub views: u64,
    pub uploaded_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<i64>,

    // portfolio metadata
    #[serde(default)]
    pub subtitle: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub date_taken: Option<String>,
    #[serde(default)]
    pub camera: Option<String>,
    #[serde(default)]
    pub lens: Option<String>,
    #[serde(default)]
    pub settings: ExposureSettings,

    // client / project
    #[serde(default)]
    pub client: Option<String>,
    #[serde(default)]
    pub project: Option<String>,
    #[serde(default)]
    pub mood: Option<String>,
    #[serde(default)]
    pub color_palette: Vec<String>,
    #[serde(default)]
    pub technical_notes: Option<String>,

    // seo / social
    #[serde(default)]
    pub seo_alt: Option<String>,
    #[serde(default)]
    pub social_description: Option<String>,

    // commercial
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub license: Option<License>,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub rating: Option<u8>,
    #[serde(default)]
    pub is_private: bool,
}

fn default_category() -> String {
    DEFAULT_CATEGORY.to_string()
}

fn default_true() -> bool {
    true
}

impl Record for PhotoEntity {
    fn id(&self) -> &str {
        &self.id
    }
}

impl PhotoEntity {
    /// Visible on the public site.
    pub fn is_public(&self) -> bool {
        self.published && !self.is_private
    }
}
