use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::modules::storage::Record;

pub const DEFAULT_COLOR: &str = "#6366F1";
pub const DEFAULT_ICON: &str = "📸";

/// A portfolio section, as stored in `categories.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryEntity {
    pub id: String,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_color")]
    pub color: String,
    #[serde(default = "default_icon")]
    pub icon: String,
    #[serde(default)]
    pub order: i64,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    /// Recomputed from the photo collection on every read.
    #[serde(default)]
    pub photo_count: usize,
}

fn default_color() -> String {
    DEFAULT_COLOR.to_string()
}

fn default_icon() -> String {
    DEFAULT_ICON.to_string()
}

impl Record for CategoryEntity {
    fn id(&self) -> &str {
        &self.id
    }
}

impl CategoryEntity {
    /// Photo category labels are free text; they match by name or slug.
    pub fn matches_label(&self, label: &str) -> bool {
        label.eq_ignore_ascii_case(&self.name) || label.eq_ignore_ascii_case(&self.slug)
    }
}

/// Categories written the first time the collection is read.
pub fn default_categories() -> Vec<CategoryEntity> {
    let now = Utc::now();
    let seed = |id: &str, name: &str, description: &str, color: &str, icon: &str, order: i64| {
        CategoryEntity {
            id: id.to_string(),
            name: name.to_string(),
            slug: name.to_lowercase(),
            description: description.to_string(),
            color: color.to_string(),
            icon: icon.to_string(),
            order,
            created_at: now,
            updated_at: None,
            photo_count: 0,
        }
    };

    vec![
        seed("1", "Mariage", "Photos de mariage et céremonies", "#FF6B6B", "💒", 0),
        seed("2", "Portrait", "Portraits individuels et de famille", "#4ECDC4", "👤", 1),
        seed("3", "Nature", "Paysages et photographie nature", "#45B7D1", "🌿", 2),
        seed("4", "Architecture", "Bâtiments et structures urbaines", "#F39C12", "🏛️", 3),
    ]
}
