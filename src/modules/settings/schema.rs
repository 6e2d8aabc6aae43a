use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use validator::Validate;

pub const SETTINGS_ID: &str = "main-settings";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SocialLinks {
    pub instagram: Option<String>,
    pub facebook: Option<String>,
    pub twitter: Option<String>,
    pub linkedin: Option<String>,
    pub pinterest: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContactInfo {
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SeoSettings {
    pub meta_title: String,
    pub meta_description: String,
    pub keywords: Vec<String>,
    pub og_image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct GallerySettings {
    #[validate(range(min = 1, max = 100, message = "Items per page must be between 1 and 100"))]
    pub items_per_page: u32,
    pub show_metadata: bool,
    pub enable_lightbox: bool,
    pub enable_download: bool,
}

impl Default for GallerySettings {
    fn default() -> Self {
        Self { items_per_page: 12, show_metadata: true, enable_lightbox: true, enable_download: false }
    }
}

/// The single site-wide settings document, `settings.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SiteSettings {
    pub id: String,
    #[validate(length(min = 1, message = "Site name cannot be empty"))]
    pub site_name: String,
    #[serde(default)]
    pub tagline: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub favicon: Option<String>,

    // theme
    pub primary_color: String,
    pub secondary_color: String,
    pub accent_color: String,
    pub font_family: String,

    #[serde(default)]
    pub social_links: SocialLinks,
    #[serde(default)]
    pub contact_info: ContactInfo,
    #[serde(default)]
    pub seo_settings: SeoSettings,
    #[validate(nested)]
    #[serde(default)]
    pub gallery_settings: GallerySettings,
    pub updated_at: DateTime<Utc>,

    /// Top-level keys this version does not model, kept as written.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for SiteSettings {
    fn default() -> Self {
        let empty = || Some(String::new());
        Self {
            id: SETTINGS_ID.to_string(),
            site_name: "Portfolio Photographe".to_string(),
            tagline: "Capturer les moments précieux".to_string(),
            description: "Portfolio professionnel de photographie spécialisé dans les mariages, portraits et nature."
                .to_string(),
            logo: None,
            favicon: None,
            primary_color: "#6366F1".to_string(),
            secondary_color: "#8B5CF6".to_string(),
            accent_color: "#EC4899".to_string(),
            font_family: "Inter".to_string(),
            social_links: SocialLinks {
                instagram: empty(),
                facebook: empty(),
                twitter: empty(),
                linkedin: empty(),
                pinterest: empty(),
            },
            contact_info: ContactInfo {
                email: "contact@photographe.com".to_string(),
                phone: empty(),
                address: empty(),
                city: empty(),
                country: Some("France".to_string()),
            },
            seo_settings: SeoSettings {
                meta_title: "Portfolio Photographe Professionnel".to_string(),
                meta_description: "Découvrez le portfolio d'une photographe professionnelle spécialisée dans les mariages, portraits et photographie artistique.".to_string(),
                keywords: ["photographe", "mariage", "portrait", "photographie", "professionnel"]
                    .iter()
                    .map(|k| k.to_string())
                    .collect(),
                og_image: empty(),
            },
            gallery_settings: GallerySettings::default(),
            updated_at: Utc::now(),
            extra: Map::new(),
        }
    }
}
