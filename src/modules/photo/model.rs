use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::api::error;
use crate::modules::photo::schema::{ExposureSettings, License, PhotoEntity};
use crate::utils::double_option;

/// File upload configuration
#[derive(Debug, Clone)]
pub struct UploadConfig {
    /// Parts accepted per request.
    pub max_files: usize,
    pub max_file_size: usize,
    /// Accepted MIME prefixes or exact types.
    pub allowed_mime_types: Vec<String>,
    pub upload_dir: String,
    pub base_url: String,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_files: 10,
            max_file_size: 10 * 1024 * 1024, // 10MB
            allowed_mime_types: vec!["image/".to_string()],
            upload_dir: "./public/uploads/photos".to_string(),
            base_url: "/uploads/photos".to_string(),
        }
    }
}

impl UploadConfig {
    pub fn too_many_files(&self) -> String {
        format!("Too many files (max {} per upload)", self.max_files)
    }

    pub fn accepts(&self, mime_type: &str) -> bool {
        self.allowed_mime_types.iter().any(|allowed| {
            if allowed.ends_with('/') {
                mime_type.starts_with(allowed.as_str())
            } else {
                mime_type == allowed
            }
        })
    }
}

/// One multipart part as received, before validation.
#[derive(Debug, Clone)]
pub struct IncomingFile {
    pub filename: String,
    pub mime_type: String,
    /// Bytes announced or streamed; may exceed `bytes.len()` when the part was truncated.
    pub size: usize,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RejectedFile {
    pub filename: String,
    pub error: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UploadReport {
    pub files: Vec<PhotoEntity>,
    pub rejected: Vec<RejectedFile>,
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct PhotoQuery {
    #[validate(length(min = 1, message = "Category cannot be empty"))]
    pub category: Option<String>,
    pub featured: Option<bool>,
    pub published: Option<bool>,
    #[validate(range(min = 1, max = 500, message = "Limit must be between 1 and 500"))]
    pub limit: Option<usize>,
}

/// `PUT /photos` body: the photo id plus the fields to merge.
#[derive(Debug, Default, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePhotoModel {
    #[validate(length(min = 1, message = "Photo id is required"))]
    pub id: String,
    #[validate(length(min = 1, message = "Title cannot be empty"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[validate(length(min = 1, message = "Category cannot be empty"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub featured: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published: Option<bool>,
    #[serde(default, deserialize_with = "double_option", skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option", skip_serializing_if = "Option::is_none")]
    pub alt: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option", skip_serializing_if = "Option::is_none")]
    pub order: Option<Option<i64>>,
    #[serde(default, deserialize_with = "double_option", skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option", skip_serializing_if = "Option::is_none")]
    pub location: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option", skip_serializing_if = "Option::is_none")]
    pub date_taken: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option", skip_serializing_if = "Option::is_none")]
    pub camera: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option", skip_serializing_if = "Option::is_none")]
    pub lens: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub settings: Option<ExposureSettings>,
    #[serde(default, deserialize_with = "double_option", skip_serializing_if = "Option::is_none")]
    pub client: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option", skip_serializing_if = "Option::is_none")]
    pub project: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option", skip_serializing_if = "Option::is_none")]
    pub mood: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color_palette: Option<Vec<String>>,
    #[serde(default, deserialize_with = "double_option", skip_serializing_if = "Option::is_none")]
    pub technical_notes: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option", skip_serializing_if = "Option::is_none")]
    pub seo_alt: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option", skip_serializing_if = "Option::is_none")]
    pub social_description: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option", skip_serializing_if = "Option::is_none")]
    pub price: Option<Option<f64>>,
    #[serde(default, deserialize_with = "double_option", skip_serializing_if = "Option::is_none")]
    pub license: Option<Option<License>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keywords: Option<Vec<String>>,
    #[serde(default, deserialize_with = "double_option", skip_serializing_if = "Option::is_none")]
    pub rating: Option<Option<u8>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_private: Option<bool>,
}

fn set<T>(target: &mut T, value: Option<T>) {
    if let Some(v) = value {
        *target = v;
    }
}

impl UpdatePhotoModel {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into(), ..Default::default() }
    }

    /// Range checks the derive cannot express on nullable fields.
    pub fn check(&self) -> Result<(), error::SystemError> {
        if let Some(Some(rating)) = self.rating {
            if !(1..=5).contains(&rating) {
                return Err(error::SystemError::bad_request("Rating must be between 1 and 5"));
            }
        }
        if let Some(Some(price)) = self.price {
            if !price.is_finite() || price < 0.0 {
                return Err(error::SystemError::bad_request("Price must be a positive amount"));
            }
        }
        if self.is_empty() {
            return Err(error::SystemError::bad_request("No fields to update"));
        }
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.category.is_none()
            && self.tags.is_none()
            && self.featured.is_none()
            && self.published.is_none()
            && self.thumbnail.is_none()
            && self.alt.is_none()
            && self.order.is_none()
            && self.subtitle.is_none()
            && self.location.is_none()
            && self.date_taken.is_none()
            && self.camera.is_none()
            && self.lens.is_none()
            && self.settings.is_none()
            && self.client.is_none()
            && self.project.is_none()
            && self.mood.is_none()
            && self.color_palette.is_none()
            && self.technical_notes.is_none()
            && self.seo_alt.is_none()
            && self.social_description.is_none()
            && self.price.is_none()
            && self.license.is_none()
            && self.keywords.is_none()
            && self.rating.is_none()
            && self.is_private.is_none()
    }

    /// Merges the provided fields over `photo`; absent fields keep their value.
    pub fn apply_to(self, photo: &mut PhotoEntity) {
        set(&mut photo.title, self.title);
        set(&mut photo.description, self.description);
        set(&mut photo.category, self.category);
        set(&mut photo.tags, self.tags);
        set(&mut photo.featured, self.featured);
        set(&mut photo.published, self.published);
        set(&mut photo.thumbnail, self.thumbnail);
        set(&mut photo.alt, self.alt);
        set(&mut photo.order, self.order);
        set(&mut photo.subtitle, self.subtitle);
        set(&mut photo.location, self.location);
        set(&mut photo.date_taken, self.date_taken);
        set(&mut photo.camera, self.camera);
        set(&mut photo.lens, self.lens);
        set(&mut photo.settings, self.settings);
        set(&mut photo.client, self.client);
        set(&mut photo.project, self.project);
        set(&mut photo.mood, self.mood);
        set(&mut photo.color_palette, self.color_palette);
        set(&mut photo.technical_notes, self.technical_notes);
        set(&mut photo.seo_alt, self.seo_alt);
        set(&mut photo.social_description, self.social_description);
        set(&mut photo.price, self.price);
        set(&mut photo.license, self.license);
        set(&mut photo.keywords, self.keywords);
        set(&mut photo.rating, self.rating);
        set(&mut photo.is_private, self.is_private);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_clears_and_absent_keeps() {
        let patch: UpdatePhotoModel =
            serde_json::from_str(r#"{"id":"1","price":null,"camera":"X-T5"}"#).unwrap();
        assert_eq!(patch.price, Some(None));
        assert_eq!(patch.camera, Some(Some("X-T5".to_string())));
        assert_eq!(patch.lens, None);
    }

    #[test]
    fn empty_patch_is_rejected() {
        let patch = UpdatePhotoModel::new("1");
        assert!(matches!(patch.check(), Err(error::SystemError::BadRequest(_))));
    }

    #[test]
    fn rating_out_of_range_is_rejected() {
        let patch = UpdatePhotoModel { rating: Some(Some(6)), ..UpdatePhotoModel::new("1") };
        assert!(patch.check().is_err());
        let patch = UpdatePhotoModel { rating: Some(Some(5)), ..UpdatePhotoModel::new("1") };
        assert!(patch.check().is_ok());
    }

    #[test]
    fn upload_config_matches_prefixes() {
        let config = UploadConfig::default();
        assert!(config.accepts("image/jpeg"));
        assert!(config.accepts("image/heic"));
        assert!(!config.accepts("text/plain"));

        let strict = UploadConfig {
            allowed_mime_types: vec!["image/png".into()],
            ..UploadConfig::default()
        };
        assert!(!strict.accepts("image/jpeg"));
    }
}
