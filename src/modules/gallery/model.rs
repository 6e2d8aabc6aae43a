use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::api::error;
use crate::modules::gallery::schema::GalleryEntity;
use crate::modules::photo::schema::PhotoEntity;
use crate::utils::{double_option, is_slug};

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateGalleryModel {
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default)]
    pub photos: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_photo: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub featured: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published: Option<bool>,
}

/// `PUT /galleries` body: gallery id plus the fields to merge.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateGalleryModel {
    #[validate(length(min = 1, message = "Gallery id is required"))]
    pub id: String,
    #[validate(length(min = 1, message = "Title cannot be empty"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photos: Option<Vec<String>>,
    #[serde(default, deserialize_with = "double_option", skip_serializing_if = "Option::is_none")]
    pub cover_photo: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub featured: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<i64>,
    #[validate(length(min = 1, message = "Slug cannot be empty"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
}

impl UpdateGalleryModel {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into(), ..Default::default() }
    }

    pub fn check(&self) -> Result<(), error::SystemError> {
        if self.title.as_deref().is_some_and(|t| t.trim().is_empty()) {
            return Err(error::SystemError::bad_request("Title cannot be empty"));
        }
        if self.slug.as_deref().is_some_and(|s| !is_slug(s)) {
            return Err(error::SystemError::bad_request(
                "Slug must be lowercase letters, digits and single hyphens",
            ));
        }
        let empty = self.title.is_none()
            && self.description.is_none()
            && self.category.is_none()
            && self.photos.is_none()
            && self.cover_photo.is_none()
            && self.featured.is_none()
            && self.published.is_none()
            && self.order.is_none()
            && self.slug.is_none();
        if empty {
            return Err(error::SystemError::bad_request("No fields to update"));
        }
        Ok(())
    }

    /// Merges the provided fields; the slug only changes when given explicitly.
    pub fn apply_to(self, gallery: &mut GalleryEntity) {
        if let Some(title) = self.title {
            gallery.title = title;
        }
        if let Some(description) = self.description {
            gallery.description = description;
        }
        if let Some(category) = self.category {
            gallery.category = category;
        }
        if let Some(photos) = self.photos {
            gallery.photos = photos;
        }
        if let Some(cover_photo) = self.cover_photo {
            gallery.cover_photo = cover_photo;
        }
        if let Some(featured) = self.featured {
            gallery.featured = featured;
        }
        if let Some(published) = self.published {
            gallery.published = published;
        }
        if let Some(order) = self.order {
            gallery.order = order;
        }
        if let Some(slug) = self.slug {
            gallery.slug = slug;
        }
    }
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct GalleryQuery {
    pub published: Option<bool>,
}

/// A published gallery with its photos resolved, for visitors.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicGallery {
    #[serde(flatten)]
    pub gallery: GalleryEntity,
    pub photo_count: usize,
    pub items: Vec<PhotoEntity>,
}

/// Gallery fields decided by the service; id and order are assigned on insert.
#[derive(Debug, Clone)]
pub struct NewGallery {
    pub title: String,
    pub description: String,
    pub category: String,
    pub photos: Vec<String>,
    pub cover_photo: Option<String>,
    pub featured: bool,
    pub published: bool,
    pub slug: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}
