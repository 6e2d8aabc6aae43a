use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::api::error;
use crate::modules::category::schema::CategoryEntity;
use crate::utils::is_slug;

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateCategoryModel {
    #[validate(length(min = 1, max = 100, message = "Category name is required"))]
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[validate(length(min = 1, message = "Color cannot be empty"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[validate(length(min = 1, message = "Icon cannot be empty"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCategoryModel {
    #[validate(length(min = 1, message = "Category id is required"))]
    pub id: String,
    #[validate(length(min = 1, max = 100, message = "Category name cannot be empty"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[validate(length(min = 1, message = "Color cannot be empty"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[validate(length(min = 1, message = "Icon cannot be empty"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<i64>,
    #[validate(length(min = 1, message = "Slug cannot be empty"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
}

impl UpdateCategoryModel {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into(), ..Default::default() }
    }

    pub fn check(&self) -> Result<(), error::SystemError> {
        if self.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
            return Err(error::SystemError::bad_request("Category name cannot be empty"));
        }
        if self.slug.as_deref().is_some_and(|s| !is_slug(s)) {
            return Err(error::SystemError::bad_request(
                "Slug must be lowercase letters, digits and single hyphens",
            ));
        }
        let empty = self.name.is_none()
            && self.description.is_none()
            && self.color.is_none()
            && self.icon.is_none()
            && self.order.is_none()
            && self.slug.is_none();
        if empty {
            return Err(error::SystemError::bad_request("No fields to update"));
        }
        Ok(())
    }

    pub fn apply_to(self, category: &mut CategoryEntity) {
        if let Some(name) = self.name {
            category.name = name;
        }
        if let Some(description) = self.description {
            category.description = description;
        }
        if let Some(color) = self.color {
            category.color = color;
        }
        if let Some(icon) = self.icon {
            category.icon = icon;
        }
        if let Some(order) = self.order {
            category.order = order;
        }
        if let Some(slug) = self.slug {
            category.slug = slug;
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewCategory {
    pub name: String,
    pub slug: String,
    pub description: String,
    pub color: String,
    pub icon: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}
