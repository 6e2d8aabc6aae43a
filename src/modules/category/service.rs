use chrono::Utc;
use std::sync::Arc;

use crate::api::error;
use crate::modules::category::{
    model::{CreateCategoryModel, NewCategory, UpdateCategoryModel},
    repository::CategoryRepository,
    schema::{CategoryEntity, DEFAULT_COLOR, DEFAULT_ICON},
};
use crate::modules::photo::{repository::PhotoRepository, schema::PhotoEntity};
use crate::utils::slugify;

#[derive(Clone)]
pub struct CategoryService {
    repo: Arc<dyn CategoryRepository + Send + Sync>,
    photos: Arc<dyn PhotoRepository + Send + Sync>,
}

impl CategoryService {
    pub fn new(
        repo: Arc<dyn CategoryRepository + Send + Sync>,
        photos: Arc<dyn PhotoRepository + Send + Sync>,
    ) -> Self {
        Self { repo, photos }
    }

    /// All categories with `photoCount` taken from the current photo collection.
    pub async fn list(&self) -> Result<Vec<CategoryEntity>, error::SystemError> {
        let mut categories = self.repo.find_all().await?;
        let photos = self.photos.find_all().await?;
        for category in categories.iter_mut() {
            count_photos(category, &photos);
        }
        Ok(categories)
    }

    pub async fn create(
        &self,
        model: CreateCategoryModel,
    ) -> Result<CategoryEntity, error::SystemError> {
        let name = model.name.trim().to_string();
        let slug = slugify(&name);
        if slug.is_empty() {
            return Err(error::SystemError::bad_request("Category name is required"));
        }

        let mut category = self
            .repo
            .insert(NewCategory {
                name,
                slug,
                description: model.description.unwrap_or_default(),
                color: model.color.unwrap_or_else(|| DEFAULT_COLOR.to_string()),
                icon: model.icon.unwrap_or_else(|| DEFAULT_ICON.to_string()),
                created_at: Utc::now(),
            })
            .await?;

        let photos = self.photos.find_all().await?;
        count_photos(&mut category, &photos);

        log::info!("Created category {} ({})", category.id, category.slug);
        Ok(category)
    }

    pub async fn update(
        &self,
        patch: UpdateCategoryModel,
    ) -> Result<CategoryEntity, error::SystemError> {
        patch.check()?;
        let mut category = self.repo.update(patch).await?;
        let photos = self.photos.find_all().await?;
        count_photos(&mut category, &photos);
        Ok(category)
    }

    /// Photos keep their label when their category is removed.
    pub async fn delete(&self, id: &str) -> Result<(), error::SystemError> {
        let category = self.repo.delete(id).await?;
        log::info!("Deleted category {} ({})", category.id, category.slug);
        Ok(())
    }
}

fn count_photos(category: &mut CategoryEntity, photos: &[PhotoEntity]) {
    category.photo_count = photos.iter().filter(|p| category.matches_label(&p.category)).count();
}
