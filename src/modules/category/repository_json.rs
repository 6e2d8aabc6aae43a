use std::path::PathBuf;

use crate::{
    api::error,
    modules::{
        category::{
            model::{NewCategory, UpdateCategoryModel},
            repository::CategoryRepository,
            schema::{default_categories, CategoryEntity},
        },
        storage::{position, unused_id, DirtyFlag, JsonFile},
    },
    utils::next_timestamp,
};

fn slug_taken(slug: &str) -> error::SystemError {
    error::SystemError::Conflict(format!("Category '{slug}' already exists").into())
}

pub struct CategoryRepositoryJson {
    file: JsonFile<Vec<CategoryEntity>>,
}

impl CategoryRepositoryJson {
    pub fn new(path: impl Into<PathBuf>, dirty: DirtyFlag) -> Self {
        Self { file: JsonFile::with_seed(path, dirty, default_categories) }
    }
}

#[async_trait::async_trait]
impl CategoryRepository for CategoryRepositoryJson {
    async fn find_all(&self) -> Result<Vec<CategoryEntity>, error::SystemError> {
        self.file.load().await
    }

    async fn insert(&self, category: NewCategory) -> Result<CategoryEntity, error::SystemError> {
        self.file
            .mutate(move |categories| {
                if categories.iter().any(|c| c.slug == category.slug) {
                    return Err(slug_taken(&category.slug));
                }
                let entity = CategoryEntity {
                    id: unused_id(categories),
                    name: category.name,
                    slug: category.slug,
                    description: category.description,
                    color: category.color,
                    icon: category.icon,
                    order: categories.len() as i64,
                    created_at: category.created_at,
                    updated_at: None,
                    photo_count: 0,
                };
                categories.push(entity.clone());
                Ok(entity)
            })
            .await
    }

    async fn update(
        &self,
        patch: UpdateCategoryModel,
    ) -> Result<CategoryEntity, error::SystemError> {
        self.file
            .mutate(move |categories| {
                let idx = position(categories, &patch.id)
                    .ok_or_else(|| error::SystemError::not_found("Category not found"))?;
                if let Some(slug) = &patch.slug {
                    if categories.iter().any(|c| &c.slug == slug && c.id != patch.id) {
                        return Err(slug_taken(slug));
                    }
                }
                let category = &mut categories[idx];
                patch.apply_to(category);
                let previous = category.updated_at.unwrap_or(category.created_at);
                category.updated_at = Some(next_timestamp(previous.max(category.created_at)));
                Ok(category.clone())
            })
            .await
    }

    async fn delete(&self, id: &str) -> Result<CategoryEntity, error::SystemError> {
        self.file
            .mutate(|categories| {
                let idx = position(categories, id)
                    .ok_or_else(|| error::SystemError::not_found("Category not found"))?;
                Ok(categories.remove(idx))
            })
            .await
    }
}
