use crate::{
    api::error,
    modules::category::{
        model::{NewCategory, UpdateCategoryModel},
        schema::CategoryEntity,
    },
};

#[async_trait::async_trait]
pub trait CategoryRepository {
    /// Seeds the default categories when the collection does not exist yet.
    async fn find_all(&self) -> Result<Vec<CategoryEntity>, error::SystemError>;

    async fn insert(&self, category: NewCategory) -> Result<CategoryEntity, error::SystemError>;

    async fn update(
        &self,
        patch: UpdateCategoryModel,
    ) -> Result<CategoryEntity, error::SystemError>;

    async fn delete(&self, id: &str) -> Result<CategoryEntity, error::SystemError>;
}
