use crate::{
    api::error,
    modules::photo::{model::UpdatePhotoModel, schema::PhotoEntity},
};

#[async_trait::async_trait]
pub trait PhotoRepository {
    async fn find_all(&self) -> Result<Vec<PhotoEntity>, error::SystemError>;

    /// Appends the batch in one write, assigning fresh ids on collision.
    async fn insert_many(
        &self,
        photos: Vec<PhotoEntity>,
    ) -> Result<Vec<PhotoEntity>, error::SystemError>;

    async fn update(&self, patch: UpdatePhotoModel) -> Result<PhotoEntity, error::SystemError>;

    /// Removes the record and returns it.
    async fn delete(&self, id: &str) -> Result<PhotoEntity, error::SystemError>;
}
