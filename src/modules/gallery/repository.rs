use crate::{
    api::error,
    modules::gallery::{
        model::{NewGallery, UpdateGalleryModel},
        schema::GalleryEntity,
    },
};

#[async_trait::async_trait]
pub trait GalleryRepository {
    async fn find_all(&self) -> Result<Vec<GalleryEntity>, error::SystemError>;

    async fn find_by_slug(&self, slug: &str) -> Result<Option<GalleryEntity>, error::SystemError>;

    /// Appends with a fresh id and `order` equal to the prior collection length.
    async fn insert(&self, gallery: NewGallery) -> Result<GalleryEntity, error::SystemError>;

    async fn update(&self, patch: UpdateGalleryModel)
        -> Result<GalleryEntity, error::SystemError>;

    async fn delete(&self, id: &str) -> Result<GalleryEntity, error::SystemError>;
}
