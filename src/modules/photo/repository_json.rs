use std::path::PathBuf;

use crate::{
    api::error,
    modules::{
        photo::{model::UpdatePhotoModel, repository::PhotoRepository, schema::PhotoEntity},
        storage::{position, unused_id, DirtyFlag, JsonFile},
    },
    utils::next_timestamp,
};

pub struct PhotoRepositoryJson {
    file: JsonFile<Vec<PhotoEntity>>,
}

impl PhotoRepositoryJson {
    pub fn new(path: impl Into<PathBuf>, dirty: DirtyFlag) -> Self {
        Self { file: JsonFile::new(path, dirty) }
    }
}

#[async_trait::async_trait]
impl PhotoRepository for PhotoRepositoryJson {
    async fn find_all(&self) -> Result<Vec<PhotoEntity>, error::SystemError> {
        self.file.load().await
    }

    async fn insert_many(
        &self,
        photos: Vec<PhotoEntity>,
    ) -> Result<Vec<PhotoEntity>, error::SystemError> {
        self.file
            .mutate(move |existing| {
                let mut inserted = Vec::with_capacity(photos.len());
                for mut photo in photos {
                    if position(existing, &photo.id).is_some() {
                        photo.id = unused_id(existing);
                    }
                    existing.push(photo.clone());
                    inserted.push(photo);
                }
                Ok(inserted)
            })
            .await
    }

    async fn update(&self, patch: UpdatePhotoModel) -> Result<PhotoEntity, error::SystemError> {
        self.file
            .mutate(move |photos| {
                let idx = position(photos, &patch.id)
                    .ok_or_else(|| error::SystemError::not_found("Photo not found"))?;
                let photo = &mut photos[idx];
                let previous = photo.updated_at.unwrap_or(photo.uploaded_at);
                patch.apply_to(photo);
                photo.updated_at = Some(next_timestamp(previous));
                Ok(photo.clone())
            })
            .await
    }

    async fn delete(&self, id: &str) -> Result<PhotoEntity, error::SystemError> {
        self.file
            .mutate(|photos| {
                let idx = position(photos, id)
                    .ok_or_else(|| error::SystemError::not_found("Photo not found"))?;
                Ok(photos.remove(idx))
            })
            .await
    }
}
