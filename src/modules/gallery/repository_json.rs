use std::path::PathBuf;

use crate::{
    api::error,
    modules::{
        gallery::{
            model::{NewGallery, UpdateGalleryModel},
            repository::GalleryRepository,
            schema::GalleryEntity,
        },
        storage::{position, unused_id, DirtyFlag, JsonFile},
    },
    utils::next_timestamp,
};

fn slug_taken(slug: &str) -> error::SystemError {
    error::SystemError::Conflict(format!("Gallery '{slug}' already exists").into())
}

pub struct GalleryRepositoryJson {
    file: JsonFile<Vec<GalleryEntity>>,
}

impl GalleryRepositoryJson {
    pub fn new(path: impl Into<PathBuf>, dirty: DirtyFlag) -> Self {
        Self { file: JsonFile::new(path, dirty) }
    }
}

#[async_trait::async_trait]
impl GalleryRepository for GalleryRepositoryJson {
    async fn find_all(&self) -> Result<Vec<GalleryEntity>, error::SystemError> {
        self.file.load().await
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<GalleryEntity>, error::SystemError> {
        let galleries = self.file.load().await?;
        Ok(galleries.into_iter().find(|g| g.slug == slug))
    }

    async fn insert(&self, gallery: NewGallery) -> Result<GalleryEntity, error::SystemError> {
        self.file
            .mutate(move |galleries| {
                if galleries.iter().any(|g| g.slug == gallery.slug) {
                    return Err(slug_taken(&gallery.slug));
                }
                let entity = GalleryEntity {
                    id: unused_id(galleries),
                    title: gallery.title,
                    description: gallery.description,
                    category: gallery.category,
                    photos: gallery.photos,
                    cover_photo: gallery.cover_photo,
                    featured: gallery.featured,
                    published: gallery.published,
                    created_at: gallery.created_at,
                    updated_at: gallery.created_at,
                    order: galleries.len() as i64,
                    slug: gallery.slug,
                };
                galleries.push(entity.clone());
                Ok(entity)
            })
            .await
    }

    async fn update(
        &self,
        patch: UpdateGalleryModel,
    ) -> Result<GalleryEntity, error::SystemError> {
        self.file
            .mutate(move |galleries| {
                let idx = position(galleries, &patch.id)
                    .ok_or_else(|| error::SystemError::not_found("Gallery not found"))?;
                if let Some(slug) = &patch.slug {
                    if galleries.iter().any(|g| &g.slug == slug && g.id != patch.id) {
                        return Err(slug_taken(slug));
                    }
                }
                let gallery = &mut galleries[idx];
                patch.apply_to(gallery);
                gallery.updated_at = next_timestamp(gallery.updated_at.max(gallery.created_at));
                Ok(gallery.clone())
            })
            .await
    }

    async fn delete(&self, id: &str) -> Result<GalleryEntity, error::SystemError> {
        self.file
            .mutate(|galleries| {
                let idx = position(galleries, id)
                    .ok_or_else(|| error::SystemError::not_found("Gallery not found"))?;
                Ok(galleries.remove(idx))
            })
            .await
    }
}
