use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;

use crate::api::error;
use crate::modules::gallery::{
    model::{CreateGalleryModel, GalleryQuery, NewGallery, PublicGallery, UpdateGalleryModel},
    repository::GalleryRepository,
    schema::{GalleryEntity, DEFAULT_GALLERY_CATEGORY},
};
use crate::modules::photo::{repository::PhotoRepository, schema::PhotoEntity};
use crate::utils::slugify;

#[derive(Clone)]
pub struct GalleryService {
    repo: Arc<dyn GalleryRepository + Send + Sync>,
    photos: Arc<dyn PhotoRepository + Send + Sync>,
}

impl GalleryService {
    pub fn new(
        repo: Arc<dyn GalleryRepository + Send + Sync>,
        photos: Arc<dyn PhotoRepository + Send + Sync>,
    ) -> Self {
        Self { repo, photos }
    }

    pub async fn list(&self, query: &GalleryQuery) -> Result<Vec<GalleryEntity>, error::SystemError> {
        let galleries = self.repo.find_all().await?;
        Ok(match query.published {
            Some(published) => galleries.into_iter().filter(|g| g.published == published).collect(),
            None => galleries,
        })
    }

    pub async fn create(&self, model: CreateGalleryModel) -> Result<GalleryEntity, error::SystemError> {
        let title = model.title.trim().to_string();
        if title.is_empty() {
            return Err(error::SystemError::bad_request("Title is required"));
        }

        let slug = slugify(&title);
        if slug.is_empty() {
            return Err(error::SystemError::bad_request("Title must contain letters or digits"));
        }
        let cover_photo = model.cover_photo.or_else(|| model.photos.first().cloned());
        let category = model
            .category
            .filter(|c| !c.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_GALLERY_CATEGORY.to_string());

        let gallery = self
            .repo
            .insert(NewGallery {
                title,
                description: model.description.unwrap_or_default(),
                category,
                photos: model.photos,
                cover_photo,
                featured: model.featured.unwrap_or(false),
                published: model.published.unwrap_or(true),
                slug,
                created_at: Utc::now(),
            })
            .await?;

        log::info!("Created gallery {} ({})", gallery.id, gallery.slug);
        Ok(gallery)
    }

    pub async fn update(&self, patch: UpdateGalleryModel) -> Result<GalleryEntity, error::SystemError> {
        patch.check()?;
        self.repo.update(patch).await
    }

    /// Removes the gallery only; its photos are left untouched.
    pub async fn delete(&self, id: &str) -> Result<(), error::SystemError> {
        let gallery = self.repo.delete(id).await?;
        log::info!("Deleted gallery {} ({})", gallery.id, gallery.slug);
        Ok(())
    }

    /// Published galleries by `order`, each with its visible photos resolved.
    pub async fn list_public(&self) -> Result<Vec<PublicGallery>, error::SystemError> {
        let mut galleries: Vec<GalleryEntity> =
            self.repo.find_all().await?.into_iter().filter(|g| g.published).collect();
        galleries.sort_by_key(|g| g.order);

        let photos = self.public_photos().await?;
        Ok(galleries.into_iter().map(|g| resolve(g, &photos)).collect())
    }

    pub async fn get_public_by_slug(&self, slug: &str) -> Result<PublicGallery, error::SystemError> {
        let gallery = self
            .repo
            .find_by_slug(slug)
            .await?
            .filter(|g| g.published)
            .ok_or_else(|| error::SystemError::not_found("Gallery not found"))?;

        let photos = self.public_photos().await?;
        Ok(resolve(gallery, &photos))
    }

    async fn public_photos(&self) -> Result<HashMap<String, PhotoEntity>, error::SystemError> {
        let photos = self.photos.find_all().await?;
        Ok(photos.into_iter().filter(PhotoEntity::is_public).map(|p| (p.id.clone(), p)).collect())
    }
}

/// Drops ids that no longer resolve to a visible photo.
fn resolve(mut gallery: GalleryEntity, photos: &HashMap<String, PhotoEntity>) -> PublicGallery {
    gallery.photos.retain(|id| photos.contains_key(id));
    if gallery.cover_photo.as_ref().is_some_and(|id| !photos.contains_key(id)) {
        gallery.cover_photo = gallery.photos.first().cloned();
    }

    let items: Vec<PhotoEntity> =
        gallery.photos.iter().filter_map(|id| photos.get(id).cloned()).collect();

    PublicGallery { photo_count: items.len(), gallery, items }
}
