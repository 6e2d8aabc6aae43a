//! In-memory mirrors of the CMS collections.
//!
//! A hook holds `items`, `loading` and `error`. Mutations go through the
//! client and, on success, refetch the whole collection; on failure the
//! message is stored in `error` and returned. Nothing is retried.

use std::future::Future;
use std::marker::PhantomData;

use crate::modules::category::{CategoryEntity, CreateCategoryModel, UpdateCategoryModel};
use crate::modules::client::api::{ClientError, CmsClient, LocalFile};
use crate::modules::gallery::{CreateGalleryModel, GalleryEntity, UpdateGalleryModel};
use crate::modules::photo::{PhotoEntity, UpdatePhotoModel, UploadReport};
use crate::modules::settings::SiteSettings;

#[async_trait::async_trait]
pub trait Collection {
    type Item: Send;

    async fn fetch(client: &CmsClient) -> Result<Vec<Self::Item>, ClientError>;
}

pub struct Photos;
pub struct Galleries;
pub struct Categories;

#[async_trait::async_trait]
impl Collection for Photos {
    type Item = PhotoEntity;

    async fn fetch(client: &CmsClient) -> Result<Vec<PhotoEntity>, ClientError> {
        client.list_photos().await
    }
}

#[async_trait::async_trait]
impl Collection for Galleries {
    type Item = GalleryEntity;

    async fn fetch(client: &CmsClient) -> Result<Vec<GalleryEntity>, ClientError> {
        client.list_galleries().await
    }
}

#[async_trait::async_trait]
impl Collection for Categories {
    type Item = CategoryEntity;

    async fn fetch(client: &CmsClient) -> Result<Vec<CategoryEntity>, ClientError> {
        client.list_categories().await
    }
}

pub struct CollectionHook<C: Collection> {
    client: CmsClient,
    pub items: Vec<C::Item>,
    pub loading: bool,
    pub error: Option<String>,
    _collection: PhantomData<C>,
}

pub type PhotosHook = CollectionHook<Photos>;
pub type GalleriesHook = CollectionHook<Galleries>;
pub type CategoriesHook = CollectionHook<Categories>;

impl<C: Collection> CollectionHook<C> {
    pub fn new(client: CmsClient) -> Self {
        Self { client, items: Vec::new(), loading: false, error: None, _collection: PhantomData }
    }

    /// Replaces the mirror with the server's collection.
    pub async fn refetch(&mut self) {
        self.loading = true;
        match C::fetch(&self.client).await {
            Ok(items) => {
                self.items = items;
                self.error = None;
            }
            Err(e) => {
                log::warn!("Failed to load collection: {}", e);
                self.error = Some(e.to_string());
            }
        }
        self.loading = false;
    }

    async fn mutate<T, Fut>(&mut self, request: Fut) -> Result<T, ClientError>
    where
        Fut: Future<Output = Result<T, ClientError>>,
    {
        match request.await {
            Ok(value) => {
                self.refetch().await;
                Ok(value)
            }
            Err(e) => {
                self.error = Some(e.to_string());
                Err(e)
            }
        }
    }
}

impl CollectionHook<Photos> {
    pub async fn upload(&mut self, files: Vec<LocalFile>) -> Result<UploadReport, ClientError> {
        let client = self.client.clone();
        self.mutate(async move { client.upload_photos(&files).await }).await
    }

    pub async fn update(&mut self, patch: UpdatePhotoModel) -> Result<PhotoEntity, ClientError> {
        let client = self.client.clone();
        self.mutate(async move { client.update_photo(&patch).await }).await
    }

    pub async fn delete(&mut self, id: &str) -> Result<(), ClientError> {
        let client = self.client.clone();
        self.mutate(async move { client.delete_photo(id).await }).await
    }
}

impl CollectionHook<Galleries> {
    pub async fn create(&mut self, gallery: CreateGalleryModel) -> Result<GalleryEntity, ClientError> {
        let client = self.client.clone();
        self.mutate(async move { client.create_gallery(&gallery).await }).await
    }

    pub async fn update(&mut self, patch: UpdateGalleryModel) -> Result<GalleryEntity, ClientError> {
        let client = self.client.clone();
        self.mutate(async move { client.update_gallery(&patch).await }).await
    }

    pub async fn delete(&mut self, id: &str) -> Result<(), ClientError> {
        let client = self.client.clone();
        self.mutate(async move { client.delete_gallery(id).await }).await
    }
}

impl CollectionHook<Categories> {
    pub async fn create(
        &mut self,
        category: CreateCategoryModel,
    ) -> Result<CategoryEntity, ClientError> {
        let client = self.client.clone();
        self.mutate(async move { client.create_category(&category).await }).await
    }

    pub async fn update(
        &mut self,
        patch: UpdateCategoryModel,
    ) -> Result<CategoryEntity, ClientError> {
        let client = self.client.clone();
        self.mutate(async move { client.update_category(&patch).await }).await
    }

    pub async fn delete(&mut self, id: &str) -> Result<(), ClientError> {
        let client = self.client.clone();
        self.mutate(async move { client.delete_category(id).await }).await
    }
}

/// Mirror of the site settings document.
pub struct SettingsHook {
    client: CmsClient,
    pub settings: Option<SiteSettings>,
    pub loading: bool,
    pub error: Option<String>,
}

impl SettingsHook {
    pub fn new(client: CmsClient) -> Self {
        Self { client, settings: None, loading: false, error: None }
    }

    pub async fn refetch(&mut self) {
        self.loading = true;
        match self.client.get_settings().await {
            Ok(settings) => {
                self.settings = Some(settings);
                self.error = None;
            }
            Err(e) => {
                log::warn!("Failed to load settings: {}", e);
                self.error = Some(e.to_string());
            }
        }
        self.loading = false;
    }

    /// The server answers with the merged document, which replaces the mirror.
    pub async fn update(&mut self, patch: serde_json::Value) -> Result<SiteSettings, ClientError> {
        match self.client.update_settings(&patch).await {
            Ok(settings) => {
                self.settings = Some(settings.clone());
                self.error = None;
                Ok(settings)
            }
            Err(e) => {
                self.error = Some(e.to_string());
                Err(e)
            }
        }
    }
}
