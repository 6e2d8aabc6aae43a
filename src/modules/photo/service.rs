use chrono::Utc;
use std::path::Path;
use std::sync::Arc;

use crate::api::error;
use crate::modules::photo::{
    model::{IncomingFile, PhotoQuery, RejectedFile, UpdatePhotoModel, UploadConfig, UploadReport},
    repository::PhotoRepository,
    schema::{ExposureSettings, License, PhotoEntity, DEFAULT_CATEGORY},
};
use crate::utils::random_suffix;

#[derive(Clone)]
pub struct PhotoService {
    repo: Arc<dyn PhotoRepository + Send + Sync>,
    config: UploadConfig,
}

impl PhotoService {
    pub fn new(repo: Arc<dyn PhotoRepository + Send + Sync>, config: UploadConfig) -> Self {
        Self { repo, config }
    }

    pub fn config(&self) -> &UploadConfig {
        &self.config
    }

    /// Validate file type and size
    fn validate_file(&self, file: &IncomingFile) -> Result<(), String> {
        if !self.config.accepts(&file.mime_type) {
            return Err(format!("File type '{}' is not allowed", file.mime_type));
        }

        if file.size > self.config.max_file_size {
            return Err(format!(
                "File size exceeds maximum allowed size of {} bytes",
                self.config.max_file_size
            ));
        }

        if file.bytes.is_empty() {
            return Err("File is empty".to_string());
        }

        Ok(())
    }

    /// `{timestamp}-{random}` stem shared by the record id and the stored name.
    fn generate_stem(&self) -> String {
        format!("{}-{}", Utc::now().timestamp_millis(), random_suffix(10))
    }

    fn extension_for(original_filename: &str, mime_type: &str) -> Option<String> {
        Path::new(original_filename)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .or_else(|| {
                mime_guess::get_mime_extensions_str(mime_type)
                    .and_then(|exts| exts.first())
                    .map(|ext| ext.to_string())
            })
    }

    /// Save file to disk
    async fn save_file(&self, filename: &str, bytes: &[u8]) -> Result<String, error::SystemError> {
        tokio::fs::create_dir_all(&self.config.upload_dir).await?;

        let file_path = format!("{}/{}", self.config.upload_dir.trim_end_matches('/'), filename);
        tokio::fs::write(&file_path, bytes).await?;

        Ok(file_path)
    }

    fn new_photo(&self, file: &IncomingFile, stem: &str, stored: &str, path: String) -> PhotoEntity {
        let title = Path::new(&file.filename)
            .file_stem()
            .and_then(|s| s.to_str())
            .filter(|s| !s.is_empty())
            .unwrap_or(stem)
            .to_string();

        PhotoEntity {
            id: stem.to_string(),
            filename: file.filename.clone(),
            path,
            size: file.bytes.len() as u64,
            mime_type: file.mime_type.clone(),
            url: format!("{}/{}", self.config.base_url.trim_end_matches('/'), stored),
            thumbnail: None,
            title,
            description: String::new(),
            category: DEFAULT_CATEGORY.to_string(),
            tags: Vec::new(),
            featured: false,
            published: true,
            views: 0,
            uploaded_at: Utc::now(),
            updated_at: None,
            alt: None,
            order: None,
            subtitle: None,
            location: None,
            date_taken: None,
            camera: None,
            lens: None,
            settings: ExposureSettings::default(),
            client: None,
            project: None,
            mood: None,
            color_palette: Vec::new(),
            technical_notes: None,
            seo_alt: None,
            social_description: None,
            price: None,
            license: Some(License::Personal),
            keywords: Vec::new(),
            rating: None,
            is_private: false,
        }
    }

    /// Stores every valid file and records it; invalid files are skipped and reported.
    ///
    /// A batch without a single valid file is a bad request and writes nothing.
    pub async fn upload_batch(
        &self,
        files: Vec<IncomingFile>,
    ) -> Result<UploadReport, error::SystemError> {
        if files.is_empty() {
            return Err(error::SystemError::bad_request("No files received"));
        }
        if files.len() > self.config.max_files {
            return Err(error::SystemError::bad_request(self.config.too_many_files()));
        }

        let mut rejected = Vec::new();
        let mut pending = Vec::new();
        let mut written = Vec::new();

        for file in &files {
            if let Err(reason) = self.validate_file(file) {
                log::warn!("Rejected upload '{}': {}", file.filename, reason);
                rejected.push(RejectedFile { filename: file.filename.clone(), error: reason });
                continue;
            }

            let stem = self.generate_stem();
            let stored = match Self::extension_for(&file.filename, &file.mime_type) {
                Some(ext) => format!("{stem}.{ext}"),
                None => stem.clone(),
            };

            let path = match self.save_file(&stored, &file.bytes).await {
                Ok(path) => path,
                Err(e) => {
                    Self::remove_files(&written).await;
                    return Err(e);
                }
            };
            written.push(path.clone());
            pending.push(self.new_photo(file, &stem, &stored, path));
        }

        if pending.is_empty() {
            let reasons: Vec<String> =
                rejected.iter().map(|r| format!("{}: {}", r.filename, r.error)).collect();
            return Err(error::SystemError::bad_request(reasons.join("; ")));
        }

        let files = match self.repo.insert_many(pending).await {
            Ok(files) => files,
            Err(e) => {
                Self::remove_files(&written).await;
                return Err(e);
            }
        };

        log::info!("Uploaded {} photo(s), rejected {}", files.len(), rejected.len());
        Ok(UploadReport { files, rejected })
    }

    async fn remove_files(paths: &[String]) {
        for path in paths {
            if let Err(e) = tokio::fs::remove_file(path).await {
                log::warn!("Failed to remove stored file {}: {}", path, e);
            }
        }
    }

    pub async fn list(&self, query: &PhotoQuery) -> Result<Vec<PhotoEntity>, error::SystemError> {
        let photos = self.repo.find_all().await?;
        Ok(filter_photos(photos, query))
    }

    /// Published, non-private photos for the public site.
    pub async fn list_public(
        &self,
        query: &PhotoQuery,
    ) -> Result<Vec<PhotoEntity>, error::SystemError> {
        let photos = self.repo.find_all().await?;
        let public = photos.into_iter().filter(PhotoEntity::is_public).collect();
        Ok(filter_photos(public, query))
    }

    pub async fn update(&self, patch: UpdatePhotoModel) -> Result<PhotoEntity, error::SystemError> {
        patch.check()?;
        self.repo.update(patch).await
    }

    /// Deletes the record, then tries to remove the stored file.
    pub async fn delete(&self, id: &str) -> Result<(), error::SystemError> {
        let photo = self.repo.delete(id).await?;

        if let Err(e) = tokio::fs::remove_file(&photo.path).await {
            log::warn!("Photo {} deleted but file {} was not removed: {}", photo.id, photo.path, e);
        }

        Ok(())
    }
}

fn filter_photos(photos: Vec<PhotoEntity>, query: &PhotoQuery) -> Vec<PhotoEntity> {
    let iter = photos.into_iter().filter(|p| {
        query.category.as_ref().map_or(true, |c| p.category.eq_ignore_ascii_case(c))
            && query.featured.map_or(true, |f| p.featured == f)
            && query.published.map_or(true, |f| p.published == f)
    });

    match query.limit {
        Some(limit) => iter.take(limit).collect(),
        None => iter.collect(),
    }
}
