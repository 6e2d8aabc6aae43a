use serde_json::Value;
use std::sync::Arc;

use crate::api::error;
use crate::modules::settings::{
    model::extract_patch, repository::SettingsRepository, schema::SiteSettings,
};

#[derive(Clone)]
pub struct SettingsService {
    repo: Arc<dyn SettingsRepository + Send + Sync>,
}

impl SettingsService {
    pub fn new(repo: Arc<dyn SettingsRepository + Send + Sync>) -> Self {
        Self { repo }
    }

    pub async fn get(&self) -> Result<SiteSettings, error::SystemError> {
        self.repo.find().await
    }

    pub async fn update(&self, body: Value) -> Result<SiteSettings, error::SystemError> {
        let patch = extract_patch(body)?;
        let keys: Vec<String> = patch.keys().cloned().collect();
        let settings = self.repo.merge(patch).await?;
        log::info!("Updated site settings: {}", keys.join(", "));
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::settings::repository_json::SettingsRepositoryJson;
    use crate::modules::storage::DirtyFlag;
    use serde_json::json;

    fn service(dir: &std::path::Path, dirty: DirtyFlag) -> SettingsService {
        SettingsService::new(Arc::new(SettingsRepositoryJson::new(dir.join("settings.json"), dirty)))
    }

    #[tokio::test]
    async fn seeded_then_stable() {
        let dir = tempfile::tempdir().unwrap();
        let dirty = DirtyFlag::default();
        let svc = service(dir.path(), dirty.clone());

        let first = svc.get().await.unwrap();
        assert_eq!(first.id, "main-settings");
        assert_eq!(first.gallery_settings.items_per_page, 12);
        assert!(dirty.take());

        assert_eq!(svc.get().await.unwrap(), first);
        assert!(!dirty.is_set());
    }

    #[tokio::test]
    async fn update_persists_merge() {
        let dir = tempfile::tempdir().unwrap();
        let svc = service(dir.path(), DirtyFlag::default());

        let updated = svc
            .update(json!({"settings": {"fontFamily": "Playfair Display", "tagline": "Lumière"}}))
            .await
            .unwrap();
        assert_eq!(updated.font_family, "Playfair Display");

        let reread = service(dir.path(), DirtyFlag::default()).get().await.unwrap();
        assert_eq!(reread, updated);
        assert_eq!(reread.tagline, "Lumière");
        assert_eq!(reread.site_name, "Portfolio Photographe");
    }

    #[tokio::test]
    async fn rejected_update_leaves_file_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let svc = service(dir.path(), DirtyFlag::default());
        let before = svc.get().await.unwrap();

        let err = svc.update(json!({"gallerySettings": {"itemsPerPage": 500}})).await.unwrap_err();

        assert!(matches!(err, error::SystemError::BadRequest(_)));
        assert_eq!(svc.get().await.unwrap(), before);
    }
}
