use serde_json::{Map, Value};
use std::path::PathBuf;

use crate::{
    api::error,
    modules::{
        settings::{model::merge_settings, repository::SettingsRepository, schema::SiteSettings},
        storage::{DirtyFlag, JsonFile},
    },
};

pub struct SettingsRepositoryJson {
    file: JsonFile<SiteSettings>,
}

impl SettingsRepositoryJson {
    pub fn new(path: impl Into<PathBuf>, dirty: DirtyFlag) -> Self {
        Self { file: JsonFile::with_seed(path, dirty, SiteSettings::default) }
    }
}

#[async_trait::async_trait]
impl SettingsRepository for SettingsRepositoryJson {
    async fn find(&self) -> Result<SiteSettings, error::SystemError> {
        self.file.load().await
    }

    async fn merge(&self, patch: Map<String, Value>) -> Result<SiteSettings, error::SystemError> {
        self.file
            .mutate(move |settings| {
                *settings = merge_settings(settings, patch)?;
                Ok(settings.clone())
            })
            .await
    }
}
