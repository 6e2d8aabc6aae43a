use serde_json::{Map, Value};

use crate::{api::error, modules::settings::schema::SiteSettings};

#[async_trait::async_trait]
pub trait SettingsRepository {
    /// The stored document, seeded with defaults when absent.
    async fn find(&self) -> Result<SiteSettings, error::SystemError>;

    async fn merge(&self, patch: Map<String, Value>) -> Result<SiteSettings, error::SystemError>;
}
