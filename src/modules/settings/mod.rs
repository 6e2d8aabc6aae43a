pub mod handle;
pub mod model;
pub mod repository;
pub mod repository_json;
pub mod route;
pub mod schema;
pub mod service;

pub use repository::SettingsRepository;
pub use repository_json::SettingsRepositoryJson;
pub use schema::SiteSettings;
pub use service::SettingsService;
