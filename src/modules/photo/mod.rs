pub mod handle;
pub mod model;
pub mod repository;
pub mod repository_json;
pub mod route;
pub mod schema;
pub mod service;

pub use model::{IncomingFile, PhotoQuery, UpdatePhotoModel, UploadConfig, UploadReport};
pub use repository::PhotoRepository;
pub use repository_json::PhotoRepositoryJson;
pub use schema::PhotoEntity;
pub use service::PhotoService;
