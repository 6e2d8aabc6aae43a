pub mod handle;
pub mod model;
pub mod repository;
pub mod repository_json;
pub mod route;
pub mod schema;
pub mod service;

pub use model::{CreateGalleryModel, GalleryQuery, PublicGallery, UpdateGalleryModel};
pub use repository::GalleryRepository;
pub use repository_json::GalleryRepositoryJson;
pub use schema::GalleryEntity;
pub use service::GalleryService;
