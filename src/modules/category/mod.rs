pub mod handle;
pub mod model;
pub mod repository;
pub mod repository_json;
pub mod route;
pub mod schema;
pub mod service;

pub use model::{CreateCategoryModel, UpdateCategoryModel};
pub use repository::CategoryRepository;
pub use repository_json::CategoryRepositoryJson;
pub use schema::CategoryEntity;
pub use service::CategoryService;
