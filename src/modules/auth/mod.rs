pub mod handle;
pub mod model;
pub mod route;
pub mod schema;
pub mod service;

pub use schema::{AdminAccount, AdminRole};
pub use service::AuthService;
