pub mod handle;
pub mod model;
pub mod route;
pub mod service;

pub use model::{AutoSaveConfig, SaveOutcome, SaveStatus};
pub use service::AutoSave;
