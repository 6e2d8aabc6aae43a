pub mod auth;
pub mod autosave;
pub mod category;
pub mod client;
pub mod gallery;
pub mod photo;
pub mod settings;
pub mod stats;
pub mod storage;
pub mod version_control;
