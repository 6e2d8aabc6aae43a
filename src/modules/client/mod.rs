pub mod api;
pub mod hooks;
pub mod upload;

pub use api::{ClientError, CmsClient, LocalFile};
pub use hooks::{CategoriesHook, GalleriesHook, PhotosHook, SettingsHook};
pub use upload::{PendingUpload, UploadPolicy, UploadStatus, UploadTracker, UploadTransport};
