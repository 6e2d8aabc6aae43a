//! HTTP client for the CMS API.
//!
//! Every response is unwrapped from the `{data, message}` envelope; error
//! responses surface their `{message}` as [`ClientError::Api`].

use reqwest::{IntoUrl, Method, RequestBuilder, Url};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::sync::Arc;

use crate::api::error::ErrorBody;
use crate::modules::autosave::model::{SaveResult, SaveStatus};
use crate::modules::auth::model::{LoginModel, LoginResponse};
use crate::modules::category::{CategoryEntity, CreateCategoryModel, UpdateCategoryModel};
use crate::modules::gallery::{CreateGalleryModel, GalleryEntity, PublicGallery, UpdateGalleryModel};
use crate::modules::photo::{PhotoEntity, UpdatePhotoModel, UploadReport};
use crate::modules::settings::SiteSettings;
use crate::modules::stats::DashboardStats;
use crate::modules::version_control::CommitInfo;

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The server answered with a non-2xx status.
    #[error("{message}")]
    Api { status: u16, message: String },

    #[error("Response carried no data")]
    EmptyData,

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    pub data: Option<T>,
    pub message: Option<String>,
}

/// A file picked on the client, ready to be sent.
#[derive(Debug, Clone)]
pub struct LocalFile {
    pub name: String,
    pub mime_type: String,
    pub bytes: Arc<Vec<u8>>,
}

impl LocalFile {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self { name: name.into(), mime_type: mime_type.into(), bytes: Arc::new(bytes) }
    }

    /// Reads a file from disk, guessing its MIME type from the extension.
    pub async fn from_path(path: impl AsRef<std::path::Path>) -> std::io::Result<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;
        let name = path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
        let mime_type = mime_guess::from_path(path).first_or_octet_stream().to_string();
        Ok(Self::new(name, mime_type, bytes))
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

#[derive(Debug, Serialize)]
struct SaveChangesBody<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<&'a str>,
}

#[derive(Clone)]
pub struct CmsClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl CmsClient {
    /// * `base_url` - server root, e.g. `http://localhost:8080`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self { http, base_url: base_url.into().trim_end_matches('/').to_string(), token: None }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Signs in and keeps the access token for later requests.
    pub async fn login(&mut self, email: &str, password: &str) -> Result<LoginResponse, ClientError> {
        let body = LoginModel { email: email.to_string(), password: password.to_string() };
        let response: LoginResponse =
            self.data(self.request(Method::POST, "/api/auth/login").json(&body)).await?;
        self.token = Some(response.access_token.clone());
        Ok(response)
    }

    // ---- photos ----

    pub async fn list_photos(&self) -> Result<Vec<PhotoEntity>, ClientError> {
        self.data(self.request(Method::GET, "/api/cms/photos")).await
    }

    /// Sends every file in one multipart request.
    pub async fn upload_photos(&self, files: &[LocalFile]) -> Result<UploadReport, ClientError> {
        let mut form = reqwest::multipart::Form::new();
        for file in files {
            let part = reqwest::multipart::Part::bytes(file.bytes.as_ref().clone())
                .file_name(file.name.clone())
                .mime_str(&file.mime_type)?;
            form = form.part("files", part);
        }
        self.data(self.request(Method::POST, "/api/cms/photos").multipart(form)).await
    }

    pub async fn update_photo(&self, patch: &UpdatePhotoModel) -> Result<PhotoEntity, ClientError> {
        self.data(self.request(Method::PUT, "/api/cms/photos").json(patch)).await
    }

    pub async fn delete_photo(&self, id: &str) -> Result<(), ClientError> {
        self.delete("/api/cms/photos", id).await
    }

    // ---- galleries ----

    pub async fn list_galleries(&self) -> Result<Vec<GalleryEntity>, ClientError> {
        self.data(self.request(Method::GET, "/api/cms/galleries")).await
    }

    pub async fn create_gallery(
        &self,
        gallery: &CreateGalleryModel,
    ) -> Result<GalleryEntity, ClientError> {
        self.data(self.request(Method::POST, "/api/cms/galleries").json(gallery)).await
    }

    pub async fn update_gallery(
        &self,
        patch: &UpdateGalleryModel,
    ) -> Result<GalleryEntity, ClientError> {
        self.data(self.request(Method::PUT, "/api/cms/galleries").json(patch)).await
    }

    pub async fn delete_gallery(&self, id: &str) -> Result<(), ClientError> {
        self.delete("/api/cms/galleries", id).await
    }

    // ---- categories ----

    pub async fn list_categories(&self) -> Result<Vec<CategoryEntity>, ClientError> {
        self.data(self.request(Method::GET, "/api/cms/categories")).await
    }

    pub async fn create_category(
        &self,
        category: &CreateCategoryModel,
    ) -> Result<CategoryEntity, ClientError> {
        self.data(self.request(Method::POST, "/api/cms/categories").json(category)).await
    }

    pub async fn update_category(
        &self,
        patch: &UpdateCategoryModel,
    ) -> Result<CategoryEntity, ClientError> {
        self.data(self.request(Method::PUT, "/api/cms/categories").json(patch)).await
    }

    pub async fn delete_category(&self, id: &str) -> Result<(), ClientError> {
        self.delete("/api/cms/categories", id).await
    }

    // ---- settings, stats, saves ----

    pub async fn get_settings(&self) -> Result<SiteSettings, ClientError> {
        self.data(self.request(Method::GET, "/api/cms/settings")).await
    }

    pub async fn update_settings(
        &self,
        patch: &serde_json::Value,
    ) -> Result<SiteSettings, ClientError> {
        let body = serde_json::json!({ "settings": patch });
        self.data(self.request(Method::PUT, "/api/cms/settings").json(&body)).await
    }

    pub async fn stats(&self) -> Result<DashboardStats, ClientError> {
        self.data(self.request(Method::GET, "/api/cms/stats")).await
    }

    pub async fn save_changes(&self, message: Option<&str>) -> Result<SaveResult, ClientError> {
        let body = SaveChangesBody { message };
        self.data(self.request(Method::POST, "/api/cms/save-changes").json(&body)).await
    }

    pub async fn history(&self) -> Result<Vec<CommitInfo>, ClientError> {
        self.data(self.request(Method::GET, "/api/cms/save-changes")).await
    }

    pub async fn save_status(&self) -> Result<SaveStatus, ClientError> {
        self.data(self.request(Method::GET, "/api/cms/save-status")).await
    }

    // ---- public site ----

    pub async fn public_photos(&self) -> Result<Vec<PhotoEntity>, ClientError> {
        self.data(self.request(Method::GET, "/api/photos")).await
    }

    pub async fn public_gallery(&self, slug: &str) -> Result<PublicGallery, ClientError> {
        let url = self.gallery_url(slug)?;
        self.data(self.request_url(Method::GET, url)).await
    }

    // ---- private helpers ----

    /// `/api/galleries/{slug}` with the slug percent-encoded as one segment.
    fn gallery_url(&self, slug: &str) -> Result<Url, ClientError> {
        let mut url = Url::parse(&format!("{}/api/galleries", self.base_url))
            .map_err(|e| ClientError::InvalidUrl(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidUrl(self.base_url.clone()))?
            .push(slug);
        Ok(url)
    }

    pub(crate) fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.request_url(method, format!("{}{}", self.base_url, path))
    }

    fn request_url(&self, method: Method, url: impl IntoUrl) -> RequestBuilder {
        let builder = self.http.request(method, url);
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn delete(&self, path: &str, id: &str) -> Result<(), ClientError> {
        let request = self.request(Method::DELETE, path).query(&[("id", id)]);
        self.envelope::<serde_json::Value>(request).await?;
        Ok(())
    }

    async fn data<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ClientError> {
        self.envelope(request).await?.data.ok_or(ClientError::EmptyData)
    }

    async fn envelope<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<Envelope<T>, ClientError> {
        let response = request.send().await?;
        Self::parse_envelope(response).await
    }

    pub(crate) async fn parse_envelope<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<Envelope<T>, ClientError> {
        let status = response.status();
        if !status.is_success() {
            let message = match response.json::<ErrorBody>().await {
                Ok(body) => body.message.into_owned(),
                Err(_) => status.canonical_reason().unwrap_or("Request failed").to_string(),
            };
            return Err(ClientError::Api { status: status.as_u16(), message });
        }
        Ok(response.json::<Envelope<T>>().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gallery_slug_is_one_encoded_segment() {
        let client = CmsClient::new("http://localhost:8080/");
        let url = client.gallery_url("a b/c?d").unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/api/galleries/a%20b%2Fc%3Fd");

        let url = client.gallery_url("nature").unwrap();
        assert_eq!(url.path(), "/api/galleries/nature");
    }

    #[test]
    fn malformed_base_url_is_reported() {
        let client = CmsClient::new("not a url");
        assert!(matches!(client.gallery_url("nature"), Err(ClientError::InvalidUrl(_))));
    }
}
