/// Backend REST API client
///
/// This module handles:
/// - Bearer authentication via a pluggable token provider (auth.rs)
/// - Error taxonomy for transport, decode and upload failures (error.rs)
/// - Request/response data types (types.rs)
///
/// Endpoints, relative to the configured base URL:
/// - `GET  /directories`                         list directory names
/// - `GET  /directories/{name}`                  list file names in a directory
/// - `POST /directories/`                        create a directory
/// - `POST /UploadFile?directory_name={name}`    multipart upload, field `file`

pub mod auth;
pub mod error;
pub mod types;

pub use auth::{StaticToken, TokenProvider};
pub use error::ApiError;
pub use types::{Acknowledgment, LocalFile};

use async_trait::async_trait;
use reqwest::header::{HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::multipart::{Form, Part};
use reqwest::{Method, Url};
use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::config::Config;

/// The four operations the view controller needs from a backend
#[async_trait]
pub trait FileBackend: Send + Sync {
    async fn list_directories(&self) -> Result<Vec<String>, ApiError>;

    async fn list_files(&self, directory: &str) -> Result<Vec<String>, ApiError>;

    async fn create_directory(&self, name: &str) -> Result<Acknowledgment, ApiError>;

    async fn upload_file(&self, directory: &str, file: &LocalFile)
        -> Result<Acknowledgment, ApiError>;
}

/// HTTP client bound to one backend base URL
#[derive(Clone)]
pub struct ApiClient {
    base_url: Url,
    http: reqwest::Client,
    credentials: Arc<dyn TokenProvider>,
}

impl ApiClient {
    pub fn new(config: &Config, credentials: Arc<dyn TokenProvider>) -> Result<Self, ApiError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }

        Ok(ApiClient {
            base_url: config.api_base_url.clone(),
            http: builder.build()?,
            credentials,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Append path segments to the base URL, percent-encoding each one.
    /// An empty final segment produces a trailing slash.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // http(s) base URLs always have a path, so this cannot fail
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn authorization(&self) -> Result<HeaderValue, ApiError> {
        let token = self.credentials.bearer_token().await?;
        let mut value = HeaderValue::from_str(&format!("Bearer {}", token.expose_secret()))
            .map_err(|e| ApiError::Credential(format!("token is not a valid header value: {}", e)))?;
        value.set_sensitive(true);
        Ok(value)
    }

    /// Send a JSON request and decode the JSON response body.
    ///
    /// The status code is not inspected: error bodies from this backend are
    /// plain text, so they fail to decode and surface as `ApiError::Decode`
    /// carrying the status.
    async fn call_json<T: DeserializeOwned>(
        &self,
        method: Method,
        url: Url,
        payload: Option<serde_json::Value>,
    ) -> Result<T, ApiError> {
        debug!(%method, %url, payload = ?payload, "calling API");

        let mut request = self
            .http
            .request(method, url)
            .header(AUTHORIZATION, self.authorization().await?)
            .header(CONTENT_TYPE, "application/json");
        if let Some(payload) = &payload {
            request = request.json(payload);
        }

        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;
        debug!(%status, bytes = body.len(), "API responded");

        serde_json::from_str(&body).map_err(|source| ApiError::Decode { status, source })
    }
}

#[async_trait]
impl FileBackend for ApiClient {
    async fn list_directories(&self) -> Result<Vec<String>, ApiError> {
        let url = self.endpoint(&["directories"]);
        let directories: Option<Vec<String>> = self.call_json(Method::GET, url, None).await?;
        Ok(directories.unwrap_or_default())
    }

    async fn list_files(&self, directory: &str) -> Result<Vec<String>, ApiError> {
        if directory.trim().is_empty() {
            return Err(ApiError::EmptyName);
        }
        let url = self.endpoint(&["directories", directory]);
        let files: Option<Vec<String>> = self.call_json(Method::GET, url, None).await?;
        Ok(files.unwrap_or_default())
    }

    async fn create_directory(&self, name: &str) -> Result<Acknowledgment, ApiError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ApiError::EmptyName);
        }
        let url = self.endpoint(&["directories", ""]);
        let payload = serde_json::json!({ "directory_name": name });
        self.call_json(Method::POST, url, Some(payload)).await
    }

    async fn upload_file(
        &self,
        directory: &str,
        file: &LocalFile,
    ) -> Result<Acknowledgment, ApiError> {
        if directory.trim().is_empty() {
            return Err(ApiError::EmptyName);
        }

        let content = tokio::fs::read(&file.path).await.map_err(|source| {
            warn!(path = %file.path.display(), error = %source, "could not read upload source");
            ApiError::LocalFile {
                path: file.path.clone(),
                source,
            }
        })?;

        let mut url = self.endpoint(&["UploadFile"]);
        url.query_pairs_mut().append_pair("directory_name", directory);
        info!(%url, file = %file.name, bytes = content.len(), "📤 Uploading file");

        // Backend stores this as the blob's content type
        let mime = mime_guess::from_path(&file.path).first_or_octet_stream();
        let part = Part::bytes(content)
            .file_name(file.name.clone())
            .mime_str(mime.essence_str())?;
        let form = Form::new().part("file", part);

        let response = self
            .http
            .post(url)
            .header(AUTHORIZATION, self.authorization().await?)
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            warn!(%status, file = %file.name, "upload rejected by backend");
            return Err(ApiError::UploadRejected { status });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|source| ApiError::Decode { status, source })
    }
}
