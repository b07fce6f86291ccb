//! Object storage for uploaded datasets.
//!
//! The trait keeps the domain layer independent of any one storage backend;
//! the shipped implementation talks to the Google Cloud Storage JSON API.

use crate::error::{DomainErrorKind, Error, ExternalErrorKind, InternalErrorKind};
use async_trait::async_trait;
use log::*;
use service::config::Config;

/// Storage backend for uploaded dataset files.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Stores an object and returns the URL under which it is reachable.
    async fn put(
        &self,
        object_name: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> Result<String, Error>;

    /// Fetches an object's raw bytes.
    async fn get(&self, object_name: &str) -> Result<Vec<u8>, Error>;

    /// Removes an object. Deleting an object that is already gone is an error.
    async fn delete(&self, object_name: &str) -> Result<(), Error>;

    /// The public URL for an object, without consulting the backend.
    fn public_url(&self, object_name: &str) -> String;
}

/// Google Cloud Storage client using the JSON API with a static bearer token.
pub struct GcsStore {
    client: reqwest::Client,
    base_url: String,
    bucket: String,
}

impl GcsStore {
    pub fn new(config: &Config) -> Result<Self, Error> {
        Self::with_base_url(config, "https://storage.googleapis.com".to_string())
    }

    /// Override the API host. Used by tests to point at a mock server.
    pub fn with_base_url(config: &Config, base_url: String) -> Result<Self, Error> {
        let bucket = config.gcs_bucket().ok_or_else(|| {
            warn!("Failed to get GCS bucket from config");
            Error::new(DomainErrorKind::Internal(InternalErrorKind::Config))
        })?;

        Ok(Self {
            client: build_client(config)?,
            base_url,
            bucket,
        })
    }
}

#[async_trait]
impl ObjectStore for GcsStore {
    async fn put(
        &self,
        object_name: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> Result<String, Error> {
        let url = format!(
            "{}/upload/storage/v1/b/{}/o?uploadType=media&name={}",
            self.base_url,
            self.bucket,
            urlencoding::encode(object_name)
        );

        debug!("Storing object {} ({} bytes)", object_name, data.len());

        let response = self
            .client
            .post(&url)
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(data)
            .send()
            .await?;

        if !response.status().is_success() {
            warn!("Object upload failed with status {}", response.status());
            return Err(upstream_error());
        }

        Ok(self.public_url(object_name))
    }

    async fn get(&self, object_name: &str) -> Result<Vec<u8>, Error> {
        let url = format!(
            "{}/storage/v1/b/{}/o/{}?alt=media",
            self.base_url,
            self.bucket,
            urlencoding::encode(object_name)
        );

        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            warn!("Object download failed with status {}", response.status());
            return Err(upstream_error());
        }

        Ok(response.bytes().await?.to_vec())
    }

    async fn delete(&self, object_name: &str) -> Result<(), Error> {
        let url = format!(
            "{}/storage/v1/b/{}/o/{}",
            self.base_url,
            self.bucket,
            urlencoding::encode(object_name)
        );

        let response = self.client.delete(&url).send().await?;

        if !response.status().is_success() {
            warn!("Object delete failed with status {}", response.status());
            return Err(upstream_error());
        }

        Ok(())
    }

    fn public_url(&self, object_name: &str) -> String {
        format!(
            "https://storage.googleapis.com/{}/{}",
            self.bucket, object_name
        )
    }
}

fn upstream_error() -> Error {
    Error::new(DomainErrorKind::External(ExternalErrorKind::Upstream))
}

fn build_client(config: &Config) -> Result<reqwest::Client, Error> {
    let access_token = config.google_access_token().ok_or_else(|| {
        warn!("Failed to get Google access token from config");
        Error::new(DomainErrorKind::Internal(InternalErrorKind::Config))
    })?;

    let mut headers = reqwest::header::HeaderMap::new();
    let mut auth_value = reqwest::header::HeaderValue::from_str(&format!(
        "Bearer {}",
        access_token
    ))
    .map_err(|err| {
        warn!("Failed to create auth header value: {err:?}");
        Error {
            source: Some(Box::new(err)),
            error_kind: DomainErrorKind::Internal(InternalErrorKind::Other(
                "Failed to create authorization header value".to_string(),
            )),
        }
    })?;
    auth_value.set_sensitive(true);
    headers.insert(reqwest::header::AUTHORIZATION, auth_value);

    Ok(reqwest::Client::builder()
        .use_rustls_tls()
        .default_headers(headers)
        .build()?)
}
