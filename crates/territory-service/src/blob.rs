//! Blob storage backend.
//!
//! Speaks the plain blob REST surface over `reqwest`, authenticated by a SAS token
//! appended to each request URL. Blob names are the resource locators.

use async_trait::async_trait;
use entity_store::{StorageBackend, StoreError};
use reqwest::{Client, StatusCode};
use std::io;
use std::time::Duration;
use tracing::debug;

const BLOB_TYPE_HEADER: &str = "x-ms-blob-type";
const BLOCK_BLOB: &str = "BlockBlob";

/// HTTP status the blob service answered with, for anything not mapped to I/O.
#[derive(Debug, thiserror::Error)]
#[error("blob service returned {status}")]
pub struct BlobStatusError {
    pub status: StatusCode,
}

/// [`StorageBackend`] over a single blob container.
#[derive(Debug, Clone)]
pub struct BlobBackend {
    client: Client,
    container_url: String,
    sas: Option<String>,
}

impl BlobBackend {
    pub fn new(endpoint: &str, container: &str, sas: Option<String>) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(Duration::from_secs(30)).build()?;
        Ok(Self {
            client,
            container_url: format!("{}/{}", endpoint.trim_end_matches('/'), container),
            sas: sas.map(|s| s.trim_start_matches('?').to_string()),
        })
    }

    fn url(&self, locator: &str) -> String {
        let base = self.display_path(locator);
        match &self.sas {
            Some(sas) => format!("{base}?{sas}"),
            None => base,
        }
    }

    fn transport(&self, locator: &str, source: impl std::error::Error + Send + Sync + 'static) -> StoreError {
        StoreError::Transport {
            path: self.display_path(locator),
            source: Box::new(source),
        }
    }

    fn status_error(&self, locator: &str, status: StatusCode) -> StoreError {
        match status {
            StatusCode::NOT_FOUND => StoreError::io(
                self.display_path(locator),
                io::Error::new(io::ErrorKind::NotFound, "blob not found"),
            ),
            StatusCode::FORBIDDEN | StatusCode::UNAUTHORIZED => StoreError::io(
                self.display_path(locator),
                io::Error::new(io::ErrorKind::PermissionDenied, status.to_string()),
            ),
            _ => self.transport(locator, BlobStatusError { status }),
        }
    }
}

#[async_trait]
impl StorageBackend for BlobBackend {
    async fn probe(&self, locator: &str) -> Result<(), StoreError> {
        let response = self
            .client
            .head(self.url(locator))
            .send()
            .await
            .map_err(|e| self.transport(locator, e))?;
        if response.status().is_success() {
            Ok(())
        } else {
            Err(self.status_error(locator, response.status()))
        }
    }

    async fn read(&self, locator: &str) -> Result<String, StoreError> {
        debug!(blob = locator, "Downloading");
        let response = self
            .client
            .get(self.url(locator))
            .send()
            .await
            .map_err(|e| self.transport(locator, e))?;
        if !response.status().is_success() {
            return Err(self.status_error(locator, response.status()));
        }
        response.text().await.map_err(|e| self.transport(locator, e))
    }

    async fn write(&self, locator: &str, contents: &str) -> Result<(), StoreError> {
        debug!(blob = locator, bytes = contents.len(), "Uploading");
        let response = self
            .client
            .put(self.url(locator))
            .header(BLOB_TYPE_HEADER, BLOCK_BLOB)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(contents.to_string())
            .send()
            .await
            .map_err(|e| self.transport(locator, e))?;
        if response.status().is_success() {
            Ok(())
        } else {
            Err(self.status_error(locator, response.status()))
        }
    }

    /// The blob URL without its SAS token.
    fn display_path(&self, locator: &str) -> String {
        format!("{}/{}", self.container_url, locator.trim_start_matches('/'))
    }
}
