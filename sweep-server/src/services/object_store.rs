//! Object store client
//!
//! Uploads normalized JPEG images to the external CDN and returns a stable
//! public URL. Keys are content-addressed (SHA256 of the bytes), so retrying
//! the same upload lands on the same object — orphaned objects from aborted
//! requests are harmless and swept out-of-band.

use async_trait::async_trait;
use sha2::{Digest, Sha256};
use std::time::Duration;
use thiserror::Error;

/// Folder prefix under which all report images live
const IMAGE_FOLDER: &str = "streetsweep";

/// A stored object reference
#[derive(Debug, Clone)]
pub struct StoredImage {
    /// Object key within the store
    pub key: String,
    /// Stable public URL
    pub url: String,
}

/// Object store errors (retryable)
#[derive(Debug, Error)]
pub enum ObjectStoreError {
    #[error("upload request failed: {0}")]
    Request(String),

    #[error("object store returned status {0}")]
    Status(u16),
}

/// Seam for the external image store; the HTTP client below is the
/// production implementation, tests supply in-memory fakes.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn put_image(&self, bytes: &[u8]) -> Result<StoredImage, ObjectStoreError>;
}

/// CDN-backed object store client
pub struct HttpObjectStore {
    client: reqwest::Client,
    base_url: String,
    token: String,
}

impl HttpObjectStore {
    pub fn new(
        base_url: String,
        token: String,
        timeout: Duration,
    ) -> Result<Self, ObjectStoreError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ObjectStoreError::Request(e.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        })
    }
}

#[async_trait]
impl ObjectStore for HttpObjectStore {
    async fn put_image(&self, bytes: &[u8]) -> Result<StoredImage, ObjectStoreError> {
        let key = format!("{}.jpg", hex::encode(Sha256::digest(bytes)));
        let url = format!("{}/{}/{}", self.base_url, IMAGE_FOLDER, key);

        let resp = self
            .client
            .put(&url)
            .bearer_auth(&self.token)
            .header(reqwest::header::CONTENT_TYPE, "image/jpeg")
            .body(bytes.to_vec())
            .send()
            .await
            .map_err(|e| ObjectStoreError::Request(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(ObjectStoreError::Status(resp.status().as_u16()));
        }

        tracing::debug!(key = %key, size = bytes.len(), "Image uploaded to object store");
        Ok(StoredImage { key, url })
    }
}
