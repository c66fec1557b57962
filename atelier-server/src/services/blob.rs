//! Blob Storage
//!
//! Uploaded files go to the hosted storage service when one is configured;
//! otherwise (or when a hosted put fails) they land on the local filesystem
//! and are served from `/uploads`. Filenames are content-addressed upstream,
//! so re-uploading the same bytes is a no-op for either backend.

use std::path::PathBuf;

use async_trait::async_trait;
use reqwest::StatusCode;
use reqwest::header::CONTENT_TYPE;

use crate::core::Config;
use crate::db::{StoreError, StoreResult};

/// Blob storage backend: store bytes, get a public URL back
#[async_trait]
pub trait BlobStore: Send + Sync {
    async fn put(&self, data: &[u8], filename: &str, content_type: &str) -> StoreResult<String>;
}

/// Hosted object storage (Supabase-style REST interface)
#[derive(Debug, Clone)]
pub struct HostedBlobStore {
    client: reqwest::Client,
    base_url: String,
    bucket: String,
    service_key: String,
}

impl HostedBlobStore {
    pub fn new(base_url: &str, service_key: &str, bucket: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            bucket: bucket.to_string(),
            service_key: service_key.to_string(),
        }
    }
}

#[async_trait]
impl BlobStore for HostedBlobStore {
    async fn put(&self, data: &[u8], filename: &str, content_type: &str) -> StoreResult<String> {
        let url = format!("{}/object/{}/{}", self.base_url, self.bucket, filename);
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.service_key)
            .header(CONTENT_TYPE, content_type)
            .body(data.to_vec())
            .send()
            .await
            .map_err(|e| StoreError::Request(e.to_string()))?;

        let status = response.status();
        // 409 means this content hash is already stored, which is success
        if !status.is_success() && status != StatusCode::CONFLICT {
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::Rejected(format!("{}: {}", status, body)));
        }

        Ok(format!(
            "{}/object/public/{}/{}",
            self.base_url, self.bucket, filename
        ))
    }
}

/// Local filesystem storage, served from `{PUBLIC_URL}/uploads`
#[derive(Debug, Clone)]
pub struct LocalBlobStore {
    dir: PathBuf,
    public_url: String,
}

impl LocalBlobStore {
    pub fn new(dir: impl Into<PathBuf>, public_url: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            public_url: public_url.into(),
        }
    }
}

#[async_trait]
impl BlobStore for LocalBlobStore {
    async fn put(&self, data: &[u8], filename: &str, _content_type: &str) -> StoreResult<String> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| StoreError::Request(format!("Failed to create upload dir: {}", e)))?;

        let path = self.dir.join(filename);
        tokio::fs::write(&path, data)
            .await
            .map_err(|e| StoreError::Request(format!("Failed to write file: {}", e)))?;

        Ok(format!("{}/uploads/{}", self.public_url, filename))
    }
}

/// Blob storage with fallback
///
/// Tries the hosted backend first; any failure there degrades to the local
/// filesystem so uploads keep working when the hosted store is down.
pub struct BlobService {
    hosted: Option<HostedBlobStore>,
    local: LocalBlobStore,
}

impl BlobService {
    pub fn from_config(config: &Config) -> Self {
        let hosted = match (&config.storage_url, &config.storage_bucket) {
            (Some(url), Some(bucket)) => {
                Some(HostedBlobStore::new(url, &config.store_service_key, bucket))
            }
            _ => None,
        };

        Self {
            hosted,
            local: LocalBlobStore::new(config.upload_dir.clone(), config.public_url.clone()),
        }
    }

    pub async fn put(&self, data: &[u8], filename: &str, content_type: &str) -> StoreResult<String> {
        if let Some(hosted) = &self.hosted {
            match hosted.put(data, filename, content_type).await {
                Ok(url) => return Ok(url),
                Err(e) => {
                    tracing::warn!(error = %e, "Hosted blob upload failed; falling back to local storage");
                }
            }
        }

        self.local.put(data, filename, content_type).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_local_store_writes_and_links() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalBlobStore::new(dir.path(), "http://localhost:8000");

        let url = store
            .put(b"fake-image-bytes", "abc123.jpg", "image/jpeg")
            .await
            .unwrap();
        assert_eq!(url, "http://localhost:8000/uploads/abc123.jpg");

        let written = std::fs::read(dir.path().join("abc123.jpg")).unwrap();
        assert_eq!(written, b"fake-image-bytes");
    }

    #[tokio::test]
    async fn test_same_content_overwrites_in_place() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalBlobStore::new(dir.path(), "http://localhost:8000");

        store.put(b"bytes", "abc.jpg", "image/jpeg").await.unwrap();
        store.put(b"bytes", "abc.jpg", "image/jpeg").await.unwrap();

        let entries = std::fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(entries, 1);
    }
}
