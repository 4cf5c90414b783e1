use crate::config::StorageConfig;
use crate::error::UploadError;
use crate::storage::ObjectStore;
use std::sync::Arc;
use tracing::info;

/// Writes the JSON Lines artifact to its fixed location
pub struct Uploader {
    store: Arc<dyn ObjectStore>,
    bucket: String,
    key: String,
}

impl Uploader {
    pub fn new(store: Arc<dyn ObjectStore>, config: &StorageConfig) -> Self {
        Self {
            store,
            bucket: config.bucket.clone(),
            key: config.object_key.clone(),
        }
    }

    /// Key the artifact is written under
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// Write `body` as the whole object
    pub async fn upload(&self, body: String) -> Result<usize, UploadError> {
        let bytes = body.len();
        self.store
            .put_object(&self.bucket, &self.key, body.into_bytes())
            .await?;

        info!(
            store = self.store.name(),
            bucket = %self.bucket,
            bytes,
            "Uploaded data to S3: {}",
            self.key
        );
        Ok(bytes)
    }
}
