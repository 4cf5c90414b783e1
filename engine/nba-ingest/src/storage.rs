//! Object store trait and implementations

use crate::config::{StorageBackend, StorageConfig};
use crate::error::UploadError;
use aws_sdk_s3::config::Region;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Abstract trait for the store receiving the upload artifact
#[async_trait::async_trait]
pub trait ObjectStore: Send + Sync {
    /// Write `body` as the whole content of `bucket/key`
    async fn put_object(&self, bucket: &str, key: &str, body: Vec<u8>) -> Result<(), UploadError>;

    /// Short name used in logs
    fn name(&self) -> &'static str;
}

/// Amazon S3 (or an S3-compatible endpoint)
pub struct S3ObjectStore {
    client: aws_sdk_s3::Client,
}

impl S3ObjectStore {
    /// Wrap an existing client
    pub fn new(client: aws_sdk_s3::Client) -> Self {
        Self { client }
    }

    /// Build a client from the default AWS credential chain
    pub async fn from_config(config: &StorageConfig) -> Self {
        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(Region::new(config.region.clone()));
        if let Some(endpoint) = &config.endpoint_url {
            loader = loader.endpoint_url(endpoint);
        }
        let sdk_config = loader.load().await;

        let s3_config = aws_sdk_s3::config::Builder::from(&sdk_config)
            .force_path_style(config.force_path_style)
            .build();

        Self::new(aws_sdk_s3::Client::from_conf(s3_config))
    }
}

#[async_trait::async_trait]
impl ObjectStore for S3ObjectStore {
    async fn put_object(&self, bucket: &str, key: &str, body: Vec<u8>) -> Result<(), UploadError> {
        self.client
            .put_object()
            .bucket(bucket)
            .key(key)
            .body(ByteStream::from(body))
            .send()
            .await
            .map_err(|e| UploadError::storage(bucket, key, DisplayErrorContext(&e).to_string()))?;

        Ok(())
    }

    fn name(&self) -> &'static str {
        "s3"
    }
}

/// Filesystem store laid out as `{root}/{bucket}/{key}`
pub struct LocalObjectStore {
    root: PathBuf,
}

impl LocalObjectStore {
    /// Create a new local store rooted at `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Path an object would be written to
    pub fn object_path(&self, bucket: &str, key: &str) -> PathBuf {
        let mut path = self.root.join(bucket);
        // Keys are `/`-separated regardless of platform
        for segment in key.split('/').filter(|s| !s.is_empty()) {
            path.push(segment);
        }
        path
    }
}

#[async_trait::async_trait]
impl ObjectStore for LocalObjectStore {
    async fn put_object(&self, bucket: &str, key: &str, body: Vec<u8>) -> Result<(), UploadError> {
        if key.split('/').any(|s| s == "..") {
            return Err(UploadError::storage(bucket, key, "key must not contain '..'"));
        }

        let path = self.object_path(bucket, key);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| UploadError::storage(bucket, key, e.to_string()))?;
        }

        tokio::fs::write(&path, body)
            .await
            .map_err(|e| UploadError::storage(bucket, key, e.to_string()))
    }

    fn name(&self) -> &'static str {
        "local"
    }
}

/// In-memory store, mostly for tests
#[derive(Default)]
pub struct InMemoryObjectStore {
    objects: Mutex<HashMap<(String, String), Vec<u8>>>,
    puts: AtomicUsize,
    fail_with: Option<String>,
}

impl InMemoryObjectStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store whose every write fails with `message`
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            fail_with: Some(message.into()),
            ..Self::default()
        }
    }

    /// Content of `bucket/key`, if written
    pub fn get(&self, bucket: &str, key: &str) -> Option<Vec<u8>> {
        let objects = self.objects.lock().ok()?;
        objects.get(&(bucket.to_string(), key.to_string())).cloned()
    }

    /// Number of put attempts, failed ones included
    pub fn put_count(&self) -> usize {
        self.puts.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl ObjectStore for InMemoryObjectStore {
    async fn put_object(&self, bucket: &str, key: &str, body: Vec<u8>) -> Result<(), UploadError> {
        self.puts.fetch_add(1, Ordering::SeqCst);

        if let Some(message) = &self.fail_with {
            return Err(UploadError::storage(bucket, key, message.clone()));
        }

        let mut objects =
            self.objects.lock().map_err(|e| UploadError::storage(bucket, key, e.to_string()))?;
        objects.insert((bucket.to_string(), key.to_string()), body);
        Ok(())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}

/// Build the store selected by the configuration
pub async fn create_object_store(config: &StorageConfig) -> Arc<dyn ObjectStore> {
    match config.backend {
        StorageBackend::S3 => Arc::new(S3ObjectStore::from_config(config).await),
        StorageBackend::Local => Arc::new(LocalObjectStore::new(config.local_root.clone())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_local_store_writes_nested_key() {
        let temp_dir = TempDir::new().unwrap();
        let store = LocalObjectStore::new(temp_dir.path());

        store
            .put_object(
                "sports-analytics-data-lake",
                "raw-data/nba_player_data.jsonl",
                b"{}".to_vec(),
            )
            .await
            .unwrap();

        let written = temp_dir
            .path()
            .join("sports-analytics-data-lake")
            .join("raw-data")
            .join("nba_player_data.jsonl");
        assert_eq!(std::fs::read(written).unwrap(), b"{}");
    }

    #[tokio::test]
    async fn test_local_store_overwrites() {
        let temp_dir = TempDir::new().unwrap();
        let store = LocalObjectStore::new(temp_dir.path());

        store.put_object("b", "k.jsonl", b"first".to_vec()).await.unwrap();
        store.put_object("b", "k.jsonl", b"second".to_vec()).await.unwrap();

        let written = store.object_path("b", "k.jsonl");
        assert_eq!(std::fs::read(written).unwrap(), b"second");
    }

    #[tokio::test]
    async fn test_local_store_rejects_parent_segments() {
        let temp_dir = TempDir::new().unwrap();
        let store = LocalObjectStore::new(temp_dir.path());

        let err = store.put_object("b", "../escape.jsonl", b"x".to_vec()).await.unwrap_err();
        assert!(matches!(err, UploadError::Storage { .. }));
    }

    #[tokio::test]
    async fn test_in_memory_store_round_trip() {
        let store = InMemoryObjectStore::new();
        store.put_object("b", "k", b"body".to_vec()).await.unwrap();

        assert_eq!(store.get("b", "k").unwrap(), b"body");
        assert_eq!(store.get("b", "other"), None);
        assert_eq!(store.put_count(), 1);
    }

    #[tokio::test]
    async fn test_failing_store_counts_attempts() {
        let store = InMemoryObjectStore::failing("AccessDenied");
        let err = store.put_object("b", "k", b"body".to_vec()).await.unwrap_err();

        assert_eq!(err.to_string(), "failed to write s3://b/k: AccessDenied");
        assert_eq!(store.put_count(), 1);
        assert_eq!(store.get("b", "k"), None);
    }

    #[tokio::test]
    async fn test_create_local_backend() {
        let temp_dir = TempDir::new().unwrap();
        let config = StorageConfig {
            backend: StorageBackend::Local,
            local_root: temp_dir.path().to_path_buf(),
            ..StorageConfig::default()
        };

        let store = create_object_store(&config).await;
        assert_eq!(store.name(), "local");
    }
}
