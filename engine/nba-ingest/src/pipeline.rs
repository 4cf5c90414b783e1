//! Fetch → transform → upload, once per invocation

use crate::config::IngestConfig;
use crate::error::UploadError;
use crate::fetcher::PlayerDataFetcher;
use crate::models::{IngestionOutcome, IngestionReport};
use crate::storage::{create_object_store, ObjectStore};
use crate::transform::to_line_delimited_json;
use crate::uploader::Uploader;
use anyhow::Result;
use chrono::Utc;
use std::sync::Arc;
use tracing::{error, info, instrument};

/// The ingestion job
pub struct IngestionPipeline {
    fetcher: PlayerDataFetcher,
    uploader: Uploader,
    glue_database: String,
}

impl IngestionPipeline {
    /// Create a pipeline writing to an existing store
    pub fn new(config: &IngestConfig, store: Arc<dyn ObjectStore>) -> Result<Self> {
        Ok(Self {
            fetcher: PlayerDataFetcher::new(config.api.clone())?,
            uploader: Uploader::new(store, &config.storage),
            glue_database: config.storage.glue_database.clone(),
        })
    }

    /// Create a pipeline with the store selected by the configuration
    pub async fn from_config(config: &IngestConfig) -> Result<Self> {
        let store = create_object_store(&config.storage).await;
        info!("Using {} object store", store.name());
        Self::new(config, store)
    }

    /// Run one ingestion. Failures are logged and reported, never returned as `Err`.
    #[instrument(skip(self), fields(key = %self.uploader.key()))]
    pub async fn run(&self) -> IngestionReport {
        let started_at = Utc::now();
        let outcome = self.ingest().await;
        let finished_at = Utc::now();

        IngestionReport {
            outcome,
            started_at,
            finished_at,
        }
    }

    async fn ingest(&self) -> IngestionOutcome {
        let records = match self.fetcher.fetch_records().await {
            Ok(records) => records,
            Err(e) => {
                error!("Error fetching NBA data: {}", e);
                return IngestionOutcome::FetchFailed(e);
            }
        };

        if records.is_empty() {
            info!("No records fetched; skipping upload");
            return IngestionOutcome::NoRecords;
        }

        let count = records.len();
        let body = match to_line_delimited_json(&records) {
            Ok(body) => body,
            Err(e) => {
                let error = UploadError::from(e);
                error!("Error uploading data to S3: {}", error);
                return IngestionOutcome::UploadFailed {
                    records: count,
                    error,
                };
            }
        };

        match self.uploader.upload(body).await {
            Ok(bytes) => {
                info!(
                    glue_database = %self.glue_database,
                    "Raw data ready for cataloging at s3://{}/{}",
                    self.uploader.bucket(),
                    self.uploader.key()
                );
                IngestionOutcome::Uploaded {
                    key: self.uploader.key().to_string(),
                    records: count,
                    bytes,
                }
            }
            Err(error) => {
                error!("Error uploading data to S3: {}", error);
                IngestionOutcome::UploadFailed {
                    records: count,
                    error,
                }
            }
        }
    }
}
