use crate::error::{FetchError, UploadError};
use chrono::{DateTime, Utc};

/// One player as returned by SportsDataIO. Passed through untouched.
pub type Record = serde_json::Value;

/// What a single ingestion run ended up doing
#[derive(Debug)]
pub enum IngestionOutcome {
    /// Artifact written
    Uploaded { key: String, records: usize, bytes: usize },

    /// Upstream returned an empty array; nothing was written
    NoRecords,

    /// Fetch failed; treated as zero records, nothing was written
    FetchFailed(FetchError),

    /// Records were fetched but the write failed
    UploadFailed { records: usize, error: UploadError },
}

impl IngestionOutcome {
    /// True when nothing went wrong (an empty upstream is not an error)
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Uploaded { .. } | Self::NoRecords)
    }
}

/// Result of a run plus timing
#[derive(Debug)]
pub struct IngestionReport {
    pub outcome: IngestionOutcome,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl IngestionReport {
    /// Wall-clock duration of the run in milliseconds
    pub fn elapsed_ms(&self) -> i64 {
        (self.finished_at - self.started_at).num_milliseconds()
    }

    /// One-line human readable summary
    pub fn summary(&self) -> String {
        match &self.outcome {
            IngestionOutcome::Uploaded { key, records, bytes } => {
                format!("uploaded {} records ({} bytes) to {}", records, bytes, key)
            }
            IngestionOutcome::NoRecords => "no records fetched; upload skipped".to_string(),
            IngestionOutcome::FetchFailed(e) => format!("fetch failed: {}", e),
            IngestionOutcome::UploadFailed { records, error } => {
                format!("upload of {} records failed: {}", records, error)
            }
        }
    }
}
