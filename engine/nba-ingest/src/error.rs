//! Error types for the ingestion pipeline

use thiserror::Error;

/// Errors raised while pulling records from the upstream API
#[derive(Error, Debug)]
pub enum FetchError {
    /// Endpoint (plus key) did not form a valid URL
    #[error("invalid endpoint URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Connection, TLS or body read failure
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Upstream answered with a non-2xx status
    #[error("API request failed with status: {0}")]
    Status(reqwest::StatusCode),

    /// Body was not valid JSON
    #[error("failed to parse response body as JSON: {0}")]
    Decode(#[from] serde_json::Error),

    /// Body parsed, but the top-level value was not an array
    #[error("expected a JSON array of records, got {0}")]
    NotAnArray(&'static str),
}

/// Errors raised while writing the upload artifact
#[derive(Error, Debug)]
pub enum UploadError {
    /// Records could not be serialized to JSON Lines
    #[error("failed to serialize records: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The object store rejected or failed the write
    #[error("failed to write s3://{bucket}/{key}: {message}")]
    Storage {
        bucket: String,
        key: String,
        message: String,
    },
}

impl UploadError {
    /// Create a new storage error for the given location
    pub fn storage(bucket: &str, key: &str, message: impl Into<String>) -> Self {
        Self::Storage {
            bucket: bucket.to_string(),
            key: key.to_string(),
            message: message.into(),
        }
    }
}

/// Short name of a JSON value's type, used in error messages
pub(crate) fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}
