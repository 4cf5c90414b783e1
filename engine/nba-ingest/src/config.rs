//! Configuration for the NBA ingestion job
//!
//! Values are layered: built-in defaults, then an optional TOML file, then
//! `NBA_INGEST_*` environment variables (nested with `__`), and finally the
//! `NBA_ENDPOINT` / `NBA_API_KEY` variables the job has always been deployed with.

use crate::error::FetchError;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use url::Url;

/// Environment variable holding the SportsDataIO key
pub const API_KEY_ENV: &str = "NBA_API_KEY";

/// Environment variable holding the SportsDataIO endpoint
pub const ENDPOINT_ENV: &str = "NBA_ENDPOINT";

/// Prefix for every other environment override
pub const ENV_PREFIX: &str = "NBA_INGEST";

/// Configuration for the ingestion job
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestConfig {
    /// Upstream API configuration
    pub api: ApiConfig,

    /// Where the upload artifact lands
    pub storage: StorageConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// SportsDataIO API configuration
#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL of the player endpoint
    pub endpoint: String,

    /// API key, sent as the `key` query parameter
    pub api_key: String,

    /// Request timeout; the HTTP client default applies when unset
    pub timeout_secs: Option<u64>,
}

/// Object storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Which store receives the artifact
    pub backend: StorageBackend,

    /// AWS region of the bucket
    pub region: String,

    /// Target bucket
    pub bucket: String,

    /// Object key of the JSON Lines artifact
    pub object_key: String,

    /// Catalog database the raw data is crawled into downstream
    pub glue_database: String,

    /// Custom S3 endpoint (MinIO, LocalStack)
    pub endpoint_url: Option<String>,

    /// Use path-style addressing, needed by most S3-compatible stores
    pub force_path_style: bool,

    /// Root directory for the local backend
    pub local_root: PathBuf,
}

/// Storage backend selection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    S3,
    Local,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Output format
    pub format: LogFormat,
}

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
    Compact,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::S3,
            region: "us-east-1".to_string(),
            bucket: "sports-analytics-data-lake".to_string(),
            object_key: "raw-data/nba_player_data.jsonl".to_string(),
            glue_database: "glue_nba_data_lake".to_string(),
            endpoint_url: None,
            force_path_style: false,
            local_root: PathBuf::from("./data-lake"),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

impl fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let key = if self.api_key.is_empty() {
            "<unset>"
        } else {
            "<redacted>"
        };
        f.debug_struct("ApiConfig")
            .field("endpoint", &self.endpoint)
            .field("api_key", &key)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl ApiConfig {
    /// Build `{endpoint}?key={api_key}`
    pub fn request_url(&self) -> std::result::Result<Url, FetchError> {
        let mut url = Url::parse(&self.endpoint)?;
        url.query_pairs_mut().append_pair("key", &self.api_key);
        Ok(url)
    }

    /// Names of the required environment variables that ended up empty
    pub fn missing_settings(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.endpoint.is_empty() {
            missing.push(ENDPOINT_ENV);
        }
        if self.api_key.is_empty() {
            missing.push(API_KEY_ENV);
        }
        missing
    }
}

impl IngestConfig {
    /// Load configuration from an optional file and the process environment
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with_env(path, std::env::vars().collect())
    }

    /// Load configuration from an optional file and an explicit environment map
    pub fn load_with_env(path: Option<&Path>, env: HashMap<String, String>) -> Result<Self> {
        let mut builder = Config::builder();

        if let Some(path) = path {
            tracing::debug!("Loading configuration from file: {:?}", path);
            builder = builder.add_source(File::from(path).required(true));
        }

        let endpoint = env.get(ENDPOINT_ENV).cloned();
        let api_key = env.get(API_KEY_ENV).cloned();

        let config: Self = builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true)
                    .source(Some(env)),
            )
            .set_override_option("api.endpoint", endpoint)?
            .set_override_option("api.api_key", api_key)?
            .build()
            .context("Failed to assemble configuration")?
            .try_deserialize()
            .context("Failed to parse configuration")?;

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.storage.bucket.is_empty() {
            return Err(anyhow::anyhow!("Storage bucket must not be empty"));
        }

        if self.storage.object_key.is_empty() {
            return Err(anyhow::anyhow!("Storage object key must not be empty"));
        }

        if self.storage.backend == StorageBackend::S3 && self.storage.region.is_empty() {
            return Err(anyhow::anyhow!("S3 region must not be empty"));
        }

        match self.logging.level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => return Err(anyhow::anyhow!("Invalid log level: {}", self.logging.level)),
        }

        Ok(())
    }
}
