//! NBA Ingest
//!
//! Fetches NBA player data from the SportsDataIO API and lands it in the data
//! lake's raw zone as a single JSON Lines object.
//!
//! The run is strictly sequential: one GET, one in-memory conversion, one
//! object write. Fetch and upload failures are logged and reported through
//! [`IngestionOutcome`]; the invocation handler still answers with its fixed
//! completion response.

pub mod config;
pub mod error;
pub mod fetcher;
pub mod handler;
pub mod logging;
pub mod models;
pub mod pipeline;
pub mod storage;
pub mod transform;
pub mod uploader;

pub use config::{IngestConfig, StorageBackend};
pub use error::{FetchError, UploadError};
pub use fetcher::PlayerDataFetcher;
pub use handler::{handle_invocation, InvocationResponse};
pub use logging::initialize_logging;
pub use models::*;
pub use pipeline::IngestionPipeline;
pub use storage::{InMemoryObjectStore, LocalObjectStore, ObjectStore, S3ObjectStore};
pub use transform::to_line_delimited_json;
pub use uploader::Uploader;
