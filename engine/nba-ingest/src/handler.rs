//! Invocation entry point
//!
//! The trigger contract returns the same 200 response whatever happened
//! inside the run; the real outcome only shows up in the logs. Callers that
//! need to know use [`IngestionPipeline::run`] directly.

use crate::models::IngestionOutcome;
use crate::pipeline::IngestionPipeline;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Message carried in every response body
pub const COMPLETION_MESSAGE: &str = "Data ingestion completed successfully.";

/// Response returned to the invoker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvocationResponse {
    pub status_code: u16,

    /// JSON-encoded completion message
    pub body: String,
}

impl InvocationResponse {
    /// The fixed completion response
    pub fn completed() -> Self {
        Self {
            status_code: 200,
            body: serde_json::Value::from(COMPLETION_MESSAGE).to_string(),
        }
    }
}

/// Run one ingestion for an incoming event. The event payload is not inspected.
pub async fn handle_invocation(
    pipeline: &IngestionPipeline,
    _event: serde_json::Value,
) -> InvocationResponse {
    let report = pipeline.run().await;

    match &report.outcome {
        IngestionOutcome::Uploaded { .. } | IngestionOutcome::NoRecords => {
            info!(
                elapsed_ms = report.elapsed_ms(),
                "Ingestion finished: {}",
                report.summary()
            );
        }
        IngestionOutcome::FetchFailed(_) | IngestionOutcome::UploadFailed { .. } => {
            warn!(
                elapsed_ms = report.elapsed_ms(),
                "Ingestion finished with errors, reporting success anyway: {}",
                report.summary()
            );
        }
    }

    InvocationResponse::completed()
}
