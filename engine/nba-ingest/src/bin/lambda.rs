use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use nba_ingest::config::LogFormat;
use nba_ingest::logging::initialize_logging_with;
use nba_ingest::{handle_invocation, IngestConfig, IngestionPipeline, InvocationResponse};
use serde_json::Value;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<(), Error> {
    let mut config = IngestConfig::load(None)?;
    // CloudWatch wants one JSON object per line unless told otherwise
    if std::env::var("NBA_INGEST_LOGGING__FORMAT").is_err() {
        config.logging.format = LogFormat::Json;
    }
    initialize_logging_with(&config.logging, false)?;

    for name in config.api.missing_settings() {
        warn!("{} is not set; the fetch will fail", name);
    }

    let pipeline = IngestionPipeline::from_config(&config).await?;
    let pipeline = &pipeline;

    run(service_fn(move |event: LambdaEvent<Value>| async move {
        info!(request_id = %event.context.request_id, "Invocation received");
        let response = handle_invocation(pipeline, event.payload).await;
        Ok::<InvocationResponse, Error>(response)
    }))
    .await
}
