use crate::config::ApiConfig;
use crate::error::{json_kind, FetchError};
use crate::models::Record;
use anyhow::Context;
use reqwest::Client;
use std::time::Duration;
use tracing::info;

/// Pulls the player payload from SportsDataIO
pub struct PlayerDataFetcher {
    config: ApiConfig,
    client: Client,
}

impl PlayerDataFetcher {
    /// Create a new fetcher instance
    pub fn new(config: ApiConfig) -> anyhow::Result<Self> {
        let mut builder = Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build().context("Failed to create HTTP client")?;

        Ok(Self { config, client })
    }

    /// Fetch every player record with a single GET
    pub async fn fetch_records(&self) -> Result<Vec<Record>, FetchError> {
        let url = self.config.request_url()?;

        // The key rides in the query string, so only the path is logged
        info!(
            "Fetching NBA player data from: {}{}",
            url.origin().ascii_serialization(),
            url.path()
        );

        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            return Err(FetchError::Status(response.status()));
        }

        let body = response.bytes().await?;
        let records = parse_records(&body)?;

        info!("Fetched NBA data successfully: {} records", records.len());
        Ok(records)
    }
}

/// Parse a response body into the record collection
pub fn parse_records(body: &[u8]) -> Result<Vec<Record>, FetchError> {
    match serde_json::from_slice(body)? {
        serde_json::Value::Array(records) => Ok(records),
        other => Err(FetchError::NotAnArray(json_kind(&other))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::{
        matchers::{method, path, query_param},
        Mock, MockServer, ResponseTemplate,
    };

    fn api_config(endpoint: String) -> ApiConfig {
        ApiConfig {
            endpoint,
            api_key: "test-key".to_string(),
            timeout_secs: Some(5),
        }
    }

    #[test]
    fn test_parse_records_keeps_order() {
        let body = br#"[{"Name":"A"},{"Name":"B"},{"Name":"C"}]"#;
        let records = parse_records(body).unwrap();
        let names: Vec<_> = records.iter().map(|r| r["Name"].as_str().unwrap()).collect();
        assert_eq!(names, vec!["A", "B", "C"]);
    }

    #[test]
    fn test_parse_records_rejects_object_body() {
        let err = parse_records(br#"{"Message":"Invalid key"}"#).unwrap_err();
        assert!(matches!(err, FetchError::NotAnArray("an object")));
    }

    #[test]
    fn test_parse_records_rejects_malformed_json() {
        let err = parse_records(b"[{\"Name\":").unwrap_err();
        assert!(matches!(err, FetchError::Decode(_)));
    }

    #[tokio::test]
    async fn test_fetch_sends_key_as_query_param() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v3/nba/scores/json/Players"))
            .and(query_param("key", "test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"PlayerID": 20000439, "FirstName": "Stephen", "LastName": "Curry"},
                {"PlayerID": 20000441, "FirstName": "LeBron", "LastName": "James"}
            ])))
            .expect(1)
            .mount(&mock_server)
            .await;

        let fetcher = PlayerDataFetcher::new(api_config(format!(
            "{}/v3/nba/scores/json/Players",
            mock_server.uri()
        )))
        .unwrap();

        let records = fetcher.fetch_records().await.unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1]["LastName"], "James");
    }

    #[tokio::test]
    async fn test_fetch_non_success_status() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(401).set_body_string("Access denied"))
            .mount(&mock_server)
            .await;

        let fetcher = PlayerDataFetcher::new(api_config(mock_server.uri())).unwrap();
        let err = fetcher.fetch_records().await.unwrap_err();

        match err {
            FetchError::Status(status) => assert_eq!(status.as_u16(), 401),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_fetch_connection_refused() {
        // Nothing listens on the discard port
        let config = api_config("http://127.0.0.1:9/players".to_string());
        let fetcher = PlayerDataFetcher::new(config).unwrap();
        let err = fetcher.fetch_records().await.unwrap_err();

        assert!(matches!(err, FetchError::Request(_)));
    }

    #[tokio::test]
    async fn test_fetch_with_empty_endpoint() {
        let fetcher = PlayerDataFetcher::new(ApiConfig::default()).unwrap();
        let err = fetcher.fetch_records().await.unwrap_err();

        assert!(matches!(err, FetchError::InvalidUrl(_)));
    }
}
