//! Shared HTTP client for the upstream services
//!
//! One `reqwest::Client` is built at startup and shared by every request.
//! Calls are made once: there is no retry, and a timeout, non-success status
//! or undecodable body all end up as `StormError::Upstream`.

use std::time::Instant;

use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};

use crate::config::UpstreamConfig;
use crate::{Result, StormError};

#[derive(Debug, Clone)]
pub struct UpstreamClient {
    client: Client,
}

impl UpstreamClient {
    /// Build the client with the configured timeout and User-Agent
    pub fn new(config: &UpstreamConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| StormError::config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self { client })
    }

    /// GET `url` with `query` and decode the JSON body.
    ///
    /// Query values are not logged; they may hold an API key.
    #[instrument(name = "upstream_get", level = "debug", skip(self, query))]
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        service: &'static str,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<T> {
        let start_time = Instant::now();

        let response = self
            .client
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|e| tag(service, e))?;

        let status = response.status();
        debug!(
            "{} responded {} in {:.3}s",
            service,
            status,
            start_time.elapsed().as_secs_f64()
        );

        if !status.is_success() {
            warn!("{} returned HTTP {}", service, status.as_u16());
            return Err(StormError::upstream(
                service,
                format!(
                    "HTTP {} {}",
                    status.as_u16(),
                    status.canonical_reason().unwrap_or("Unknown error")
                ),
            ));
        }

        response.json::<T>().await.map_err(|e| tag(service, e))
    }
}

fn tag(service: &'static str, err: reqwest::Error) -> StormError {
    match StormError::from(err) {
        StormError::Upstream { message, .. } => StormError::upstream(service, message),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StormConfig;
    use serde_json::{Value, json};
    use std::time::Duration;
    use wiremock::matchers::{header_exists, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(timeout_seconds: u32) -> UpstreamClient {
        let mut config = StormConfig::default().upstream;
        config.timeout_seconds = timeout_seconds;
        UpstreamClient::new(&config).unwrap()
    }

    #[tokio::test]
    async fn test_get_json_success() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/thing"))
            .and(query_param("zone", "DCZ001"))
            .and(header_exists("user-agent"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ok": true })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let url = format!("{}/thing", mock_server.uri());
        let body: Value = client(5)
            .get_json("test", &url, &[("zone", "DCZ001")])
            .await
            .unwrap();
        assert_eq!(body["ok"], true);
    }

    #[tokio::test]
    async fn test_error_status_is_upstream_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&mock_server)
            .await;

        let err = client(5)
            .get_json::<Value>("weather.gov", &mock_server.uri(), &[])
            .await
            .unwrap_err();
        assert!(matches!(err, StormError::Upstream { service: "weather.gov", .. }));
        assert!(err.to_string().contains("503"));
    }

    #[tokio::test]
    async fn test_malformed_body_is_upstream_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
            .mount(&mock_server)
            .await;

        let err = client(5)
            .get_json::<Value>("airnow", &mock_server.uri(), &[])
            .await
            .unwrap_err();
        assert!(matches!(err, StormError::Upstream { service: "airnow", .. }));
    }

    #[tokio::test]
    async fn test_timeout_is_upstream_error_without_key() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!([]))
                    .set_delay(Duration::from_secs(3)),
            )
            .mount(&mock_server)
            .await;

        let err = client(1)
            .get_json::<Value>("airnow", &mock_server.uri(), &[("API_KEY", "secret-123")])
            .await
            .unwrap_err();
        assert!(matches!(err, StormError::Upstream { .. }));
        assert!(!err.to_string().contains("secret-123"));
    }
}
