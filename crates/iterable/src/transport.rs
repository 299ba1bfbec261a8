//! HTTP transport for delivering payloads.

use crate::config::Config;
use crate::types::{ApiResponse, Endpoint, EventPayload};
use crate::Error;
use tracing::{debug, warn};

/// HTTP transport for sending payloads to the Iterable API.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    /// Create a new HTTP transport.
    pub fn new(config: &Config) -> Result<Self, Error> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()?;

        let base_url = format!("{}/api", config.api_host());

        Ok(Self { client, base_url })
    }

    fn url(&self, endpoint: Endpoint) -> String {
        format!("{}/{}", self.base_url, endpoint.as_str())
    }

    /// Send a payload to its endpoint.
    pub async fn send(&self, payload: &EventPayload) -> Result<ApiResponse, Error> {
        let url = self.url(payload.endpoint);

        debug!(url = %url, field_count = payload.body.len(), "sending payload");

        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(&payload.body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_else(|_| "Unknown error".into());
            warn!(status = %status, body = %body, "API request failed");
            return Err(Error::Api {
                status: status.as_u16(),
                body,
            });
        }

        let text = response.text().await?;
        let result = parse_response(&text);

        debug!(endpoint = %payload.endpoint, code = ?result.code, "payload sent successfully");

        Ok(result)
    }
}

/// Parse a success body; delivery already succeeded, so unparseable bodies
/// yield an empty response.
fn parse_response(text: &str) -> ApiResponse {
    if text.trim().is_empty() {
        return ApiResponse::default();
    }
    serde_json::from_str(text).unwrap_or_else(|e| {
        debug!(error = %e, "non-JSON success body");
        ApiResponse::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_response_is_lenient() {
        assert!(parse_response("").code.is_none());
        assert!(parse_response("OK").code.is_none());
        assert!(parse_response("[1, 2]").msg.is_none());
        assert_eq!(
            parse_response(r#"{"msg": "done", "code": "Success"}"#)
                .code
                .as_deref(),
            Some("Success")
        );
    }

    #[test]
    fn test_url_construction() {
        let config = Config {
            api_host: "https://example.com".into(),
            ..Config::default()
        };

        let transport = HttpTransport::new(&config).unwrap();

        assert_eq!(
            transport.url(Endpoint::RegisterDeviceToken),
            "https://example.com/api/users/registerDeviceToken"
        );
        assert_eq!(
            transport.url(Endpoint::Track),
            "https://example.com/api/events/track"
        );
    }
}
