//! HTTP client for the decision service.
//!
//! One POST per submission, no retries. The body is read as text before any
//! JSON parsing so that non-JSON error pages degrade into readable messages
//! instead of parse panics.

use reqwest::Client;
use tracing::{debug, warn};

use super::error::CoachError;
use super::types::{parse_output_body, DecisionOutput, DecisionRequest, ErrorBody};
use crate::config::CONFIG;

pub struct CoachClient {
    client: Client,
    endpoint: String,
}

impl CoachClient {
    /// Client against the configured endpoint.
    pub fn new() -> Self {
        Self::with_endpoint(CONFIG.endpoint.clone())
    }

    /// Client against an explicit endpoint (tests point this at a local mock).
    pub fn with_endpoint(endpoint: String) -> Self {
        let client = Client::builder()
            .timeout(CONFIG.request_timeout_duration())
            .build()
            .unwrap_or_else(|_| Client::new());

        Self { client, endpoint }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Submit one request and map the outcome onto the error taxonomy.
    pub async fn submit(&self, request: &DecisionRequest) -> Result<DecisionOutput, CoachError> {
        debug!(endpoint = %self.endpoint, "submitting decision request");

        let response = self
            .client
            .post(&self.endpoint)
            .header("Content-Type", "application/json")
            .json(request)
            .send()
            .await
            .map_err(|e| CoachError::network(&e))?;

        let status = response.status();
        // Text first: error bodies are not guaranteed to be JSON.
        let body = response
            .text()
            .await
            .map_err(|e| CoachError::network(&e))?;

        if !status.is_success() {
            let message = server_message(status.as_u16(), &body);
            warn!(status = status.as_u16(), %message, "decision service returned an error");
            return Err(CoachError::Server {
                status: status.as_u16(),
                message,
            });
        }

        parse_output_body(&body).ok_or_else(|| CoachError::malformed(status.as_u16(), &body))
    }
}

impl Default for CoachClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Best error message available: `body.error` (+ details) when the service
/// sent its structured shape, else `HTTP <status>`.
fn server_message(status: u16, body: &str) -> String {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(ErrorBody { error, details: Some(details) }) => format!("{}: {}", error, details),
        Ok(ErrorBody { error, details: None }) => error,
        Err(_) => format!("HTTP {}", status),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_message_prefers_structured_error() {
        assert_eq!(server_message(500, r#"{"error":"boom"}"#), "boom");
        assert_eq!(
            server_message(422, r#"{"error":"bad input","details":"decision missing"}"#),
            "bad input: decision missing"
        );
    }

    #[test]
    fn server_message_falls_back_to_status() {
        assert_eq!(server_message(502, "<html>Bad Gateway</html>"), "HTTP 502");
        assert_eq!(server_message(500, r#"{"message":"nope"}"#), "HTTP 500");
    }
}
