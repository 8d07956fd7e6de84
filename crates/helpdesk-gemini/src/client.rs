// SPDX-FileCopyrightText: 2026 Helpdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the Gemini `generateContent` API.
//!
//! Provides [`GeminiClient`], which handles request construction,
//! authentication, status-to-error mapping and bounded retry on transient
//! statuses.

use std::time::Duration;

use helpdesk_core::{ClassifyError, HelpdeskError};
use reqwest::StatusCode;
use reqwest::header::{HeaderMap, HeaderValue, RETRY_AFTER};
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, warn};

use crate::types::{ApiErrorResponse, GenerateContentRequest, GenerateContentResponse};

/// Default API base URL.
pub const API_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// HTTP client for Gemini API communication.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: reqwest::Client,
    api_key: SecretString,
    model: String,
    base_url: String,
    timeout: Duration,
    max_retries: u32,
    retry_delay: Duration,
}

impl GeminiClient {
    /// Creates a client for `model` with a per-request `timeout`.
    pub fn new(api_key: SecretString, model: String, timeout: Duration) -> Result<Self, HelpdeskError> {
        let mut headers = HeaderMap::new();
        headers.insert("content-type", HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| HelpdeskError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key,
            model,
            base_url: API_BASE_URL.to_string(),
            timeout,
            max_retries: 0,
            retry_delay: Duration::from_secs(1),
        })
    }

    /// Overrides the base URL (self-hosted proxies, tests).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Number of retries on transient statuses (429, 500, 502, 503, 504).
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Full `generateContent` URL for the configured model.
    pub fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }

    /// Sends one `generateContent` request.
    pub async fn generate_content(
        &self,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, ClassifyError> {
        let api_key = HeaderValue::from_str(self.api_key.expose_secret())
            .map(|mut v| {
                v.set_sensitive(true);
                v
            })
            .map_err(|e| ClassifyError::Transient {
                message: format!("invalid API key header value: {e}"),
            })?;

        let url = self.endpoint();
        let mut attempt = 0;
        let mut wait = Duration::ZERO;
        loop {
            if attempt > 0 {
                warn!(
                    attempt,
                    wait_ms = wait.as_millis() as u64,
                    "retrying Gemini request after transient error"
                );
                tokio::time::sleep(wait).await;
            }

            let result = self
                .client
                .post(&url)
                .header("x-goog-api-key", api_key.clone())
                .json(request)
                .send()
                .await;

            let response = match result {
                Ok(response) => response,
                Err(e) if e.is_timeout() => {
                    return Err(ClassifyError::Timeout {
                        duration: self.timeout,
                    });
                }
                Err(e) if attempt < self.max_retries => {
                    warn!(error = %e, "Gemini request failed, will retry");
                    attempt += 1;
                    wait = self.backoff(attempt);
                    continue;
                }
                Err(e) => {
                    return Err(ClassifyError::Transient {
                        message: format!("HTTP request failed: {e}"),
                    });
                }
            };

            let status = response.status();
            debug!(status = %status, attempt, model = %self.model, "Gemini response received");

            if status.is_success() {
                let body = response.text().await.map_err(|e| ClassifyError::Transient {
                    message: format!("failed to read response body: {e}"),
                })?;
                return serde_json::from_str(&body).map_err(|_| ClassifyError::Malformed {
                    output: body,
                });
            }

            if is_transient_error(status) && attempt < self.max_retries {
                let server_wait = retry_after(response.headers())
                    .filter(|_| status == StatusCode::TOO_MANY_REQUESTS);
                let body = response.text().await.unwrap_or_default();
                warn!(status = %status, body = %body, "transient error, will retry");
                attempt += 1;
                wait = server_wait.unwrap_or_else(|| self.backoff(attempt));
                continue;
            }

            let retry_after = retry_after(response.headers());
            let body = response.text().await.unwrap_or_default();
            return Err(status_error(status, &body, retry_after));
        }
    }
}

impl GeminiClient {
    /// Linear backoff: the n-th retry waits `n * retry_delay`.
    fn backoff(&self, attempt: u32) -> Duration {
        self.retry_delay * attempt
    }
}

/// Returns true for HTTP status codes worth retrying.
fn is_transient_error(status: StatusCode) -> bool {
    matches!(status.as_u16(), 429 | 500 | 502 | 503 | 504)
}

fn retry_after(headers: &HeaderMap) -> Option<Duration> {
    headers
        .get(RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
        .map(Duration::from_secs)
}

/// Maps a non-success response to a classification error.
fn status_error(status: StatusCode, body: &str, retry_after: Option<Duration>) -> ClassifyError {
    if status == StatusCode::TOO_MANY_REQUESTS {
        return ClassifyError::RateLimited { retry_after };
    }
    let message = match serde_json::from_str::<ApiErrorResponse>(body) {
        Ok(api_err) => format!(
            "Gemini API error ({} {}): {}",
            api_err.error.code, api_err.error.status, api_err.error.message
        ),
        Err(_) => format!("API returned {status}: {body}"),
    };
    ClassifyError::Transient { message }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Content, GenerationConfig};
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const MODEL_PATH: &str = "/v1beta/models/gemini-2.5-flash:generateContent";

    fn test_client(base_url: &str) -> GeminiClient {
        GeminiClient::new(
            SecretString::from("test-api-key".to_string()),
            "gemini-2.5-flash".into(),
            Duration::from_secs(5),
        )
        .unwrap()
        .with_base_url(base_url)
        .with_retry_delay(Duration::from_millis(10))
    }

    fn test_request() -> GenerateContentRequest {
        GenerateContentRequest {
            contents: vec![Content::user("Classify: hours?")],
            system_instruction: None,
            generation_config: GenerationConfig {
                temperature: 0.0,
                max_output_tokens: 10,
            },
        }
    }

    fn success_body(text: &str) -> serde_json::Value {
        serde_json::json!({
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": text}]},
                "finishReason": "STOP"
            }],
            "usageMetadata": {"promptTokenCount": 120, "candidatesTokenCount": 2, "totalTokenCount": 122}
        })
    }

    #[tokio::test]
    async fn generate_content_success() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(MODEL_PATH))
            .and(header("x-goog-api-key", "test-api-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(success_body("faq")))
            .mount(&server)
            .await;

        let response = test_client(&server.uri())
            .generate_content(&test_request())
            .await
            .unwrap();
        assert_eq!(response.first_text(), Some("faq"));
        assert_eq!(response.usage_metadata.unwrap().prompt_token_count, 120);
    }

    #[tokio::test]
    async fn rate_limit_maps_to_rate_limited() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "7"))
            .expect(1)
            .mount(&server)
            .await;

        let err = test_client(&server.uri())
            .generate_content(&test_request())
            .await
            .unwrap_err();
        assert_eq!(
            err,
            ClassifyError::RateLimited {
                retry_after: Some(Duration::from_secs(7))
            }
        );
    }

    #[tokio::test]
    async fn retries_transient_status_when_configured() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(success_body("order_status")))
            .mount(&server)
            .await;

        let response = test_client(&server.uri())
            .with_max_retries(1)
            .generate_content(&test_request())
            .await
            .unwrap();
        assert_eq!(response.first_text(), Some("order_status"));
    }

    #[tokio::test]
    async fn retried_rate_limit_waits_for_retry_after() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "1"))
            .up_to_n_times(1)
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(success_body("faq")))
            .expect(1)
            .mount(&server)
            .await;

        let started = std::time::Instant::now();
        let response = test_client(&server.uri())
            .with_max_retries(1)
            .generate_content(&test_request())
            .await
            .unwrap();
        assert_eq!(response.first_text(), Some("faq"));
        assert!(started.elapsed() >= Duration::from_secs(1));
    }

    #[tokio::test]
    async fn retry_delay_grows_with_each_attempt() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503))
            .up_to_n_times(2)
            .expect(2)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(success_body("faq")))
            .expect(1)
            .mount(&server)
            .await;

        let started = std::time::Instant::now();
        test_client(&server.uri())
            .with_max_retries(2)
            .with_retry_delay(Duration::from_millis(200))
            .generate_content(&test_request())
            .await
            .unwrap();
        // 200ms before the first retry, 400ms before the second.
        assert!(started.elapsed() >= Duration::from_millis(600));
    }

    #[test]
    fn backoff_is_linear_in_attempts() {
        let client = test_client("http://localhost").with_retry_delay(Duration::from_millis(250));
        assert_eq!(client.backoff(1), Duration::from_millis(250));
        assert_eq!(client.backoff(3), Duration::from_millis(750));
    }

    #[tokio::test]
    async fn server_error_is_transient_without_retry_by_default() {
        let server = MockServer::start().await;
        let error_body = serde_json::json!({
            "error": {"code": 503, "message": "The model is overloaded.", "status": "UNAVAILABLE"}
        });
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503).set_body_json(&error_body))
            .expect(1)
            .mount(&server)
            .await;

        let err = test_client(&server.uri())
            .generate_content(&test_request())
            .await
            .unwrap_err();
        match err {
            ClassifyError::Transient { message } => {
                assert!(message.contains("UNAVAILABLE"), "got: {message}")
            }
            other => panic!("expected transient, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn bad_request_carries_api_error_text() {
        let server = MockServer::start().await;
        let error_body = serde_json::json!({
            "error": {"code": 400, "message": "API key not valid.", "status": "INVALID_ARGUMENT"}
        });
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(400).set_body_json(&error_body))
            .mount(&server)
            .await;

        let err = test_client(&server.uri())
            .generate_content(&test_request())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("API key not valid"), "got: {err}");
    }

    #[tokio::test]
    async fn undecodable_body_is_malformed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let err = test_client(&server.uri())
            .generate_content(&test_request())
            .await
            .unwrap_err();
        assert!(matches!(err, ClassifyError::Malformed { .. }));
    }

    #[tokio::test]
    async fn connection_refused_is_transient() {
        let err = test_client("http://127.0.0.1:9")
            .generate_content(&test_request())
            .await
            .unwrap_err();
        assert!(matches!(err, ClassifyError::Transient { .. }), "got: {err:?}");
    }

    #[test]
    fn endpoint_joins_base_and_model() {
        let client = test_client("http://localhost:8080/");
        assert_eq!(
            client.endpoint(),
            "http://localhost:8080/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }
}
