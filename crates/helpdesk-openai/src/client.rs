// SPDX-FileCopyrightText: 2026 Helpdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for Azure OpenAI chat completions.

use std::time::Duration;

use helpdesk_core::{ClassifyError, HelpdeskError};
use reqwest::StatusCode;
use reqwest::header::{HeaderMap, HeaderValue, RETRY_AFTER};
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, warn};

use crate::types::{ApiErrorResponse, ChatRequest, ChatResponse};

/// Outcome of a single HTTP attempt.
enum Attempt {
    Done(Result<ChatResponse, ClassifyError>),
    Retryable(ClassifyError),
}

/// HTTP client for one Azure OpenAI deployment.
#[derive(Debug, Clone)]
pub struct AzureOpenAiClient {
    client: reqwest::Client,
    api_key: SecretString,
    endpoint: String,
    deployment: String,
    api_version: String,
    timeout: Duration,
    max_retries: u32,
    retry_delay: Duration,
}

impl AzureOpenAiClient {
    /// Creates a client for `deployment` on the resource at `endpoint`.
    pub fn new(
        api_key: SecretString,
        endpoint: String,
        deployment: String,
        api_version: String,
        timeout: Duration,
    ) -> Result<Self, HelpdeskError> {
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
            endpoint,
            deployment,
            api_version,
            timeout,
            max_retries: 0,
            retry_delay: Duration::from_secs(1),
        })
    }

    /// Number of retries on transient statuses and connection errors.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    pub fn deployment(&self) -> &str {
        &self.deployment
    }

    /// Chat completions URL for the deployment.
    pub fn url(&self) -> String {
        format!(
            "{}/openai/deployments/{}/chat/completions?api-version={}",
            self.endpoint.trim_end_matches('/'),
            self.deployment,
            self.api_version
        )
    }

    /// Sends a chat completion request, retrying transient failures up to
    /// the configured count.
    pub async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse, ClassifyError> {
        let mut attempt = 0;
        loop {
            match self.send_once(request).await {
                Attempt::Done(result) => return result,
                Attempt::Retryable(err) if attempt < self.max_retries => {
                    attempt += 1;
                    let wait = match &err {
                        ClassifyError::RateLimited {
                            retry_after: Some(retry_after),
                        } => *retry_after,
                        _ => self.backoff(attempt),
                    };
                    warn!(
                        attempt,
                        wait_ms = wait.as_millis() as u64,
                        error = %err,
                        "retrying Azure OpenAI request"
                    );
                    tokio::time::sleep(wait).await;
                }
                Attempt::Retryable(err) => return Err(err),
            }
        }
    }

    /// Linear backoff: the n-th retry waits `n * retry_delay`.
    fn backoff(&self, attempt: u32) -> Duration {
        self.retry_delay * attempt
    }

    async fn send_once(&self, request: &ChatRequest) -> Attempt {
        let mut api_key = match HeaderValue::from_str(self.api_key.expose_secret()) {
            Ok(value) => value,
            Err(e) => {
                return Attempt::Done(Err(ClassifyError::Transient {
                    message: format!("invalid API key header value: {e}"),
                }));
            }
        };
        api_key.set_sensitive(true);

        let response = match self
            .client
            .post(self.url())
            .header("api-key", api_key)
            .json(request)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) if e.is_timeout() => {
                return Attempt::Done(Err(ClassifyError::Timeout {
                    duration: self.timeout,
                }));
            }
            Err(e) => {
                return Attempt::Retryable(ClassifyError::Transient {
                    message: format!("HTTP request failed: {e}"),
                });
            }
        };

        let status = response.status();
        debug!(status = %status, deployment = %self.deployment, "Azure OpenAI response received");

        if status.is_success() {
            let body = match response.text().await {
                Ok(body) => body,
                Err(e) => {
                    return Attempt::Done(Err(ClassifyError::Transient {
                        message: format!("failed to read response body: {e}"),
                    }));
                }
            };
            return Attempt::Done(
                serde_json::from_str(&body).map_err(|_| ClassifyError::Malformed { output: body }),
            );
        }

        let retry_after = response
            .headers()
            .get(RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<u64>().ok())
            .map(Duration::from_secs);
        let body = response.text().await.unwrap_or_default();

        match status {
            StatusCode::TOO_MANY_REQUESTS => {
                Attempt::Retryable(ClassifyError::RateLimited { retry_after })
            }
            StatusCode::INTERNAL_SERVER_ERROR
            | StatusCode::BAD_GATEWAY
            | StatusCode::SERVICE_UNAVAILABLE
            | StatusCode::GATEWAY_TIMEOUT => Attempt::Retryable(ClassifyError::Transient {
                message: api_error_message(status, &body),
            }),
            _ => Attempt::Done(Err(ClassifyError::Transient {
                message: api_error_message(status, &body),
            })),
        }
    }
}

fn api_error_message(status: StatusCode, body: &str) -> String {
    match serde_json::from_str::<ApiErrorResponse>(body) {
        Ok(api_err) => match api_err.error.code {
            Some(code) => format!("Azure OpenAI error ({code}): {}", api_err.error.message),
            None => format!("Azure OpenAI error ({status}): {}", api_err.error.message),
        },
        Err(_) => format!("API returned {status}: {body}"),
    }
}
