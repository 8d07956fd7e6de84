// SPDX-FileCopyrightText: 2026 Helpdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Azure OpenAI (GPT-4o) query classifier for the helpdesk router.

pub mod client;
pub mod types;

use std::time::Duration;

use async_trait::async_trait;
use helpdesk_config::model::OpenAiConfig;
use helpdesk_core::prompt::{SYSTEM_INSTRUCTION, build_prompt, parse_label};
use helpdesk_core::{
    Category, Classification, ClassifyError, Classifier, HelpdeskError, Query, Strategy,
    TokenUsage,
};
use secrecy::SecretString;
use tracing::{debug, info};

use crate::client::AzureOpenAiClient;
use crate::types::{ChatMessage, ChatRequest};

const MAX_TOKENS: u32 = 10;

/// GPT-backed classifier over an Azure OpenAI deployment.
#[derive(Debug, Clone)]
pub struct OpenAiClassifier {
    client: AzureOpenAiClient,
}

impl OpenAiClassifier {
    pub fn new(client: AzureOpenAiClient) -> Self {
        Self { client }
    }

    /// Builds a classifier from `[openai]`. Both the API key and the
    /// endpoint are required.
    pub fn from_config(config: &OpenAiConfig) -> Result<Self, HelpdeskError> {
        let api_key = non_blank(config.api_key.as_deref()).ok_or_else(|| {
            HelpdeskError::Config(
                "openai.api_key is not set (HELPDESK_OPENAI_API_KEY)".to_string(),
            )
        })?;
        let endpoint = non_blank(config.endpoint.as_deref()).ok_or_else(|| {
            HelpdeskError::Config(
                "openai.endpoint is not set (HELPDESK_OPENAI_ENDPOINT)".to_string(),
            )
        })?;

        let client = AzureOpenAiClient::new(
            SecretString::from(api_key.to_string()),
            endpoint.to_string(),
            config.deployment.clone(),
            config.api_version.clone(),
            Duration::from_secs(config.timeout_secs),
        )?
        .with_max_retries(config.max_retries);

        info!(deployment = %config.deployment, "Azure OpenAI classifier initialized");
        Ok(Self::new(client))
    }

    fn request(query: &Query, categories: &[Category]) -> ChatRequest {
        ChatRequest {
            messages: vec![
                ChatMessage::system(SYSTEM_INSTRUCTION),
                ChatMessage::user(build_prompt(query.text(), categories)),
            ],
            temperature: 0.0,
            max_tokens: MAX_TOKENS,
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[async_trait]
impl Classifier for OpenAiClassifier {
    fn name(&self) -> &str {
        "gpt"
    }

    fn strategy(&self) -> Strategy {
        Strategy::Gpt
    }

    async fn classify(
        &self,
        query: &Query,
        categories: &[Category],
    ) -> Result<Classification, ClassifyError> {
        let response = self.client.chat(&Self::request(query, categories)).await?;

        let content = response.first_content().unwrap_or_default();
        let category = parse_label(content, categories)?;
        debug!(deployment = %self.client.deployment(), category = %category, "GPT classification");

        Ok(match response.usage {
            Some(usage) => Classification::new(category).with_usage(TokenUsage {
                input_tokens: usage.prompt_tokens,
                output_tokens: usage.completion_tokens,
            }),
            None => Classification::new(category),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use helpdesk_config::HelpdeskConfig;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config(endpoint: &str) -> OpenAiConfig {
        OpenAiConfig {
            api_key: Some("azure-key".into()),
            endpoint: Some(endpoint.to_string()),
            ..HelpdeskConfig::default().openai
        }
    }

    fn reply(content: &str) -> ResponseTemplate {
        ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "choices": [{"message": {"role": "assistant", "content": content}, "finish_reason": "stop"}],
            "usage": {"prompt_tokens": 160, "completion_tokens": 1}
        }))
    }

    #[test]
    fn missing_key_or_endpoint_is_a_config_error() {
        let err = OpenAiClassifier::from_config(&OpenAiConfig::default()).unwrap_err();
        assert!(matches!(err, HelpdeskError::Config(ref msg) if msg.contains("openai.api_key")));

        let no_endpoint = OpenAiConfig {
            api_key: Some("k".into()),
            endpoint: Some("  ".into()),
            ..OpenAiConfig::default()
        };
        let err = OpenAiClassifier::from_config(&no_endpoint).unwrap_err();
        assert!(matches!(err, HelpdeskError::Config(ref msg) if msg.contains("openai.endpoint")));
    }

    #[tokio::test]
    async fn quoted_label_is_accepted() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/openai/deployments/gpt-4o/chat/completions"))
            .and(body_partial_json(serde_json::json!({
                "temperature": 0.0,
                "max_tokens": 10
            })))
            .respond_with(reply("\"faq\"."))
            .mount(&server)
            .await;

        let classifier = OpenAiClassifier::from_config(&config(&server.uri())).unwrap();
        let classification = classifier
            .classify(&Query::new("Do you accept Aetna?"), &Category::ROUTABLE)
            .await
            .unwrap();
        assert_eq!(classification.category, Category::Faq);
        assert_eq!(
            classification.usage,
            Some(TokenUsage {
                input_tokens: 160,
                output_tokens: 1
            })
        );
    }

    #[tokio::test]
    async fn prose_reply_is_malformed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(reply("I think this is about billing."))
            .mount(&server)
            .await;

        let classifier = OpenAiClassifier::from_config(&config(&server.uri())).unwrap();
        let err = classifier
            .classify(&Query::new("What do I owe?"), &Category::ROUTABLE)
            .await
            .unwrap_err();
        assert!(matches!(err, ClassifyError::Malformed { .. }));
    }

    #[tokio::test]
    async fn server_error_is_transient() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let classifier = OpenAiClassifier::from_config(&config(&server.uri())).unwrap();
        let err = classifier
            .classify(&Query::new("hours?"), &Category::ROUTABLE)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), helpdesk_core::FailureKind::Transient);
    }

    #[test]
    fn request_puts_instruction_first() {
        let request = OpenAiClassifier::request(&Query::new("Is RX-11223 ready?"), &Category::ROUTABLE);
        assert_eq!(request.messages.len(), 2);
        assert_eq!(request.messages[0].role, "system");
        assert!(request.messages[1]
            .content
            .as_deref()
            .unwrap()
            .contains("Is RX-11223 ready?"));
    }
}
