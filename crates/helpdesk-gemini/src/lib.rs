// SPDX-FileCopyrightText: 2026 Helpdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Google Gemini query classifier for the helpdesk router.
//!
//! [`GeminiClassifier`] implements [`Classifier`] by asking a Gemini model
//! for the category label with a deterministic, label-only prompt.

pub mod client;
pub mod types;

use std::time::Duration;

use async_trait::async_trait;
use helpdesk_config::model::GeminiConfig;
use helpdesk_core::prompt::{SYSTEM_INSTRUCTION, build_prompt, parse_label};
use helpdesk_core::{
    Category, Classification, ClassifyError, Classifier, HelpdeskError, Query, Strategy,
    TokenUsage,
};
use secrecy::SecretString;
use tracing::{debug, info};

use crate::client::GeminiClient;
use crate::types::{Content, GenerateContentRequest, GenerationConfig};

/// Labels are a couple of tokens; anything longer is not a label.
const MAX_OUTPUT_TOKENS: u32 = 10;

/// Gemini-backed classifier.
#[derive(Debug, Clone)]
pub struct GeminiClassifier {
    client: GeminiClient,
}

impl GeminiClassifier {
    pub fn new(client: GeminiClient) -> Self {
        Self { client }
    }

    /// Builds a classifier from `[gemini]`. Fails when no API key is configured.
    pub fn from_config(config: &GeminiConfig) -> Result<Self, HelpdeskError> {
        let api_key = config
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .ok_or_else(|| {
                HelpdeskError::Config(
                    "gemini.api_key is not set (HELPDESK_GEMINI_API_KEY)".to_string(),
                )
            })?;

        let client = GeminiClient::new(
            SecretString::from(api_key.to_string()),
            config.model.clone(),
            Duration::from_secs(config.timeout_secs),
        )?
        .with_base_url(config.base_url.clone())
        .with_max_retries(config.max_retries);

        info!(model = %config.model, "Gemini classifier initialized");
        Ok(Self::new(client))
    }

    fn request(query: &Query, categories: &[Category]) -> GenerateContentRequest {
        GenerateContentRequest {
            contents: vec![Content::user(build_prompt(query.text(), categories))],
            system_instruction: Some(Content::system(SYSTEM_INSTRUCTION)),
            generation_config: GenerationConfig {
                temperature: 0.0,
                max_output_tokens: MAX_OUTPUT_TOKENS,
            },
        }
    }
}

#[async_trait]
impl Classifier for GeminiClassifier {
    fn name(&self) -> &str {
        "gemini"
    }

    fn strategy(&self) -> Strategy {
        Strategy::Gemini
    }

    async fn classify(
        &self,
        query: &Query,
        categories: &[Category],
    ) -> Result<Classification, ClassifyError> {
        let response = self
            .client
            .generate_content(&Self::request(query, categories))
            .await?;

        let text = response.first_text().unwrap_or_default();
        let category = parse_label(text, categories)?;
        debug!(model = %self.client.model(), label = %text.trim(), category = %category, "Gemini classification");

        let mut classification = Classification::new(category);
        if let Some(usage) = response.usage_metadata {
            classification = classification.with_usage(TokenUsage {
                input_tokens: usage.prompt_token_count,
                output_tokens: usage.candidates_token_count,
            });
        }
        Ok(classification)
    }
}
