// SPDX-FileCopyrightText: 2026 Helpdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the helpdesk router.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use std::str::FromStr;
use std::time::Duration;

use helpdesk_core::Strategy;
use serde::{Deserialize, Serialize};

/// Top-level helpdesk configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct HelpdeskConfig {
    /// Process identity and logging.
    #[serde(default)]
    pub agent: AgentConfig,

    /// Router behavior.
    #[serde(default)]
    pub routing: RoutingConfig,

    /// Google Gemini classifier settings.
    #[serde(default)]
    pub gemini: GeminiConfig,

    /// Azure OpenAI classifier settings.
    #[serde(default)]
    pub openai: OpenAiConfig,

    /// FAQ and order table locations.
    #[serde(default)]
    pub data: DataConfig,

    /// Evaluation run settings.
    #[serde(default)]
    pub evaluation: EvaluationConfig,
}

/// Process identity and logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AgentConfig {
    /// Display name used in the shell banner.
    #[serde(default = "default_agent_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            name: default_agent_name(),
            log_level: default_log_level(),
        }
    }
}

fn default_agent_name() -> String {
    "helpdesk".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Router configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RoutingConfig {
    /// Strategy used by `ask` and `shell` (keyword, gemini, gpt).
    #[serde(default = "default_strategy")]
    pub strategy: String,

    /// Upper bound on a single classification call.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Route queries carrying an order identifier straight to order status.
    #[serde(default = "default_true")]
    pub identifier_short_circuit: bool,

    /// Route single-word queries without an identifier to the FAQ agent.
    #[serde(default = "default_true")]
    pub single_word_defaults_to_faq: bool,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            strategy: default_strategy(),
            timeout_secs: default_timeout_secs(),
            identifier_short_circuit: true,
            single_word_defaults_to_faq: true,
        }
    }
}

impl RoutingConfig {
    /// The configured strategy, if the label is known.
    pub fn parsed_strategy(&self) -> Option<Strategy> {
        Strategy::from_str(self.strategy.trim()).ok()
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn default_strategy() -> String {
    "keyword".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_true() -> bool {
    true
}

fn default_max_retries() -> u32 {
    0
}

/// Google Gemini configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GeminiConfig {
    /// Gemini API key. `None` leaves the strategy unconfigured.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Model name.
    #[serde(default = "default_gemini_model")]
    pub model: String,

    /// API base URL.
    #[serde(default = "default_gemini_base_url")]
    pub base_url: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Retries on transient HTTP statuses.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Minimum interval between calls during evaluation (free tier: 10 req/min).
    #[serde(default = "default_gemini_min_interval_ms")]
    pub min_interval_ms: u64,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_gemini_model(),
            base_url: default_gemini_base_url(),
            timeout_secs: default_timeout_secs(),
            max_retries: default_max_retries(),
            min_interval_ms: default_gemini_min_interval_ms(),
        }
    }
}

fn default_gemini_model() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_gemini_base_url() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_gemini_min_interval_ms() -> u64 {
    7000
}

/// Azure OpenAI configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct OpenAiConfig {
    /// Azure OpenAI API key. `None` leaves the strategy unconfigured.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Resource endpoint, e.g. `https://my-resource.openai.azure.com`.
    #[serde(default)]
    pub endpoint: Option<String>,

    /// Deployment name.
    #[serde(default = "default_openai_deployment")]
    pub deployment: String,

    #[serde(default = "default_openai_api_version")]
    pub api_version: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Retries on transient HTTP statuses.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Minimum interval between calls during evaluation.
    #[serde(default)]
    pub min_interval_ms: u64,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            endpoint: None,
            deployment: default_openai_deployment(),
            api_version: default_openai_api_version(),
            timeout_secs: default_timeout_secs(),
            max_retries: default_max_retries(),
            min_interval_ms: 0,
        }
    }
}

fn default_openai_deployment() -> String {
    "gpt-4o".to_string()
}

fn default_openai_api_version() -> String {
    "2024-02-15-preview".to_string()
}

/// Data table locations. Built-in tables are used when unset.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DataConfig {
    /// Path to a `{"faqs": [...]}` JSON file.
    #[serde(default)]
    pub faq_path: Option<String>,

    /// Path to an `{"orders": [...]}` JSON file.
    #[serde(default)]
    pub orders_path: Option<String>,
}

/// Evaluation configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct EvaluationConfig {
    /// Directory holding the corpus JSON files. Built-in corpus when unset.
    #[serde(default)]
    pub corpus_dir: Option<String>,

    /// Strategies evaluated by default.
    #[serde(default = "default_eval_strategies")]
    pub strategies: Vec<String>,

    /// Markdown report output path.
    #[serde(default = "default_report_path")]
    pub report_path: String,

    /// Optional JSON report output path.
    #[serde(default)]
    pub json_report_path: Option<String>,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            corpus_dir: None,
            strategies: default_eval_strategies(),
            report_path: default_report_path(),
            json_report_path: None,
        }
    }
}

impl EvaluationConfig {
    /// Configured strategies with unknown labels skipped.
    pub fn parsed_strategies(&self) -> Vec<Strategy> {
        self.strategies
            .iter()
            .filter_map(|s| Strategy::from_str(s.trim()).ok())
            .collect()
    }
}

fn default_eval_strategies() -> Vec<String> {
    vec!["keyword".into(), "gemini".into(), "gpt".into()]
}

fn default_report_path() -> String {
    "evaluation/results.md".to_string()
}
