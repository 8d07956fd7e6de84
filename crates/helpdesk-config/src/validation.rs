// SPDX-FileCopyrightText: 2026 Helpdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde attributes,
//! such as known strategy labels, positive timeouts and endpoint schemes.

use std::collections::HashSet;
use std::str::FromStr;

use helpdesk_core::Strategy;

use crate::diagnostic::ConfigError;
use crate::model::HelpdeskConfig;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &HelpdeskConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if !LOG_LEVELS.contains(&config.agent.log_level.trim()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "agent.log_level `{}` is not one of {}",
                config.agent.log_level,
                LOG_LEVELS.join(", ")
            ),
        });
    }

    if config.routing.parsed_strategy().is_none() {
        errors.push(unknown_strategy("routing.strategy", &config.routing.strategy));
    }

    for (key, secs) in [
        ("routing.timeout_secs", config.routing.timeout_secs),
        ("gemini.timeout_secs", config.gemini.timeout_secs),
        ("openai.timeout_secs", config.openai.timeout_secs),
    ] {
        if secs == 0 {
            errors.push(ConfigError::Validation {
                message: format!("{key} must be greater than 0"),
            });
        }
    }

    if let Some(endpoint) = &config.openai.endpoint {
        let endpoint = endpoint.trim();
        if !(endpoint.starts_with("https://") || endpoint.starts_with("http://")) {
            errors.push(ConfigError::Validation {
                message: format!("openai.endpoint `{endpoint}` must be an http(s) URL"),
            });
        }
    }

    if config.evaluation.strategies.is_empty() {
        errors.push(ConfigError::Validation {
            message: "evaluation.strategies must list at least one strategy".to_string(),
        });
    }

    let mut seen = HashSet::new();
    for label in &config.evaluation.strategies {
        match Strategy::from_str(label.trim()) {
            Ok(strategy) => {
                if !seen.insert(strategy) {
                    errors.push(ConfigError::Validation {
                        message: format!("duplicate strategy `{label}` in evaluation.strategies"),
                    });
                }
            }
            Err(_) => errors.push(unknown_strategy("evaluation.strategies", label)),
        }
    }

    if config.evaluation.report_path.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "evaluation.report_path must not be empty".to_string(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn unknown_strategy(key: &str, label: &str) -> ConfigError {
    ConfigError::Validation {
        message: format!("{key}: unknown strategy `{label}` (expected keyword, gemini or gpt)"),
    }
}
