// SPDX-FileCopyrightText: 2026 Helpdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Wiring shared by every command: data tables, classifiers and routers.

use std::path::Path;
use std::sync::Arc;

use helpdesk_agents::{AgentRegistry, FaqTable, OrderTable};
use helpdesk_config::HelpdeskConfig;
use helpdesk_config::model::DataConfig;
use helpdesk_core::{Classifier, HelpdeskError, Strategy, UnconfiguredClassifier};
use helpdesk_router::{KeywordClassifier, Router, RouterSettings};
use tracing::{info, warn};

/// Loads the FAQ and order tables named in `[data]`, or the built-in ones.
pub fn load_registry(data: &DataConfig) -> Result<Arc<AgentRegistry>, HelpdeskError> {
    let faq = match &data.faq_path {
        Some(path) => FaqTable::from_path(Path::new(path))?,
        None => FaqTable::builtin()?,
    };
    let orders = match &data.orders_path {
        Some(path) => OrderTable::from_path(Path::new(path))?,
        None => OrderTable::builtin()?,
    };
    info!(faqs = faq.len(), orders = orders.len(), "data tables loaded");
    Ok(Arc::new(AgentRegistry::standard(
        Arc::new(faq),
        Arc::new(orders),
    )))
}

/// Strategy from the command line, or `routing.strategy`.
pub fn resolve_strategy(requested: Option<Strategy>, config: &HelpdeskConfig) -> Strategy {
    requested
        .or_else(|| config.routing.parsed_strategy())
        .unwrap_or(Strategy::Keyword)
}

/// Builds the classifier for `strategy`.
///
/// A remote classifier that cannot be built (missing credentials, feature
/// disabled) is replaced by one that always fails, so routing falls back to
/// keywords.
pub fn build_classifier(strategy: Strategy, config: &HelpdeskConfig) -> Arc<dyn Classifier> {
    let built: Result<Arc<dyn Classifier>, HelpdeskError> = match strategy {
        Strategy::Keyword => Ok(Arc::new(
            KeywordClassifier::new()
                .with_single_word_default(config.routing.single_word_defaults_to_faq),
        )),
        Strategy::Gemini => gemini_classifier(config),
        Strategy::Gpt => openai_classifier(config),
    };

    match built {
        Ok(classifier) => classifier,
        Err(e) => {
            warn!(
                strategy = %strategy,
                error = %e,
                "classifier unavailable, queries will fall back to keywords"
            );
            Arc::new(UnconfiguredClassifier::new(strategy))
        }
    }
}

#[cfg(feature = "gemini")]
fn gemini_classifier(config: &HelpdeskConfig) -> Result<Arc<dyn Classifier>, HelpdeskError> {
    Ok(Arc::new(helpdesk_gemini::GeminiClassifier::from_config(
        &config.gemini,
    )?))
}

#[cfg(not(feature = "gemini"))]
fn gemini_classifier(_config: &HelpdeskConfig) -> Result<Arc<dyn Classifier>, HelpdeskError> {
    Err(HelpdeskError::Config(
        "built without the gemini feature".to_string(),
    ))
}

#[cfg(feature = "openai")]
fn openai_classifier(config: &HelpdeskConfig) -> Result<Arc<dyn Classifier>, HelpdeskError> {
    Ok(Arc::new(helpdesk_openai::OpenAiClassifier::from_config(
        &config.openai,
    )?))
}

#[cfg(not(feature = "openai"))]
fn openai_classifier(_config: &HelpdeskConfig) -> Result<Arc<dyn Classifier>, HelpdeskError> {
    Err(HelpdeskError::Config(
        "built without the openai feature".to_string(),
    ))
}

/// A router for `strategy` over `registry`.
pub fn build_router(
    strategy: Strategy,
    config: &HelpdeskConfig,
    registry: Arc<AgentRegistry>,
) -> Router {
    Router::new(
        build_classifier(strategy, config),
        registry,
        RouterSettings::from_config(&config.routing),
    )
}
