// SPDX-FileCopyrightText: 2026 Helpdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Query routing with a bounded wait and one keyword fallback.
//!
//! Order of resolution: identifier short-circuit > configured classifier >
//! keyword fallback > undetermined. Every valid query yields exactly one
//! [`RoutingDecision`]; classification errors never reach the caller.

use std::sync::Arc;
use std::time::Duration;

use helpdesk_agents::AgentRegistry;
use helpdesk_config::model::RoutingConfig;
use helpdesk_core::{
    Category, Classification, ClassifyError, Classifier, HelpdeskError, Query, Resolution,
    RouteFailure, RoutingDecision, Strategy, contains_identifier, find_identifier,
};
use tokio::time::Instant;
use tracing::{debug, error, warn};

use crate::classifier::KeywordClassifier;

/// Router behavior, taken from `[routing]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouterSettings {
    /// Upper bound on each classification call.
    pub timeout: Duration,
    /// Route identifier-bearing queries without classifying.
    pub identifier_short_circuit: bool,
    /// Passed to the default keyword fallback.
    pub single_word_defaults_to_faq: bool,
}

impl Default for RouterSettings {
    fn default() -> Self {
        Self::from_config(&RoutingConfig::default())
    }
}

impl RouterSettings {
    pub fn from_config(config: &RoutingConfig) -> Self {
        Self {
            timeout: config.timeout(),
            identifier_short_circuit: config.identifier_short_circuit,
            single_word_defaults_to_faq: config.single_word_defaults_to_faq,
        }
    }
}

/// Routes queries to agents.
///
/// Holds no state across calls beyond its classifiers, registry and settings,
/// so one router can serve concurrent calls.
pub struct Router {
    classifier: Arc<dyn Classifier>,
    fallback: Arc<dyn Classifier>,
    registry: Arc<AgentRegistry>,
    settings: RouterSettings,
}

impl Router {
    /// Creates a router over `classifier` with the keyword classifier as fallback.
    pub fn new(
        classifier: Arc<dyn Classifier>,
        registry: Arc<AgentRegistry>,
        settings: RouterSettings,
    ) -> Self {
        let fallback = KeywordClassifier::new()
            .with_single_word_default(settings.single_word_defaults_to_faq);
        Self {
            classifier,
            fallback: Arc::new(fallback),
            registry,
            settings,
        }
    }

    /// Replaces the fallback classifier.
    pub fn with_fallback(mut self, fallback: Arc<dyn Classifier>) -> Self {
        self.fallback = fallback;
        self
    }

    /// Strategy of the configured classifier.
    pub fn strategy(&self) -> Strategy {
        self.classifier.strategy()
    }

    pub fn settings(&self) -> &RouterSettings {
        &self.settings
    }

    /// Whether routing `text` calls a remote classifier.
    ///
    /// False for invalid text, for identifier-bearing text when the
    /// short-circuit is on, and for local or unconfigured classifiers.
    pub fn calls_remote(&self, text: &str) -> bool {
        if !self.classifier.is_remote() || text.trim().is_empty() {
            return false;
        }
        !(self.settings.identifier_short_circuit && contains_identifier(text))
    }

    /// Routes one query.
    ///
    /// Returns `Err(HelpdeskError::InvalidQuery)` for empty or whitespace-only
    /// text. Any other outcome, including total classifier failure, is a
    /// decision.
    pub async fn route(&self, query: impl Into<Query>) -> Result<RoutingDecision, HelpdeskError> {
        let started = Instant::now();
        let query = query.into();
        query.validate()?;

        let primary = self.classifier.strategy();

        if self.settings.identifier_short_circuit {
            if let Some(order_id) = find_identifier(query.text()) {
                debug!(order_id = %order_id, "identifier short-circuit");
                return Ok(self.decide(
                    query,
                    Category::OrderStatus,
                    primary,
                    Resolution::IdentifierMatch,
                    None,
                    started,
                ));
            }
        }

        let primary_err = match self.attempt(self.classifier.as_ref(), &query).await {
            Ok(classification) => {
                debug!(
                    strategy = %primary,
                    category = %classification.category,
                    channel = query.metadata().channel.as_deref().unwrap_or("-"),
                    "classified"
                );
                return Ok(self.decide(
                    query,
                    classification.category,
                    primary,
                    Resolution::Classified,
                    None,
                    started,
                ));
            }
            Err(err) => err,
        };

        warn!(
            strategy = %primary,
            kind = %primary_err.kind(),
            error = %primary_err,
            "classifier failed, falling back to keywords"
        );

        match self.attempt(self.fallback.as_ref(), &query).await {
            Ok(classification) => Ok(self.decide(
                query,
                classification.category,
                self.fallback.strategy(),
                Resolution::Fallback,
                Some(RouteFailure::recovered(&primary_err)),
                started,
            )),
            Err(fallback_err) => {
                error!(
                    strategy = %primary,
                    primary = %primary_err.kind(),
                    fallback = %fallback_err.kind(),
                    "classification unavailable"
                );
                Ok(self.decide(
                    query,
                    Category::Unknown,
                    self.fallback.strategy(),
                    Resolution::Unavailable,
                    Some(RouteFailure::ClassificationUnavailable {
                        primary: primary_err.kind(),
                        fallback: fallback_err.kind(),
                    }),
                    started,
                ))
            }
        }
    }

    /// One bounded classification call. Out-of-set categories are malformed.
    async fn attempt(
        &self,
        classifier: &dyn Classifier,
        query: &Query,
    ) -> Result<Classification, ClassifyError> {
        let offered = &Category::ROUTABLE;
        let classification =
            tokio::time::timeout(self.settings.timeout, classifier.classify(query, offered))
                .await
                .map_err(|_| ClassifyError::Timeout {
                    duration: self.settings.timeout,
                })??;

        if offered.contains(&classification.category) {
            Ok(classification)
        } else {
            Err(ClassifyError::Malformed {
                output: classification.category.to_string(),
            })
        }
    }

    fn decide(
        &self,
        query: Query,
        category: Category,
        strategy_used: Strategy,
        resolution: Resolution,
        error: Option<RouteFailure>,
        started: Instant,
    ) -> RoutingDecision {
        let response = if resolution == Resolution::Unavailable {
            self.registry.undetermined(&query)
        } else {
            self.registry.dispatch(category, &query)
        };
        RoutingDecision::new(
            query,
            category,
            strategy_used,
            resolution,
            started.elapsed(),
            error,
            response,
        )
    }
}

impl std::fmt::Debug for Router {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Router")
            .field("classifier", &self.classifier.name())
            .field("fallback", &self.fallback.name())
            .field("settings", &self.settings)
            .finish()
    }
}
