// SPDX-FileCopyrightText: 2026 Helpdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for end-to-end routing tests.
//!
//! `TestHarness` assembles a [`Router`] over a classifier stub and either the
//! fixture tables or the built-in tables, and provides `ask()` to drive the
//! full route-and-dispatch path.

use std::sync::Arc;
use std::time::Duration;

use helpdesk_agents::{AgentRegistry, FaqTable, OrderTable};
use helpdesk_core::{Category, Classifier, HelpdeskError, RoutingDecision, Strategy};
use helpdesk_router::{KeywordClassifier, Router, RouterSettings};

use crate::fixtures;
use crate::mock_classifier::MockClassifier;

/// Builder for creating test environments with configurable options.
pub struct TestHarnessBuilder {
    classifier: Option<Arc<dyn Classifier>>,
    fallback: Option<Arc<dyn Classifier>>,
    settings: RouterSettings,
    builtin_tables: bool,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            classifier: None,
            fallback: None,
            settings: RouterSettings::default(),
            builtin_tables: false,
        }
    }

    /// Primary classifier. Defaults to the keyword classifier.
    pub fn with_classifier(mut self, classifier: Arc<dyn Classifier>) -> Self {
        self.classifier = Some(classifier);
        self
    }

    /// Shorthand for a mock primary classifier.
    pub fn with_mock(self, mock: MockClassifier) -> Self {
        self.with_classifier(Arc::new(mock))
    }

    /// Replaces the keyword fallback.
    pub fn with_fallback(mut self, fallback: Arc<dyn Classifier>) -> Self {
        self.fallback = Some(fallback);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.settings.timeout = timeout;
        self
    }

    pub fn without_identifier_short_circuit(mut self) -> Self {
        self.settings.identifier_short_circuit = false;
        self
    }

    /// Use the built-in FAQ and order tables instead of the fixtures.
    pub fn with_builtin_tables(mut self) -> Self {
        self.builtin_tables = true;
        self
    }

    /// Build the harness.
    pub fn build(self) -> Result<TestHarness, HelpdeskError> {
        let (faq, orders) = if self.builtin_tables {
            (FaqTable::builtin()?, OrderTable::builtin()?)
        } else {
            (fixtures::faq_table(), fixtures::order_table())
        };
        let faq = Arc::new(faq);
        let orders = Arc::new(orders);
        let registry = Arc::new(AgentRegistry::standard(faq.clone(), orders.clone()));

        let classifier = self.classifier.unwrap_or_else(|| {
            Arc::new(
                KeywordClassifier::new()
                    .with_single_word_default(self.settings.single_word_defaults_to_faq),
            )
        });
        let mut router = Router::new(classifier, registry.clone(), self.settings);
        if let Some(fallback) = self.fallback {
            router = router.with_fallback(fallback);
        }

        Ok(TestHarness {
            router: Arc::new(router),
            registry,
            faq,
            orders,
        })
    }
}

/// A router with its tables, ready for assertions.
pub struct TestHarness {
    pub router: Arc<Router>,
    pub registry: Arc<AgentRegistry>,
    pub faq: Arc<FaqTable>,
    pub orders: Arc<OrderTable>,
}

impl TestHarness {
    /// Create a new builder for configuring the test harness.
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    /// Keyword router over the fixture tables.
    pub fn keyword() -> Result<Self, HelpdeskError> {
        Self::builder().build()
    }

    /// Router whose primary classifier always fails, so every query goes
    /// through the keyword fallback.
    pub fn always_failing(strategy: Strategy) -> Result<Self, HelpdeskError> {
        Self::builder()
            .with_mock(MockClassifier::failing(
                strategy,
                helpdesk_core::ClassifyError::Transient {
                    message: "service down".to_string(),
                },
            ))
            .build()
    }

    /// Routes `text` through the full pipeline.
    pub async fn ask(&self, text: &str) -> Result<RoutingDecision, HelpdeskError> {
        self.router.route(text).await
    }

    /// Category the router picks for `text`, or `Unknown` for rejected input.
    pub async fn category_of(&self, text: &str) -> Category {
        self.ask(text)
            .await
            .map(|d| d.category())
            .unwrap_or(Category::Unknown)
    }
}
