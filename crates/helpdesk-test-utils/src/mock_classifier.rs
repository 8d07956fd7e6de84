// SPDX-FileCopyrightText: 2026 Helpdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock classifier for deterministic routing tests.
//!
//! `MockClassifier` implements `Classifier` with pre-configured outcomes,
//! so router and evaluation tests never call a remote service.

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use helpdesk_core::{Category, Classification, ClassifyError, Classifier, Query, Strategy};
use tokio::sync::Mutex;

/// A classifier stub with scripted outcomes.
///
/// Outcomes are popped from a FIFO queue. When the queue is empty, the
/// default outcome is returned.
pub struct MockClassifier {
    strategy: Strategy,
    outcomes: Arc<Mutex<VecDeque<Result<Category, ClassifyError>>>>,
    default: Result<Category, ClassifyError>,
    delay: Option<Duration>,
    calls: Arc<AtomicUsize>,
}

impl MockClassifier {
    fn with_default(strategy: Strategy, default: Result<Category, ClassifyError>) -> Self {
        Self {
            strategy,
            outcomes: Arc::new(Mutex::new(VecDeque::new())),
            default,
            delay: None,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Always answers `category`.
    pub fn fixed(strategy: Strategy, category: Category) -> Self {
        Self::with_default(strategy, Ok(category))
    }

    /// Always fails with `err`.
    pub fn failing(strategy: Strategy, err: ClassifyError) -> Self {
        Self::with_default(strategy, Err(err))
    }

    /// Returns `outcomes` in order, then fails as transient once exhausted.
    pub fn scripted(strategy: Strategy, outcomes: Vec<Result<Category, ClassifyError>>) -> Self {
        let mock = Self::with_default(
            strategy,
            Err(ClassifyError::Transient {
                message: "mock script exhausted".to_string(),
            }),
        );
        Self {
            outcomes: Arc::new(Mutex::new(VecDeque::from(outcomes))),
            ..mock
        }
    }

    /// Sleeps for `delay` before every answer.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Appends an outcome to the script.
    pub async fn push(&self, outcome: Result<Category, ClassifyError>) {
        self.outcomes.lock().await.push_back(outcome);
    }

    /// Number of `classify` calls so far, including ones that later timed out.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    async fn next_outcome(&self) -> Result<Category, ClassifyError> {
        self.outcomes
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| self.default.clone())
    }
}

#[async_trait]
impl Classifier for MockClassifier {
    fn name(&self) -> &str {
        "mock"
    }

    fn strategy(&self) -> Strategy {
        self.strategy
    }

    async fn classify(
        &self,
        _query: &Query,
        _categories: &[Category],
    ) -> Result<Classification, ClassifyError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.next_outcome().await.map(Classification::new)
    }
}
