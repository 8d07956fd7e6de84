// SPDX-FileCopyrightText: 2026 Helpdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Classifier port: maps a query to one of a set of categories.

use async_trait::async_trait;

use crate::error::ClassifyError;
use crate::types::{Category, Classification, Query, Strategy};

/// A query classifier.
///
/// Implementations may call remote services and may fail; the router owns
/// timeouts and fallback. A returned category outside `categories` is
/// treated by the router as malformed output.
#[async_trait]
pub trait Classifier: Send + Sync {
    /// Name used in logs.
    fn name(&self) -> &str;

    /// The strategy this classifier implements.
    fn strategy(&self) -> Strategy;

    /// Whether `classify` calls a remote service.
    fn is_remote(&self) -> bool {
        self.strategy().is_remote()
    }

    /// Classifies `query` into one of `categories`.
    async fn classify(
        &self,
        query: &Query,
        categories: &[Category],
    ) -> Result<Classification, ClassifyError>;
}

/// Classifier standing in for a remote strategy whose credentials are
/// missing. Every call fails with [`ClassifyError::Unconfigured`].
#[derive(Debug, Clone, Copy)]
pub struct UnconfiguredClassifier {
    strategy: Strategy,
}

impl UnconfiguredClassifier {
    pub fn new(strategy: Strategy) -> Self {
        Self { strategy }
    }
}

#[async_trait]
impl Classifier for UnconfiguredClassifier {
    fn name(&self) -> &str {
        "unconfigured"
    }

    fn strategy(&self) -> Strategy {
        self.strategy
    }

    fn is_remote(&self) -> bool {
        false
    }

    async fn classify(
        &self,
        _query: &Query,
        _categories: &[Category],
    ) -> Result<Classification, ClassifyError> {
        Err(ClassifyError::Unconfigured {
            strategy: self.strategy,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unconfigured_always_fails() {
        let classifier = UnconfiguredClassifier::new(Strategy::Gemini);
        let err = classifier
            .classify(&Query::new("hours?"), &Category::ROUTABLE)
            .await
            .unwrap_err();
        assert_eq!(
            err,
            ClassifyError::Unconfigured {
                strategy: Strategy::Gemini
            }
        );
        assert_eq!(classifier.strategy(), Strategy::Gemini);
        assert!(!classifier.is_remote());
    }
}
