// SPDX-FileCopyrightText: 2026 Helpdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Evaluation engine: routes every corpus case and scores the decisions.

use std::collections::HashMap;
use std::time::Duration;

use futures::future::join_all;
use helpdesk_config::HelpdeskConfig;
use helpdesk_core::Strategy;
use helpdesk_router::Router;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::corpus::Corpus;
use crate::pacing::Pacer;
use crate::result::{EvaluationAccumulator, EvaluationResult};

/// Engine settings: minimum call spacing per strategy.
#[derive(Debug, Clone, Default)]
pub struct EvaluationSettings {
    intervals: HashMap<Strategy, Duration>,
}

impl EvaluationSettings {
    /// Intervals from `gemini.min_interval_ms` and `openai.min_interval_ms`.
    pub fn from_config(config: &HelpdeskConfig) -> Self {
        Self::default()
            .with_interval(
                Strategy::Gemini,
                Duration::from_millis(config.gemini.min_interval_ms),
            )
            .with_interval(
                Strategy::Gpt,
                Duration::from_millis(config.openai.min_interval_ms),
            )
    }

    pub fn with_interval(mut self, strategy: Strategy, interval: Duration) -> Self {
        self.intervals.insert(strategy, interval);
        self
    }

    /// Minimum interval between calls for `strategy`; zero when unset.
    pub fn interval_for(&self, strategy: Strategy) -> Duration {
        self.intervals
            .get(&strategy)
            .copied()
            .unwrap_or(Duration::ZERO)
    }
}

/// Scores routers against a corpus.
#[derive(Debug, Clone, Default)]
pub struct Evaluator {
    settings: EvaluationSettings,
}

impl Evaluator {
    pub fn new(settings: EvaluationSettings) -> Self {
        Self { settings }
    }

    /// Routes every case in group order, one call at a time.
    ///
    /// Only cases that reach a remote classifier are paced; identifier
    /// matches and unconfigured strategies run back to back.
    ///
    /// Never fails: a rejected query or an unparseable expected label is
    /// scored as incorrect and the run continues.
    pub async fn evaluate(&self, router: &Router, corpus: &Corpus) -> EvaluationResult {
        let strategy = router.strategy();
        let mut pacer = Pacer::new(self.settings.interval_for(strategy));
        let mut acc = EvaluationAccumulator::new(strategy);
        let run_started = Instant::now();

        info!(strategy = %strategy, cases = corpus.len(), "evaluation started");

        for (group, cases) in corpus.partition() {
            debug!(strategy = %strategy, group = %group, cases = cases.len(), "evaluating group");
            for case in cases {
                if router.calls_remote(&case.query) {
                    pacer.wait().await;
                }
                let started = Instant::now();
                match router.route(case.query.as_str()).await {
                    Ok(decision) => {
                        let latency = started.elapsed();
                        if decision.category().to_string() != case.expected_category {
                            debug!(
                                strategy = %strategy,
                                id = %case.id,
                                expected = %case.expected_category,
                                actual = %decision.category(),
                                "mismatch"
                            );
                        }
                        acc.record(case, &decision, latency);
                    }
                    Err(err) => {
                        warn!(strategy = %strategy, id = %case.id, error = %err, "case rejected");
                        acc.record_rejected(case, err.to_string());
                    }
                }
            }
        }

        let result = acc.finish();
        info!(
            strategy = %strategy,
            total = result.total,
            correct = result.correct,
            accuracy = result.accuracy,
            fallbacks = result.fallbacks,
            unavailable = result.unavailable,
            elapsed_ms = run_started.elapsed().as_millis() as u64,
            "evaluation finished"
        );
        result
    }

    /// Evaluates several routers concurrently. Results are in input order.
    pub async fn compare(&self, routers: &[&Router], corpus: &Corpus) -> Vec<EvaluationResult> {
        join_all(routers.iter().map(|router| self.evaluate(router, corpus))).await
    }
}
