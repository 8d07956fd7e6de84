// SPDX-FileCopyrightText: 2026 Helpdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-strategy evaluation results.
//!
//! Decisions are folded into an [`EvaluationAccumulator`]; [`finish`] consumes
//! it and yields an immutable [`EvaluationResult`].
//!
//! [`finish`]: EvaluationAccumulator::finish

use std::str::FromStr;
use std::time::Duration;

use helpdesk_core::{Category, Resolution, RoutingDecision, Strategy};
use serde::{Serialize, Serializer};

use crate::corpus::{CategoryGroup, TestCase};

/// Percentage of `correct` in `total`; zero for an empty set.
pub fn accuracy(correct: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    correct as f64 / total as f64 * 100.0
}

fn as_secs<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_f64(d.as_secs_f64())
}

/// A case the strategy got wrong.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Mismatch {
    pub id: String,
    pub query: String,
    pub expected: String,
    /// Category the router picked; `None` when no decision was made.
    pub actual: Option<Category>,
    pub group: CategoryGroup,
    /// Why the case failed beyond a plain wrong label.
    pub failure: Option<String>,
}

/// Results for one category group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupResult {
    pub group: CategoryGroup,
    pub total: usize,
    pub correct: usize,
    pub incorrect: usize,
    /// Percentage, 0-100.
    pub accuracy: f64,
    #[serde(serialize_with = "as_secs")]
    pub avg_latency: Duration,
}

/// Results for one strategy over a whole corpus.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluationResult {
    pub strategy: Strategy,
    pub total: usize,
    pub correct: usize,
    pub incorrect: usize,
    /// Percentage, 0-100.
    pub accuracy: f64,
    #[serde(serialize_with = "as_secs")]
    pub avg_latency: Duration,
    #[serde(serialize_with = "as_secs")]
    pub total_time: Duration,
    /// Decisions answered by the strategy's own classifier.
    pub classified: usize,
    /// Decisions reached through the keyword fallback.
    pub fallbacks: usize,
    /// Decisions where classification was unavailable.
    pub unavailable: usize,
    pub groups: Vec<GroupResult>,
    pub mismatches: Vec<Mismatch>,
}

impl EvaluationResult {
    pub fn group(&self, group: CategoryGroup) -> Option<&GroupResult> {
        self.groups.iter().find(|g| g.group == group)
    }

    /// True when the classifier never answered and every classification
    /// attempt ended in the fallback or unavailable path.
    pub fn only_fell_back(&self) -> bool {
        self.classified == 0 && self.fallbacks + self.unavailable > 0
    }
}

#[derive(Debug)]
struct GroupTally {
    group: CategoryGroup,
    total: usize,
    correct: usize,
    timed: usize,
    latency: Duration,
}

impl GroupTally {
    fn new(group: CategoryGroup) -> Self {
        Self {
            group,
            total: 0,
            correct: 0,
            timed: 0,
            latency: Duration::ZERO,
        }
    }
}

/// Running totals for one strategy run.
#[derive(Debug)]
pub struct EvaluationAccumulator {
    strategy: Strategy,
    groups: Vec<GroupTally>,
    mismatches: Vec<Mismatch>,
    classified: usize,
    fallbacks: usize,
    unavailable: usize,
}

impl EvaluationAccumulator {
    pub fn new(strategy: Strategy) -> Self {
        Self {
            strategy,
            groups: Vec::new(),
            mismatches: Vec::new(),
            classified: 0,
            fallbacks: 0,
            unavailable: 0,
        }
    }

    fn tally(&mut self, group: CategoryGroup) -> &mut GroupTally {
        let index = match self.groups.iter().position(|t| t.group == group) {
            Some(index) => index,
            None => {
                self.groups.push(GroupTally::new(group));
                self.groups.len() - 1
            }
        };
        &mut self.groups[index]
    }

    /// Scores one routed case. `latency` is the measured duration of the
    /// single routing call.
    pub fn record(&mut self, case: &TestCase, decision: &RoutingDecision, latency: Duration) {
        match decision.resolution() {
            Resolution::Classified => self.classified += 1,
            Resolution::Fallback => self.fallbacks += 1,
            Resolution::Unavailable => self.unavailable += 1,
            Resolution::IdentifierMatch => {}
        }

        let expected = Category::from_str(&case.expected_category).ok();
        let correct = expected == Some(decision.category());

        let tally = self.tally(case.group);
        tally.total += 1;
        tally.timed += 1;
        tally.latency += latency;
        if correct {
            tally.correct += 1;
            return;
        }

        let failure = match (expected, decision.error()) {
            (None, _) => Some(format!(
                "unknown expected label {:?}",
                case.expected_category
            )),
            (Some(_), Some(err)) => Some(err.to_string()),
            (Some(_), None) => None,
        };
        self.mismatches.push(Mismatch {
            id: case.id.clone(),
            query: case.query.clone(),
            expected: case.expected_category.clone(),
            actual: Some(decision.category()),
            group: case.group,
            failure,
        });
    }

    /// Scores a case the router rejected without a decision.
    pub fn record_rejected(&mut self, case: &TestCase, reason: String) {
        self.tally(case.group).total += 1;
        self.mismatches.push(Mismatch {
            id: case.id.clone(),
            query: case.query.clone(),
            expected: case.expected_category.clone(),
            actual: None,
            group: case.group,
            failure: Some(reason),
        });
    }

    /// Finalizes accuracy and averages.
    pub fn finish(self) -> EvaluationResult {
        let mut total = 0;
        let mut correct = 0;
        let mut timed = 0u32;
        let mut total_time = Duration::ZERO;

        let groups: Vec<GroupResult> = self
            .groups
            .into_iter()
            .map(|t| {
                total += t.total;
                correct += t.correct;
                timed += t.timed as u32;
                total_time += t.latency;
                GroupResult {
                    group: t.group,
                    total: t.total,
                    correct: t.correct,
                    incorrect: t.total - t.correct,
                    accuracy: accuracy(t.correct, t.total),
                    avg_latency: average(t.latency, t.timed as u32),
                }
            })
            .collect();

        EvaluationResult {
            strategy: self.strategy,
            total,
            correct,
            incorrect: total - correct,
            accuracy: accuracy(correct, total),
            avg_latency: average(total_time, timed),
            total_time,
            classified: self.classified,
            fallbacks: self.fallbacks,
            unavailable: self.unavailable,
            groups,
            mismatches: self.mismatches,
        }
    }
}

fn average(sum: Duration, count: u32) -> Duration {
    if count == 0 {
        Duration::ZERO
    } else {
        sum / count
    }
}
