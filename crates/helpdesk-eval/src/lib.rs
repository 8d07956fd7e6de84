// SPDX-FileCopyrightText: 2026 Helpdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Evaluation of routing strategies against a labeled corpus.
//!
//! - [`Corpus`] loads labeled test cases, one JSON file per [`CategoryGroup`].
//! - [`Evaluator`] routes every case through a [`helpdesk_router::Router`]
//!   and folds the decisions into an [`EvaluationResult`].
//! - [`report`] renders comparison tables and markdown/JSON reports.

pub mod corpus;
pub mod engine;
pub mod pacing;
pub mod report;
pub mod result;

pub use corpus::{CategoryGroup, Corpus, TestCase};
pub use engine::{EvaluationSettings, Evaluator};
pub use pacing::Pacer;
pub use result::{EvaluationAccumulator, EvaluationResult, GroupResult, Mismatch, accuracy};
