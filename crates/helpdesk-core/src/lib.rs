// SPDX-FileCopyrightText: 2026 Helpdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the helpdesk query router.
//!
//! This crate provides the shared data model, the error taxonomy, the
//! structured identifier pattern, prompt helpers for remote classifiers, and
//! the [`Classifier`] and [`Agent`] traits that the other crates implement.

pub mod error;
pub mod identifier;
pub mod prompt;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::{ClassifyError, FailureKind, HelpdeskError, RouteFailure};
pub use identifier::{contains_identifier, find_identifier};
pub use traits::classifier::UnconfiguredClassifier;
pub use traits::{Agent, Classifier};
pub use types::{
    AgentResponse, Category, Classification, Query, QueryMetadata, Resolution, ResponseOutcome,
    RoutingDecision, Strategy, TokenUsage,
};
