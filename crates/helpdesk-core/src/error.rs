// SPDX-FileCopyrightText: 2026 Helpdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the helpdesk router.

use std::path::PathBuf;
use std::time::Duration;

use serde::Serialize;
use strum::{Display, IntoStaticStr};
use thiserror::Error;

use crate::types::Strategy;

/// The primary error type used across the library crates.
#[derive(Debug, Error)]
pub enum HelpdeskError {
    /// The query cannot be routed (empty or whitespace-only text).
    #[error("invalid query: {reason}")]
    InvalidQuery { reason: String },

    /// Configuration errors (missing credentials, bad values).
    #[error("configuration error: {0}")]
    Config(String),

    /// A data table or corpus file could not be read or parsed.
    #[error("failed to load {}: {source}", path.display())]
    Data {
        path: PathBuf,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Writing a report failed.
    #[error("report error: {source}")]
    Report {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

/// Failure of a single classification attempt.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ClassifyError {
    /// Network failure or a 5xx response.
    #[error("transient classifier failure: {message}")]
    Transient { message: String },

    /// The service rejected the call with HTTP 429.
    #[error("rate limited{}", retry_after.map(|d| format!(" (retry after {d:?})")).unwrap_or_default())]
    RateLimited { retry_after: Option<Duration> },

    /// The response could not be parsed into an offered category.
    #[error("malformed classifier output: {output:?}")]
    Malformed { output: String },

    /// The bounded wait was exceeded.
    #[error("classification timed out after {duration:?}")]
    Timeout { duration: Duration },

    /// The strategy has no credentials configured.
    #[error("{strategy} classifier is not configured")]
    Unconfigured { strategy: Strategy },
}

impl ClassifyError {
    /// The failure kind, for logs and decision records.
    pub fn kind(&self) -> FailureKind {
        match self {
            ClassifyError::Transient { .. } => FailureKind::Transient,
            ClassifyError::RateLimited { .. } => FailureKind::RateLimited,
            ClassifyError::Malformed { .. } => FailureKind::Malformed,
            ClassifyError::Timeout { .. } => FailureKind::Timeout,
            ClassifyError::Unconfigured { .. } => FailureKind::Unconfigured,
        }
    }
}

/// Discriminant of [`ClassifyError`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, IntoStaticStr, Serialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    Transient,
    RateLimited,
    Malformed,
    Timeout,
    Unconfigured,
}

/// Classification failure recorded on a routing decision.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteFailure {
    /// The primary classifier failed and the fallback recovered.
    #[error("primary classifier failed ({kind}): {message}")]
    ClassificationTransientFailure { kind: FailureKind, message: String },

    /// Both the primary classifier and the fallback failed.
    #[error("classification unavailable (primary: {primary}, fallback: {fallback})")]
    ClassificationUnavailable {
        primary: FailureKind,
        fallback: FailureKind,
    },
}

impl RouteFailure {
    /// Records a primary failure that the fallback recovered from.
    pub fn recovered(err: &ClassifyError) -> Self {
        RouteFailure::ClassificationTransientFailure {
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}
