// SPDX-FileCopyrightText: 2026 Helpdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Query classification and routing for the helpdesk.
//!
//! This crate provides:
//! - [`KeywordClassifier`]: rule-based classification (zero-cost, zero-latency)
//! - [`Router`]: bounded classification with one keyword fallback, then
//!   dispatch to the agent registered for the resulting category
//!
//! Remote classifiers live in their own crates and plug in through
//! [`helpdesk_core::Classifier`].

pub mod classifier;
pub mod router;

pub use classifier::KeywordClassifier;
pub use router::{Router, RouterSettings};
