// SPDX-FileCopyrightText: 2026 Helpdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for helpdesk integration tests.
//!
//! Provides classifier stubs, fixture tables and a router harness for fast,
//! deterministic tests without remote classification services.
//!
//! # Components
//!
//! - [`MockClassifier`] - Scripted, fixed, failing or slow classifier stub
//! - [`fixtures`] - Small FAQ and order tables
//! - [`TestHarness`] - Router assembled over a stub and fixture tables

pub mod fixtures;
pub mod harness;
pub mod mock_classifier;

pub use harness::TestHarness;
pub use mock_classifier::MockClassifier;
