// SPDX-FileCopyrightText: 2026 Helpdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Trait seams: classifiers are pluggable behind [`Classifier`], handlers
//! behind [`Agent`].

pub mod agent;
pub mod classifier;

pub use agent::Agent;
pub use classifier::Classifier;
