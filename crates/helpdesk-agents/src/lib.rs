// SPDX-FileCopyrightText: 2026 Helpdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Agents that answer routed queries.
//!
//! - [`FaqAgent`] answers general clinic questions from a [`FaqTable`].
//! - [`OrderAgent`] reports order status from an [`OrderTable`].
//! - [`UndeterminedAgent`] answers when intent is unknown.
//!
//! All agents run the [`safety`] screen first, so a medical-advice request is
//! refused whichever category it was routed to. [`AgentRegistry`] maps
//! categories to agents.

pub mod fallback;
pub mod faq;
pub mod order;
pub mod registry;
pub mod safety;

pub use fallback::UndeterminedAgent;
pub use faq::{FaqAgent, FaqEntry, FaqTable};
pub use order::{OrderAgent, OrderRecord, OrderTable};
pub use registry::AgentRegistry;
pub use safety::{SafetyConcern, screen};
