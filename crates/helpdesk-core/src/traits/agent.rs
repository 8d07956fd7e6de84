// SPDX-FileCopyrightText: 2026 Helpdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Agent trait: produces the answer for a routed query.

use crate::types::{AgentResponse, Query};

/// A query handler for one category.
///
/// Handling is a pure function of the agent's read-only table and the query.
/// Agents never fail: missing data is reported in the response text.
pub trait Agent: Send + Sync {
    /// Short agent name, e.g. `"faq"`.
    fn name(&self) -> &'static str;

    /// Produces the response for `query`.
    fn handle(&self, query: &Query) -> AgentResponse;
}
