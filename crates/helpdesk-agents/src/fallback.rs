// SPDX-FileCopyrightText: 2026 Helpdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Agent for queries whose intent could not be determined.

use helpdesk_core::{Agent, AgentResponse, Query, ResponseOutcome};

use crate::safety;

/// Generic response when intent is unknown.
pub const UNDETERMINED_TEXT: &str = "I'm sorry, I wasn't able to determine what you need. \
Please rephrase your question, or contact our office at (555) 123-4567 for assistance.";

/// Handles the `unknown` category.
#[derive(Debug, Clone, Copy, Default)]
pub struct UndeterminedAgent;

impl UndeterminedAgent {
    pub const NAME: &'static str = "undetermined";
}

impl Agent for UndeterminedAgent {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn handle(&self, query: &Query) -> AgentResponse {
        safety::refusal(Self::NAME, query.text()).unwrap_or_else(|| {
            AgentResponse::new(Self::NAME, UNDETERMINED_TEXT, ResponseOutcome::Undetermined)
        })
    }
}
