// SPDX-FileCopyrightText: 2026 Helpdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Category to agent mapping.

use std::collections::HashMap;
use std::sync::Arc;

use helpdesk_core::{Agent, AgentResponse, Category, Query};

use crate::fallback::UndeterminedAgent;
use crate::faq::{FaqAgent, FaqTable};
use crate::order::{OrderAgent, OrderTable};

/// Maps each category to the agent that handles it.
///
/// Dispatch never fails: a category with no registered agent is handled by
/// the undetermined agent.
#[derive(Clone)]
pub struct AgentRegistry {
    agents: HashMap<Category, Arc<dyn Agent>>,
    undetermined: Arc<dyn Agent>,
}

impl AgentRegistry {
    /// An empty registry that answers everything with the undetermined agent.
    pub fn new() -> Self {
        Self {
            agents: HashMap::new(),
            undetermined: Arc::new(UndeterminedAgent),
        }
    }

    /// The standard wiring: FAQ, order status and undetermined agents.
    pub fn standard(faq: Arc<FaqTable>, orders: Arc<OrderTable>) -> Self {
        Self::new()
            .with_agent(Category::Faq, Arc::new(FaqAgent::new(faq)))
            .with_agent(Category::OrderStatus, Arc::new(OrderAgent::new(orders)))
            .with_agent(Category::Unknown, Arc::new(UndeterminedAgent))
    }

    /// Registers `agent` for `category`, replacing any previous one.
    pub fn with_agent(mut self, category: Category, agent: Arc<dyn Agent>) -> Self {
        self.agents.insert(category, agent);
        self
    }

    /// The agent registered for `category`, if any.
    pub fn get(&self, category: Category) -> Option<&Arc<dyn Agent>> {
        self.agents.get(&category)
    }

    /// Hands `query` to the agent for `category`.
    pub fn dispatch(&self, category: Category, query: &Query) -> AgentResponse {
        match self.agents.get(&category) {
            Some(agent) => agent.handle(query),
            None => {
                tracing::warn!(category = %category, "no agent registered, using undetermined agent");
                self.undetermined.handle(query)
            }
        }
    }

    /// Response of the undetermined agent, used when classification is unavailable.
    pub fn undetermined(&self, query: &Query) -> AgentResponse {
        self.dispatch(Category::Unknown, query)
    }
}

impl Default for AgentRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for AgentRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<_> = self
            .agents
            .iter()
            .map(|(category, agent)| (*category, agent.name()))
            .collect();
        names.sort();
        f.debug_struct("AgentRegistry").field("agents", &names).finish()
    }
}
