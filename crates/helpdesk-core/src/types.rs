// SPDX-FileCopyrightText: 2026 Helpdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types shared by the router, the agents and the evaluation engine.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, IntoStaticStr};

use crate::error::{HelpdeskError, RouteFailure};

/// Optional metadata attached to a query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryMetadata {
    /// Channel the query arrived on (e.g. "cli", "web").
    pub channel: Option<String>,
}

/// A free-text customer query.
///
/// Queries have no identity beyond their text: two queries with the same
/// text are independent occurrences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Query {
    text: String,
    #[serde(default)]
    metadata: QueryMetadata,
}

impl Query {
    /// Creates a query from raw text with empty metadata.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            metadata: QueryMetadata::default(),
        }
    }

    /// Sets the source channel.
    pub fn with_channel(mut self, channel: impl Into<String>) -> Self {
        self.metadata.channel = Some(channel.into());
        self
    }

    /// Raw query text, exactly as received.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn metadata(&self) -> &QueryMetadata {
        &self.metadata
    }

    /// Rejects empty or whitespace-only text.
    pub fn validate(&self) -> Result<(), HelpdeskError> {
        if self.text.trim().is_empty() {
            return Err(HelpdeskError::InvalidQuery {
                reason: "query text is empty".to_string(),
            });
        }
        Ok(())
    }
}

impl From<&str> for Query {
    fn from(text: &str) -> Self {
        Query::new(text)
    }
}

impl From<String> for Query {
    fn from(text: String) -> Self {
        Query::new(text)
    }
}

/// The handler label a query is routed to.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Display,
    EnumString,
    IntoStaticStr,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// General clinic information: hours, insurance, location, processes.
    Faq,
    /// Status of a specific appointment, lab test or prescription.
    OrderStatus,
    /// Intent could not be determined.
    Unknown,
}

impl Category {
    /// Categories offered to classifiers. `Unknown` is never a valid answer.
    pub const ROUTABLE: [Category; 2] = [Category::Faq, Category::OrderStatus];

    /// Short description used when prompting remote classifiers.
    pub fn description(&self) -> &'static str {
        match self {
            Category::Faq => {
                "general clinic information: hours, location, insurance, services, \
                 policies, and how-to questions about booking, rescheduling, \
                 cancelling or refilling"
            }
            Category::OrderStatus => {
                "the status of one specific existing appointment, lab test or \
                 prescription, usually referenced by an ID such as APT-12345"
            }
            Category::Unknown => "intent could not be determined",
        }
    }
}

/// Routing strategy: which classifier backs the router.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumString,
    IntoStaticStr,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Deterministic keyword rules.
    Keyword,
    /// Google Gemini.
    Gemini,
    /// Azure OpenAI GPT-4o.
    Gpt,
}

impl Strategy {
    pub const ALL: [Strategy; 3] = [Strategy::Keyword, Strategy::Gemini, Strategy::Gpt];

    /// Whether the strategy calls a remote classification service.
    pub fn is_remote(&self) -> bool {
        !matches!(self, Strategy::Keyword)
    }

    /// Human-facing name used in reports.
    pub fn display_name(&self) -> &'static str {
        match self {
            Strategy::Keyword => "Keyword",
            Strategy::Gemini => "Gemini",
            Strategy::Gpt => "GPT-4o",
        }
    }
}

/// Token usage reported by a remote classifier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

/// Successful output of a classifier.
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub category: Category,
    /// Confidence in the label (0.0-1.0), if the classifier reports one.
    pub confidence: Option<f32>,
    /// Token usage, for remote classifiers.
    pub usage: Option<TokenUsage>,
}

impl Classification {
    pub fn new(category: Category) -> Self {
        Self {
            category,
            confidence: None,
            usage: None,
        }
    }

    pub fn with_confidence(mut self, confidence: f32) -> Self {
        self.confidence = Some(confidence);
        self
    }

    pub fn with_usage(mut self, usage: TokenUsage) -> Self {
        self.usage = Some(usage);
        self
    }
}

/// How an agent's response relates to the stored data.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, IntoStaticStr, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ResponseOutcome {
    /// A stored answer or record was returned.
    Answered,
    /// Lookup found nothing; the response says so explicitly.
    NotFound,
    /// An order lookup was requested without an identifier.
    NeedsIdentifier,
    /// The request was out of scope (medical advice) and was refused.
    Refused,
    /// Intent could not be determined.
    Undetermined,
}

/// Text produced by an agent, tagged with the agent that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentResponse {
    agent: &'static str,
    text: String,
    outcome: ResponseOutcome,
}

impl AgentResponse {
    pub fn new(agent: &'static str, text: impl Into<String>, outcome: ResponseOutcome) -> Self {
        Self {
            agent,
            text: text.into(),
            outcome,
        }
    }

    /// Name of the agent that produced the response.
    pub fn agent(&self) -> &'static str {
        self.agent
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn outcome(&self) -> ResponseOutcome {
        self.outcome
    }
}

/// The path by which a routing decision was reached.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, IntoStaticStr, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Resolution {
    /// The configured classifier answered.
    Classified,
    /// A structured identifier routed the query without classification.
    IdentifierMatch,
    /// The configured classifier failed and the keyword fallback answered.
    Fallback,
    /// Both the configured classifier and the fallback failed.
    Unavailable,
}

/// The outcome of routing one query. Created once, never mutated.
#[derive(Debug, Clone)]
pub struct RoutingDecision {
    query: Query,
    category: Category,
    strategy_used: Strategy,
    resolution: Resolution,
    latency: Duration,
    error: Option<RouteFailure>,
    response: AgentResponse,
}

impl RoutingDecision {
    pub fn new(
        query: Query,
        category: Category,
        strategy_used: Strategy,
        resolution: Resolution,
        latency: Duration,
        error: Option<RouteFailure>,
        response: AgentResponse,
    ) -> Self {
        Self {
            query,
            category,
            strategy_used,
            resolution,
            latency,
            error,
            response,
        }
    }

    pub fn query(&self) -> &Query {
        &self.query
    }

    /// The category the query was routed to.
    pub fn category(&self) -> Category {
        self.category
    }

    /// Strategy whose classifier produced the category.
    pub fn strategy_used(&self) -> Strategy {
        self.strategy_used
    }

    pub fn resolution(&self) -> Resolution {
        self.resolution
    }

    /// Wall-clock duration of the routing call.
    pub fn latency(&self) -> Duration {
        self.latency
    }

    /// False only when classification was unavailable.
    pub fn succeeded(&self) -> bool {
        !matches!(
            self.error,
            Some(RouteFailure::ClassificationUnavailable { .. })
        )
    }

    pub fn error(&self) -> Option<&RouteFailure> {
        self.error.as_ref()
    }

    pub fn response(&self) -> &AgentResponse {
        &self.response
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;
    use crate::error::FailureKind;

    #[test]
    fn empty_and_blank_queries_are_invalid() {
        assert!(Query::new("").validate().is_err());
        assert!(Query::new("   \t\n").validate().is_err());
        assert!(Query::new("hours?").validate().is_ok());
    }

    #[test]
    fn query_keeps_raw_text_and_channel() {
        let q = Query::new("  Where Is My ORDER?  ").with_channel("web");
        assert_eq!(q.text(), "  Where Is My ORDER?  ");
        assert_eq!(q.metadata().channel.as_deref(), Some("web"));
    }

    #[test]
    fn category_labels_round_trip() {
        for category in [Category::Faq, Category::OrderStatus, Category::Unknown] {
            let label = category.to_string();
            assert_eq!(Category::from_str(&label).unwrap(), category);
        }
        assert_eq!(Category::OrderStatus.to_string(), "order_status");
        assert!(Category::from_str("billing").is_err());
    }

    #[test]
    fn routable_set_excludes_unknown() {
        assert!(!Category::ROUTABLE.contains(&Category::Unknown));
    }

    #[test]
    fn strategy_labels() {
        assert_eq!(Strategy::from_str("gpt").unwrap(), Strategy::Gpt);
        assert_eq!(Strategy::Keyword.to_string(), "keyword");
        assert!(!Strategy::Keyword.is_remote());
        assert!(Strategy::Gemini.is_remote());
    }

    #[test]
    fn decision_succeeded_reflects_unavailable_only() {
        let response = AgentResponse::new("faq", "ok", ResponseOutcome::Answered);
        let recovered = RoutingDecision::new(
            Query::new("x"),
            Category::Faq,
            Strategy::Keyword,
            Resolution::Fallback,
            Duration::from_millis(3),
            Some(RouteFailure::ClassificationTransientFailure {
                kind: FailureKind::Timeout,
                message: "timed out".into(),
            }),
            response.clone(),
        );
        assert!(recovered.succeeded());

        let unavailable = RoutingDecision::new(
            Query::new("x"),
            Category::Unknown,
            Strategy::Keyword,
            Resolution::Unavailable,
            Duration::from_millis(3),
            Some(RouteFailure::ClassificationUnavailable {
                primary: FailureKind::Transient,
                fallback: FailureKind::Transient,
            }),
            response,
        );
        assert!(!unavailable.succeeded());
    }

    #[test]
    fn category_serializes_snake_case() {
        let json = serde_json::to_string(&Category::OrderStatus).unwrap();
        assert_eq!(json, "\"order_status\"");
    }
}
