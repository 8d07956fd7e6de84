// SPDX-FileCopyrightText: 2026 Helpdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! FAQ agent: answers general clinic questions from a keyword-scored table.

use std::path::Path;
use std::sync::Arc;

use helpdesk_core::{Agent, AgentResponse, HelpdeskError, Query, ResponseOutcome};
use serde::{Deserialize, Serialize};

use crate::safety;

/// Response when no FAQ entry matches.
pub const NO_ANSWER_TEXT: &str = "I couldn't find a specific answer to your question. \
Please contact our office at (555) 123-4567 for assistance, or rephrase your question.";

const BUILTIN_FAQS: &str = include_str!("../data/faqs.json");

/// One question/answer pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaqEntry {
    pub id: u32,
    pub topic: String,
    pub question: String,
    /// Lower-case phrases; each one found in a query adds one to the score.
    pub keywords: Vec<String>,
    pub answer: String,
}

impl FaqEntry {
    /// Number of keywords contained in the lower-cased query.
    pub fn score(&self, query_lower: &str) -> usize {
        self.keywords
            .iter()
            .filter(|k| query_lower.contains(k.to_lowercase().as_str()))
            .count()
    }
}

#[derive(Debug, Deserialize)]
struct FaqFile {
    faqs: Vec<FaqEntry>,
}

/// Read-only FAQ table.
#[derive(Debug, Clone, Default)]
pub struct FaqTable {
    entries: Vec<FaqEntry>,
}

impl FaqTable {
    pub fn new(entries: Vec<FaqEntry>) -> Self {
        Self { entries }
    }

    /// The table compiled into the binary.
    pub fn builtin() -> Result<Self, HelpdeskError> {
        Self::from_json_str(BUILTIN_FAQS, Path::new("<built-in faqs>"))
    }

    /// Parses a `{"faqs": [...]}` document; `origin` names it in errors.
    pub fn from_json_str(json: &str, origin: &Path) -> Result<Self, HelpdeskError> {
        let file: FaqFile = serde_json::from_str(json).map_err(|e| HelpdeskError::Data {
            path: origin.to_path_buf(),
            source: Box::new(e),
        })?;
        Ok(Self::new(file.faqs))
    }

    pub fn from_path(path: &Path) -> Result<Self, HelpdeskError> {
        let json = std::fs::read_to_string(path).map_err(|e| HelpdeskError::Data {
            path: path.to_path_buf(),
            source: Box::new(e),
        })?;
        let table = Self::from_json_str(&json, path)?;
        tracing::debug!(path = %path.display(), entries = table.len(), "loaded FAQ table");
        Ok(table)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[FaqEntry] {
        &self.entries
    }

    /// Best-scoring entry for `query`. Ties go to the earlier entry; a zero
    /// score never matches.
    pub fn lookup(&self, query: &str) -> Option<&FaqEntry> {
        let lower = query.to_lowercase();
        let mut best: Option<(&FaqEntry, usize)> = None;
        for entry in &self.entries {
            let score = entry.score(&lower);
            if score > best.map_or(0, |(_, s)| s) {
                best = Some((entry, score));
            }
        }
        best.map(|(entry, _)| entry)
    }
}

/// Answers general questions from a [`FaqTable`].
#[derive(Debug, Clone)]
pub struct FaqAgent {
    table: Arc<FaqTable>,
}

impl FaqAgent {
    pub const NAME: &'static str = "faq";

    pub fn new(table: Arc<FaqTable>) -> Self {
        Self { table }
    }
}

impl Agent for FaqAgent {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn handle(&self, query: &Query) -> AgentResponse {
        if let Some(refusal) = safety::refusal(Self::NAME, query.text()) {
            return refusal;
        }
        match self.table.lookup(query.text()) {
            Some(entry) => {
                tracing::debug!(topic = %entry.topic, "FAQ match");
                AgentResponse::new(Self::NAME, entry.answer.clone(), ResponseOutcome::Answered)
            }
            None => AgentResponse::new(Self::NAME, NO_ANSWER_TEXT, ResponseOutcome::NotFound),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: u32, topic: &str, keywords: &[&str]) -> FaqEntry {
        FaqEntry {
            id,
            topic: topic.into(),
            question: format!("{topic}?"),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
            answer: format!("{topic} answer"),
        }
    }

    fn agent() -> FaqAgent {
        FaqAgent::new(Arc::new(FaqTable::builtin().unwrap()))
    }

    #[test]
    fn builtin_table_loads() {
        let table = FaqTable::builtin().unwrap();
        assert!(table.len() >= 12);
        assert!(table.entries().iter().all(|e| !e.keywords.is_empty()));
    }

    #[test]
    fn highest_score_wins() {
        let table = FaqTable::new(vec![
            entry(1, "hours", &["hours"]),
            entry(2, "weekend", &["hours", "saturday"]),
        ]);
        assert_eq!(
            table.lookup("Saturday hours?").map(|e| e.topic.as_str()),
            Some("weekend")
        );
    }

    #[test]
    fn ties_go_to_the_first_entry() {
        let table = FaqTable::new(vec![
            entry(1, "first", &["visit"]),
            entry(2, "second", &["visit"]),
        ]);
        assert_eq!(
            table.lookup("my visit").map(|e| e.topic.as_str()),
            Some("first")
        );
    }

    #[test]
    fn clinic_hours_are_answered() {
        let response = agent().handle(&Query::new("What are your clinic hours?"));
        assert_eq!(response.outcome(), ResponseOutcome::Answered);
        assert!(response.text().to_lowercase().contains("hours"));
        assert_eq!(response.agent(), "faq");
    }

    #[test]
    fn builtin_answers_cover_common_questions() {
        let agent = agent();
        for (query, needle) in [
            ("Do you accept Blue Cross insurance?", "Blue Cross"),
            ("Where are you located?", "Health Street"),
            ("Is there parking at your clinic?", "parking"),
            ("Do you offer telehealth visits?", "telehealth"),
            ("What's your cancellation policy?", "24 hours"),
            ("Can I get a prescription refilled?", "Refill"),
            ("What should I bring to my first visit?", "photo ID"),
            ("Do you have a lab on site?", "laboratory on site"),
            ("How do I access my test results?", "patient portal"),
        ] {
            let response = agent.handle(&Query::new(query));
            assert!(
                response.text().contains(needle),
                "{query}: {}",
                response.text()
            );
        }
    }

    #[test]
    fn no_match_returns_designated_text() {
        let response = agent().handle(&Query::new("Tell me a joke about penguins"));
        assert_eq!(response.outcome(), ResponseOutcome::NotFound);
        assert_eq!(response.text(), NO_ANSWER_TEXT);
    }

    #[test]
    fn medical_advice_is_refused() {
        let response = agent().handle(&Query::new("What dosage of insulin should I take?"));
        assert_eq!(response.outcome(), ResponseOutcome::Refused);
        assert_eq!(response.text(), safety::MEDICAL_ADVICE_REFUSAL);
    }

    #[test]
    fn invalid_json_is_a_data_error() {
        let err = FaqTable::from_json_str("{\"faqs\": 3}", Path::new("bad.json")).unwrap_err();
        assert!(matches!(err, HelpdeskError::Data { .. }));
        assert!(err.to_string().contains("bad.json"));
    }
}
