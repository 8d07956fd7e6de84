// SPDX-FileCopyrightText: 2026 Helpdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Deterministic keyword classification.
//!
//! Routes queries between `faq` and `order_status` with fixed rules. No
//! network, no latency, never fails. Also serves as the router's fallback
//! when a remote classifier is unavailable.

use async_trait::async_trait;
use helpdesk_core::{
    Category, Classification, ClassifyError, Classifier, Query, Strategy, contains_identifier,
};

/// Keywords suggesting a question about a specific order.
const ORDER_KEYWORDS: &[&str] = &[
    "order",
    "appointment",
    "lab",
    "test",
    "prescription",
    "status",
    "result",
    "scheduled",
    "ready",
    "pickup",
    "confirmed",
];

/// Keywords suggesting a general clinic question.
const FAQ_KEYWORDS: &[&str] = &[
    "hours",
    "open",
    "insurance",
    "located",
    "location",
    "directions",
    "parking",
    "telehealth",
    "policy",
    "bring",
    "accept",
    "cost",
    "price",
    "refill",
    "schedule",
    "book",
    "new patient",
    "do you",
    "how do i",
    "how can i",
    "what should i",
];

/// Query text split into lower-case alphanumeric words.
struct Tokens {
    words: Vec<String>,
    /// Words joined by single spaces, padded at both ends.
    padded: String,
}

impl Tokens {
    fn new(text: &str) -> Self {
        let words: Vec<String> = text
            .to_lowercase()
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
            .map(str::to_string)
            .collect();
        let padded = format!(" {} ", words.join(" "));
        Self { words, padded }
    }

    /// Single words match a token prefix (`refill` matches `refilled`);
    /// phrases match whole words in sequence.
    fn matches(&self, keyword: &str) -> bool {
        if keyword.contains(' ') {
            self.padded.contains(&format!(" {keyword} "))
        } else {
            self.words.iter().any(|w| w.starts_with(keyword))
        }
    }

    fn matches_any(&self, keywords: &[&str]) -> bool {
        keywords.iter().any(|k| self.matches(k))
    }
}

/// Rule-based classifier.
#[derive(Debug, Clone, Copy)]
pub struct KeywordClassifier {
    single_word_defaults_to_faq: bool,
}

impl KeywordClassifier {
    pub fn new() -> Self {
        Self {
            single_word_defaults_to_faq: true,
        }
    }

    /// Whether single-word queries without an identifier go straight to `faq`.
    pub fn with_single_word_default(mut self, enabled: bool) -> Self {
        self.single_word_defaults_to_faq = enabled;
        self
    }

    /// Classifies raw text. Same text, same answer.
    pub fn classify_text(&self, text: &str) -> Classification {
        if contains_identifier(text) {
            return Classification::new(Category::OrderStatus).with_confidence(1.0);
        }

        let tokens = Tokens::new(text);
        if self.single_word_defaults_to_faq && tokens.words.len() <= 1 {
            return Classification::new(Category::Faq).with_confidence(0.5);
        }

        let order = tokens.matches_any(ORDER_KEYWORDS);
        let faq = tokens.matches_any(FAQ_KEYWORDS);
        match (order, faq) {
            (true, false) => Classification::new(Category::OrderStatus).with_confidence(0.8),
            (false, true) => Classification::new(Category::Faq).with_confidence(0.8),
            // Ambiguous: the general path discloses nothing about a specific order.
            (true, true) => Classification::new(Category::Faq).with_confidence(0.5),
            (false, false) => Classification::new(Category::Faq).with_confidence(0.3),
        }
    }
}

impl Default for KeywordClassifier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Classifier for KeywordClassifier {
    fn name(&self) -> &str {
        "keyword"
    }

    fn strategy(&self) -> Strategy {
        Strategy::Keyword
    }

    async fn classify(
        &self,
        query: &Query,
        _categories: &[Category],
    ) -> Result<Classification, ClassifyError> {
        let classification = self.classify_text(query.text());
        tracing::debug!(
            category = %classification.category,
            confidence = classification.confidence.unwrap_or_default(),
            "keyword classification"
        );
        Ok(classification)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn category(text: &str) -> Category {
        KeywordClassifier::new().classify_text(text).category
    }

    #[test]
    fn identifier_routes_to_order_status() {
        let c = KeywordClassifier::new().classify_text("Where is my order APT-12345?");
        assert_eq!(c.category, Category::OrderStatus);
        assert_eq!(c.confidence, Some(1.0));
        assert_eq!(category("I need to know about LAB-90123"), Category::OrderStatus);
    }

    #[test]
    fn order_keywords_without_faq_keywords() {
        assert_eq!(category("Is my appointment confirmed?"), Category::OrderStatus);
        assert_eq!(category("Has my prescription been filled?"), Category::OrderStatus);
    }

    #[test]
    fn faq_keywords_without_order_keywords() {
        assert_eq!(category("What time do you open on Saturday?"), Category::Faq);
        assert_eq!(category("Where are you located?"), Category::Faq);
        assert_eq!(category("Is there parking at your clinic?"), Category::Faq);
    }

    #[test]
    fn both_matched_prefers_faq() {
        assert_eq!(category("How can I schedule an appointment?"), Category::Faq);
        assert_eq!(category("Do you have a lab on site?"), Category::Faq);
        assert_eq!(category("How do I access my test results?"), Category::Faq);
        assert_eq!(category("Can I get a prescription refilled?"), Category::Faq);
    }

    #[test]
    fn no_signal_defaults_to_faq() {
        assert_eq!(category("Tell me something nice"), Category::Faq);
    }

    #[test]
    fn single_word_defaults_to_faq() {
        assert_eq!(category("appointment"), Category::Faq);
        assert_eq!(category("  status?  "), Category::Faq);

        let strict = KeywordClassifier::new().with_single_word_default(false);
        assert_eq!(strict.classify_text("appointment").category, Category::OrderStatus);
    }

    #[test]
    fn single_word_identifier_still_routes_to_order_status() {
        assert_eq!(category("RX-11223"), Category::OrderStatus);
    }

    #[test]
    fn prefix_matching_is_word_anchored() {
        // `reschedule` does not start with `schedule`.
        assert_eq!(
            category("Can I reschedule or cancel my appointment for tomorrow?"),
            Category::OrderStatus
        );
        // `refilled` starts with `refill`.
        assert!(Tokens::new("Can it be refilled").matches("refill"));
        assert!(!Tokens::new("Please reschedule").matches("schedule"));
    }

    #[test]
    fn phrases_match_whole_words() {
        let tokens = Tokens::new("How do I pay?");
        assert!(tokens.matches("how do i"));
        assert!(!Tokens::new("How do Ian's results look").matches("how do i"));
    }

    #[tokio::test]
    async fn classifier_port_never_fails() {
        let classifier = KeywordClassifier::new();
        let result = classifier
            .classify(&Query::new("anything at all"), &Category::ROUTABLE)
            .await;
        assert!(result.is_ok());
        assert_eq!(classifier.strategy(), Strategy::Keyword);
    }

    proptest! {
        #[test]
        fn classification_is_deterministic(text in ".{0,80}") {
            let classifier = KeywordClassifier::new();
            let first = classifier.classify_text(&text);
            let second = classifier.classify_text(&text);
            prop_assert_eq!(first, second);
        }

        #[test]
        fn never_returns_unknown(text in ".{0,80}") {
            let c = KeywordClassifier::new().classify_text(&text);
            prop_assert!(Category::ROUTABLE.contains(&c.category));
        }
    }
}
