// SPDX-FileCopyrightText: 2026 Helpdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Prompt construction and label parsing shared by the remote classifiers.

use std::str::FromStr;

use crate::error::ClassifyError;
use crate::types::Category;

/// System instruction sent ahead of every classification request.
pub const SYSTEM_INSTRUCTION: &str = "You are a query router for a healthcare clinic's \
customer service desk. You classify each customer query into exactly one category and \
answer with the category label only.";

/// Builds the user prompt for one query and the offered categories.
pub fn build_prompt(query: &str, categories: &[Category]) -> String {
    let mut prompt = String::from(
        "Classify the customer query into exactly one of these categories:\n\n",
    );
    for category in categories {
        prompt.push_str(&format!("- {category}: {}\n", category.description()));
    }
    prompt.push_str(
        "\nRules:\n\
         - General or ambiguous questions go to faq.\n\
         - Questions about processes (how to book, reschedule, cancel or refill) go to faq.\n\
         - Only requests about one specific existing order, appointment, lab test or \
           prescription go to order_status.\n\
         - Answer with the category label only, nothing else.\n\n",
    );
    prompt.push_str(&format!("Query: \"{}\"\n\nCategory:", query.trim()));
    prompt
}

/// Parses a model reply into one of `categories`.
///
/// Takes the first non-empty line, strips whitespace, quotes, backticks and
/// trailing punctuation, and lower-cases it. Anything that is not one of the
/// offered labels is `Malformed`.
pub fn parse_label(text: &str, categories: &[Category]) -> Result<Category, ClassifyError> {
    let malformed = || ClassifyError::Malformed {
        output: text.to_string(),
    };

    let line = text
        .lines()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .ok_or_else(malformed)?;

    let label = line
        .trim_matches(|c: char| c.is_whitespace() || matches!(c, '"' | '\'' | '`'))
        .trim_end_matches(|c: char| matches!(c, '.' | ',' | ';' | ':' | '!' | '?'))
        .trim_matches(|c: char| c.is_whitespace() || matches!(c, '"' | '\'' | '`'))
        .to_lowercase();

    let category = Category::from_str(&label).map_err(|_| malformed())?;
    if categories.contains(&category) {
        Ok(category)
    } else {
        Err(malformed())
    }
}
