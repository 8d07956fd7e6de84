// SPDX-FileCopyrightText: 2026 Helpdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Structured order identifiers such as `APT-12345`, `LAB-67890` or `RX-11223`.

use std::sync::LazyLock;

use regex::Regex;

/// Two or three letters, a dash, five digits, as a whole word.
static IDENTIFIER_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b([A-Z]{2,3}-\d{5})\b").expect("identifier pattern is valid")
});

/// Returns the first structured identifier in `text`, upper-cased.
///
/// Matching is case-insensitive: `apt-12345` is found as `APT-12345`.
pub fn find_identifier(text: &str) -> Option<String> {
    let upper = text.to_uppercase();
    IDENTIFIER_PATTERN
        .captures(&upper)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Whether `text` contains a structured identifier.
pub fn contains_identifier(text: &str) -> bool {
    IDENTIFIER_PATTERN.is_match(&text.to_uppercase())
}
