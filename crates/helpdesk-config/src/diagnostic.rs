// SPDX-FileCopyrightText: 2026 Helpdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Figment-to-miette error bridge with "did you mean" suggestions.
//!
//! Deserialization failures become [`ConfigError`] diagnostics carrying the
//! offending key, the valid keys of its section, a Jaro-Winkler suggestion
//! and, when the key can be located in a config file, a labelled source span.

#![allow(unused_assignments)] // miette's Diagnostic derive generates code triggering this lint

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// Minimum Jaro-Winkler similarity for a suggestion.
const SUGGESTION_THRESHOLD: f64 = 0.75;

/// A configuration error with diagnostic information.
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    /// An unknown key was found in the configuration.
    #[error("unknown configuration key `{key}`")]
    #[diagnostic(
        code(helpdesk::config::unknown_key),
        help("{}", unknown_key_help(suggestion.as_deref(), valid_keys))
    )]
    UnknownKey {
        key: String,
        /// Closest valid key, if any is close enough.
        suggestion: Option<String>,
        /// Comma-separated valid keys for the section.
        valid_keys: String,
        #[label("this key is not recognized")]
        span: Option<SourceSpan>,
        #[source_code]
        src: Option<NamedSource<String>>,
    },

    /// A configuration value has the wrong type.
    #[error("invalid type for key `{key}`: {detail}")]
    #[diagnostic(code(helpdesk::config::invalid_type), help("expected {expected}"))]
    InvalidType {
        key: String,
        detail: String,
        expected: String,
        #[label("wrong type here")]
        span: Option<SourceSpan>,
        #[source_code]
        src: Option<NamedSource<String>>,
    },

    /// A required configuration key is missing.
    #[error("missing required key `{key}`")]
    #[diagnostic(
        code(helpdesk::config::missing_key),
        help("add `{key} = <value>` to your helpdesk.toml")
    )]
    MissingKey { key: String },

    /// A semantic validation failure.
    #[error("validation error: {message}")]
    #[diagnostic(code(helpdesk::config::validation))]
    Validation { message: String },

    /// Catch-all for other configuration errors.
    #[error("configuration error: {0}")]
    #[diagnostic(code(helpdesk::config::other))]
    Other(String),
}

fn unknown_key_help(suggestion: Option<&str>, valid_keys: &str) -> String {
    match suggestion {
        Some(s) => format!("did you mean `{s}`? Valid keys: {valid_keys}"),
        None => format!("valid keys: {valid_keys}"),
    }
}

/// Convert a `figment::Error` (which may hold several errors) into diagnostics.
///
/// `toml_sources` pairs file paths with their contents so spans can be
/// resolved against the file an error came from.
pub fn figment_to_config_errors(
    err: figment::Error,
    toml_sources: &[(String, String)],
) -> Vec<ConfigError> {
    use figment::error::Kind;

    err.into_iter()
        .map(|error| {
            let section: Vec<String> = error.path.iter().map(|s| s.to_string()).collect();
            match &error.kind {
                Kind::UnknownField(field, expected) => {
                    let valid_keys: Vec<&str> = expected.to_vec();
                    let (span, src) = locate(&error, &section, field, toml_sources);
                    ConfigError::UnknownKey {
                        key: field.clone(),
                        suggestion: suggest_key(field, &valid_keys),
                        valid_keys: valid_keys.join(", "),
                        span,
                        src,
                    }
                }
                Kind::MissingField(field) => ConfigError::MissingKey {
                    key: field.clone().into_owned(),
                },
                Kind::InvalidType(actual, expected) => {
                    let key = section.join(".");
                    let (span, src) = match section.split_last() {
                        Some((field, parent)) => locate(&error, parent, field, toml_sources),
                        None => (None, None),
                    };
                    ConfigError::InvalidType {
                        key,
                        detail: format!("found {actual}, expected {expected}"),
                        expected: expected.to_string(),
                        span,
                        src,
                    }
                }
                _ => ConfigError::Other(error.to_string()),
            }
        })
        .collect()
}

/// Resolve a key's span in the TOML file the error was read from.
fn locate(
    error: &figment::error::Error,
    section: &[String],
    field: &str,
    toml_sources: &[(String, String)],
) -> (Option<SourceSpan>, Option<NamedSource<String>>) {
    let source_path = error
        .metadata
        .as_ref()
        .and_then(|m| m.source.as_ref())
        .and_then(|s| match s {
            figment::Source::File(path) => Some(path.display().to_string()),
            _ => None,
        });

    let source = match source_path {
        Some(path) => toml_sources.iter().find(|(p, _)| *p == path),
        // Inline strings carry no file metadata.
        None => toml_sources.iter().find(|(p, _)| p == "<inline>"),
    };

    let Some((path, content)) = source else {
        return (None, None);
    };

    match find_key_offset(content, section, field) {
        Some(offset) => (
            Some(SourceSpan::new(offset.into(), field.len())),
            Some(NamedSource::new(path, content.clone())),
        ),
        None => (None, None),
    }
}

/// Find the byte offset of `field` in TOML `content` under the section `path`.
///
/// For `path = ["routing"]` the search starts after the `[routing]` header
/// and stops at the next header. Top-level keys are searched from the start,
/// also matching a `[field]` table header.
pub fn find_key_offset(content: &str, path: &[String], field: &str) -> Option<usize> {
    let header = (!path.is_empty()).then(|| format!("[{}]", path.join(".")));

    let mut in_section = header.is_none();
    let mut offset = 0;
    for line in content.split_inclusive('\n') {
        let trimmed = line.trim_start();
        let indent = line.len() - trimmed.len();

        if trimmed.starts_with('[') {
            let name = trimmed.trim_end();
            match &header {
                Some(h) => in_section = name == h,
                None => {
                    if name == format!("[{field}]") {
                        return Some(offset + indent + 1);
                    }
                    in_section = false;
                }
            }
        } else if in_section {
            if let Some(after) = trimmed.strip_prefix(field) {
                if after.starts_with([' ', '=', '\t']) {
                    return Some(offset + indent);
                }
            }
        }
        offset += line.len();
    }

    None
}

/// Suggest the closest valid key by Jaro-Winkler similarity, if above threshold.
pub fn suggest_key(unknown: &str, valid_keys: &[&str]) -> Option<String> {
    valid_keys
        .iter()
        .map(|&key| (key, strsim::jaro_winkler(unknown, key)))
        .filter(|(_, score)| *score > SUGGESTION_THRESHOLD)
        .max_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(key, _)| key.to_string())
}

/// Render diagnostics to stderr with miette's graphical handler.
pub fn render_errors(errors: &[ConfigError]) {
    use miette::GraphicalReportHandler;

    let handler = GraphicalReportHandler::new();
    for error in errors {
        let mut buf = String::new();
        let diagnostic: &dyn Diagnostic = error;
        if handler.render_report(&mut buf, diagnostic).is_ok() {
            eprint!("{buf}");
        } else {
            eprintln!("Error: {error}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suggest_stratgy_for_strategy() {
        let valid = &[
            "strategy",
            "timeout_secs",
            "identifier_short_circuit",
            "single_word_defaults_to_faq",
        ];
        assert_eq!(suggest_key("stratgy", valid), Some("strategy".to_string()));
    }

    #[test]
    fn suggest_api_ky_for_api_key() {
        let valid = &["api_key", "model", "base_url"];
        assert_eq!(suggest_key("api_ky", valid), Some("api_key".to_string()));
    }

    #[test]
    fn no_suggestion_for_distant_typo() {
        let valid = &["name", "log_level"];
        assert_eq!(suggest_key("zzzzzz", valid), None);
    }

    #[test]
    fn key_offset_is_scoped_to_its_section() {
        let content = "[gemini]\nmodel = \"x\"\n\n[openai]\nmodel = \"y\"\n";
        let path = vec!["openai".to_string()];
        let o = find_key_offset(content, &path, "model").unwrap();
        assert_eq!(&content[o..o + 5], "model");
        assert!(o > content.find("[openai]").unwrap());
    }

    #[test]
    fn key_offset_finds_top_level_table() {
        let content = "[agent]\nname = \"a\"\n[logging]\nlevel = 1\n";
        let o = find_key_offset(content, &[], "logging").unwrap();
        assert_eq!(&content[o..o + 7], "logging");
    }

    #[test]
    fn key_offset_missing_key() {
        let content = "[agent]\nname = \"a\"\n";
        assert_eq!(
            find_key_offset(content, &["agent".to_string()], "naem"),
            None
        );
    }
}
