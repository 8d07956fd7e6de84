// SPDX-FileCopyrightText: 2026 Helpdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the helpdesk configuration system.

use std::io::Write;

use helpdesk_config::diagnostic::{ConfigError, suggest_key};
use helpdesk_config::model::HelpdeskConfig;
use helpdesk_config::{load_and_validate_path, load_and_validate_str, load_config_from_str};

/// Valid TOML with all known sections deserializes successfully.
#[test]
fn valid_toml_deserializes_into_helpdesk_config() {
    let toml = r#"
[agent]
name = "front-desk"
log_level = "debug"

[routing]
strategy = "gemini"
timeout_secs = 10
identifier_short_circuit = false
single_word_defaults_to_faq = false

[gemini]
api_key = "gm-key"
model = "gemini-2.0-flash"
max_retries = 2
min_interval_ms = 6000

[openai]
api_key = "az-key"
endpoint = "https://clinic.openai.azure.com"
deployment = "gpt-4o-mini"

[data]
faq_path = "/srv/helpdesk/faqs.json"
orders_path = "/srv/helpdesk/orders.json"

[evaluation]
corpus_dir = "/srv/helpdesk/corpus"
strategies = ["keyword", "gpt"]
report_path = "out/report.md"
json_report_path = "out/report.json"
"#;

    let config = load_config_from_str(toml).expect("valid TOML should deserialize");
    assert_eq!(config.agent.name, "front-desk");
    assert_eq!(config.agent.log_level, "debug");
    assert_eq!(config.routing.strategy, "gemini");
    assert_eq!(config.routing.timeout_secs, 10);
    assert!(!config.routing.identifier_short_circuit);
    assert!(!config.routing.single_word_defaults_to_faq);
    assert_eq!(config.gemini.api_key.as_deref(), Some("gm-key"));
    assert_eq!(config.gemini.model, "gemini-2.0-flash");
    assert_eq!(config.gemini.max_retries, 2);
    assert_eq!(config.gemini.min_interval_ms, 6000);
    assert_eq!(
        config.openai.endpoint.as_deref(),
        Some("https://clinic.openai.azure.com")
    );
    assert_eq!(config.openai.deployment, "gpt-4o-mini");
    assert_eq!(config.openai.api_version, "2024-02-15-preview");
    assert_eq!(
        config.data.orders_path.as_deref(),
        Some("/srv/helpdesk/orders.json")
    );
    assert_eq!(config.evaluation.strategies, vec!["keyword", "gpt"]);
    assert_eq!(
        config.evaluation.json_report_path.as_deref(),
        Some("out/report.json")
    );
}

/// Missing optional sections use defaults without error.
#[test]
fn missing_optional_sections_use_defaults() {
    let config = load_config_from_str("").expect("empty TOML should use defaults");

    assert_eq!(config.agent.name, "helpdesk");
    assert_eq!(config.agent.log_level, "info");
    assert_eq!(config.routing.strategy, "keyword");
    assert_eq!(config.routing.timeout_secs, 30);
    assert!(config.routing.identifier_short_circuit);
    assert!(config.routing.single_word_defaults_to_faq);
    assert!(config.gemini.api_key.is_none());
    assert_eq!(config.gemini.model, "gemini-2.5-flash");
    assert_eq!(config.gemini.min_interval_ms, 7000);
    assert!(config.openai.endpoint.is_none());
    assert_eq!(config.openai.deployment, "gpt-4o");
    assert_eq!(config.openai.min_interval_ms, 0);
    assert!(config.data.faq_path.is_none());
    assert!(config.evaluation.corpus_dir.is_none());
    assert_eq!(config.evaluation.report_path, "evaluation/results.md");
}

/// Unknown field in [routing] produces an error naming the key.
#[test]
fn unknown_field_in_routing_produces_error() {
    let toml = r#"
[routing]
stratgy = "gpt"
"#;

    let err = load_config_from_str(toml).expect_err("should reject unknown field");
    let err_str = format!("{err}");
    assert!(
        err_str.contains("unknown field") || err_str.contains("stratgy"),
        "error should mention unknown field, got: {err_str}"
    );
}

/// Unexpected top-level section is rejected by deny_unknown_fields.
#[test]
fn deny_unknown_fields_at_top_level() {
    let toml = r#"
[logging]
level = "debug"
"#;

    let err = load_config_from_str(toml).expect_err("unknown top-level section should be rejected");
    let err_str = format!("{err}");
    assert!(
        err_str.contains("unknown field") || err_str.contains("logging"),
        "error should mention unknown field, got: {err_str}"
    );
}

/// Dotted overrides (what the env provider produces) win over TOML.
#[test]
fn dotted_override_wins_over_toml() {
    use figment::{
        Figment,
        providers::{Format, Serialized, Toml},
    };

    let toml_content = r#"
[gemini]
api_key = "from-toml"
"#;

    let config: HelpdeskConfig = Figment::new()
        .merge(Serialized::defaults(HelpdeskConfig::default()))
        .merge(Toml::string(toml_content))
        .merge(("gemini.api_key", "from-env"))
        .merge(("openai.api_version", "2024-06-01"))
        .extract()
        .expect("should merge override");

    assert_eq!(config.gemini.api_key.as_deref(), Some("from-env"));
    assert_eq!(config.openai.api_version, "2024-06-01");
}

/// Missing config files are silently skipped.
#[test]
fn missing_config_files_silently_skipped() {
    use figment::{
        Figment,
        providers::{Format, Serialized, Toml},
    };

    let config: HelpdeskConfig = Figment::new()
        .merge(Serialized::defaults(HelpdeskConfig::default()))
        .merge(Toml::file("/nonexistent/path/helpdesk.toml"))
        .extract()
        .expect("missing file should be silently skipped");

    assert_eq!(config.agent.name, "helpdesk");
}

#[test]
fn diagnostic_stratgy_suggests_strategy() {
    let valid_keys = &["strategy", "timeout_secs"];
    assert_eq!(
        suggest_key("stratgy", valid_keys),
        Some("strategy".to_string())
    );
}

/// Unknown key diagnostics carry the suggestion, the valid keys and a span.
#[test]
fn diagnostic_error_includes_unknown_key() {
    let toml = r#"
[routing]
stratgy = "gpt"
"#;

    let errors = load_and_validate_str(toml).expect_err("should produce errors");
    let found = errors.iter().any(|e| {
        matches!(e, ConfigError::UnknownKey { key, suggestion, valid_keys, .. } if {
            key == "stratgy"
                && suggestion.as_deref() == Some("strategy")
                && valid_keys.contains("identifier_short_circuit")
        })
    });
    assert!(found, "expected UnknownKey for `stratgy`, got: {errors:?}");
}

/// Invalid type (string where number expected) produces an InvalidType diagnostic.
#[test]
fn diagnostic_invalid_type() {
    let toml = r#"
[routing]
timeout_secs = "thirty"
"#;

    let errors = load_and_validate_str(toml).expect_err("should reject invalid type");
    assert!(
        errors
            .iter()
            .any(|e| matches!(e, ConfigError::InvalidType { key, .. } if key.contains("timeout_secs"))),
        "got: {errors:?}"
    );
}

/// ConfigError can be rendered using miette's graphical handler.
#[test]
fn config_error_renders_with_miette() {
    use miette::{Diagnostic, GraphicalReportHandler};

    let error = ConfigError::UnknownKey {
        key: "stratgy".to_string(),
        suggestion: Some("strategy".to_string()),
        valid_keys: "strategy, timeout_secs".to_string(),
        span: None,
        src: None,
    };

    assert!(error.code().is_some());
    let help = error.help().map(|h| h.to_string()).unwrap_or_default();
    assert!(help.contains("did you mean `strategy`"), "got: {help}");

    let mut buf = String::new();
    GraphicalReportHandler::new()
        .render_report(&mut buf, &error)
        .expect("should render without error");
    assert!(buf.contains("stratgy"));
}

/// Validation errors surface through load_and_validate_str.
#[test]
fn validation_catches_unknown_strategy() {
    let toml = r#"
[evaluation]
strategies = ["keyword", "claude"]
"#;

    let errors = load_and_validate_str(toml).expect_err("unknown strategy should fail");
    assert!(errors.iter().any(|e| {
        matches!(e, ConfigError::Validation { message } if message.contains("claude"))
    }));
}

/// An explicit config file is loaded and validated.
#[test]
fn load_and_validate_explicit_path() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    writeln!(file, "[routing]\nstrategy = \"gpt\"\ntimeout_secs = 5").expect("write");

    let config = load_and_validate_path(file.path()).expect("file should validate");
    assert_eq!(config.routing.strategy, "gpt");
    assert_eq!(config.routing.timeout_secs, 5);
}

#[test]
fn load_and_validate_missing_path_is_an_error() {
    let errors = load_and_validate_path(std::path::Path::new("/nonexistent/helpdesk.toml"))
        .expect_err("missing explicit file should fail");
    assert!(matches!(&errors[0], ConfigError::Other(msg) if msg.contains("not found")));
}

/// Defaults load when no config files exist in the working directory.
#[test]
#[serial_test::serial]
fn load_and_validate_defaults() {
    let config = helpdesk_config::load_and_validate().expect("defaults should validate");
    assert!(!config.agent.name.is_empty());
}
