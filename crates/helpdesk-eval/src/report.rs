// SPDX-FileCopyrightText: 2026 Helpdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Comparison table and markdown/JSON reports.

use std::fmt::Write as _;
use std::path::Path;

use chrono::{DateTime, Utc};
use helpdesk_core::{HelpdeskError, Strategy};

use crate::corpus::{CategoryGroup, Corpus};
use crate::result::EvaluationResult;

const LABEL_WIDTH: usize = 25;
const COLUMN_WIDTH: usize = 15;
const RULE_WIDTH: usize = 80;

fn find(results: &[EvaluationResult], strategy: Strategy) -> Option<&EvaluationResult> {
    results.iter().find(|r| r.strategy == strategy)
}

fn percent_cell(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:>6.1}%", v),
        None => "N/A".to_string(),
    }
}

/// Plain-text table with one column per strategy. Strategies without a
/// result show `N/A`.
pub fn comparison_table(results: &[EvaluationResult]) -> String {
    let mut out = String::new();
    let rule = "-".repeat(RULE_WIDTH);

    let _ = write!(out, "{:<LABEL_WIDTH$}", "Category");
    for strategy in Strategy::ALL {
        let _ = write!(out, " {:<COLUMN_WIDTH$}", strategy.display_name());
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "{rule}");

    let mut row = |label: &str, cell: &dyn Fn(&EvaluationResult) -> Option<String>| {
        let _ = write!(out, "{label:<LABEL_WIDTH$}");
        for strategy in Strategy::ALL {
            let text = find(results, strategy)
                .and_then(cell)
                .unwrap_or_else(|| "N/A".to_string());
            let _ = write!(out, " {text:<COLUMN_WIDTH$}");
        }
        let _ = writeln!(out);
    };

    row("OVERALL ACCURACY", &|r| Some(percent_cell(Some(r.accuracy))));
    for group in CategoryGroup::ALL {
        row(group.title(), &|r| {
            r.group(group).map(|g| percent_cell(Some(g.accuracy)))
        });
    }
    row("Avg Response Time", &|r| {
        Some(format!("{:>6.3}s", r.avg_latency.as_secs_f64()))
    });
    row("Fallbacks", &|r| Some(format!("{:>6}", r.fallbacks)));

    out.trim_end().to_string()
}

/// Markdown report stamped with the current time.
pub fn markdown_report(results: &[EvaluationResult], corpus: &Corpus) -> String {
    markdown_report_at(results, corpus, Utc::now())
}

/// Markdown report: summary, overall and per-group tables, every mismatch,
/// and a recommendation.
pub fn markdown_report_at(
    results: &[EvaluationResult],
    corpus: &Corpus,
    generated_at: DateTime<Utc>,
) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "# Routing Strategy Evaluation\n");
    let _ = writeln!(
        out,
        "**Generated:** {}\n",
        generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    );
    let _ = writeln!(out, "---\n");

    let _ = writeln!(out, "## Executive Summary\n");
    let groups = CategoryGroup::ALL
        .iter()
        .filter(|g| corpus.group_len(**g) > 0)
        .count();
    let _ = writeln!(
        out,
        "This evaluation routed **{} queries** across **{} categories** with {} strategies:\n",
        corpus.len(),
        groups,
        results.len()
    );
    for (i, r) in results.iter().enumerate() {
        let _ = writeln!(
            out,
            "{}. **{}** - {}",
            i + 1,
            r.strategy.display_name(),
            strategy_blurb(r.strategy)
        );
    }
    let _ = writeln!(out);

    let _ = writeln!(out, "## Overall Results\n");
    let _ = writeln!(
        out,
        "| Strategy | Total Queries | Correct | Accuracy | Avg Response Time | Fallbacks | Unavailable |"
    );
    let _ = writeln!(
        out,
        "|----------|---------------|---------|----------|-------------------|-----------|-------------|"
    );
    for r in results {
        let _ = writeln!(
            out,
            "| {} | {} | {} | {:.1}% | {:.3}s | {} | {} |",
            r.strategy.display_name(),
            r.total,
            r.correct,
            r.accuracy,
            r.avg_latency.as_secs_f64(),
            r.fallbacks,
            r.unavailable
        );
    }
    let _ = writeln!(out);

    let _ = writeln!(out, "## Category Breakdown\n");
    for group in CategoryGroup::ALL {
        let _ = writeln!(out, "### {}\n", group.title());
        let _ = writeln!(out, "| Strategy | Queries | Correct | Accuracy | Avg Time |");
        let _ = writeln!(out, "|----------|---------|---------|----------|----------|");
        for r in results {
            match r.group(group) {
                Some(g) => {
                    let _ = writeln!(
                        out,
                        "| {} | {} | {} | {:.1}% | {:.3}s |",
                        r.strategy.display_name(),
                        g.total,
                        g.correct,
                        g.accuracy,
                        g.avg_latency.as_secs_f64()
                    );
                }
                None => {
                    let _ = writeln!(
                        out,
                        "| {} | N/A | N/A | N/A | N/A |",
                        r.strategy.display_name()
                    );
                }
            }
        }
        let _ = writeln!(out);
    }

    let _ = writeln!(out, "## Error Analysis\n");
    for r in results {
        let _ = writeln!(out, "### {} Errors\n", r.strategy.display_name());
        if r.mismatches.is_empty() {
            let _ = writeln!(out, "No errors detected.\n");
            continue;
        }
        for group in CategoryGroup::ALL {
            let mut group_errors = r.mismatches.iter().filter(|m| m.group == group).peekable();
            if group_errors.peek().is_none() {
                continue;
            }
            let _ = writeln!(out, "**{}:**\n", group.title());
            for m in group_errors {
                let actual = m
                    .actual
                    .map(|c| c.to_string())
                    .unwrap_or_else(|| "none".to_string());
                let _ = writeln!(out, "- [{}] Query: \"{}\"", m.id, m.query);
                let _ = writeln!(out, "  - Expected: `{}`", m.expected);
                let _ = writeln!(out, "  - Actual: `{actual}`");
                if let Some(failure) = &m.failure {
                    let _ = writeln!(out, "  - Failure: {failure}");
                }
            }
            let _ = writeln!(out);
        }
    }

    let _ = writeln!(out, "## Recommendation\n");
    for r in results.iter().filter(|r| r.only_fell_back()) {
        let _ = writeln!(
            out,
            "_{} was not considered: its classifier never answered and every query fell back to keywords._\n",
            r.strategy.display_name()
        );
    }
    match recommended(results) {
        Some(best) => {
            let _ = writeln!(
                out,
                "**Recommended for production: {}**\n",
                best.strategy.display_name()
            );
            let _ = writeln!(out, "- **Accuracy:** {:.1}%", best.accuracy);
            let _ = writeln!(
                out,
                "- **Response Time:** {:.3}s",
                best.avg_latency.as_secs_f64()
            );
            let (cost, justification) = cost_note(best.strategy);
            let _ = writeln!(out, "- **Cost:** {cost}");
            let _ = writeln!(out, "- **Justification:** {justification}");
        }
        None if results.is_empty() => {
            let _ = writeln!(out, "No strategies were evaluated.");
        }
        None => {
            let _ = writeln!(out, "No strategy classified queries on its own.");
        }
    }

    out
}

/// Most accurate result whose classifier actually answered; the earliest
/// one wins a tie.
pub fn recommended(results: &[EvaluationResult]) -> Option<&EvaluationResult> {
    results
        .iter()
        .filter(|r| !r.only_fell_back())
        .fold(None, |best, r| match best {
            Some(b) if b.accuracy >= r.accuracy => Some(b),
            _ => Some(r),
        })
}

fn strategy_blurb(strategy: Strategy) -> &'static str {
    match strategy {
        Strategy::Keyword => "rule-based keyword matching baseline",
        Strategy::Gemini => "Google Gemini classification",
        Strategy::Gpt => "Azure OpenAI GPT-4o classification",
    }
}

fn cost_note(strategy: Strategy) -> (&'static str, &'static str) {
    match strategy {
        Strategy::Keyword => (
            "$0 (no API calls)",
            "Instant response with no external dependency",
        ),
        Strategy::Gemini => (
            "Free tier, limited to 10 requests per minute",
            "Best balance of accuracy and cost",
        ),
        Strategy::Gpt => (
            "About $0.50 per 1,000 queries",
            "Highest accuracy at an acceptable latency and cost",
        ),
    }
}

/// Pretty-printed JSON array of results.
pub fn json_report(results: &[EvaluationResult]) -> Result<String, HelpdeskError> {
    serde_json::to_string_pretty(results).map_err(|e| HelpdeskError::Report {
        source: Box::new(e),
    })
}

/// Writes `contents` to `path`, creating parent directories.
pub fn write_report(path: &Path, contents: &str) -> Result<(), HelpdeskError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| HelpdeskError::Report {
                source: Box::new(e),
            })?;
        }
    }
    std::fs::write(path, contents).map_err(|e| HelpdeskError::Report {
        source: Box::new(e),
    })?;
    tracing::info!(path = %path.display(), bytes = contents.len(), "report written");
    Ok(())
}
