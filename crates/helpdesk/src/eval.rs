// SPDX-FileCopyrightText: 2026 Helpdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `helpdesk eval` command implementation.
//!
//! Evaluates the selected strategies concurrently over the corpus, prints a
//! summary per strategy and the comparison table, and writes the reports.

use std::path::{Path, PathBuf};

use colored::Colorize;
use helpdesk_config::HelpdeskConfig;
use helpdesk_core::{HelpdeskError, Strategy};
use helpdesk_eval::report::{comparison_table, json_report, markdown_report, write_report};
use helpdesk_eval::{CategoryGroup, Corpus, EvaluationResult, EvaluationSettings, Evaluator};
use helpdesk_router::Router;
use tracing::info;

use crate::setup;

/// Command-line overrides for `helpdesk eval`.
#[derive(Debug, Default)]
pub struct EvalOptions {
    pub strategies: Vec<Strategy>,
    pub corpus: Option<PathBuf>,
    pub report: Option<PathBuf>,
    pub json: Option<PathBuf>,
}

/// Strategies to run: the command line wins over `evaluation.strategies`.
/// Duplicates are dropped, keeping the first occurrence.
fn selected_strategies(options: &EvalOptions, config: &HelpdeskConfig) -> Vec<Strategy> {
    let requested = if options.strategies.is_empty() {
        config.evaluation.parsed_strategies()
    } else {
        options.strategies.clone()
    };
    let mut unique = Vec::with_capacity(requested.len());
    for strategy in requested {
        if !unique.contains(&strategy) {
            unique.push(strategy);
        }
    }
    unique
}

fn load_corpus(options: &EvalOptions, config: &HelpdeskConfig) -> Result<Corpus, HelpdeskError> {
    let dir = options
        .corpus
        .clone()
        .or_else(|| config.evaluation.corpus_dir.as_ref().map(PathBuf::from));
    match dir {
        Some(dir) => {
            let corpus = Corpus::load_dir(&dir)?;
            info!(dir = %dir.display(), cases = corpus.len(), "corpus loaded");
            Ok(corpus)
        }
        None => Corpus::builtin(),
    }
}

fn print_summary(result: &EvaluationResult) {
    let rule = "=".repeat(80);
    println!("\n{rule}");
    println!(
        " {} - OVERALL RESULTS",
        result.strategy.display_name().to_uppercase().bold()
    );
    println!("{rule}");
    println!("Total Queries:          {}", result.total);
    println!("Correct:                {}", result.correct);
    println!("Incorrect:              {}", result.incorrect);
    println!("Overall Accuracy:       {:.1}%", result.accuracy);
    println!(
        "Avg Response Time:      {:.3}s",
        result.avg_latency.as_secs_f64()
    );
    println!(
        "Total Evaluation Time:  {:.2}s",
        result.total_time.as_secs_f64()
    );
    if result.only_fell_back() {
        println!(
            "{}",
            "Classifier never answered; results are the keyword fallback's.".yellow()
        );
    }
    if result.fallbacks > 0 || result.unavailable > 0 {
        println!(
            "{}",
            format!(
                "Keyword fallbacks:      {} (unavailable: {})",
                result.fallbacks, result.unavailable
            )
            .yellow()
        );
    }
    for group in CategoryGroup::ALL {
        if let Some(g) = result.group(group) {
            println!(
                "  {:<24} {}/{} ({:.1}%)",
                group.title(),
                g.correct,
                g.total,
                g.accuracy
            );
        }
    }
}

/// Runs `helpdesk eval`.
pub async fn run_eval(config: &HelpdeskConfig, options: EvalOptions) -> Result<(), HelpdeskError> {
    let strategies = selected_strategies(&options, config);
    if strategies.is_empty() {
        return Err(HelpdeskError::Config(
            "no strategies selected for evaluation".to_string(),
        ));
    }

    let corpus = load_corpus(&options, config)?;
    let registry = setup::load_registry(&config.data)?;
    let routers: Vec<Router> = strategies
        .iter()
        .map(|&s| setup::build_router(s, config, registry.clone()))
        .collect();
    let router_refs: Vec<&Router> = routers.iter().collect();

    println!(
        "Evaluating {} strategies over {} test cases...",
        strategies.len(),
        corpus.len()
    );
    let evaluator = Evaluator::new(EvaluationSettings::from_config(config));
    let results = evaluator.compare(&router_refs, &corpus).await;

    for result in &results {
        print_summary(result);
    }
    println!("\n{}", "COMPARISON TABLE".bold());
    println!("{}", comparison_table(&results));

    let report_path = options
        .report
        .unwrap_or_else(|| PathBuf::from(&config.evaluation.report_path));
    write_report(&report_path, &markdown_report(&results, &corpus))?;
    println!("\nDetailed report saved to: {}", report_path.display());

    let json_path = options
        .json
        .or_else(|| config.evaluation.json_report_path.as_ref().map(PathBuf::from));
    if let Some(path) = json_path {
        write_json(&path, &results)?;
        println!("JSON results saved to: {}", path.display());
    }
    Ok(())
}

fn write_json(path: &Path, results: &[EvaluationResult]) -> Result<(), HelpdeskError> {
    write_report(path, &json_report(results)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_line_strategies_win_and_are_deduplicated() {
        let config = HelpdeskConfig::default();
        let options = EvalOptions {
            strategies: vec![Strategy::Gpt, Strategy::Keyword, Strategy::Gpt],
            ..EvalOptions::default()
        };
        assert_eq!(
            selected_strategies(&options, &config),
            [Strategy::Gpt, Strategy::Keyword]
        );
        assert_eq!(
            selected_strategies(&EvalOptions::default(), &config),
            Strategy::ALL
        );
    }

    #[tokio::test]
    async fn keyword_eval_writes_both_reports() {
        let dir = tempfile::tempdir().unwrap();
        let options = EvalOptions {
            strategies: vec![Strategy::Keyword],
            corpus: None,
            report: Some(dir.path().join("out/results.md")),
            json: Some(dir.path().join("out/results.json")),
        };
        run_eval(&HelpdeskConfig::default(), options).await.unwrap();

        let md = std::fs::read_to_string(dir.path().join("out/results.md")).unwrap();
        assert!(md.contains("| Keyword | 45 | 43 | 95.6% |"));
        let json = std::fs::read_to_string(dir.path().join("out/results.json")).unwrap();
        assert!(json.contains("\"strategy\": \"keyword\""));
    }
}
