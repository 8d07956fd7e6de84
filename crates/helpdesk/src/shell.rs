// SPDX-FileCopyrightText: 2026 Helpdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `helpdesk ask` and `helpdesk shell` command implementations.
//!
//! Every line is routed independently; the shell keeps readline history but
//! no conversation state.

use colored::Colorize;
use helpdesk_config::HelpdeskConfig;
use helpdesk_core::{HelpdeskError, Query, Resolution, RoutingDecision, Strategy};
use helpdesk_router::Router;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

use crate::setup;

const EXAMPLES: &[&str] = &[
    "What are your hours on Saturday?",
    "Do you accept Blue Cross insurance?",
    "What's the status of APT-12345?",
    "Is prescription RX-11223 ready to pick up?",
    "How do I access my test results?",
];

/// Shell input other than a query.
#[derive(Debug, PartialEq, Eq)]
enum ShellCommand<'a> {
    Quit,
    Help,
    Empty,
    Query(&'a str),
}

fn parse_line(line: &str) -> ShellCommand<'_> {
    let trimmed = line.trim();
    match trimmed.to_ascii_lowercase().as_str() {
        "" => ShellCommand::Empty,
        "quit" | "exit" | "q" => ShellCommand::Quit,
        "help" => ShellCommand::Help,
        _ => ShellCommand::Query(trimmed),
    }
}

/// Plain-text rendering of a decision.
pub fn render_decision(decision: &RoutingDecision) -> String {
    let via = match decision.resolution() {
        Resolution::Classified => format!("classified by {}", decision.strategy_used()),
        Resolution::IdentifierMatch => "matched an order identifier".to_string(),
        Resolution::Fallback => "keyword fallback".to_string(),
        Resolution::Unavailable => "classification unavailable".to_string(),
    };
    format!(
        "[{} agent, {}, {} ms]\n{}",
        decision.response().agent(),
        via,
        decision.latency().as_millis(),
        decision.response().text()
    )
}

fn print_decision(decision: &RoutingDecision) {
    let rendered = render_decision(decision);
    let (header, body) = rendered.split_once('\n').unwrap_or((rendered.as_str(), ""));
    println!("{}", header.dimmed());
    if decision.succeeded() {
        println!("{body}");
    } else {
        println!("{}", body.yellow());
    }
}

/// Runs `helpdesk ask`: routes one query and prints the answer.
pub async fn run_ask(
    config: &HelpdeskConfig,
    strategy: Option<Strategy>,
    query: &str,
) -> Result<(), HelpdeskError> {
    let registry = setup::load_registry(&config.data)?;
    let router = setup::build_router(setup::resolve_strategy(strategy, config), config, registry);
    let decision = router.route(cli_query(query)).await?;
    print_decision(&decision);
    Ok(())
}

fn cli_query(text: &str) -> Query {
    Query::new(text).with_channel("cli")
}

/// Runs the `helpdesk shell` interactive loop.
pub async fn run_shell(
    config: &HelpdeskConfig,
    strategy: Option<Strategy>,
) -> Result<(), HelpdeskError> {
    let registry = setup::load_registry(&config.data)?;
    let strategy = setup::resolve_strategy(strategy, config);
    let router = setup::build_router(strategy, config, registry);

    let mut rl = DefaultEditor::new()
        .map_err(|e| HelpdeskError::Internal(format!("failed to initialize readline: {e}")))?;

    println!("{}", format!("{} shell", config.agent.name).bold().green());
    println!(
        "Routing with {}. Type {} for examples, {} to exit.\n",
        strategy.display_name().cyan(),
        "help".yellow(),
        "quit".yellow()
    );

    let prompt = format!("{}> ", config.agent.name.green());
    loop {
        match rl.readline(&prompt) {
            Ok(line) => match parse_line(&line) {
                ShellCommand::Empty => continue,
                ShellCommand::Quit => break,
                ShellCommand::Help => print_help(),
                ShellCommand::Query(text) => {
                    let _ = rl.add_history_entry(text);
                    handle_line(&router, text).await;
                }
            },
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => {
                eprintln!("{}: {e}", "error".red());
                break;
            }
        }
    }

    println!("{}", "goodbye".dimmed());
    Ok(())
}

async fn handle_line(router: &Router, text: &str) {
    match router.route(cli_query(text)).await {
        Ok(decision) => print_decision(&decision),
        Err(e) => eprintln!("{}: {e}", "error".red()),
    }
    println!();
}

fn print_help() {
    println!("Ask about clinic hours, insurance, location or services, or about");
    println!("an appointment, lab test or prescription by its ID. For example:");
    for example in EXAMPLES {
        println!("  {}", example.cyan());
    }
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use helpdesk_test_utils::TestHarness;

    #[test]
    fn shell_commands() {
        assert_eq!(parse_line("  "), ShellCommand::Empty);
        assert_eq!(parse_line("QUIT"), ShellCommand::Quit);
        assert_eq!(parse_line("exit"), ShellCommand::Quit);
        assert_eq!(parse_line("q"), ShellCommand::Quit);
        assert_eq!(parse_line(" help "), ShellCommand::Help);
        assert_eq!(
            parse_line(" hours? "),
            ShellCommand::Query("hours?")
        );
    }

    #[tokio::test]
    async fn rendering_names_agent_and_path() {
        let harness = TestHarness::keyword().unwrap();
        let decision = harness.ask("Is APT-12345 confirmed?").await.unwrap();
        let rendered = render_decision(&decision);
        assert!(rendered.starts_with("[order_status agent, matched an order identifier,"));
        assert!(rendered.contains("Status: Confirmed"));
    }

    #[test]
    fn cli_queries_carry_the_channel() {
        let q = cli_query("hours?");
        assert_eq!(q.metadata().channel.as_deref(), Some("cli"));
    }
}
