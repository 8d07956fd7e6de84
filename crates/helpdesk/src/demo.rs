// SPDX-FileCopyrightText: 2026 Helpdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `helpdesk demo`: routes a few fixed queries with the keyword strategy.

use colored::Colorize;
use helpdesk_config::HelpdeskConfig;
use helpdesk_core::{HelpdeskError, Strategy};
use helpdesk_router::Router;

use crate::setup;

pub const DEMO_QUERIES: [&str; 5] = [
    "What are your hours?",
    "Do you accept Blue Cross insurance?",
    "What's the status of APT-12345?",
    "Check the status of LAB-67890",
    "Where is my order APT-99999?",
];

const PREVIEW_CHARS: usize = 100;

/// First `max` characters of `text`, with an ellipsis when cut.
pub fn preview(text: &str, max: usize) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(max).collect();
    if chars.next().is_some() {
        format!("{head}...")
    } else {
        head
    }
}

/// One `(query, agent, preview)` line per demo query.
pub async fn demo_lines(router: &Router) -> Vec<(String, String, String)> {
    let mut lines = Vec::with_capacity(DEMO_QUERIES.len());
    for query in DEMO_QUERIES {
        match router.route(query).await {
            Ok(decision) => lines.push((
                query.to_string(),
                decision.response().agent().to_string(),
                preview(decision.response().text(), PREVIEW_CHARS),
            )),
            Err(e) => lines.push((query.to_string(), "error".to_string(), e.to_string())),
        }
    }
    lines
}

/// Runs `helpdesk demo`.
pub async fn run_demo(config: &HelpdeskConfig) -> Result<(), HelpdeskError> {
    let registry = setup::load_registry(&config.data)?;
    let router = setup::build_router(Strategy::Keyword, config, registry);

    println!("{}", "Helpdesk demo (keyword routing)".bold().green());
    println!("{}", "=".repeat(60));
    for (query, agent, answer) in demo_lines(&router).await {
        println!("\n{} {}", "Query:".bold(), query);
        println!("{} {}", "Agent:".bold(), agent.cyan());
        println!("{} {}", "Answer:".bold(), answer);
    }
    println!();
    Ok(())
}
