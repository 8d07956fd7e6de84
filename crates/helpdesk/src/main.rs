// SPDX-FileCopyrightText: 2026 Helpdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Helpdesk - clinic query router and routing-strategy evaluator.
//!
//! This is the binary entry point.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod demo;
mod eval;
mod setup;
mod shell;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use helpdesk_config::HelpdeskConfig;
use helpdesk_core::Strategy;

/// Helpdesk - route clinic customer-service queries and compare routing strategies.
#[derive(Parser, Debug)]
#[command(name = "helpdesk", version, about, long_about = None)]
struct Cli {
    /// Load configuration from this file (plus HELPDESK_* env vars) instead
    /// of the standard locations.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Route one query and print the answer.
    Ask {
        /// The query text.
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
        /// Routing strategy (keyword, gemini, gpt). Defaults to routing.strategy.
        #[arg(long)]
        strategy: Option<Strategy>,
    },
    /// Launch an interactive session.
    Shell {
        /// Routing strategy (keyword, gemini, gpt). Defaults to routing.strategy.
        #[arg(long)]
        strategy: Option<Strategy>,
    },
    /// Route a few sample queries with the keyword strategy.
    Demo,
    /// Evaluate routing strategies against the labeled corpus.
    Eval {
        /// Strategy to evaluate; repeat for several. Defaults to evaluation.strategies.
        #[arg(long = "strategy")]
        strategies: Vec<Strategy>,
        /// Corpus directory. Defaults to evaluation.corpus_dir or the built-in corpus.
        #[arg(long, value_name = "DIR")]
        corpus: Option<PathBuf>,
        /// Markdown report path. Defaults to evaluation.report_path.
        #[arg(long, value_name = "PATH")]
        report: Option<PathBuf>,
        /// Also write JSON results here.
        #[arg(long, value_name = "PATH")]
        json: Option<PathBuf>,
    },
}

fn load_config(path: Option<&PathBuf>) -> HelpdeskConfig {
    let loaded = match path {
        Some(path) => helpdesk_config::load_and_validate_path(path),
        None => helpdesk_config::load_and_validate(),
    };
    match loaded {
        Ok(config) => config,
        Err(errors) => {
            helpdesk_config::render_errors(&errors);
            std::process::exit(1);
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = load_config(cli.config.as_ref());
    init_tracing(&config.agent.log_level);

    let outcome = match cli.command {
        Some(Commands::Ask { query, strategy }) => {
            shell::run_ask(&config, strategy, &query.join(" ")).await
        }
        Some(Commands::Shell { strategy }) => shell::run_shell(&config, strategy).await,
        Some(Commands::Demo) => demo::run_demo(&config).await,
        Some(Commands::Eval {
            strategies,
            corpus,
            report,
            json,
        }) => {
            eval::run_eval(
                &config,
                eval::EvalOptions {
                    strategies,
                    corpus,
                    report,
                    json,
                },
            )
            .await
        }
        None => {
            println!("helpdesk: use --help for available commands");
            Ok(())
        }
    };

    if let Err(e) = outcome {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

/// Initializes the tracing subscriber with the given log level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("helpdesk={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .with_writer(std::io::stderr)
        .init();
}
