//! # News Reader
//!
//! A terminal news reader that fetches categorized articles from a news
//! backend, renders them as cards with their source links, and asks the
//! backend to summarize an article and translate the summary on demand.
//!
//! ## Usage
//!
//! ```sh
//! news_reader                                   # interactive browsing
//! news_reader list --category technology        # print one category
//! news_reader summarize https://example.com/a -l french
//! ```
//!
//! ## Architecture
//!
//! 1. **State**: list and detail state machines issue ticketed requests
//!    ([`state`])
//! 2. **Transport**: tickets are executed against the backend ([`api`])
//! 3. **Shell**: completions are routed back to the view that issued them
//!    ([`shell`])
//! 4. **Presentation**: the visible view is rendered as text ([`render`])

use clap::Parser;
use std::error::Error;
use std::process::ExitCode;
use tracing::{debug, error, info, instrument};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod api;
mod browse;
mod cli;
mod commands;
mod config;
mod models;
mod render;
mod shell;
mod state;
mod utils;

use api::HttpNewsApi;
use cli::{Cli, Command};
use config::Config;
use shell::Shell;

#[tokio::main(flavor = "current_thread")]
#[instrument]
async fn main() -> Result<ExitCode, Box<dyn Error>> {
    // --- Tracing init ---
    // Logs go to stderr so rendered views on stdout stay readable.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tfmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    let config = match Config::load(args.backend_url.as_deref(), args.config.as_deref()).await {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "Invalid configuration");
            return Err(e.into());
        }
    };
    info!(backend = %config.display_base_url(), "news_reader starting up");

    let api = HttpNewsApi::new(config)?;

    let ok = match args.resolved_command() {
        Command::Browse { category } => {
            let interrupt = async {
                if let Err(e) = tokio::signal::ctrl_c().await {
                    error!(error = %e, "Failed to listen for Ctrl-C");
                    std::future::pending::<()>().await;
                }
            };
            browse::run(&api, Shell::new(category), browse::stdin_lines(), interrupt).await;
            true
        }
        Command::List { category, json } => {
            let report = commands::list(&api, category, json).await?;
            print!("{}", report.output);
            report.ok
        }
        Command::Summarize { url, language } => {
            let report = commands::summarize(&api, &url, language).await;
            print!("{}", report.output);
            report.ok
        }
    };

    Ok(if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}
