//! Command-line interface definitions for the news reader.
//!
//! This module defines the CLI arguments and subcommands using the `clap` crate.
//! The backend address can also be provided through the environment.

use crate::models::{Category, Language};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Command-line arguments for the news reader.
///
/// # Examples
///
/// ```sh
/// # Browse interactively against the default backend
/// news_reader
///
/// # Print the technology headlines from another backend
/// news_reader --backend-url http://news.local:8000 list --category technology
///
/// # Summarize an article and translate the summary
/// news_reader summarize https://example.com/story --language french
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Optional path to a YAML config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Backend base URL (takes precedence over the config file)
    #[arg(short, long, env = "NEWS_BACKEND_URL")]
    pub backend_url: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Browse news interactively (the default)
    Browse {
        /// Category to open with
        #[arg(long, value_enum, default_value_t = Category::General)]
        category: Category,
    },

    /// Print the articles of one category and exit
    List {
        #[arg(long, value_enum, default_value_t = Category::General)]
        category: Category,

        /// Print the articles as JSON instead of cards
        #[arg(long)]
        json: bool,
    },

    /// Print the summary of an article, optionally translated
    Summarize {
        /// URL of the article
        url: String,

        /// Language to translate the summary into
        #[arg(short, long, value_enum)]
        language: Option<Language>,
    },
}

impl Cli {
    /// The subcommand to run, defaulting to interactive browsing.
    pub fn resolved_command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Browse {
            category: Category::General,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults_to_browse() {
        let cli = Cli::parse_from(["news_reader"]);
        assert_eq!(
            cli.resolved_command(),
            Command::Browse {
                category: Category::General
            }
        );
        assert!(cli.config.is_none());
    }

    #[test]
    fn test_cli_list() {
        let cli = Cli::parse_from([
            "news_reader",
            "-b",
            "http://news.local:9000",
            "list",
            "--category",
            "technology",
            "--json",
        ]);

        assert_eq!(cli.backend_url.as_deref(), Some("http://news.local:9000"));
        assert_eq!(
            cli.resolved_command(),
            Command::List {
                category: Category::Technology,
                json: true
            }
        );
    }

    #[test]
    fn test_cli_summarize_with_language() {
        let cli = Cli::parse_from([
            "news_reader",
            "-c",
            "/tmp/reader.yaml",
            "summarize",
            "http://a",
            "-l",
            "chinese",
        ]);

        assert_eq!(cli.config, Some(PathBuf::from("/tmp/reader.yaml")));
        assert_eq!(
            cli.resolved_command(),
            Command::Summarize {
                url: "http://a".to_string(),
                language: Some(Language::ChineseSimplified)
            }
        );
    }

    #[test]
    fn test_cli_rejects_unknown_category() {
        assert!(Cli::try_parse_from(["news_reader", "list", "--category", "weather"]).is_err());
    }
}
