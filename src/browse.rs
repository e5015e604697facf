//! Interactive terminal front end.
//!
//! Reads one command per line from stdin and re-renders the shell whenever
//! its visible state changes. Requests run concurrently on the current task:
//! typing a new command never waits for an earlier request to finish, and a
//! response that has been superseded is dropped by the state machines.

use crate::api::NewsApi;
use crate::models::{Category, Language, UnknownValue, parse_language_choice};
use crate::render::{CardView, Intent, ShellScreen};
use crate::shell::{Route, Shell};
use crate::state::{Completion, Request};
use futures::FutureExt;
use futures::future::LocalBoxFuture;
use futures::stream::{FuturesUnordered, StreamExt};
use std::io::BufRead;
use std::str::FromStr;
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::{debug, info, instrument, warn};

pub const HELP: &str = "\
Commands:
  <category> | c <category>   switch category (general, business, entertainment,
                              health, science, sports, technology)
  r                           refresh the current category
  s <n>                       open the summary of article n
  o <n> <k>                   open source k of article n
  l <language> | l none       translate the summary (spanish, french, german,
                              hindi, chinese) or clear the translation
  g <path>                    go to a route (/ or /summary/<encoded url>)
  h                           back to the article list
  ?                           show this help
  q                           quit";

/// One line of user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrowseCommand {
    Show,
    Category(Category),
    Refresh,
    /// One-based article number.
    Summarize(usize),
    /// One-based article and source numbers.
    Open { article: usize, source: usize },
    Language(Option<Language>),
    Go(Route),
    Home,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseCommandError {
    #[error("unknown command: {0:?}")]
    Unknown(String),

    #[error("{0} needs an argument")]
    MissingArgument(&'static str),

    #[error("expected a positive number, got {0:?}")]
    BadNumber(String),

    #[error("unknown route: {0:?}")]
    BadRoute(String),

    #[error(transparent)]
    Value(#[from] UnknownValue),
}

fn number(arg: Option<&str>, what: &'static str) -> Result<usize, ParseCommandError> {
    let raw = arg.ok_or(ParseCommandError::MissingArgument(what))?;
    match raw.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(ParseCommandError::BadNumber(raw.to_string())),
    }
}

impl FromStr for BrowseCommand {
    type Err = ParseCommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };
        let mut args = rest.split_whitespace();

        match word.to_ascii_lowercase().as_str() {
            "" => Ok(BrowseCommand::Show),
            "r" | "refresh" => Ok(BrowseCommand::Refresh),
            "h" | "home" | "b" | "back" => Ok(BrowseCommand::Home),
            "?" | "help" => Ok(BrowseCommand::Help),
            "q" | "quit" | "exit" => Ok(BrowseCommand::Quit),
            "c" | "category" => {
                if rest.is_empty() {
                    return Err(ParseCommandError::MissingArgument("category"));
                }
                Ok(BrowseCommand::Category(rest.parse()?))
            }
            "s" | "summarize" => Ok(BrowseCommand::Summarize(number(args.next(), "summarize")?)),
            "o" | "open" => Ok(BrowseCommand::Open {
                article: number(args.next(), "open")?,
                source: number(args.next(), "open")?,
            }),
            // The whole remainder, so "chinese (simplified)" parses.
            "l" | "lang" | "language" => Ok(BrowseCommand::Language(parse_language_choice(rest)?)),
            "g" | "go" => {
                let route = Route::parse(rest)
                    .ok_or_else(|| ParseCommandError::BadRoute(rest.to_string()))?;
                Ok(BrowseCommand::Go(route))
            }
            other => other
                .parse::<Category>()
                .map(BrowseCommand::Category)
                .map_err(|_| ParseCommandError::Unknown(line.to_string())),
        }
    }
}

/// What the loop should do after a command.
#[derive(Debug)]
pub enum Outcome {
    /// Re-render, sending the request first if there is one.
    Redraw(Option<Request>),
    /// Print a one-off line without re-rendering.
    Message(String),
    /// Hand a URL to the reader's browser.
    Open(String),
    Quit,
}

/// Apply a command to the shell.
#[instrument(level = "debug", skip(shell))]
pub fn dispatch(shell: &mut Shell, command: BrowseCommand) -> Outcome {
    match command {
        BrowseCommand::Show => Outcome::Redraw(None),
        BrowseCommand::Help => Outcome::Message(HELP.to_string()),
        BrowseCommand::Quit => Outcome::Quit,
        BrowseCommand::Category(category) => {
            // Picking a category from a summary returns to the list.
            shell.navigate(Route::List);
            Outcome::Redraw(Some(shell.change_category(category)))
        }
        BrowseCommand::Refresh => {
            shell.navigate(Route::List);
            Outcome::Redraw(Some(shell.refresh()))
        }
        BrowseCommand::Home => Outcome::Redraw(shell.navigate(Route::List)),
        BrowseCommand::Go(route) => Outcome::Redraw(shell.navigate(route)),
        BrowseCommand::Summarize(n) => match card(shell, n) {
            Err(message) => Outcome::Message(message),
            Ok(card) if !card.has_summary_target() => {
                Outcome::Message(format!("Article {n} has no source to summarize."))
            }
            Ok(card) => match card.summarize() {
                Intent::Navigate(route) => Outcome::Redraw(shell.navigate(route)),
                Intent::OpenExternal(url) => Outcome::Open(url),
            },
        },
        BrowseCommand::Open { article, source } => match card(shell, article) {
            Err(message) => Outcome::Message(message),
            Ok(card) => match source.checked_sub(1).and_then(|k| card.read_more(k)) {
                Some(Intent::OpenExternal(url)) => Outcome::Open(url),
                Some(Intent::Navigate(route)) => Outcome::Redraw(shell.navigate(route)),
                None => Outcome::Message(format!("Article {article} has no source {source}.")),
            },
        },
        BrowseCommand::Language(choice) => {
            if shell.detail().is_none() {
                return Outcome::Message("Open an article summary first (s <n>).".to_string());
            }
            Outcome::Redraw(shell.select_language(choice))
        }
    }
}

/// The card for a one-based article number on the list view.
fn card(shell: &Shell, n: usize) -> Result<CardView, String> {
    if shell.route() != &Route::List {
        return Err("Go back to the article list first (h).".to_string());
    }
    shell
        .list()
        .articles()
        .get(n.wrapping_sub(1))
        .map(CardView::from_article)
        .ok_or_else(|| format!("There is no article {n}."))
}

/// Whether a completion belongs to the view currently on screen.
fn is_visible(shell: &Shell, completion: &Completion) -> bool {
    match completion {
        Completion::List(..) => shell.route() == &Route::List,
        Completion::Summary(..) | Completion::Translation(..) => shell.detail().is_some(),
    }
}

fn draw(shell: &Shell) {
    println!();
    print!("{}", ShellScreen(shell));
}

/// Forward stdin lines into a channel from a dedicated thread.
///
/// A blocking stdin read cannot be cancelled, so it must not sit on the
/// runtime's blocking pool where it would hold up shutdown. The channel closes
/// at end of input or on a read error.
pub fn stdin_lines() -> mpsc::Receiver<String> {
    let (tx, rx) = mpsc::channel(16);
    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            let line = match line {
                Ok(line) => line,
                Err(e) => {
                    warn!(error = %e, "Failed to read stdin");
                    break;
                }
            };
            if tx.blocking_send(line).is_err() {
                break;
            }
        }
    });
    rx
}

/// Run the interactive loop until `q`, `interrupt` resolves, or `input` closes.
///
/// After `input` closes, requests still in flight are awaited and rendered so
/// piped command scripts see their results.
#[instrument(level = "info", skip_all)]
pub async fn run<A, I>(api: &A, mut shell: Shell, mut input: mpsc::Receiver<String>, interrupt: I)
where
    A: NewsApi,
    I: Future<Output = ()>,
{
    let mut in_flight: FuturesUnordered<LocalBoxFuture<'_, Completion>> = FuturesUnordered::new();
    in_flight.push(shell.mount().execute(api).boxed_local());
    draw(&shell);
    println!("\nType ? for help.");

    tokio::pin!(interrupt);
    let mut input_open = true;

    while input_open || !in_flight.is_empty() {
        tokio::select! {
            line = input.recv(), if input_open => {
                let Some(line) = line else {
                    debug!(pending = in_flight.len(), "Input closed");
                    input_open = false;
                    continue;
                };
                let command = match line.parse::<BrowseCommand>() {
                    Ok(command) => command,
                    Err(e) => {
                        println!("{e} (type ? for help)");
                        continue;
                    }
                };
                match dispatch(&mut shell, command) {
                    Outcome::Quit => break,
                    Outcome::Message(message) => println!("{message}"),
                    Outcome::Open(url) => {
                        info!(%url, "Opening source");
                        println!("↗ Open in your browser: {url}");
                    }
                    Outcome::Redraw(request) => {
                        if let Some(request) = request {
                            in_flight.push(request.execute(api).boxed_local());
                        }
                        draw(&shell);
                    }
                }
            }
            Some(done) = in_flight.next(), if !in_flight.is_empty() => {
                let visible = is_visible(&shell, &done);
                if shell.apply(done) && visible {
                    draw(&shell);
                }
            }
            () = &mut interrupt => {
                info!(pending = in_flight.len(), "Interrupted");
                break;
            }
        }
    }
}
