//! Article list state machine.
//!
//! ```text
//! Idle ──select_category/refresh──▶ Loading ──▶ Success | Empty | Failed
//!   ▲                                  ▲                       │
//!   └──────────────────────────────────┴───────────────────────┘
//! ```
//!
//! Each request is issued with a [`ListTicket`]. Only the most recently issued
//! ticket may complete the machine; older completions are dropped.

use crate::api::{ApiError, NewsApi, NewsListing};
use crate::models::{Article, Category};
use chrono::{DateTime, Local};
use tracing::{debug, info, instrument, warn};

/// The display mode of the list view. Exactly one holds at a time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListPhase {
    Idle,
    Loading,
    /// Non-empty article list.
    Success(Vec<Article>),
    /// The backend answered with no articles and no explanation.
    Empty,
    Failed(String),
}

/// Proof that a list request was issued; hand it back with the outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListTicket {
    seq: u64,
    category: Category,
}

impl ListTicket {
    pub fn category(&self) -> Category {
        self.category
    }
}

#[derive(Debug, Clone)]
pub struct ListView {
    category: Category,
    phase: ListPhase,
    issued: u64,
    fetched_at: Option<DateTime<Local>>,
}

impl ListView {
    pub fn new(category: Category) -> Self {
        Self {
            category,
            phase: ListPhase::Idle,
            issued: 0,
            fetched_at: None,
        }
    }

    /// Enter `Loading` for `category` and issue a ticket for the request.
    ///
    /// Re-selecting the current category is not short-circuited.
    #[instrument(level = "debug", skip(self), fields(%category))]
    pub fn begin(&mut self, category: Category) -> ListTicket {
        self.issued += 1;
        self.category = category;
        self.phase = ListPhase::Loading;
        debug!(seq = self.issued, "List request issued");
        ListTicket {
            seq: self.issued,
            category,
        }
    }

    /// Enter `Loading` again for the current category.
    pub fn begin_refresh(&mut self) -> ListTicket {
        self.begin(self.category)
    }

    /// Apply the outcome of a request.
    ///
    /// Returns `false`, leaving the state untouched, when `ticket` is not the
    /// latest one issued.
    #[instrument(level = "debug", skip_all, fields(seq = ticket.seq, category = %ticket.category))]
    pub fn complete(&mut self, ticket: ListTicket, outcome: Result<NewsListing, ApiError>) -> bool {
        if ticket.seq != self.issued {
            debug!(latest = self.issued, "Dropping stale list response");
            return false;
        }

        self.phase = match outcome {
            Ok(listing) if !listing.articles.is_empty() => {
                info!(count = listing.articles.len(), "Articles loaded");
                self.fetched_at = Some(Local::now());
                ListPhase::Success(listing.articles)
            }
            Ok(NewsListing { error: Some(error), .. }) => {
                warn!(%error, "Backend reported no articles");
                ListPhase::Failed(error)
            }
            Ok(_) => {
                info!("No articles for category");
                ListPhase::Empty
            }
            Err(e) => {
                warn!(error = %e, "Failed to load articles");
                ListPhase::Failed(e.to_string())
            }
        };
        true
    }

    /// Run one full select-category cycle against `api`.
    pub async fn select_category<A: NewsApi>(&mut self, api: &A, category: Category) {
        let ticket = self.begin(category);
        let outcome = api.list_articles(category).await;
        self.complete(ticket, outcome);
    }

    /// Run one full refresh cycle against `api`.
    pub async fn refresh<A: NewsApi>(&mut self, api: &A) {
        let category = self.category;
        self.select_category(api, category).await;
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn phase(&self) -> &ListPhase {
        &self.phase
    }

    pub fn loading(&self) -> bool {
        matches!(self.phase, ListPhase::Loading)
    }

    /// Articles on display; empty in every phase but `Success`.
    pub fn articles(&self) -> &[Article] {
        match &self.phase {
            ListPhase::Success(articles) => articles.as_slice(),
            _ => &[],
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.phase {
            ListPhase::Failed(message) => Some(message.as_str()),
            _ => None,
        }
    }

    /// Local time of the last successful load.
    pub fn fetched_at(&self) -> Option<DateTime<Local>> {
        self.fetched_at
    }
}
