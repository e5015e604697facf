//! View state machines and the requests that drive them.
//!
//! - [`list`]: The article list for the current category
//! - [`detail`]: One visit to an article's summary/translation view
//!
//! State machines never perform I/O themselves. Starting a transition hands
//! out a ticket, the ticket is wrapped in a [`Request`] and executed against a
//! [`NewsApi`], and the resulting [`Completion`] is fed back to the owner. This
//! lets several requests be in flight at once while each machine decides for
//! itself whether a response is still current.

pub mod detail;
pub mod list;

use crate::api::{ApiError, NewsApi, NewsListing};
use detail::{SummaryTicket, TranslationTicket};
use list::ListTicket;

/// A request waiting to be sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    List(ListTicket),
    Summary(SummaryTicket),
    Translation(TranslationTicket),
}

/// A request together with its outcome.
#[derive(Debug)]
pub enum Completion {
    List(ListTicket, Result<NewsListing, ApiError>),
    Summary(SummaryTicket, Result<String, ApiError>),
    Translation(TranslationTicket, Result<String, ApiError>),
}

impl Request {
    /// Send the request and pair the outcome with its ticket.
    pub async fn execute<A: NewsApi>(self, api: &A) -> Completion {
        match self {
            Request::List(ticket) => {
                let outcome = api.list_articles(ticket.category()).await;
                Completion::List(ticket, outcome)
            }
            Request::Summary(ticket) => {
                let outcome = api.query(ticket.instruction()).await;
                Completion::Summary(ticket, outcome)
            }
            Request::Translation(ticket) => {
                let outcome = api.query(ticket.instruction()).await;
                Completion::Translation(ticket, outcome)
            }
        }
    }
}
