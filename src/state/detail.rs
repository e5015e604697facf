//! Article detail state machine: a summary, then an optional translation.
//!
//! ```text
//! summary:      Loading ──▶ Ready | Failed              (once per visit)
//! translation:  None ──select_language──▶ Loading ──▶ Ready | Failed
//!                 ▲                                      │
//!                 └──────── select "none" ───────────────┘
//! ```
//!
//! The translation slot only leaves `None` while the summary is `Ready`. A
//! failed summary is never sent for translation.

use crate::api::{ApiError, NewsApi, summarize_instruction, translate_instruction};
use crate::models::Language;
use tracing::{debug, info, instrument, warn};

/// Summary text used when the backend answers without any output.
pub const NO_SUMMARY: &str = "No summary available";
/// Translation text used when the backend answers without any output.
pub const NO_TRANSLATION: &str = "No translation available";

/// Prefix a failure message the way the detail view shows it.
pub fn error_text(message: &str) -> String {
    format!("❌ Error: {message}")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SummarySlot {
    Loading,
    Ready(String),
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranslationSlot {
    None,
    Loading(Language),
    Ready { language: Language, text: String },
    Failed { language: Language, message: String },
}

/// Issued when the summary request starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryTicket {
    visit: u64,
    instruction: String,
}

/// Issued when a translation request starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationTicket {
    visit: u64,
    seq: u64,
    language: Language,
    instruction: String,
}

impl SummaryTicket {
    /// The `/query` input for this request.
    pub fn instruction(&self) -> &str {
        &self.instruction
    }
}

impl TranslationTicket {
    pub fn instruction(&self) -> &str {
        &self.instruction
    }
}

/// State of one visit to an article's detail view.
///
/// `visit` distinguishes this visit from earlier ones to the same or another
/// article, so tickets from a previous visit never apply here.
#[derive(Debug, Clone)]
pub struct DetailView {
    article_url: String,
    visit: u64,
    summary: SummarySlot,
    translation: TranslationSlot,
    selected_language: Option<Language>,
    translations_issued: u64,
}

impl DetailView {
    /// Enter the view for `article_url`. The summary starts out loading; call
    /// [`DetailView::begin_summary`] to obtain the request.
    pub fn new(article_url: impl Into<String>, visit: u64) -> Self {
        Self {
            article_url: article_url.into(),
            visit,
            summary: SummarySlot::Loading,
            translation: TranslationSlot::None,
            selected_language: None,
            translations_issued: 0,
        }
    }

    /// Issue the summary request for this visit.
    #[instrument(level = "debug", skip(self), fields(url = %self.article_url, visit = self.visit))]
    pub fn begin_summary(&mut self) -> SummaryTicket {
        self.summary = SummarySlot::Loading;
        SummaryTicket {
            visit: self.visit,
            instruction: summarize_instruction(&self.article_url),
        }
    }

    /// Apply the summary outcome. Returns `false` for a ticket from another visit.
    #[instrument(level = "debug", skip_all, fields(visit = ticket.visit))]
    pub fn complete_summary(
        &mut self,
        ticket: &SummaryTicket,
        outcome: Result<String, ApiError>,
    ) -> bool {
        if ticket.visit != self.visit {
            debug!(current = self.visit, "Dropping summary for another visit");
            return false;
        }
        self.summary = match outcome {
            Ok(text) if text.trim().is_empty() => SummarySlot::Ready(NO_SUMMARY.to_string()),
            Ok(text) => {
                info!(bytes = text.len(), "Summary ready");
                SummarySlot::Ready(text)
            }
            Err(e) => {
                warn!(error = %e, "Summary failed");
                SummarySlot::Failed(e.to_string())
            }
        };
        true
    }

    /// Choose a translation language, or `None` to clear it.
    ///
    /// Returns a ticket only when a request must be sent: a language was
    /// chosen and the summary is ready. Any other choice resets the
    /// translation slot and invalidates an in-flight translation.
    #[instrument(level = "debug", skip(self), fields(visit = self.visit))]
    pub fn select_language(&mut self, choice: Option<Language>) -> Option<TranslationTicket> {
        self.selected_language = choice;
        self.translations_issued += 1;

        let (language, summary) = match (choice, &self.summary) {
            (Some(language), SummarySlot::Ready(summary)) => (language, summary),
            _ => {
                self.translation = TranslationSlot::None;
                return None;
            }
        };

        let instruction = translate_instruction(language, summary);
        self.translation = TranslationSlot::Loading(language);
        debug!(seq = self.translations_issued, %language, "Translation request issued");
        Some(TranslationTicket {
            visit: self.visit,
            seq: self.translations_issued,
            language,
            instruction,
        })
    }

    /// Apply a translation outcome. Returns `false` for a superseded ticket.
    #[instrument(level = "debug", skip_all, fields(visit = ticket.visit, seq = ticket.seq))]
    pub fn complete_translation(
        &mut self,
        ticket: &TranslationTicket,
        outcome: Result<String, ApiError>,
    ) -> bool {
        if ticket.visit != self.visit || ticket.seq != self.translations_issued {
            debug!(latest = self.translations_issued, "Dropping stale translation");
            return false;
        }
        let language = ticket.language;
        self.translation = match outcome {
            Ok(text) if text.trim().is_empty() => TranslationSlot::Ready {
                language,
                text: NO_TRANSLATION.to_string(),
            },
            Ok(text) => {
                info!(%language, bytes = text.len(), "Translation ready");
                TranslationSlot::Ready { language, text }
            }
            Err(e) => {
                warn!(%language, error = %e, "Translation failed");
                TranslationSlot::Failed {
                    language,
                    message: e.to_string(),
                }
            }
        };
        true
    }

    /// Enter the view and wait for the summary.
    pub async fn load_summary<A: NewsApi>(&mut self, api: &A) {
        let ticket = self.begin_summary();
        let outcome = api.query(ticket.instruction()).await;
        self.complete_summary(&ticket, outcome);
    }

    /// Select a language and wait for the translation, if one is requested.
    pub async fn translate<A: NewsApi>(&mut self, api: &A, choice: Option<Language>) {
        if let Some(ticket) = self.select_language(choice) {
            let outcome = api.query(ticket.instruction()).await;
            self.complete_translation(&ticket, outcome);
        }
    }

    pub fn article_url(&self) -> &str {
        &self.article_url
    }

    pub fn translation_slot(&self) -> &TranslationSlot {
        &self.translation
    }

    /// The summary once settled: `Ok(text)` or `Err(message)`.
    pub fn summary(&self) -> Option<Result<&str, &str>> {
        match &self.summary {
            SummarySlot::Loading => None,
            SummarySlot::Ready(text) => Some(Ok(text.as_str())),
            SummarySlot::Failed(message) => Some(Err(message.as_str())),
        }
    }

    pub fn loading_summary(&self) -> bool {
        matches!(self.summary, SummarySlot::Loading)
    }

    /// The translation once settled: `Ok(text)` or `Err(message)`.
    pub fn translation(&self) -> Option<Result<&str, &str>> {
        match &self.translation {
            TranslationSlot::Ready { text, .. } => Some(Ok(text.as_str())),
            TranslationSlot::Failed { message, .. } => Some(Err(message.as_str())),
            TranslationSlot::None | TranslationSlot::Loading(_) => None,
        }
    }

    pub fn loading_translation(&self) -> bool {
        matches!(self.translation, TranslationSlot::Loading(_))
    }

    pub fn selected_language(&self) -> Option<Language> {
        self.selected_language
    }

    /// The summary as displayed, with failures prefixed.
    pub fn summary_text(&self) -> Option<String> {
        self.summary().map(|r| match r {
            Ok(text) => text.to_string(),
            Err(message) => error_text(message),
        })
    }

    /// The translation as displayed, with failures prefixed.
    pub fn translation_text(&self) -> Option<String> {
        self.translation().map(|r| match r {
            Ok(text) => text.to_string(),
            Err(message) => error_text(message),
        })
    }
}
