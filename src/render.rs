//! Text presentation of the shell, its views, and article cards.
//!
//! Everything here is a pure function of its inputs. Cards and selectors hold
//! no state; choosing something on them produces an [`Intent`] for the caller
//! to act on.
//!
//! Screens are `Display` adapters so they can be printed directly:
//!
//! ```ignore
//! println!("{}", ShellScreen(&shell));
//! ```

use crate::models::{Article, Category, Language, NO_LINK};
use crate::shell::{Route, Shell};
use crate::state::detail::{DetailView, TranslationSlot};
use crate::state::list::{ListPhase, ListView};
use std::fmt;

/// Something the reader asked for by interacting with a card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    /// Open a URL outside the reader.
    OpenExternal(String),
    /// Switch to another view.
    Navigate(Route),
}

/// Open a source link, ignoring the `#` sentinel and empty values.
pub fn open_source(url: &str) -> Option<Intent> {
    let url = url.trim();
    if url.is_empty() || url == NO_LINK {
        return None;
    }
    Some(Intent::OpenExternal(url.to_string()))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceButton {
    pub name: String,
    pub icon: String,
    pub url: String,
}

/// Everything a card shows, derived from one article.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardView {
    pub title: String,
    pub description: String,
    /// One button per source, duplicates included.
    pub sources: Vec<SourceButton>,
    /// The summary view for the first source, or for `#` without sources.
    pub summary_route: Route,
}

impl CardView {
    pub fn from_article(article: &Article) -> Self {
        Self {
            title: article.title.clone(),
            description: article.description.clone(),
            sources: article
                .sources
                .iter()
                .map(|s| SourceButton {
                    name: s.name.clone(),
                    icon: s.icon_or_fallback().to_string(),
                    url: s.url.clone(),
                })
                .collect(),
            summary_route: Route::for_article(article.primary_url().unwrap_or(NO_LINK)),
        }
    }

    /// Pick an entry of the "read more" selector (zero-based).
    pub fn read_more(&self, index: usize) -> Option<Intent> {
        self.sources.get(index).and_then(|s| open_source(&s.url))
    }

    pub fn summarize(&self) -> Intent {
        Intent::Navigate(self.summary_route.clone())
    }

    /// Whether the card links to a real article rather than the sentinel.
    pub fn has_summary_target(&self) -> bool {
        self.summary_route.article_url().as_deref() != Some(NO_LINK)
    }
}

/// The navigation strip with the current category highlighted.
pub struct NavStrip(pub Category);

impl fmt::Display for NavStrip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "News App  ⌂ Home  │")?;
        for category in Category::ALL {
            if category == self.0 {
                write!(f, " [{}]", category.display_name())?;
            } else {
                write!(f, "  {} ", category.display_name())?;
            }
        }
        Ok(())
    }
}

/// Placeholder shown while the article list is loading.
pub struct LoadingPlaceholder;

impl fmt::Display for LoadingPlaceholder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "⟳ Loading news…")?;
        for _ in 0..3 {
            writeln!(f)?;
            writeln!(f, "  ░░░░░░░░░░░░░░░░░░░░░░░░")?;
            writeln!(f, "  ░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░")?;
            writeln!(f, "  ◌◌")?;
        }
        Ok(())
    }
}

/// One article card; `number` is the one-based position shown to the reader.
pub struct CardScreen<'a> {
    pub number: usize,
    pub card: &'a CardView,
}

impl fmt::Display for CardScreen<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let card = self.card;
        writeln!(f, "[{}] {}", self.number, card.title)?;
        writeln!(f, "    {}", card.description)?;
        if card.sources.is_empty() {
            writeln!(f, "    No sources available")?;
        } else {
            for (k, source) in card.sources.iter().enumerate() {
                writeln!(
                    f,
                    "    ({}) {} <{}>  icon: {}",
                    k + 1,
                    source.name,
                    source.url,
                    source.icon
                )?;
            }
            writeln!(f, "    Read more: o {} <source#>", self.number)?;
        }
        writeln!(
            f,
            "    Summarization: s {}  → {}",
            self.number,
            card.summary_route.path()
        )
    }
}

/// The list view in whichever phase it is in.
pub struct ListScreen<'a>(pub &'a ListView);

impl fmt::Display for ListScreen<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let view = self.0;
        if view.loading() {
            return write!(f, "{}", LoadingPlaceholder);
        }
        if let Some(message) = view.error() {
            return writeln!(f, "⚠ {message}");
        }
        let articles = view.articles();
        if articles.is_empty() {
            return match view.phase() {
                ListPhase::Idle => writeln!(f, "Pick a category to load news."),
                _ => writeln!(f, "No news articles found for category: {}.", view.category()),
            };
        }

        write!(f, "News Articles - {}", view.category().display_name())?;
        if let Some(at) = view.fetched_at() {
            write!(f, "  (updated {})", at.format("%H:%M:%S"))?;
        }
        writeln!(f)?;
        for (i, article) in articles.iter().enumerate() {
            writeln!(f)?;
            let card = CardView::from_article(article);
            write!(f, "{}", CardScreen { number: i + 1, card: &card })?;
        }
        writeln!(f)?;
        writeln!(f, "Refresh News: r")
    }
}

/// The summary/translation view for one article.
pub struct DetailScreen<'a>(pub &'a DetailView);

impl fmt::Display for DetailScreen<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let view = self.0;
        writeln!(f, "🧠 Article Summary")?;
        writeln!(f, "   {}", view.article_url())?;
        writeln!(f)?;

        if view.loading_summary() {
            return writeln!(f, "Loading summary...");
        }
        let summary = view.summary_text().unwrap_or_default();
        writeln!(f, "🔍 English Summary:")?;
        writeln!(f, "{summary}")?;
        writeln!(f)?;

        write!(f, "Select Language (l <name>):")?;
        for language in Language::ALL {
            let marker = if view.selected_language() == Some(language) { "*" } else { "" };
            write!(f, " {}{marker}", language.display_name())?;
        }
        writeln!(f, " | none")?;

        if view.loading_translation() {
            return writeln!(f, "Translating...");
        }
        match view.translation_slot() {
            TranslationSlot::Ready { language, .. } | TranslationSlot::Failed { language, .. } => {
                writeln!(f)?;
                writeln!(f, "🔍 Translated Summary ({}):", language.display_name())?;
                writeln!(f, "{}", view.translation_text().unwrap_or_default())
            }
            TranslationSlot::None | TranslationSlot::Loading(_) => Ok(()),
        }
    }
}

/// The whole screen: navigation strip plus the routed view.
pub struct ShellScreen<'a>(pub &'a Shell);

impl fmt::Display for ShellScreen<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let shell = self.0;
        writeln!(f, "{}", NavStrip(shell.current_category()))?;
        writeln!(f, "{}", "─".repeat(72))?;
        match (shell.route(), shell.detail()) {
            (Route::Detail { .. }, Some(detail)) => write!(f, "{}", DetailScreen(detail)),
            _ => write!(f, "{}", ListScreen(shell.list())),
        }
    }
}
