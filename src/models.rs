//! Data models for categories, languages, articles and their sources.
//!
//! This module defines the core data structures used throughout the application:
//! - [`Category`]: The fixed set of news topics the backend partitions articles into
//! - [`Language`]: Target languages offered for summary translation
//! - [`Article`] / [`Source`]: A displayable article with placeholder fallbacks applied
//! - Wire payloads ([`NewsPayload`], [`QueryPayload`], [`ErrorPayload`]) as sent
//!   by the backend
//!
//! Wire payloads keep every field optional. Conversion into [`Article`] is where
//! missing cosmetic fields are replaced with placeholder text.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Title shown when the backend omits one.
pub const NO_TITLE: &str = "No title available";
/// Description shown when the backend omits one.
pub const NO_DESCRIPTION: &str = "No description available";
/// Source name shown when the backend omits one.
pub const UNKNOWN_SOURCE: &str = "Unknown source";
/// Image used for sources without a logo.
pub const FALLBACK_ICON: &str = "https://placehold.co/24x24";
/// Link target used when there is nothing to navigate to.
pub const NO_LINK: &str = "#";

/// A news topic recognized by the backend.
///
/// The same value serves as the `category` query parameter ([`Category::as_str`])
/// and as the label shown in the navigation strip ([`Category::display_name`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    #[default]
    General,
    Business,
    Entertainment,
    Health,
    Science,
    Sports,
    Technology,
}

impl Category {
    /// Every category, in navigation order.
    pub const ALL: [Category; 7] = [
        Category::General,
        Category::Business,
        Category::Entertainment,
        Category::Health,
        Category::Science,
        Category::Sports,
        Category::Technology,
    ];

    /// The value sent to the backend.
    pub fn as_str(self) -> &'static str {
        match self {
            Category::General => "general",
            Category::Business => "business",
            Category::Entertainment => "entertainment",
            Category::Health => "health",
            Category::Science => "science",
            Category::Sports => "sports",
            Category::Technology => "technology",
        }
    }

    /// The label shown to the reader.
    pub fn display_name(self) -> &'static str {
        match self {
            Category::General => "General",
            Category::Business => "Business",
            Category::Entertainment => "Entertainment",
            Category::Health => "Health",
            Category::Science => "Science",
            Category::Sports => "Sports",
            Category::Technology => "Technology",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string names neither a category nor a language.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind}: {value:?}")]
pub struct UnknownValue {
    kind: &'static str,
    value: String,
}

impl FromStr for Category {
    type Err = UnknownValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Category::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| UnknownValue {
                kind: "category",
                value: s.to_string(),
            })
    }
}

/// A target language for summary translation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum Language {
    Spanish,
    French,
    German,
    Hindi,
    #[value(name = "chinese", alias = "chinese-simplified")]
    ChineseSimplified,
}

impl Language {
    /// Every language, in menu order.
    pub const ALL: [Language; 5] = [
        Language::Spanish,
        Language::French,
        Language::German,
        Language::Hindi,
        Language::ChineseSimplified,
    ];

    /// The language as it appears in translation instructions.
    pub fn code(self) -> &'static str {
        match self {
            Language::Spanish => "spanish",
            Language::French => "french",
            Language::German => "german",
            Language::Hindi => "hindi",
            Language::ChineseSimplified => "chinese (simplified)",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Language::Spanish => "Spanish",
            Language::French => "French",
            Language::German => "German",
            Language::Hindi => "Hindi",
            Language::ChineseSimplified => "Chinese (Simplified)",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = UnknownValue;

    /// Accepts the instruction code, the display name, or the first word of
    /// either (so `chinese` selects Chinese (Simplified)).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Language::ALL
            .into_iter()
            .find(|l| {
                l.code().eq_ignore_ascii_case(wanted)
                    || l.display_name().eq_ignore_ascii_case(wanted)
                    || l.code()
                        .split_whitespace()
                        .next()
                        .is_some_and(|w| w.eq_ignore_ascii_case(wanted))
            })
            .ok_or_else(|| UnknownValue {
                kind: "language",
                value: s.to_string(),
            })
    }
}

/// Parse a language menu choice, where `none` (or nothing) clears the selection.
pub fn parse_language_choice(s: &str) -> Result<Option<Language>, UnknownValue> {
    let trimmed = s.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("none") {
        return Ok(None);
    }
    trimmed.parse().map(Some)
}

/// A publisher attribution attached to an article.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Source {
    pub name: String,
    /// Publisher logo, if the backend supplied a non-empty one.
    pub icon: Option<String>,
    /// Navigation and summarization target.
    pub url: String,
}

impl Source {
    /// The logo to display, falling back to a placeholder image.
    pub fn icon_or_fallback(&self) -> &str {
        self.icon.as_deref().unwrap_or(FALLBACK_ICON)
    }
}

/// A displayable news article.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Article {
    pub title: String,
    pub description: String,
    /// Ordered as received; may be empty and may contain duplicates.
    pub sources: Vec<Source>,
}

impl Article {
    /// URL of the first source, used to open the article's summary.
    pub fn primary_url(&self) -> Option<&str> {
        self.sources.first().map(|s| s.url.as_str())
    }
}

/// Body of a `GET /news` response.
#[derive(Debug, Default, Deserialize)]
pub struct NewsPayload {
    #[serde(default)]
    pub news_articles: Option<Vec<ArticlePayload>>,
    #[serde(default)]
    pub error: Option<String>,
}

/// One article as sent by the backend.
#[derive(Debug, Default, Deserialize)]
pub struct ArticlePayload {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub sources: Option<Vec<SourcePayload>>,
}

/// One source as sent by the backend.
#[derive(Debug, Default, Deserialize)]
pub struct SourcePayload {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub logo: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

/// Body of a `POST /query` request.
#[derive(Debug, Serialize)]
pub struct QueryRequest<'a> {
    pub input: &'a str,
}

/// Body of a successful `POST /query` response.
#[derive(Debug, Default, Deserialize)]
pub struct QueryPayload {
    #[serde(default)]
    pub output: Option<String>,
}

/// Body of a non-2xx response.
///
/// `detail` is usually a string, but validation failures carry a list of
/// problems instead, so it is kept as raw JSON.
#[derive(Debug, Default, Deserialize)]
pub struct ErrorPayload {
    #[serde(default)]
    pub detail: Option<serde_json::Value>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl From<SourcePayload> for Source {
    fn from(p: SourcePayload) -> Self {
        Source {
            name: non_empty(p.name).unwrap_or_else(|| UNKNOWN_SOURCE.to_string()),
            icon: non_empty(p.logo),
            url: non_empty(p.url).unwrap_or_else(|| NO_LINK.to_string()),
        }
    }
}

impl From<ArticlePayload> for Article {
    fn from(p: ArticlePayload) -> Self {
        Article {
            title: non_empty(p.title).unwrap_or_else(|| NO_TITLE.to_string()),
            description: non_empty(p.description).unwrap_or_else(|| NO_DESCRIPTION.to_string()),
            sources: p
                .sources
                .unwrap_or_default()
                .into_iter()
                .map(Source::from)
                .collect(),
        }
    }
}
