//! One-shot subcommands: run a single view cycle, print it, and exit.

use crate::api::NewsApi;
use crate::models::{Article, Category, Language};
use crate::render::{DetailScreen, ListScreen};
use crate::state::detail::DetailView;
use crate::state::list::ListView;
use serde::Serialize;
use tracing::instrument;

/// Printed output plus whether every request succeeded.
#[derive(Debug)]
pub struct Report {
    pub output: String,
    pub ok: bool,
}

#[derive(Serialize)]
struct ListingJson<'a> {
    category: Category,
    articles: &'a [Article],
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<&'a str>,
}

/// Load one category and render it as cards or JSON.
#[instrument(level = "info", skip(api))]
pub async fn list<A: NewsApi>(
    api: &A,
    category: Category,
    json: bool,
) -> Result<Report, serde_json::Error> {
    let mut view = ListView::new(category);
    view.refresh(api).await;

    let output = if json {
        serde_json::to_string_pretty(&ListingJson {
            category,
            articles: view.articles(),
            error: view.error(),
        })?
    } else {
        ListScreen(&view).to_string()
    };
    Ok(Report {
        output,
        ok: view.error().is_none(),
    })
}

/// Summarize one article, then translate the summary if a language is given.
#[instrument(level = "info", skip(api))]
pub async fn summarize<A: NewsApi>(api: &A, url: &str, language: Option<Language>) -> Report {
    let mut view = DetailView::new(url, 1);
    view.load_summary(api).await;
    view.translate(api, language).await;

    Report {
        output: DetailScreen(&view).to_string(),
        ok: matches!(view.summary(), Some(Ok(_))) && !matches!(view.translation(), Some(Err(_))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::fake::{ScriptedApi, unreachable_backend};

    #[tokio::test]
    async fn test_list_cards() {
        let api = ScriptedApi::new().news_body(
            Category::Technology,
            200,
            r#"{"news_articles":[{"title":"A","description":"B","sources":[{"name":"X","logo":"u","url":"http://x"}]}]}"#,
        );
        let report = list(&api, Category::Technology, false).await.unwrap();
        assert!(report.ok);
        assert!(report.output.contains("News Articles - Technology"));
        assert!(report.output.contains("(1) X <http://x>  icon: u"));
    }

    #[tokio::test]
    async fn test_list_json() {
        let api = ScriptedApi::new().news_body(
            Category::Business,
            200,
            r#"{"news_articles":[{"title":"A"}]}"#,
        );
        let report = list(&api, Category::Business, true).await.unwrap();
        let value: serde_json::Value = serde_json::from_str(&report.output).unwrap();
        assert_eq!(value["category"], "business");
        assert_eq!(value["articles"][0]["title"], "A");
        assert_eq!(value["articles"][0]["description"], "No description available");
        assert!(value.get("error").is_none());
    }

    #[tokio::test]
    async fn test_list_failure_is_reported() {
        let api = ScriptedApi::new().news_error(Category::General, unreachable_backend());
        let report = list(&api, Category::General, false).await.unwrap();
        assert!(!report.ok);
        assert!(report.output.contains("Failed to connect to backend"));
    }

    #[tokio::test]
    async fn test_summarize_and_translate() {
        let api = ScriptedApi::new()
            .query_body(200, r#"{"output":"summary text"}"#)
            .query_body(200, r#"{"output":"Zusammenfassung"}"#);
        let report = summarize(&api, "http://a", Some(Language::German)).await;
        assert!(report.ok);
        assert!(report.output.contains("summary text"));
        assert!(report.output.contains("Translated Summary (German):\nZusammenfassung"));
    }

    #[tokio::test]
    async fn test_summarize_translation_failure() {
        let api = ScriptedApi::new()
            .query_body(200, r#"{"output":"summary text"}"#)
            .query_body(429, r#"{"detail":"rate limited"}"#);
        let report = summarize(&api, "http://a", Some(Language::French)).await;
        assert!(!report.ok);
        assert!(report.output.contains("❌ Error: rate limited"));
    }
}
