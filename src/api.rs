//! Backend API client for the news and query endpoints.
//!
//! The reader talks to two endpoints:
//! - `GET /news?category={category}` returns the article list for a category
//! - `POST /query` runs a natural-language instruction (summarize, translate)
//!   and returns the model's text
//!
//! # Architecture
//!
//! - [`NewsApi`]: Core trait the state machines are driven through
//! - [`HttpNewsApi`]: `reqwest` implementation against a configured base URL
//! - [`interpret_news`] / [`interpret_query`]: Pure status + body interpretation,
//!   shared by every implementation so error text is consistent
//!
//! There is no retry, backoff or timeout at this layer. A failed request is
//! surfaced once as an [`ApiError`] whose `Display` text is what the reader sees.

use crate::config::Config;
use crate::models::{
    Article, Category, ErrorPayload, Language, NewsPayload, QueryPayload, QueryRequest,
};
use crate::utils::truncate_for_log;
use reqwest::{Client, StatusCode};
use std::time::Instant;
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

/// Build the instruction that asks the backend to summarize an article.
pub fn summarize_instruction(article_url: &str) -> String {
    format!("Summarize this article: {article_url}")
}

/// Build the instruction that asks the backend to translate a summary.
pub fn translate_instruction(language: Language, text: &str) -> String {
    format!("Translate this text to {}: {text}", language.code())
}

/// Why a backend request did not produce a usable result.
///
/// Every variant collapses to one human-readable line through `Display`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// No response was received (connection refused, DNS failure, ...).
    #[error("Failed to connect to backend. Ensure it is running at {base_url}.")]
    Unreachable { base_url: String, reason: String },

    /// The backend answered with a non-2xx status.
    #[error("{detail}")]
    Server { status: u16, detail: String },

    /// The body could not be read as the expected JSON shape.
    #[error("Unexpected response from backend: {0}")]
    Malformed(String),

    #[error("Invalid backend endpoint: {0}")]
    Endpoint(String),

    #[error("Failed to build HTTP client: {0}")]
    Client(String),
}

/// A successfully received article list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewsListing {
    pub articles: Vec<Article>,
    /// Explanation the backend attached, typically when no articles were found.
    pub error: Option<String>,
}

/// Async access to the backend.
///
/// Implementors only perform the request; deciding what the reader sees is
/// left to the state machines in [`crate::state`].
pub trait NewsApi {
    /// List articles for a category.
    async fn list_articles(&self, category: Category) -> Result<NewsListing, ApiError>;

    /// Send a natural-language instruction and return the output text.
    ///
    /// A success without an `output` field yields an empty string.
    async fn query(&self, input: &str) -> Result<String, ApiError>;
}

/// Interpret a `/news` response.
///
/// A missing `news_articles` array is an empty listing, not a failure.
pub fn interpret_news(status: StatusCode, body: &str) -> Result<NewsListing, ApiError> {
    if !status.is_success() {
        return Err(server_error(status, body));
    }
    let payload: NewsPayload =
        serde_json::from_str(body).map_err(|e| ApiError::Malformed(e.to_string()))?;
    Ok(NewsListing {
        articles: payload
            .news_articles
            .unwrap_or_default()
            .into_iter()
            .map(Article::from)
            .collect(),
        error: payload.error.filter(|e| !e.trim().is_empty()),
    })
}

/// Interpret a `/query` response.
pub fn interpret_query(status: StatusCode, body: &str) -> Result<String, ApiError> {
    if !status.is_success() {
        return Err(server_error(status, body));
    }
    let payload: QueryPayload =
        serde_json::from_str(body).map_err(|e| ApiError::Malformed(e.to_string()))?;
    Ok(payload.output.unwrap_or_default())
}

/// Turn a non-2xx response into [`ApiError::Server`], preferring the body's `detail`.
fn server_error(status: StatusCode, body: &str) -> ApiError {
    let detail = serde_json::from_str::<ErrorPayload>(body)
        .ok()
        .and_then(|p| p.detail)
        .and_then(|d| match d {
            serde_json::Value::Null => None,
            serde_json::Value::String(s) if s.trim().is_empty() => None,
            serde_json::Value::String(s) => Some(s),
            other => Some(other.to_string()),
        })
        .unwrap_or_else(|| format!("HTTP error! status: {}", status.as_u16()));
    ApiError::Server {
        status: status.as_u16(),
        detail,
    }
}

/// [`NewsApi`] over HTTP.
#[derive(Debug, Clone)]
pub struct HttpNewsApi {
    client: Client,
    config: Config,
}

impl HttpNewsApi {
    pub fn new(config: Config) -> Result<Self, ApiError> {
        let client = Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ApiError::Client(e.to_string()))?;
        Ok(Self { client, config })
    }

    fn unreachable(&self, e: reqwest::Error) -> ApiError {
        ApiError::Unreachable {
            base_url: self.config.display_base_url().to_string(),
            reason: e.to_string(),
        }
    }
}

impl NewsApi for HttpNewsApi {
    #[instrument(level = "info", skip(self), fields(%category))]
    async fn list_articles(&self, category: Category) -> Result<NewsListing, ApiError> {
        let t0 = Instant::now();
        let mut url = self
            .config
            .endpoint("news")
            .map_err(|e| ApiError::Endpoint(e.to_string()))?;
        url.query_pairs_mut().append_pair("category", category.as_str());
        debug!(%url, "Requesting news");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| self.unreachable(e))?;
        let status = response.status();
        let body = response.text().await.map_err(|e| self.unreachable(e))?;
        let dt = t0.elapsed();

        let res = interpret_news(status, &body);
        match &res {
            Ok(listing) => info!(
                status = status.as_u16(),
                count = listing.articles.len(),
                elapsed_ms = dt.as_millis() as u64,
                "Fetched news"
            ),
            Err(e) => warn!(
                status = status.as_u16(),
                elapsed_ms = dt.as_millis() as u64,
                error = %e,
                body_preview = %truncate_for_log(&body, 300),
                "News request failed"
            ),
        }
        res
    }

    #[instrument(level = "info", skip_all, fields(input = %truncate_for_log(input, 80)))]
    async fn query(&self, input: &str) -> Result<String, ApiError> {
        let t0 = Instant::now();
        let url = self
            .config
            .endpoint("query")
            .map_err(|e| ApiError::Endpoint(e.to_string()))?;

        let response = self
            .client
            .post(url)
            .json(&QueryRequest { input })
            .send()
            .await
            .map_err(|e| self.unreachable(e))?;
        let status = response.status();
        let body = response.text().await.map_err(|e| self.unreachable(e))?;
        let dt = t0.elapsed();

        let res = interpret_query(status, &body);
        match &res {
            Ok(output) => info!(
                status = status.as_u16(),
                bytes = output.len(),
                elapsed_ms = dt.as_millis() as u64,
                "Query answered"
            ),
            Err(e) => warn!(
                status = status.as_u16(),
                elapsed_ms = dt.as_millis() as u64,
                error = %e,
                "Query failed"
            ),
        }
        res
    }
}

/// In-memory [`NewsApi`] for tests, answering from scripted queues.
#[cfg(test)]
pub(crate) mod fake {
    use super::*;
    use std::cell::RefCell;
    use std::collections::{HashMap, VecDeque};

    /// A request the fake received.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub(crate) enum Call {
        News(Category),
        Query(String),
    }

    #[derive(Debug, Default)]
    pub(crate) struct ScriptedApi {
        news: RefCell<HashMap<Category, VecDeque<Result<NewsListing, ApiError>>>>,
        queries: RefCell<VecDeque<Result<String, ApiError>>>,
        calls: RefCell<Vec<Call>>,
    }

    impl ScriptedApi {
        pub(crate) fn new() -> Self {
            Self::default()
        }

        /// Queue a raw `/news` response, interpreted exactly as HTTP would be.
        pub(crate) fn news_body(self, category: Category, status: u16, body: &str) -> Self {
            let status = StatusCode::from_u16(status).unwrap();
            self.news
                .borrow_mut()
                .entry(category)
                .or_default()
                .push_back(interpret_news(status, body));
            self
        }

        pub(crate) fn news_error(self, category: Category, error: ApiError) -> Self {
            self.news
                .borrow_mut()
                .entry(category)
                .or_default()
                .push_back(Err(error));
            self
        }

        /// Queue a raw `/query` response.
        pub(crate) fn query_body(self, status: u16, body: &str) -> Self {
            let status = StatusCode::from_u16(status).unwrap();
            self.queries
                .borrow_mut()
                .push_back(interpret_query(status, body));
            self
        }

        pub(crate) fn query_error(self, error: ApiError) -> Self {
            self.queries.borrow_mut().push_back(Err(error));
            self
        }

        pub(crate) fn calls(&self) -> Vec<Call> {
            self.calls.borrow().clone()
        }
    }

    impl NewsApi for ScriptedApi {
        async fn list_articles(&self, category: Category) -> Result<NewsListing, ApiError> {
            self.calls.borrow_mut().push(Call::News(category));
            self.news
                .borrow_mut()
                .get_mut(&category)
                .and_then(VecDeque::pop_front)
                .unwrap_or_else(|| Err(unscripted()))
        }

        async fn query(&self, input: &str) -> Result<String, ApiError> {
            self.calls.borrow_mut().push(Call::Query(input.to_string()));
            self.queries
                .borrow_mut()
                .pop_front()
                .unwrap_or_else(|| Err(unscripted()))
        }
    }

    pub(crate) fn unreachable_backend() -> ApiError {
        ApiError::Unreachable {
            base_url: "http://localhost:8000".to_string(),
            reason: "connection refused".to_string(),
        }
    }

    fn unscripted() -> ApiError {
        ApiError::Server {
            status: 599,
            detail: "no scripted response".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instruction_templates() {
        assert_eq!(
            summarize_instruction("http://a"),
            "Summarize this article: http://a"
        );
        assert_eq!(
            translate_instruction(Language::French, "summary text"),
            "Translate this text to french: summary text"
        );
        assert_eq!(
            translate_instruction(Language::ChineseSimplified, "x"),
            "Translate this text to chinese (simplified): x"
        );
    }

    #[test]
    fn test_interpret_news_success() {
        let body = r#"{"news_articles":[{"title":"A","description":"B","sources":[{"name":"X","logo":"u","url":"http://x"}]}]}"#;
        let listing = interpret_news(StatusCode::OK, body).unwrap();
        assert_eq!(listing.articles.len(), 1);
        assert_eq!(listing.articles[0].title, "A");
        assert_eq!(listing.error, None);
    }

    #[test]
    fn test_interpret_news_missing_array_is_empty() {
        let listing = interpret_news(StatusCode::OK, "{}").unwrap();
        assert!(listing.articles.is_empty());

        let listing = interpret_news(
            StatusCode::OK,
            r#"{"error":"No news articles found for category: health."}"#,
        )
        .unwrap();
        assert!(listing.articles.is_empty());
        assert_eq!(
            listing.error.as_deref(),
            Some("No news articles found for category: health.")
        );
    }

    #[test]
    fn test_interpret_news_malformed() {
        assert!(matches!(
            interpret_news(StatusCode::OK, "<html>oops</html>"),
            Err(ApiError::Malformed(_))
        ));
        assert!(matches!(
            interpret_news(StatusCode::OK, r#"{"news_articles": 3}"#),
            Err(ApiError::Malformed(_))
        ));
    }

    #[test]
    fn test_interpret_query_success() {
        assert_eq!(
            interpret_query(StatusCode::OK, r#"{"output":"summary text"}"#).unwrap(),
            "summary text"
        );
        assert_eq!(interpret_query(StatusCode::OK, "{}").unwrap(), "");
    }

    #[test]
    fn test_server_error_uses_detail() {
        let err = interpret_query(
            StatusCode::TOO_MANY_REQUESTS,
            r#"{"detail":"rate limited"}"#,
        )
        .unwrap_err();
        assert_eq!(
            err,
            ApiError::Server {
                status: 429,
                detail: "rate limited".to_string()
            }
        );
        assert_eq!(err.to_string(), "rate limited");
    }

    #[test]
    fn test_server_error_without_detail() {
        let err = interpret_news(StatusCode::BAD_GATEWAY, "upstream down").unwrap_err();
        assert_eq!(err.to_string(), "HTTP error! status: 502");

        let err = interpret_query(StatusCode::INTERNAL_SERVER_ERROR, r#"{"detail":""}"#)
            .unwrap_err();
        assert_eq!(err.to_string(), "HTTP error! status: 500");
    }

    #[test]
    fn test_server_error_structured_detail() {
        let err = interpret_query(
            StatusCode::UNPROCESSABLE_ENTITY,
            r#"{"detail":[{"msg":"field required"}]}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("field required"));
    }

    #[test]
    fn test_unreachable_message() {
        let err = fake::unreachable_backend();
        assert_eq!(
            err.to_string(),
            "Failed to connect to backend. Ensure it is running at http://localhost:8000."
        );
    }

    #[tokio::test]
    async fn test_http_client_reports_unreachable_backend() {
        // Port 9 (discard) is not expected to have an HTTP listener.
        let api = HttpNewsApi::new(Config::new("http://127.0.0.1:9").unwrap()).unwrap();
        let err = api.list_articles(Category::General).await.unwrap_err();
        assert!(matches!(err, ApiError::Unreachable { .. }));
        assert!(err.to_string().contains("http://127.0.0.1:9"));
    }
}
