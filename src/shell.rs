//! Root shell: current category, active route, and the views beneath them.
//!
//! The shell performs no I/O. Every operation that needs the backend returns a
//! [`Request`]; the caller executes it and hands the [`Completion`] back to
//! [`Shell::apply`].
//!
//! # Routes
//!
//! | Path | View |
//! |------|------|
//! | `/` | Article list for the current category |
//! | `/summary/{encoded url}` | Summary and translation for one article |

use crate::models::{Category, Language};
use crate::state::detail::DetailView;
use crate::state::list::ListView;
use crate::state::{Completion, Request};
use std::borrow::Cow;
use tracing::{debug, info, instrument};

const SUMMARY_PREFIX: &str = "/summary/";

/// A logical view location.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Route {
    #[default]
    List,
    /// `encoded_url` is the percent-encoded article URL path segment.
    Detail { encoded_url: String },
}

impl Route {
    /// The detail route for an article URL.
    pub fn for_article(article_url: &str) -> Self {
        Route::Detail {
            encoded_url: urlencoding::encode(article_url).into_owned(),
        }
    }

    /// Parse a path; `None` for paths outside the two known routes.
    pub fn parse(path: &str) -> Option<Self> {
        let path = path.trim();
        if path.is_empty() || path == "/" {
            return Some(Route::List);
        }
        let segment = path.strip_prefix(SUMMARY_PREFIX)?;
        if segment.is_empty() || segment.contains('/') {
            return None;
        }
        Some(Route::Detail {
            encoded_url: segment.to_string(),
        })
    }

    pub fn path(&self) -> String {
        match self {
            Route::List => "/".to_string(),
            Route::Detail { encoded_url } => format!("{SUMMARY_PREFIX}{encoded_url}"),
        }
    }

    /// The decoded article URL of a detail route.
    ///
    /// A segment that does not decode to UTF-8 is used as-is.
    pub fn article_url(&self) -> Option<String> {
        match self {
            Route::List => None,
            Route::Detail { encoded_url } => Some(
                urlencoding::decode(encoded_url)
                    .unwrap_or(Cow::Borrowed(encoded_url.as_str()))
                    .into_owned(),
            ),
        }
    }
}

#[derive(Debug)]
pub struct Shell {
    current_category: Category,
    list: ListView,
    route: Route,
    detail: Option<DetailView>,
    visits: u64,
}

impl Shell {
    pub fn new(category: Category) -> Self {
        Self {
            current_category: category,
            list: ListView::new(category),
            route: Route::List,
            detail: None,
            visits: 0,
        }
    }

    /// Load the current category for the first time.
    pub fn mount(&mut self) -> Request {
        Request::List(self.list.begin(self.current_category))
    }

    /// Make `category` current and reload the list.
    #[instrument(level = "info", skip(self), fields(%category))]
    pub fn change_category(&mut self, category: Category) -> Request {
        self.current_category = category;
        Request::List(self.list.begin(category))
    }

    pub fn refresh(&mut self) -> Request {
        Request::List(self.list.begin_refresh())
    }

    /// Switch views.
    ///
    /// Entering a detail route always starts a fresh visit and returns its
    /// summary request, even when the same article is already open. Leaving it
    /// discards the detail state.
    #[instrument(level = "info", skip(self), fields(path = %route.path()))]
    pub fn navigate(&mut self, route: Route) -> Option<Request> {
        self.route = route;
        match self.route.article_url() {
            None => {
                self.detail = None;
                None
            }
            Some(url) => {
                self.visits += 1;
                info!(%url, visit = self.visits, "Opening article");
                let mut detail = DetailView::new(url, self.visits);
                let ticket = detail.begin_summary();
                self.detail = Some(detail);
                Some(Request::Summary(ticket))
            }
        }
    }

    /// Forward a language choice to the open detail view.
    pub fn select_language(&mut self, choice: Option<Language>) -> Option<Request> {
        self.detail
            .as_mut()?
            .select_language(choice)
            .map(Request::Translation)
    }

    /// Route a completed request to the machine that issued it.
    ///
    /// Returns whether any visible state changed.
    pub fn apply(&mut self, completion: Completion) -> bool {
        let applied = match completion {
            Completion::List(ticket, outcome) => self.list.complete(ticket, outcome),
            Completion::Summary(ticket, outcome) => self
                .detail
                .as_mut()
                .is_some_and(|d| d.complete_summary(&ticket, outcome)),
            Completion::Translation(ticket, outcome) => self
                .detail
                .as_mut()
                .is_some_and(|d| d.complete_translation(&ticket, outcome)),
        };
        if !applied {
            debug!("Completion no longer current; ignored");
        }
        applied
    }

    pub fn current_category(&self) -> Category {
        self.current_category
    }

    pub fn list(&self) -> &ListView {
        &self.list
    }

    pub fn route(&self) -> &Route {
        &self.route
    }

    pub fn detail(&self) -> Option<&DetailView> {
        self.detail.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::fake::{Call, ScriptedApi};
    use crate::state::list::ListPhase;

    #[test]
    fn test_route_parse_and_path() {
        assert_eq!(Route::parse("/"), Some(Route::List));
        assert_eq!(Route::parse(""), Some(Route::List));
        assert_eq!(Route::parse("/about"), None);
        assert_eq!(Route::parse("/summary/"), None);
        assert_eq!(Route::parse("/summary/http://x"), None);

        let route = Route::for_article("https://news.example/a b?c=d");
        let parsed = Route::parse(&route.path()).unwrap();
        assert_eq!(parsed, route);
        assert_eq!(
            parsed.article_url().as_deref(),
            Some("https://news.example/a b?c=d")
        );
        assert_eq!(Route::List.article_url(), None);
    }

    #[tokio::test]
    async fn test_mount_loads_current_category() {
        let api = ScriptedApi::new().news_body(Category::General, 200, r#"{"news_articles":[]}"#);
        let mut shell = Shell::new(Category::General);

        let done = shell.mount().execute(&api).await;
        assert!(shell.apply(done));

        assert_eq!(shell.list().phase(), &ListPhase::Empty);
        assert_eq!(api.calls(), vec![Call::News(Category::General)]);
    }

    #[tokio::test]
    async fn test_change_category_updates_current() {
        let api = ScriptedApi::new().news_body(
            Category::Technology,
            200,
            r#"{"news_articles":[{"title":"A","sources":[]}]}"#,
        );
        let mut shell = Shell::new(Category::General);

        let request = shell.change_category(Category::Technology);
        assert_eq!(shell.current_category(), Category::Technology);
        assert!(shell.list().loading());

        shell.apply(request.execute(&api).await);
        assert_eq!(shell.list().articles()[0].title, "A");
    }

    #[tokio::test]
    async fn test_out_of_order_list_responses() {
        let api = ScriptedApi::new()
            .news_body(Category::Business, 200, r#"{"news_articles":[{"title":"biz"}]}"#)
            .news_body(Category::Health, 200, r#"{"news_articles":[{"title":"health"}]}"#);
        let mut shell = Shell::new(Category::General);

        let business = shell.change_category(Category::Business);
        let health = shell.change_category(Category::Health);

        let health_done = health.execute(&api).await;
        let business_done = business.execute(&api).await;
        assert!(shell.apply(health_done));
        assert!(!shell.apply(business_done));

        assert_eq!(shell.list().articles()[0].title, "health");
    }

    #[tokio::test]
    async fn test_detail_visit_summary_and_translation() {
        let api = ScriptedApi::new()
            .query_body(200, r#"{"output":"summary text"}"#)
            .query_body(200, r#"{"output":"resumen"}"#);
        let mut shell = Shell::new(Category::General);

        let summary = shell.navigate(Route::for_article("http://a")).unwrap();
        assert!(shell.detail().unwrap().loading_summary());
        shell.apply(summary.execute(&api).await);

        let translation = shell.select_language(Some(Language::Spanish)).unwrap();
        shell.apply(translation.execute(&api).await);

        let detail = shell.detail().unwrap();
        assert_eq!(detail.summary(), Some(Ok("summary text")));
        assert_eq!(detail.translation(), Some(Ok("resumen")));
        assert_eq!(
            api.calls(),
            vec![
                Call::Query("Summarize this article: http://a".to_string()),
                Call::Query("Translate this text to spanish: summary text".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_leaving_detail_discards_state() {
        let api = ScriptedApi::new().query_body(200, r#"{"output":"late"}"#);
        let mut shell = Shell::new(Category::General);

        let summary = shell.navigate(Route::for_article("http://a")).unwrap();
        assert_eq!(shell.navigate(Route::List), None);
        assert!(shell.detail().is_none());

        assert!(!shell.apply(summary.execute(&api).await));
    }

    #[tokio::test]
    async fn test_revisit_starts_fresh() {
        let api = ScriptedApi::new()
            .query_body(200, r#"{"output":"first"}"#)
            .query_body(200, r#"{"output":"second"}"#);
        let mut shell = Shell::new(Category::General);

        let first = shell.navigate(Route::for_article("http://a")).unwrap();
        let second = shell.navigate(Route::for_article("http://a")).unwrap();

        let first_done = first.execute(&api).await;
        assert!(!shell.apply(first_done));
        assert!(shell.detail().unwrap().loading_summary());

        shell.apply(second.execute(&api).await);
        assert_eq!(shell.detail().unwrap().summary(), Some(Ok("second")));
    }

    #[test]
    fn test_language_without_detail_is_ignored() {
        let mut shell = Shell::new(Category::General);
        assert!(shell.select_language(Some(Language::French)).is_none());
    }
}
