//! Search suggestions
//!
//! Fetching never fails from the caller's point of view: transport, status and
//! parse errors all collapse into an empty list. Overlapping requests are not
//! ordered, so [`SuggestionTracker`] decides which delivery is still wanted.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::runtime::{Handle, Runtime};
use tokio::task::JoinHandle;

use crate::error::NavigationError;
use crate::input::{check_template, fill_template};
use crate::Result;

pub const DEFAULT_SUGGESTION_ENDPOINT: &str =
    "https://suggestqueries.google.com/complete/search?client=firefox&q=%s";

#[derive(Debug, Clone)]
pub struct SuggestionFetcher {
    client: reqwest::Client,
    /// Endpoint URL template (%s replaced with query)
    endpoint: String,
    /// Where fetches run; never the caller's thread
    runtime: Handle,
    /// Set when no runtime was available at construction
    _owned_runtime: Option<Arc<BackgroundRuntime>>,
}

impl SuggestionFetcher {
    /// Use the ambient tokio runtime, or start a dedicated background one
    /// when called from a plain (UI) thread
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self> {
        match Handle::try_current() {
            Ok(handle) => Self::with_handle(endpoint, timeout, handle),
            Err(_) => {
                let owned = Arc::new(BackgroundRuntime::start()?);
                let mut fetcher = Self::with_handle(endpoint, timeout, owned.handle())?;
                fetcher._owned_runtime = Some(owned);
                Ok(fetcher)
            }
        }
    }

    pub fn with_handle(
        endpoint: impl Into<String>,
        timeout: Duration,
        runtime: Handle,
    ) -> Result<Self> {
        let endpoint = endpoint.into();
        check_template(&endpoint)?;

        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            endpoint,
            runtime,
            _owned_runtime: None,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Runtime the spawned fetches run on
    pub fn runtime(&self) -> &Handle {
        &self.runtime
    }

    /// Fetch candidates for `query`; any failure yields an empty list
    pub async fn fetch(&self, query: &str) -> Vec<String> {
        let query = query.trim();
        if query.is_empty() {
            return Vec::new();
        }

        match self.try_fetch(query).await {
            Ok(suggestions) => suggestions,
            Err(e) => {
                tracing::debug!(query = %query, error = %e, "Suggestion fetch failed");
                Vec::new()
            }
        }
    }

    /// Run [`fetch`](Self::fetch) on a background task. Callable from any
    /// thread, inside a runtime or not.
    pub fn spawn(&self, query: impl Into<String>) -> JoinHandle<Vec<String>> {
        let fetcher = self.clone();
        let query = query.into();
        self.runtime.spawn(async move { fetcher.fetch(&query).await })
    }

    async fn try_fetch(&self, query: &str) -> Result<Vec<String>> {
        let url = fill_template(&self.endpoint, query);
        let body = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;

        let value: Value = serde_json::from_slice(&body)?;
        parse_suggestions(&value).ok_or_else(|| {
            NavigationError::MalformedResponse("expected [query, [candidates...]]".to_string())
        })
    }
}

/// Runtime owned by a fetcher created outside any tokio context
#[derive(Debug)]
struct BackgroundRuntime {
    handle: Handle,
    runtime: Option<Runtime>,
}

impl BackgroundRuntime {
    fn start() -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .thread_name("binjola-suggest")
            .enable_all()
            .build()
            .map_err(NavigationError::Runtime)?;

        tracing::debug!("Started background runtime for suggestions");

        Ok(Self {
            handle: runtime.handle().clone(),
            runtime: Some(runtime),
        })
    }

    fn handle(&self) -> Handle {
        self.handle.clone()
    }
}

impl Drop for BackgroundRuntime {
    fn drop(&mut self) {
        // May be dropped from inside another runtime, where a blocking
        // shutdown would panic
        if let Some(runtime) = self.runtime.take() {
            runtime.shutdown_background();
        }
    }
}

/// Extract the candidate list (second array element) from a response
pub fn parse_suggestions(value: &Value) -> Option<Vec<String>> {
    let candidates = value.as_array()?.get(1)?.as_array()?;
    Some(
        candidates
            .iter()
            .filter_map(|c| c.as_str().map(str::to_string))
            .collect(),
    )
}

/// Identity of one issued suggestion request
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SuggestionTicket(u64);

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestionQuery {
    pub query_text: String,
    pub results: Vec<String>,
}

/// Last-issued-wins bookkeeping for one input field
#[derive(Debug, Default)]
pub struct SuggestionTracker {
    issued: u64,
    pending_query: String,
    current: SuggestionQuery,
}

impl SuggestionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new request; every earlier ticket becomes stale
    pub fn issue(&mut self, query: impl Into<String>) -> SuggestionTicket {
        self.issued += 1;
        self.pending_query = query.into();
        SuggestionTicket(self.issued)
    }

    pub fn is_latest(&self, ticket: SuggestionTicket) -> bool {
        ticket.0 == self.issued
    }

    /// Replace the current list if `ticket` is still the latest request
    pub fn deliver(&mut self, ticket: SuggestionTicket, results: Vec<String>) -> bool {
        if !self.is_latest(ticket) {
            tracing::debug!(
                ticket = ticket.0,
                latest = self.issued,
                "Dropping stale suggestions"
            );
            return false;
        }

        self.current = SuggestionQuery {
            query_text: self.pending_query.clone(),
            results,
        };
        true
    }

    pub fn current(&self) -> &SuggestionQuery {
        &self.current
    }

    /// Hide suggestions; in-flight requests become stale
    pub fn clear(&mut self) {
        self.issued += 1;
        self.pending_query.clear();
        self.current = SuggestionQuery::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serve one canned HTTP response and return an endpoint template for it
    async fn serve_once(status_line: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 2048];
            let _ = socket.read(&mut buf).await;
            let response = format!(
                "{}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            let _ = socket.shutdown().await;
        });

        format!("http://{}/complete/search?client=firefox&q=%s", addr)
    }

    fn fetcher(endpoint: &str) -> SuggestionFetcher {
        SuggestionFetcher::new(endpoint, Duration::from_secs(2)).unwrap()
    }

    #[test]
    fn test_parse_suggestions() {
        let value = json!(["rust", ["rust lang", "rust book", 3, "rustup"]]);
        assert_eq!(
            parse_suggestions(&value),
            Some(vec![
                "rust lang".to_string(),
                "rust book".to_string(),
                "rustup".to_string()
            ])
        );

        assert_eq!(parse_suggestions(&json!(["rust", []])), Some(vec![]));
        assert_eq!(parse_suggestions(&json!(["rust"])), None);
        assert_eq!(parse_suggestions(&json!({"rust": []})), None);
    }

    #[test]
    fn test_rejects_endpoint_without_placeholder() {
        assert!(SuggestionFetcher::new("https://example.com/", Duration::from_secs(1)).is_err());
    }

    #[tokio::test]
    async fn test_fetch_success() {
        let endpoint = serve_once("HTTP/1.1 200 OK", r#"["rus",["rust","rust book"]]"#).await;

        let results = fetcher(&endpoint).fetch("rus").await;
        assert_eq!(results, vec!["rust".to_string(), "rust book".to_string()]);
    }

    #[tokio::test]
    async fn test_fetch_network_error_is_empty() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let endpoint = format!("http://{}/complete/search?q=%s", addr);
        assert!(fetcher(&endpoint).fetch("rust").await.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_bad_status_and_body_are_empty() {
        let endpoint = serve_once("HTTP/1.1 500 Internal Server Error", "[]").await;
        assert!(fetcher(&endpoint).fetch("rust").await.is_empty());

        let endpoint = serve_once("HTTP/1.1 200 OK", "<html>not json</html>").await;
        assert!(fetcher(&endpoint).fetch("rust").await.is_empty());
    }

    #[tokio::test]
    async fn test_blank_query_skips_request() {
        let results = fetcher("http://127.0.0.1:9/?q=%s").fetch("   ").await;
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_spawned_fetch_delivers() {
        let endpoint = serve_once("HTTP/1.1 200 OK", r#"["to",["tokio"]]"#).await;

        let handle = fetcher(&endpoint).spawn("to");
        assert_eq!(handle.await.unwrap(), vec!["tokio".to_string()]);
    }

    #[test]
    fn test_spawn_outside_runtime() {
        assert!(Handle::try_current().is_err());

        let fetcher = fetcher("http://127.0.0.1:9/complete/search?q=%s");
        let handle = fetcher.spawn("rust");

        let results = fetcher.runtime().block_on(handle).unwrap();
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_uses_ambient_runtime() {
        let fetcher = fetcher("http://127.0.0.1:9/complete/search?q=%s");
        assert_eq!(fetcher.runtime().id(), Handle::current().id());
    }

    #[test]
    fn test_tracker_last_issued_wins() {
        let mut tracker = SuggestionTracker::new();

        let first = tracker.issue("ru");
        let second = tracker.issue("rus");

        assert!(tracker.deliver(second, vec!["rust".to_string()]));
        assert!(!tracker.deliver(first, vec!["ruby".to_string()]));

        assert_eq!(tracker.current().query_text, "rus");
        assert_eq!(tracker.current().results, vec!["rust".to_string()]);
    }

    #[test]
    fn test_tracker_clear_invalidates_pending() {
        let mut tracker = SuggestionTracker::new();
        let ticket = tracker.issue("rust");

        tracker.clear();
        assert!(!tracker.deliver(ticket, vec!["rust".to_string()]));
        assert_eq!(tracker.current(), &SuggestionQuery::default());
    }
}
