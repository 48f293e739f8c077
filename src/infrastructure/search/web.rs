//! HTML search endpoint retriever

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{info, warn};

use super::parser::SnippetParser;
use crate::domain::retrieval::{broken_web_sentinel, SnippetSource, NOTHING_FOUND_SENTINEL};
use crate::domain::DomainError;

/// Search endpoint settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// HTML search endpoint; the query is sent as the `q` parameter
    pub base_url: String,
    pub user_agent: String,
    pub timeout_secs: u64,
    pub max_snippets: usize,
    /// CSS selector of a single result snippet
    pub snippet_selector: String,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            base_url: "https://duckduckgo.com/html/".to_string(),
            user_agent: "Mozilla/5.0".to_string(),
            timeout_secs: 10,
            max_snippets: 3,
            snippet_selector: ".result__snippet".to_string(),
        }
    }
}

impl SearchConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Snippet source backed by an HTML search page
///
/// One GET per fetch, bounded by the configured timeout, never retried.
#[derive(Debug, Clone)]
pub struct WebSnippetRetriever {
    client: reqwest::Client,
    base_url: String,
    parser: SnippetParser,
}

impl WebSnippetRetriever {
    pub fn new(config: &SearchConfig) -> Result<Self, DomainError> {
        Self::with_timeout(config, config.timeout())
    }

    /// Same as [`Self::new`] with an explicit request timeout
    pub fn with_timeout(config: &SearchConfig, timeout: Duration) -> Result<Self, DomainError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| {
                DomainError::configuration(format!("Failed to build HTTP client: {}", e))
            })?;
        let parser = SnippetParser::new(&config.snippet_selector, config.max_snippets)?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            parser,
        })
    }

    async fn search(&self, query: &str) -> Result<Vec<String>, reqwest::Error> {
        let body = self
            .client
            .get(&self.base_url)
            .query(&[("q", query)])
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        Ok(self.parser.extract(&body))
    }
}

#[async_trait]
impl SnippetSource for WebSnippetRetriever {
    async fn fetch(&self, query: &str) -> String {
        match self.search(query).await {
            Ok(snippets) if snippets.is_empty() => {
                info!(query = %query, "Search returned no snippets");
                NOTHING_FOUND_SENTINEL.to_string()
            }
            Ok(snippets) => {
                info!(query = %query, snippets = snippets.len(), "Search returned snippets");
                snippets.join(" ")
            }
            Err(e) => {
                warn!(query = %query, error = %e, "Search failed");
                broken_web_sentinel(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::retrieval::WEB_BROKEN_PREFIX;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const RESULTS_PAGE: &str = r#"
        <html><body>
            <div class="result"><a class="result__snippet">Paris is the capital of France.</a></div>
            <div class="result"><a class="result__snippet">It is on the <b>Seine</b>.</a></div>
            <div class="result"><a class="result__snippet">About 2 million people live there.</a></div>
            <div class="result"><a class="result__snippet">This one is dropped.</a></div>
        </body></html>
    "#;

    fn config_for(server: &MockServer) -> SearchConfig {
        SearchConfig {
            base_url: format!("{}/html/", server.uri()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_fetch_joins_first_three_snippets() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/html/"))
            .and(query_param("q", "capital of france"))
            .and(header("user-agent", "Mozilla/5.0"))
            .respond_with(ResponseTemplate::new(200).set_body_string(RESULTS_PAGE))
            .expect(1)
            .mount(&server)
            .await;

        let retriever = WebSnippetRetriever::new(&config_for(&server)).unwrap();
        let context = retriever.fetch("capital of france").await;

        assert_eq!(
            context,
            "Paris is the capital of France. It is on the Seine. About 2 million people live there."
        );
    }

    #[tokio::test]
    async fn test_fetch_without_results_returns_sentinel() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html><body></body></html>"))
            .mount(&server)
            .await;

        let retriever = WebSnippetRetriever::new(&config_for(&server)).unwrap();

        assert_eq!(retriever.fetch("zzqx").await, NOTHING_FOUND_SENTINEL);
    }

    #[tokio::test]
    async fn test_fetch_error_status_returns_broken_sentinel() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .expect(1)
            .mount(&server)
            .await;

        let retriever = WebSnippetRetriever::new(&config_for(&server)).unwrap();
        let context = retriever.fetch("anything").await;

        assert!(context.starts_with(WEB_BROKEN_PREFIX));
        assert!(context.contains("503"));
    }

    #[tokio::test]
    async fn test_fetch_timeout_returns_broken_sentinel_without_retry() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(RESULTS_PAGE)
                    .set_delay(Duration::from_secs(2)),
            )
            .expect(1)
            .mount(&server)
            .await;

        let retriever =
            WebSnippetRetriever::with_timeout(&config_for(&server), Duration::from_millis(100))
                .unwrap();
        let context = retriever.fetch("slow").await;

        assert!(context.starts_with("Web's broken, mate. Error: "));
    }

    #[tokio::test]
    async fn test_fetch_connection_refused_returns_broken_sentinel() {
        let config = SearchConfig {
            base_url: "http://127.0.0.1:9/html/".to_string(),
            ..Default::default()
        };
        let retriever = WebSnippetRetriever::new(&config).unwrap();

        assert!(retriever.fetch("offline").await.starts_with(WEB_BROKEN_PREFIX));
    }

    #[test]
    fn test_default_config() {
        let config = SearchConfig::default();
        assert_eq!(config.timeout(), Duration::from_secs(10));
        assert_eq!(config.max_snippets, 3);
        assert_eq!(config.snippet_selector, ".result__snippet");
    }

    #[test]
    fn test_invalid_selector_fails_construction() {
        let config = SearchConfig {
            snippet_selector: "div[".to_string(),
            ..Default::default()
        };

        assert!(WebSnippetRetriever::new(&config).is_err());
    }
}
