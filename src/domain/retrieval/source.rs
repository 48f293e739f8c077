//! Snippet source trait and fallback texts

use async_trait::async_trait;

#[cfg(test)]
use mockall::automock;

/// Context used when a search succeeds but yields no snippets
pub const NOTHING_FOUND_SENTINEL: &str =
    "Nothing useful found. The internet's letting me down today.";

/// Leading text of the context used when a search fails
pub const WEB_BROKEN_PREFIX: &str = "Web's broken, mate.";

/// Builds the fallback context for a failed search
pub fn broken_web_sentinel(error: impl std::fmt::Display) -> String {
    format!("{} Error: {}", WEB_BROKEN_PREFIX, error)
}

/// Source of short text snippets for a query
///
/// Implementations never fail: network or parse problems are reported as
/// [`broken_web_sentinel`] text and empty results as
/// [`NOTHING_FOUND_SENTINEL`], so callers always get usable context.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait SnippetSource: Send + Sync {
    /// Issues one search for `query` and returns the joined snippets
    async fn fetch(&self, query: &str) -> String;
}

/// Context resolved for one request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetrievalResult {
    pub context: String,
    pub from_cache: bool,
}

impl RetrievalResult {
    pub fn cached(context: impl Into<String>) -> Self {
        Self {
            context: context.into(),
            from_cache: true,
        }
    }

    pub fn fetched(context: impl Into<String>) -> Self {
        Self {
            context: context.into(),
            from_cache: false,
        }
    }
}
