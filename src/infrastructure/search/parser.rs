//! Search result page parser

use scraper::{Html, Selector};

use crate::domain::DomainError;

/// Extracts result snippets from a search result page
#[derive(Debug, Clone)]
pub struct SnippetParser {
    selector: Selector,
    max_snippets: usize,
}

impl SnippetParser {
    /// Creates a parser for elements matching the CSS `selector`
    pub fn new(selector: &str, max_snippets: usize) -> Result<Self, DomainError> {
        let selector = Selector::parse(selector).map_err(|e| {
            DomainError::configuration(format!("Invalid snippet selector '{}': {:?}", selector, e))
        })?;

        Ok(Self {
            selector,
            max_snippets,
        })
    }

    /// Text of the first matching elements in document order, trimmed, blanks
    /// dropped
    pub fn extract(&self, html: &str) -> Vec<String> {
        let document = Html::parse_document(html);

        document
            .select(&self.selector)
            .take(self.max_snippets)
            .map(|el| el.text().collect::<String>().trim().to_string())
            .filter(|text| !text.is_empty())
            .collect()
    }
}
