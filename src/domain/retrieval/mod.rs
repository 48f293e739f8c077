//! Retrieval domain - web snippets used as answer context

mod source;

pub use source::{
    broken_web_sentinel, RetrievalResult, SnippetSource, NOTHING_FOUND_SENTINEL,
    WEB_BROKEN_PREFIX,
};

#[cfg(test)]
pub use source::MockSnippetSource;
