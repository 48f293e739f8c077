//! Web search infrastructure - snippet retrieval over HTTP

mod parser;
mod web;

pub use parser::SnippetParser;
pub use web::{SearchConfig, WebSnippetRetriever};
