//! Request and response types of the HTTP boundary

pub mod ask;
pub mod error;
pub mod json;

pub use ask::AskRequest;
pub use error::{ApiError, ApiErrorResponse};
pub use json::Json;
