//! Infrastructure layer - External service implementations

pub mod cache;
pub mod logging;
pub mod model;
pub mod search;
