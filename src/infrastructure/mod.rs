//! Infrastructure layer - Store, cache and dataset implementations

pub mod api_key;
pub mod cache;
pub mod dataset;
pub mod logging;
pub mod rate_limiter;
