//! # Caching
//!
//! - [`ResultCache`]: TTL cache for aggregated search results

pub mod result_cache;

pub use result_cache::{DEFAULT_CLEANUP_INTERVAL, DEFAULT_TTL, ResultCache};
