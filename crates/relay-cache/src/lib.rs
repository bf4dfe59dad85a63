mod fingerprint;
mod in_memory;

pub use fingerprint::{fingerprint, fingerprint_request};
pub use in_memory::{CacheMetrics, InMemoryCache};

// Re-export the cache trait from core so downstream crates can depend on
// this crate alone.
pub use relay_core::ResultCache;
