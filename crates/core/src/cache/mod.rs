//! Cache module - TTL-bounded read-through caching.

mod ttl_cache;

pub use ttl_cache::TtlCache;
