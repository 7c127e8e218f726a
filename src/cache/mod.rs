//! In-memory cache for upstream API responses
//!
//! This module provides a TTL cache keyed by structured `(namespace, params)`
//! keys. Entries carry an absolute expiry timestamp; expired entries are not
//! pruned but are treated as absent on lookup and overwritten by the next
//! store to the same key.

mod manager;

pub use manager::{is_valid, is_valid_at, CacheEntry, CacheKey, TtlCache, DEFAULT_TTL_MS};
