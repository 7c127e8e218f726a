//! TTL cache for fetched Hive payloads
//!
//! Provides a `TtlCache` that stores payloads alongside expiry timestamps.
//! The cache is constructed once at startup and shared through an `Arc`.

use chrono::{DateTime, Duration, Utc};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::fmt;

/// Default time-to-live for cache entries in milliseconds (5 minutes)
pub const DEFAULT_TTL_MS: i64 = 300_000;

/// Identity of a cache entry: a namespace plus an ordered list of parameters
///
/// Equality and hashing are structural, so a parameter containing `_` can
/// never collide with a differently split key. The `Display` form joins the
/// parts with `_` and is meant for logs only.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    namespace: &'static str,
    params: Vec<String>,
}

impl CacheKey {
    /// Builds a key from a namespace prefix and ordered parameter values
    ///
    /// # Arguments
    /// * `namespace` - Key prefix (e.g., "post", "user_profile")
    /// * `params` - Identifying values in a fixed order (e.g., author, permlink)
    pub fn new<I, P>(namespace: &'static str, params: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: ToString,
    {
        Self {
            namespace,
            params: params.into_iter().map(|p| p.to_string()).collect(),
        }
    }

    /// Returns the namespace prefix
    pub fn namespace(&self) -> &str {
        self.namespace
    }

    /// Returns the parameter values in order
    pub fn params(&self) -> &[String] {
        &self.params
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.namespace)?;
        for param in &self.params {
            write!(f, "_{}", param)?;
        }
        Ok(())
    }
}

/// A cached payload with its expiry timestamp
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    /// The cached payload
    pub payload: V,
    /// When the entry was stored
    pub cached_at: DateTime<Utc>,
    /// When the entry stops being valid
    pub expires_at: DateTime<Utc>,
}

/// Returns whether an entry is present and not yet expired
pub fn is_valid<V>(entry: Option<&CacheEntry<V>>) -> bool {
    is_valid_at(entry, Utc::now())
}

/// Returns whether an entry is present and `now` is strictly before its expiry
pub fn is_valid_at<V>(entry: Option<&CacheEntry<V>>, now: DateTime<Utc>) -> bool {
    match entry {
        Some(entry) => now < entry.expires_at,
        None => false,
    }
}

/// In-memory mapping from `CacheKey` to payload and expiry
///
/// Entries are never evicted; an expired entry stays in the map until the
/// next store to its key overwrites it.
#[derive(Debug)]
pub struct TtlCache<V> {
    entries: RwLock<HashMap<CacheKey, CacheEntry<V>>>,
    default_ttl: Duration,
}

impl<V: Clone> Default for TtlCache<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Clone> TtlCache<V> {
    /// Creates an empty cache using the 5 minute default TTL
    pub fn new() -> Self {
        Self::with_ttl(Duration::milliseconds(DEFAULT_TTL_MS))
    }

    /// Creates an empty cache with a custom default TTL
    pub fn with_ttl(default_ttl: Duration) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            default_ttl,
        }
    }

    /// Returns the TTL applied by `put`
    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    /// Looks up an entry without checking its expiry
    pub fn get(&self, key: &CacheKey) -> Option<CacheEntry<V>> {
        self.entries.read().get(key).cloned()
    }

    /// Looks up a payload, returning `None` if it is missing or expired
    pub fn get_valid(&self, key: &CacheKey) -> Option<V> {
        let entries = self.entries.read();
        let entry = entries.get(key);
        if is_valid(entry) {
            entry.map(|e| e.payload.clone())
        } else {
            None
        }
    }

    /// Stores a payload with the cache's default TTL
    pub fn put(&self, key: CacheKey, payload: V) {
        self.put_with_ttl(key, payload, self.default_ttl);
    }

    /// Stores a payload with an explicit TTL, replacing any existing entry
    pub fn put_with_ttl(&self, key: CacheKey, payload: V, ttl: Duration) {
        self.put_at(key, payload, ttl, Utc::now());
    }

    /// Stores a payload as if the current time were `now`
    pub fn put_at(&self, key: CacheKey, payload: V, ttl: Duration, now: DateTime<Utc>) {
        let entry = CacheEntry {
            payload,
            cached_at: now,
            expires_at: now + ttl,
        };
        self.entries.write().insert(key, entry);
    }

    /// Number of stored entries, expired ones included
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Whether the cache holds no entries at all
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}
