//! Process-local page cache.
//!
//! An LRU map with per-entry TTL. Expired entries are treated as absent and
//! evicted lazily on access. All mutation goes through one mutex; eviction
//! is never performed outside it.

use std::sync::Mutex;
use std::time::{Duration, Instant};

use lru::LruCache;
use metrics::counter;

use crate::application::list::MembershipPage;

use super::config::CacheConfig;
use super::lock::mutex_lock;
use super::{METRIC_LOCAL_EVICT, METRIC_LOCAL_HIT, METRIC_LOCAL_MISS};

const SOURCE: &str = "cache::local";

struct LocalEntry {
    page: MembershipPage,
    expires_at: Instant,
}

/// Bounded in-process memoization of recently computed pages.
pub struct LocalPageCache {
    entries: Mutex<LruCache<String, LocalEntry>>,
    ttl: Duration,
}

impl LocalPageCache {
    pub fn new(config: &CacheConfig) -> Self {
        Self {
            entries: Mutex::new(LruCache::new(config.local_capacity_non_zero())),
            ttl: config.local_ttl,
        }
    }

    /// Returns the cached page if present and not expired.
    pub fn get(&self, key: &str) -> Option<MembershipPage> {
        let mut entries = mutex_lock(&self.entries, SOURCE, "get");
        match entries.get(key) {
            Some(entry) if entry.expires_at > Instant::now() => {
                counter!(METRIC_LOCAL_HIT).increment(1);
                Some(entry.page.clone())
            }
            Some(_) => {
                entries.pop(key);
                counter!(METRIC_LOCAL_MISS).increment(1);
                None
            }
            None => {
                counter!(METRIC_LOCAL_MISS).increment(1);
                None
            }
        }
    }

    /// Inserts or overwrites, evicting the least recently used entry when at
    /// capacity.
    pub fn set(&self, key: String, page: MembershipPage) {
        let entry = LocalEntry {
            page,
            expires_at: Instant::now() + self.ttl,
        };
        let mut entries = mutex_lock(&self.entries, SOURCE, "set");
        if let Some((evicted_key, _)) = entries.push(key, entry) {
            // push reports the displaced pair; an overwrite returns the same
            // key and is not an eviction.
            if !entries.contains(&evicted_key) {
                counter!(METRIC_LOCAL_EVICT).increment(1);
            }
        }
    }

    pub fn delete(&self, key: &str) {
        mutex_lock(&self.entries, SOURCE, "delete").pop(key);
    }

    /// Removes all entries unconditionally. The coarse invalidation hammer:
    /// the local tier has no pattern-match primitive, and a cold local cache
    /// after a mutation is acceptable where a stale page is not.
    pub fn clear(&self) {
        mutex_lock(&self.entries, SOURCE, "clear").clear();
    }

    pub fn len(&self) -> usize {
        mutex_lock(&self.entries, SOURCE, "len").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
