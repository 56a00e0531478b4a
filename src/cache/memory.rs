//! In-process [`SharedCache`] backend.
//!
//! Stands in for Redis when no shared-cache URL is configured and backs the
//! behavioral test suites. Correct for a single instance; it cannot provide
//! cross-instance invalidation.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use async_trait::async_trait;

use super::lock::mutex_lock;
use super::shared::{SharedCache, SharedCacheError};

const SOURCE: &str = "cache::memory";

struct MemoryEntry {
    value: String,
    expires_at: Instant,
}

#[derive(Default)]
pub struct MemorySharedCache {
    entries: Mutex<HashMap<String, MemoryEntry>>,
}

impl MemorySharedCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        let now = Instant::now();
        mutex_lock(&self.entries, SOURCE, "len")
            .values()
            .filter(|entry| entry.expires_at > now)
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Glob match supporting the `*` wildcard; the only patterns this crate
/// produces are `prefix*`, but suffix and infix stars fall out for free.
fn glob_matches(pattern: &str, key: &str) -> bool {
    let mut segments = pattern.split('*');
    let first = segments.next().unwrap_or("");
    if !key.starts_with(first) {
        return false;
    }
    let mut rest = &key[first.len()..];
    let mut last_segment: Option<&str> = None;
    for segment in segments {
        last_segment = Some(segment);
        if segment.is_empty() {
            continue;
        }
        match rest.find(segment) {
            Some(pos) => rest = &rest[pos + segment.len()..],
            None => return false,
        }
    }
    match last_segment {
        // No '*' at all: exact match required.
        None => rest.is_empty(),
        Some(last) if !last.is_empty() => key.ends_with(last),
        Some(_) => true,
    }
}

#[async_trait]
impl SharedCache for MemorySharedCache {
    async fn get(&self, key: &str) -> Result<Option<String>, SharedCacheError> {
        let mut entries = mutex_lock(&self.entries, SOURCE, "get");
        match entries.get(key) {
            Some(entry) if entry.expires_at > Instant::now() => Ok(Some(entry.value.clone())),
            Some(_) => {
                entries.remove(key);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn set(
        &self,
        key: &str,
        value: &str,
        ttl: Duration,
    ) -> Result<(), SharedCacheError> {
        let entry = MemoryEntry {
            value: value.to_string(),
            expires_at: Instant::now() + ttl,
        };
        mutex_lock(&self.entries, SOURCE, "set").insert(key.to_string(), entry);
        Ok(())
    }

    async fn delete_matching(
        &self,
        pattern: &str,
        _batch_size: usize,
    ) -> Result<u64, SharedCacheError> {
        let mut entries = mutex_lock(&self.entries, SOURCE, "delete_matching");
        let before = entries.len();
        entries.retain(|key, _| !glob_matches(pattern, key));
        Ok((before - entries.len()) as u64)
    }
}
