//! Tier orchestration and invalidation.
//!
//! Reads walk local → shared; each tier populates the faster ones on a hit.
//! Shared-cache failures never cross this boundary: they are logged,
//! counted, and treated as misses.

use std::sync::Arc;

use metrics::counter;
use tracing::{debug, warn};

use crate::application::list::MembershipPage;

use super::config::CacheConfig;
use super::keys;
use super::local::LocalPageCache;
use super::shared::SharedCache;
use super::{METRIC_INVALIDATION, METRIC_SHARED_ERROR, METRIC_SHARED_HIT, METRIC_SHARED_MISS};

pub struct TieredPageCache {
    local: LocalPageCache,
    shared: Arc<dyn SharedCache>,
    config: CacheConfig,
}

impl TieredPageCache {
    pub fn new(shared: Arc<dyn SharedCache>, config: CacheConfig) -> Self {
        Self {
            local: LocalPageCache::new(&config),
            shared,
            config,
        }
    }

    /// Tiered lookup. A local hit returns without consulting the shared
    /// tier; a shared hit back-populates the local tier with its short TTL.
    pub async fn get(&self, key: &str) -> Option<MembershipPage> {
        if let Some(page) = self.local.get(key) {
            return Some(page);
        }

        let payload = match self.shared.get(key).await {
            Ok(Some(payload)) => payload,
            Ok(None) => {
                counter!(METRIC_SHARED_MISS).increment(1);
                return None;
            }
            Err(err) => {
                counter!(METRIC_SHARED_ERROR).increment(1);
                warn!(error = %err, key, "shared cache read failed; degrading to store");
                return None;
            }
        };

        match serde_json::from_str::<MembershipPage>(&payload) {
            Ok(page) => {
                counter!(METRIC_SHARED_HIT).increment(1);
                self.local.set(key.to_string(), page.clone());
                Some(page)
            }
            Err(err) => {
                // An undecodable payload is a foreign or corrupt format;
                // treat as a miss and let the next store overwrite it.
                counter!(METRIC_SHARED_ERROR).increment(1);
                warn!(error = %err, key, "cached payload failed to decode; ignoring entry");
                None
            }
        }
    }

    /// Populate both tiers after a store round trip.
    pub async fn store(&self, key: &str, page: &MembershipPage) {
        self.local.set(key.to_string(), page.clone());

        match serde_json::to_string(page) {
            Ok(payload) => {
                if let Err(err) = self
                    .shared
                    .set(key, &payload, self.config.shared_ttl)
                    .await
                {
                    counter!(METRIC_SHARED_ERROR).increment(1);
                    warn!(error = %err, key, "shared cache write failed; entry not shared");
                }
            }
            Err(err) => {
                warn!(error = %err, key, "page serialization failed; entry not shared");
            }
        }
    }

    /// Drop every cached page for an owner: a full local wipe plus a
    /// batched, pattern-scoped delete in the shared tier. Unconditionally
    /// safe; a degraded shared tier leaves TTL as the staleness backstop.
    pub async fn invalidate_owner(&self, owner_id: &str) {
        counter!(METRIC_INVALIDATION).increment(1);
        self.local.clear();

        let pattern = keys::owner_pattern(owner_id);
        match self
            .shared
            .delete_matching(&pattern, self.config.scan_batch_non_zero())
            .await
        {
            Ok(removed) => {
                debug!(owner_id, removed, "shared cache invalidated");
            }
            Err(err) => {
                counter!(METRIC_SHARED_ERROR).increment(1);
                warn!(
                    error = %err,
                    owner_id,
                    "shared cache invalidation failed; TTL will bound staleness"
                );
            }
        }
    }

    pub fn local_len(&self) -> usize {
        self.local.len()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::super::memory::MemorySharedCache;
    use super::*;

    fn page(total: u64) -> MembershipPage {
        MembershipPage {
            items: Vec::new(),
            total,
            page: 1,
            page_size: 20,
            total_pages: total.div_ceil(20),
        }
    }

    fn tiered() -> TieredPageCache {
        TieredPageCache::new(Arc::new(MemorySharedCache::new()), CacheConfig::default())
    }

    #[tokio::test]
    async fn miss_then_store_then_hit() {
        let cache = tiered();
        let key = keys::page_key("alice", 1, 20);

        assert!(cache.get(&key).await.is_none());
        cache.store(&key, &page(3)).await;
        assert_eq!(cache.get(&key).await.unwrap().total, 3);
    }

    #[tokio::test]
    async fn shared_hit_repopulates_local_tier() {
        let cache = tiered();
        let key = keys::page_key("alice", 1, 20);
        cache.store(&key, &page(5)).await;

        // Wipe the local tier only; the shared tier still holds the entry.
        cache.local.clear();
        assert_eq!(cache.local_len(), 0);

        assert_eq!(cache.get(&key).await.unwrap().total, 5);
        assert_eq!(cache.local_len(), 1);
    }

    #[tokio::test]
    async fn invalidate_owner_scrubs_both_tiers() {
        let cache = tiered();
        let key_a = keys::page_key("alice", 1, 20);
        let key_b = keys::page_key("alice", 2, 20);
        let key_other = keys::page_key("bob", 1, 20);
        cache.store(&key_a, &page(1)).await;
        cache.store(&key_b, &page(2)).await;
        cache.store(&key_other, &page(3)).await;

        cache.invalidate_owner("alice").await;

        assert!(cache.get(&key_a).await.is_none());
        assert!(cache.get(&key_b).await.is_none());
        // The other owner's entry survives in the shared tier even though
        // the local wipe was coarse.
        assert_eq!(cache.get(&key_other).await.unwrap().total, 3);
    }

    #[tokio::test]
    async fn invalidation_is_idempotent() {
        let cache = tiered();
        let key = keys::page_key("alice", 1, 20);
        cache.store(&key, &page(1)).await;

        cache.invalidate_owner("alice").await;
        cache.invalidate_owner("alice").await;

        assert!(cache.get(&key).await.is_none());
        assert_eq!(cache.local_len(), 0);
    }

    #[tokio::test]
    async fn undecodable_shared_payload_reads_as_miss() {
        let shared = Arc::new(MemorySharedCache::new());
        let cache = TieredPageCache::new(shared.clone(), CacheConfig::default());
        let key = keys::page_key("alice", 1, 20);
        shared
            .set(&key, "{\"legacy\":true}", Duration::from_secs(60))
            .await
            .unwrap();

        assert!(cache.get(&key).await.is_none());
    }
}
