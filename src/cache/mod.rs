//! Tiered page caching for the saved-items read path.
//!
//! Two tiers sit in front of the durable store:
//!
//! - **Local**: in-process, capacity-bounded, short TTL. Invalidated with a
//!   coarse wipe because it has no pattern-match primitive.
//! - **Shared**: network key/value store (Redis) with a longer TTL, shared
//!   across instances, invalidated per owner via resumable key enumeration.
//!
//! Losing either tier is never a correctness problem; cached pages are
//! derived values reconstructable from the store, and TTLs bound staleness
//! when invalidation is degraded.

mod config;
pub mod keys;
mod local;
mod lock;
mod memory;
mod redis;
mod shared;
mod tiered;

pub use config::CacheConfig;
pub use local::LocalPageCache;
pub use memory::MemorySharedCache;
pub use redis::RedisSharedCache;
pub use shared::{SharedCache, SharedCacheError};
pub use tiered::TieredPageCache;

pub(crate) const METRIC_LOCAL_HIT: &str = "reelist_cache_local_hit_total";
pub(crate) const METRIC_LOCAL_MISS: &str = "reelist_cache_local_miss_total";
pub(crate) const METRIC_LOCAL_EVICT: &str = "reelist_cache_local_evict_total";
pub(crate) const METRIC_SHARED_HIT: &str = "reelist_cache_shared_hit_total";
pub(crate) const METRIC_SHARED_MISS: &str = "reelist_cache_shared_miss_total";
pub(crate) const METRIC_SHARED_ERROR: &str = "reelist_cache_shared_error_total";
pub(crate) const METRIC_INVALIDATION: &str = "reelist_cache_invalidation_total";

/// Metric names exported for telemetry registration.
pub fn metric_names() -> [&'static str; 7] {
    [
        METRIC_LOCAL_HIT,
        METRIC_LOCAL_MISS,
        METRIC_LOCAL_EVICT,
        METRIC_SHARED_HIT,
        METRIC_SHARED_MISS,
        METRIC_SHARED_ERROR,
        METRIC_INVALIDATION,
    ]
}
