//! Cache tier tuning knobs.

use std::num::NonZeroUsize;
use std::time::Duration;

const DEFAULT_SHARED_TTL_SECS: u64 = 300;
const DEFAULT_LOCAL_TTL_SECS: u64 = 30;
const DEFAULT_LOCAL_CAPACITY: usize = 500;
const DEFAULT_SCAN_BATCH_SIZE: usize = 100;

/// Tunables for both cache tiers.
///
/// The local TTL stays well under the shared TTL: the local tier is
/// invalidated coarsely (full wipe), so its entries must age out quickly on
/// instances that did not observe a mutation.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// TTL for entries in the shared tier.
    pub shared_ttl: Duration,
    /// TTL for entries in the process-local tier.
    pub local_ttl: Duration,
    /// Maximum entries held by the process-local tier.
    pub local_capacity: usize,
    /// Upper bound on keys enumerated or deleted per shared-cache call
    /// during invalidation.
    pub scan_batch_size: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            shared_ttl: Duration::from_secs(DEFAULT_SHARED_TTL_SECS),
            local_ttl: Duration::from_secs(DEFAULT_LOCAL_TTL_SECS),
            local_capacity: DEFAULT_LOCAL_CAPACITY,
            scan_batch_size: DEFAULT_SCAN_BATCH_SIZE,
        }
    }
}

impl From<&crate::config::CacheSettings> for CacheConfig {
    fn from(settings: &crate::config::CacheSettings) -> Self {
        Self {
            shared_ttl: settings.shared_ttl,
            local_ttl: settings.local_ttl,
            local_capacity: settings.local_capacity,
            scan_batch_size: settings.scan_batch_size,
        }
    }
}

impl CacheConfig {
    /// Local capacity as `NonZeroUsize`, clamping to 1 if zero.
    pub fn local_capacity_non_zero(&self) -> NonZeroUsize {
        NonZeroUsize::new(self.local_capacity).unwrap_or(NonZeroUsize::MIN)
    }

    /// Scan batch size, clamping to 1 if zero.
    pub fn scan_batch_non_zero(&self) -> usize {
        self.scan_batch_size.max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_values() {
        let config = CacheConfig::default();
        assert_eq!(config.shared_ttl, Duration::from_secs(300));
        assert_eq!(config.local_ttl, Duration::from_secs(30));
        assert_eq!(config.local_capacity, 500);
        assert_eq!(config.scan_batch_size, 100);
    }

    #[test]
    fn non_zero_clamps_to_min() {
        let config = CacheConfig {
            local_capacity: 0,
            scan_batch_size: 0,
            ..Default::default()
        };
        assert_eq!(config.local_capacity_non_zero().get(), 1);
        assert_eq!(config.scan_batch_non_zero(), 1);
    }
}
