//! Shared cache abstraction.
//!
//! The shared tier is a network key/value store with TTL and pattern-based
//! key enumeration, shared across all service instances. Backends implement
//! [`SharedCache`]; callers above the tiered engine never see these errors.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SharedCacheError {
    #[error("shared cache backend error: {0}")]
    Backend(String),
    #[error("shared cache operation timed out after {0:?}")]
    Timeout(Duration),
}

impl SharedCacheError {
    pub fn backend(err: impl std::fmt::Display) -> Self {
        Self::Backend(err.to_string())
    }
}

/// Network-accessible key/value store with TTL and resumable pattern-scoped
/// deletion.
#[async_trait]
pub trait SharedCache: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, SharedCacheError>;

    async fn set(
        &self,
        key: &str,
        value: &str,
        ttl: Duration,
    ) -> Result<(), SharedCacheError>;

    /// Delete every key matching `pattern` (glob semantics, as produced by
    /// [`super::keys::owner_pattern`]), enumerating and deleting in batches
    /// of at most `batch_size`. Returns the number of keys removed.
    async fn delete_matching(
        &self,
        pattern: &str,
        batch_size: usize,
    ) -> Result<u64, SharedCacheError>;
}
