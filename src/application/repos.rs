//! Repository traits describing persistence adapters.

use async_trait::async_trait;
use thiserror::Error;
use time::OffsetDateTime;

use crate::domain::entities::{EnrichedMembership, MembershipRecord};
use crate::domain::types::ContentKind;

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("persistence error: {0}")]
    Persistence(String),
    #[error("duplicate record violates unique constraint `{constraint}`")]
    Duplicate { constraint: String },
    #[error("resource not found")]
    NotFound,
    #[error("invalid input: {message}")]
    InvalidInput { message: String },
    #[error("database timeout")]
    Timeout,
}

impl RepoError {
    pub fn from_persistence(err: impl std::fmt::Display) -> Self {
        Self::Persistence(err.to_string())
    }
}

/// One logical round trip worth of page data: the requested slice, already
/// enriched, plus the owner's total membership count.
#[derive(Debug, Clone)]
pub struct EnrichedSlice {
    pub items: Vec<EnrichedMembership>,
    pub total: u64,
}

/// Membership counts grouped by content kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KindCounts {
    pub movies: u64,
    pub shows: u64,
}

impl KindCounts {
    pub fn total(&self) -> u64 {
        self.movies + self.shows
    }
}

/// Durable store adapter for list-membership rows.
#[async_trait]
pub trait MembershipsRepo: Send + Sync {
    /// Insert a membership, relying on the storage-level unique constraint
    /// over `(owner_id, content_id)` to reject duplicates atomically.
    async fn insert_membership(
        &self,
        owner_id: &str,
        content_id: &str,
        content_kind: ContentKind,
        added_at: OffsetDateTime,
    ) -> Result<MembershipRecord, RepoError>;

    /// Delete the membership for `(owner_id, content_id)`. Returns whether a
    /// row was actually removed.
    async fn delete_membership(
        &self,
        owner_id: &str,
        content_id: &str,
    ) -> Result<bool, RepoError>;

    /// Fetch one enriched page slice ordered by `added_at` descending, with
    /// a deterministic tie-break, together with the owner's total count.
    async fn enriched_slice(
        &self,
        owner_id: &str,
        offset: u64,
        limit: u64,
    ) -> Result<EnrichedSlice, RepoError>;

    /// Aggregate membership counts per content kind for an owner.
    async fn count_by_kind(&self, owner_id: &str) -> Result<KindCounts, RepoError>;
}

/// Read-only access to the content catalog, consulted before adds.
#[async_trait]
pub trait CatalogRepo: Send + Sync {
    /// Whether a catalog entry with this id exists in the collection named
    /// by `kind`.
    async fn content_exists(
        &self,
        content_id: &str,
        kind: ContentKind,
    ) -> Result<bool, RepoError>;
}
