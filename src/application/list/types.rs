use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::application::repos::{KindCounts, RepoError};
use crate::domain::entities::EnrichedMembership;
use crate::domain::types::ContentKind;

const MAX_OWNER_ID_LEN: usize = 128;

/// One page of an owner's list, enriched and ready to serve. This is the
/// value cached by both tiers; bump
/// [`crate::cache::keys::CACHE_KEY_VERSION`] when its shape changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MembershipPage {
    pub items: Vec<EnrichedMembership>,
    pub total: u64,
    pub page: u32,
    pub page_size: u32,
    pub total_pages: u64,
}

/// Aggregate membership counts for an owner. Computed on demand, not cached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListStats {
    pub total: u64,
    pub by_kind: KindBreakdown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KindBreakdown {
    pub movie: u64,
    pub show: u64,
}

impl From<KindCounts> for ListStats {
    fn from(counts: KindCounts) -> Self {
        Self {
            total: counts.total(),
            by_kind: KindBreakdown {
                movie: counts.movies,
                show: counts.shows,
            },
        }
    }
}

#[derive(Debug, Clone)]
pub struct AddItemCommand {
    pub content_id: String,
    pub content_kind: ContentKind,
}

#[derive(Debug, Error)]
pub enum MyListError {
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("content `{content_id}` not found in the {kind} catalog")]
    ContentNotFound {
        content_id: String,
        kind: ContentKind,
    },
    #[error("membership not found")]
    MembershipNotFound,
    #[error("content is already saved to this list")]
    AlreadyExists,
    #[error(transparent)]
    Store(RepoError),
}

impl From<RepoError> for MyListError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::Duplicate { .. } => MyListError::AlreadyExists,
            RepoError::NotFound => MyListError::MembershipNotFound,
            other => MyListError::Store(other),
        }
    }
}

/// Owner ids come from an opaque caller-supplied header but also become
/// cache key segments, so the charset is restricted to keep key formatting
/// and pattern scans unambiguous.
pub fn ensure_owner_id(owner_id: &str) -> Result<(), MyListError> {
    if owner_id.is_empty() {
        return Err(MyListError::Validation("owner id must not be empty".into()));
    }
    if owner_id.len() > MAX_OWNER_ID_LEN {
        return Err(MyListError::Validation(format!(
            "owner id exceeds {MAX_OWNER_ID_LEN} characters"
        )));
    }
    if !owner_id
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '@'))
    {
        return Err(MyListError::Validation(
            "owner id may only contain ASCII letters, digits, `-`, `_`, `.`, `@`".into(),
        ));
    }
    Ok(())
}

pub(super) fn ensure_content_id(content_id: &str) -> Result<(), MyListError> {
    if content_id.trim().is_empty() {
        return Err(MyListError::Validation(
            "content id must not be empty".into(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn owner_id_charset_is_enforced() {
        assert!(ensure_owner_id("user-42@example.com").is_ok());
        assert!(ensure_owner_id("").is_err());
        assert!(ensure_owner_id("has space").is_err());
        assert!(ensure_owner_id("glob*").is_err());
        assert!(ensure_owner_id("colon:sep").is_err());
        assert!(ensure_owner_id(&"x".repeat(129)).is_err());
    }

    #[test]
    fn stats_breakdown_sums_to_total() {
        let stats = ListStats::from(KindCounts {
            movies: 3,
            shows: 2,
        });
        assert_eq!(stats.total, 5);
        assert_eq!(stats.by_kind.movie, 3);
        assert_eq!(stats.by_kind.show, 2);
    }
}
