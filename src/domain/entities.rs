//! Persistent domain records.

use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};

use super::types::ContentKind;

/// A single saved-item row linking an owner to a catalog entry.
///
/// `(owner_id, content_id)` is unique at the storage layer; rows are created
/// on add and deleted on remove, never mutated in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MembershipRecord {
    pub owner_id: String,
    pub content_id: String,
    pub content_kind: ContentKind,
    #[serde(with = "time::serde::rfc3339")]
    pub added_at: OffsetDateTime,
}

/// One episode of a show, carried verbatim from the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Episode {
    pub season: i32,
    pub number: i32,
    pub title: String,
}

/// Kind-specific catalog payload, resolved exhaustively at the enrichment
/// join point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ContentDetails {
    #[serde(rename = "movie")]
    Movie {
        release_date: Option<Date>,
        cast: Vec<String>,
    },
    #[serde(rename = "tvshow")]
    Show { episodes: Vec<Episode> },
}

/// Read-only catalog entry joined onto a membership for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentSummary {
    pub title: String,
    pub description: String,
    pub genres: Vec<String>,
    #[serde(flatten)]
    pub details: ContentDetails,
}

/// A membership joined with its catalog entry at read time. Never persisted;
/// `content` is absent when the catalog row has gone missing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedMembership {
    pub content_id: String,
    pub content_kind: ContentKind,
    #[serde(with = "time::serde::rfc3339")]
    pub added_at: OffsetDateTime,
    pub content: Option<ContentSummary>,
}
