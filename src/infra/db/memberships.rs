use std::str::FromStr;

use async_trait::async_trait;
use sqlx::FromRow;
use sqlx::types::Json;
use time::{Date, OffsetDateTime};
use tracing::warn;

use crate::application::repos::{EnrichedSlice, KindCounts, MembershipsRepo, RepoError};
use crate::domain::entities::{
    ContentDetails, ContentSummary, EnrichedMembership, Episode, MembershipRecord,
};
use crate::domain::types::ContentKind;

use super::PostgresRepositories;
use super::util::map_sqlx_error;

/// One page row with both catalog joins flattened in. Exactly one of the
/// join sides is populated, selected by `content_kind`; neither being
/// populated means the catalog row is gone.
#[derive(FromRow)]
struct EnrichedRow {
    content_id: String,
    content_kind: String,
    added_at: OffsetDateTime,
    total: i64,
    movie_title: Option<String>,
    movie_description: Option<String>,
    movie_genres: Option<Vec<String>>,
    movie_release_date: Option<Date>,
    movie_cast: Option<Vec<String>>,
    show_title: Option<String>,
    show_description: Option<String>,
    show_genres: Option<Vec<String>>,
    show_episodes: Option<Json<Vec<Episode>>>,
}

const PAGE_SQL: &str = "\
    SELECT m.content_id, m.content_kind, m.added_at, \
           COUNT(*) OVER () AS total, \
           mv.title AS movie_title, mv.description AS movie_description, \
           mv.genres AS movie_genres, mv.release_date AS movie_release_date, \
           mv.cast_members AS movie_cast, \
           sh.title AS show_title, sh.description AS show_description, \
           sh.genres AS show_genres, sh.episodes AS show_episodes \
    FROM mylist_memberships m \
    LEFT JOIN movies mv ON m.content_kind = 'movie' AND mv.id = m.content_id \
    LEFT JOIN shows sh ON m.content_kind = 'tvshow' AND sh.id = m.content_id \
    WHERE m.owner_id = $1 \
    ORDER BY m.added_at DESC, m.content_id DESC \
    OFFSET $2 LIMIT $3";

impl EnrichedRow {
    fn into_membership(self) -> EnrichedMembership {
        let kind = match ContentKind::from_str(&self.content_kind) {
            Ok(kind) => kind,
            Err(err) => {
                // A foreign kind value can only appear through out-of-band
                // writes; surface the row as unenriched rather than failing
                // the page.
                warn!(error = %err, content_id = %self.content_id, "unknown content kind in store");
                return EnrichedMembership {
                    content_id: self.content_id,
                    content_kind: ContentKind::Movie,
                    added_at: self.added_at,
                    content: None,
                };
            }
        };

        let content = match kind {
            ContentKind::Movie => self.movie_title.map(|title| ContentSummary {
                title,
                description: self.movie_description.unwrap_or_default(),
                genres: self.movie_genres.unwrap_or_default(),
                details: ContentDetails::Movie {
                    release_date: self.movie_release_date,
                    cast: self.movie_cast.unwrap_or_default(),
                },
            }),
            ContentKind::Show => self.show_title.map(|title| ContentSummary {
                title,
                description: self.show_description.unwrap_or_default(),
                genres: self.show_genres.unwrap_or_default(),
                details: ContentDetails::Show {
                    episodes: self.show_episodes.map(|json| json.0).unwrap_or_default(),
                },
            }),
        };

        EnrichedMembership {
            content_id: self.content_id,
            content_kind: kind,
            added_at: self.added_at,
            content,
        }
    }
}

#[async_trait]
impl MembershipsRepo for PostgresRepositories {
    async fn insert_membership(
        &self,
        owner_id: &str,
        content_id: &str,
        content_kind: ContentKind,
        added_at: OffsetDateTime,
    ) -> Result<MembershipRecord, RepoError> {
        sqlx::query(
            "INSERT INTO mylist_memberships (owner_id, content_id, content_kind, added_at) \
             VALUES ($1, $2, $3, $4)",
        )
        .bind(owner_id)
        .bind(content_id)
        .bind(content_kind.as_str())
        .bind(added_at)
        .execute(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(MembershipRecord {
            owner_id: owner_id.to_string(),
            content_id: content_id.to_string(),
            content_kind,
            added_at,
        })
    }

    async fn delete_membership(
        &self,
        owner_id: &str,
        content_id: &str,
    ) -> Result<bool, RepoError> {
        let result = sqlx::query(
            "DELETE FROM mylist_memberships WHERE owner_id = $1 AND content_id = $2",
        )
        .bind(owner_id)
        .bind(content_id)
        .execute(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(result.rows_affected() > 0)
    }

    async fn enriched_slice(
        &self,
        owner_id: &str,
        offset: u64,
        limit: u64,
    ) -> Result<EnrichedSlice, RepoError> {
        let rows: Vec<EnrichedRow> = sqlx::query_as(PAGE_SQL)
            .bind(owner_id)
            .bind(offset as i64)
            .bind(limit as i64)
            .fetch_all(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        // The window count rides along with the rows; a slice past the end
        // of the list comes back empty, so the total needs its own query.
        let total = match rows.first() {
            Some(row) => row.total.max(0) as u64,
            None => {
                let count: i64 = sqlx::query_scalar(
                    "SELECT COUNT(*) FROM mylist_memberships WHERE owner_id = $1",
                )
                .bind(owner_id)
                .fetch_one(self.pool())
                .await
                .map_err(map_sqlx_error)?;
                count.max(0) as u64
            }
        };

        let items = rows.into_iter().map(EnrichedRow::into_membership).collect();
        Ok(EnrichedSlice { items, total })
    }

    async fn count_by_kind(&self, owner_id: &str) -> Result<KindCounts, RepoError> {
        let rows: Vec<(String, i64)> = sqlx::query_as(
            "SELECT content_kind, COUNT(*) FROM mylist_memberships \
             WHERE owner_id = $1 GROUP BY content_kind",
        )
        .bind(owner_id)
        .fetch_all(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        let mut counts = KindCounts::default();
        for (kind, count) in rows {
            match ContentKind::from_str(&kind) {
                Ok(ContentKind::Movie) => counts.movies = count.max(0) as u64,
                Ok(ContentKind::Show) => counts.shows = count.max(0) as u64,
                Err(err) => {
                    warn!(error = %err, owner_id, "unknown content kind in aggregate");
                }
            }
        }
        Ok(counts)
    }
}
