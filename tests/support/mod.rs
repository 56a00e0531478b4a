//! Shared fixtures: an in-memory storage backend and a service builder.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use time::OffsetDateTime;

use reelist::application::list::{ListSettings, MyListService};
use reelist::application::repos::{
    CatalogRepo, EnrichedSlice, KindCounts, MembershipsRepo, RepoError,
};
use reelist::cache::{CacheConfig, MemorySharedCache, SharedCache, TieredPageCache};
use reelist::domain::entities::{
    ContentDetails, ContentSummary, EnrichedMembership, Episode, MembershipRecord,
};
use reelist::domain::types::ContentKind;

/// In-memory stand-in for the Postgres adapter. The membership map is held
/// behind one mutex so the duplicate check and the insert are atomic, same
/// as the storage-level unique constraint.
#[derive(Default)]
pub struct TestBackend {
    memberships: Mutex<Vec<MembershipRecord>>,
    catalog: Mutex<HashMap<(ContentKind, String), ContentSummary>>,
}

impl TestBackend {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn seed_movie(&self, id: &str, title: &str) {
        let summary = ContentSummary {
            title: title.to_string(),
            description: format!("{title} description"),
            genres: vec!["drama".to_string()],
            details: ContentDetails::Movie {
                release_date: None,
                cast: vec!["Lead Actor".to_string()],
            },
        };
        self.catalog
            .lock()
            .unwrap()
            .insert((ContentKind::Movie, id.to_string()), summary);
    }

    pub fn seed_show(&self, id: &str, title: &str) {
        let summary = ContentSummary {
            title: title.to_string(),
            description: format!("{title} description"),
            genres: vec!["drama".to_string()],
            details: ContentDetails::Show {
                episodes: vec![Episode {
                    season: 1,
                    number: 1,
                    title: "Pilot".to_string(),
                }],
            },
        };
        self.catalog
            .lock()
            .unwrap()
            .insert((ContentKind::Show, id.to_string()), summary);
    }

    pub fn membership_count(&self) -> usize {
        self.memberships.lock().unwrap().len()
    }
}

#[async_trait]
impl MembershipsRepo for TestBackend {
    async fn insert_membership(
        &self,
        owner_id: &str,
        content_id: &str,
        content_kind: ContentKind,
        added_at: OffsetDateTime,
    ) -> Result<MembershipRecord, RepoError> {
        let mut rows = self.memberships.lock().unwrap();
        if rows
            .iter()
            .any(|row| row.owner_id == owner_id && row.content_id == content_id)
        {
            return Err(RepoError::Duplicate {
                constraint: "mylist_memberships_pkey".to_string(),
            });
        }

        let record = MembershipRecord {
            owner_id: owner_id.to_string(),
            content_id: content_id.to_string(),
            content_kind,
            added_at,
        };
        rows.push(record.clone());
        Ok(record)
    }

    async fn delete_membership(
        &self,
        owner_id: &str,
        content_id: &str,
    ) -> Result<bool, RepoError> {
        let mut rows = self.memberships.lock().unwrap();
        let before = rows.len();
        rows.retain(|row| !(row.owner_id == owner_id && row.content_id == content_id));
        Ok(rows.len() < before)
    }

    async fn enriched_slice(
        &self,
        owner_id: &str,
        offset: u64,
        limit: u64,
    ) -> Result<EnrichedSlice, RepoError> {
        let rows = self.memberships.lock().unwrap();
        let catalog = self.catalog.lock().unwrap();

        let mut owned: Vec<&MembershipRecord> = rows
            .iter()
            .filter(|row| row.owner_id == owner_id)
            .collect();
        owned.sort_by(|a, b| {
            b.added_at
                .cmp(&a.added_at)
                .then_with(|| b.content_id.cmp(&a.content_id))
        });

        let total = owned.len() as u64;
        let items = owned
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .map(|row| EnrichedMembership {
                content_id: row.content_id.clone(),
                content_kind: row.content_kind,
                added_at: row.added_at,
                content: catalog
                    .get(&(row.content_kind, row.content_id.clone()))
                    .cloned(),
            })
            .collect();

        Ok(EnrichedSlice { items, total })
    }

    async fn count_by_kind(&self, owner_id: &str) -> Result<KindCounts, RepoError> {
        let rows = self.memberships.lock().unwrap();
        let mut counts = KindCounts::default();
        for row in rows.iter().filter(|row| row.owner_id == owner_id) {
            match row.content_kind {
                ContentKind::Movie => counts.movies += 1,
                ContentKind::Show => counts.shows += 1,
            }
        }
        Ok(counts)
    }
}

#[async_trait]
impl CatalogRepo for TestBackend {
    async fn content_exists(
        &self,
        content_id: &str,
        kind: ContentKind,
    ) -> Result<bool, RepoError> {
        Ok(self
            .catalog
            .lock()
            .unwrap()
            .contains_key(&(kind, content_id.to_string())))
    }
}

pub fn build_service(backend: Arc<TestBackend>) -> Arc<MyListService> {
    build_service_with_shared(backend, Arc::new(MemorySharedCache::new()))
}

pub fn build_service_with_shared(
    backend: Arc<TestBackend>,
    shared: Arc<dyn SharedCache>,
) -> Arc<MyListService> {
    let cache = Arc::new(TieredPageCache::new(shared, CacheConfig::default()));
    Arc::new(MyListService::new(
        backend.clone(),
        backend,
        cache,
        ListSettings::default(),
    ))
}
