use tracing::debug;

use crate::cache::keys;

use super::service::MyListService;
use super::types::{ListStats, MembershipPage, MyListError, ensure_owner_id};

impl MyListService {
    /// Fetch one enriched page of an owner's list through the cache tiers.
    ///
    /// `page` and `page_size` are clamped, never rejected: pages below 1
    /// become 1, page sizes are forced into `1..=max_page_size`. Missing
    /// values fall back to the configured defaults.
    pub async fn get_page(
        &self,
        owner_id: &str,
        page: Option<i64>,
        page_size: Option<i64>,
    ) -> Result<MembershipPage, MyListError> {
        ensure_owner_id(owner_id)?;

        let page = clamp_page(page.unwrap_or(1));
        let page_size = clamp_page_size(
            page_size.unwrap_or(i64::from(self.settings.default_page_size.get())),
            self.settings.max_page_size.get(),
        );

        let key = keys::page_key(owner_id, page, page_size);
        if let Some(hit) = self.cache.get(&key).await {
            return Ok(hit);
        }

        let offset = u64::from(page - 1) * u64::from(page_size);
        let slice = self
            .memberships
            .enriched_slice(owner_id, offset, u64::from(page_size))
            .await?;

        let result = MembershipPage {
            total_pages: slice.total.div_ceil(u64::from(page_size)),
            items: slice.items,
            total: slice.total,
            page,
            page_size,
        };

        debug!(
            owner_id,
            page,
            page_size,
            total = result.total,
            "page computed from store"
        );
        self.cache.store(&key, &result).await;
        Ok(result)
    }

    /// Aggregate counts per content kind, straight from the store.
    pub async fn get_stats(&self, owner_id: &str) -> Result<ListStats, MyListError> {
        ensure_owner_id(owner_id)?;
        let counts = self.memberships.count_by_kind(owner_id).await?;
        Ok(ListStats::from(counts))
    }
}

fn clamp_page(page: i64) -> u32 {
    page.clamp(1, i64::from(u32::MAX)) as u32
}

fn clamp_page_size(page_size: i64, max: u32) -> u32 {
    page_size.clamp(1, i64::from(max)) as u32
}
