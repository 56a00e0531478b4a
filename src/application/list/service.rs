use std::num::NonZeroU32;
use std::sync::Arc;

use crate::application::repos::{CatalogRepo, MembershipsRepo};
use crate::cache::TieredPageCache;

const DEFAULT_MAX_PAGE_SIZE: u32 = 100;
const DEFAULT_PAGE_SIZE: u32 = 20;

/// Page-size policy for the read path.
#[derive(Debug, Clone, Copy)]
pub struct ListSettings {
    /// Ceiling applied to caller-requested page sizes.
    pub max_page_size: NonZeroU32,
    /// Page size used when the caller does not supply one.
    pub default_page_size: NonZeroU32,
}

impl Default for ListSettings {
    fn default() -> Self {
        Self {
            max_page_size: NonZeroU32::new(DEFAULT_MAX_PAGE_SIZE).unwrap_or(NonZeroU32::MIN),
            default_page_size: NonZeroU32::new(DEFAULT_PAGE_SIZE).unwrap_or(NonZeroU32::MIN),
        }
    }
}

/// The saved-items engine: tiered reads, storage-guarded mutations, and the
/// invalidation protocol tying them together.
#[derive(Clone)]
pub struct MyListService {
    pub(super) memberships: Arc<dyn MembershipsRepo>,
    pub(super) catalog: Arc<dyn CatalogRepo>,
    pub(super) cache: Arc<TieredPageCache>,
    pub(super) settings: ListSettings,
}

impl MyListService {
    pub fn new(
        memberships: Arc<dyn MembershipsRepo>,
        catalog: Arc<dyn CatalogRepo>,
        cache: Arc<TieredPageCache>,
        settings: ListSettings,
    ) -> Self {
        Self {
            memberships,
            catalog,
            cache,
            settings,
        }
    }

    pub fn settings(&self) -> ListSettings {
        self.settings
    }
}
