//! Cache key construction.
//!
//! Keys place the owner segment before the format-version tag so one prefix
//! scan per owner covers every page/page-size/version combination.

/// Bumped whenever the cached page shape changes, so entries written by an
/// older build can never be decoded as the current shape.
pub const CACHE_KEY_VERSION: u32 = 2;

const NAMESPACE: &str = "mylist";

/// Key for one cached page of an owner's list.
pub fn page_key(owner_id: &str, page: u32, page_size: u32) -> String {
    format!("{NAMESPACE}:{owner_id}:v{CACHE_KEY_VERSION}:p{page}:s{page_size}")
}

/// Glob pattern matching every cached page for an owner, across all
/// versions.
pub fn owner_pattern(owner_id: &str) -> String {
    format!("{NAMESPACE}:{owner_id}:*")
}
