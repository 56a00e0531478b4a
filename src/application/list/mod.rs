//! The saved-items ("My List") engine.
//!
//! `queries` implements the tiered read path and stats, `commands` the
//! mutations plus their synchronous invalidation.

mod commands;
mod queries;
mod service;
mod types;

pub use service::{ListSettings, MyListService};
pub use types::{
    AddItemCommand, KindBreakdown, ListStats, MembershipPage, MyListError, ensure_owner_id,
};
