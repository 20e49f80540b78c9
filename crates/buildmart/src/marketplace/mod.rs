//! Build listings, buyer playstyle profiles, and listing moderation.
//!
//! Storage and outbound notices sit behind traits so the process entry point decides which
//! concrete clients back the service.

pub mod catalog;
pub mod domain;
pub(crate) mod guard;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use catalog::{
    rank_catalog, read_catalog, read_catalog_path, CatalogEntry, CatalogError, RankedEntry,
};
pub use domain::{
    Archetype, BrowseQuery, BuildAttributes, BuildId, BuildListing, BuildSubmission, BuyerId,
    GameTitle, ListingStatus, ModerationDecision, PerformanceSnapshot, Position, SellerId,
};
pub use guard::{ListingGuard, ListingViolation};
pub use repository::{
    BuildRepository, ListingNotice, NoticeError, NoticePublisher, PlaystyleRepository,
    RepositoryError,
};
pub use router::marketplace_router;
pub use service::{BrowseEntry, BuildDetail, MarketplaceError, MarketplaceService};
