use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::domain::{BuildId, BuildListing, BuyerId, ListingStatus, SellerId};
use crate::playstyle::PlaystyleVector;

/// Storage abstraction for listings so the service can run against any backing store.
pub trait BuildRepository: Send + Sync {
    fn insert(&self, listing: BuildListing) -> Result<BuildListing, RepositoryError>;
    /// Replace a stored listing only while its status is still `expected`. The status check and
    /// the write must be atomic; a mismatch is `Conflict`, a missing listing `NotFound`.
    fn update_if(
        &self,
        listing: BuildListing,
        expected: ListingStatus,
    ) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &BuildId) -> Result<Option<BuildListing>, RepositoryError>;
    /// Listings in `status`, oldest `created_at` first (ties by id), at most `limit`.
    fn list_by_status(
        &self,
        status: ListingStatus,
        limit: usize,
    ) -> Result<Vec<BuildListing>, RepositoryError>;
}

/// Buyer onboarding answers keyed by buyer.
pub trait PlaystyleRepository: Send + Sync {
    fn upsert(&self, buyer: &BuyerId, vector: PlaystyleVector) -> Result<(), RepositoryError>;
    fn fetch(&self, buyer: &BuyerId) -> Result<Option<PlaystyleVector>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Outbound seller notifications (e-mail provider adapters implement this).
pub trait NoticePublisher: Send + Sync {
    fn publish(&self, notice: ListingNotice) -> Result<(), NoticeError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingNotice {
    pub template: String,
    pub build_id: BuildId,
    pub seller_id: SellerId,
    pub details: BTreeMap<String, String>,
}

#[derive(Debug, thiserror::Error)]
pub enum NoticeError {
    #[error("notice transport unavailable: {0}")]
    Transport(String),
}
