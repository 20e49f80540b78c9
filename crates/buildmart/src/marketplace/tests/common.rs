use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use serde_json::Value;

use crate::config::MarketplaceConfig;
use crate::marketplace::domain::{
    Archetype, BuildAttributes, BuildId, BuildListing, BuildSubmission, BuyerId, GameTitle,
    ListingStatus, PerformanceSnapshot, Position,
};
use crate::marketplace::guard::ListingGuard;
use crate::marketplace::repository::{
    BuildRepository, ListingNotice, NoticeError, NoticePublisher, PlaystyleRepository,
    RepositoryError,
};
use crate::marketplace::{marketplace_router, MarketplaceService};
use crate::playstyle::PlaystyleVector;

pub(super) type TestService = MarketplaceService<MemoryBuilds, MemoryProfiles, MemoryNotices>;

pub(super) fn marketplace_config() -> MarketplaceConfig {
    MarketplaceConfig {
        min_price_cents: 99,
        max_price_cents: 20_000,
        require_moderation: true,
    }
}

pub(super) fn dna(ratings: [u8; 8]) -> PlaystyleVector {
    PlaystyleVector::new(ratings).expect("valid test vector")
}

pub(super) fn submission() -> BuildSubmission {
    BuildSubmission {
        title: "  Two-Way Slasher 6'5\"  ".to_string(),
        description: "Finishing-first guard with enough defense to stay on the floor.".to_string(),
        game: GameTitle::Nba2k26,
        price_cents: 1299,
        attributes: BuildAttributes {
            archetype: Archetype::Slasher,
            position: Position::ShootingGuard,
            height_inches: 77,
            overall_rating: 88,
            badges: vec!["Posterizer".to_string(), " ".to_string(), "Clamps".to_string()],
        },
        performance: PerformanceSnapshot {
            shooting: Some(62.0),
            speed: Some(85.0),
            defense: Some(74.0),
            playmaking: None,
            athleticism: Some(90.0),
        },
        build_dna: Some(dna([3, 6, 7, 6, 7, 8, 8, 5])),
    }
}

pub(super) fn sharpshooter_submission() -> BuildSubmission {
    BuildSubmission {
        title: "Corner Specialist".to_string(),
        description: String::new(),
        game: GameTitle::Nba2k26,
        price_cents: 799,
        attributes: BuildAttributes {
            archetype: Archetype::Sharpshooter,
            position: Position::SmallForward,
            height_inches: 79,
            overall_rating: 85,
            badges: Vec::new(),
        },
        performance: PerformanceSnapshot {
            shooting: Some(91.0),
            ..PerformanceSnapshot::default()
        },
        build_dna: Some(dna([10, 3, 4, 5, 9, 2, 3, 4])),
    }
}

pub(super) type ServiceParts = (
    TestService,
    Arc<MemoryBuilds>,
    Arc<MemoryProfiles>,
    Arc<MemoryNotices>,
);

pub(super) fn build_service() -> ServiceParts {
    build_service_with(marketplace_config())
}

pub(super) fn build_service_with(config: MarketplaceConfig) -> ServiceParts {
    let builds = Arc::new(MemoryBuilds::default());
    let profiles = Arc::new(MemoryProfiles::default());
    let notices = Arc::new(MemoryNotices::default());
    let service =
        MarketplaceService::new(builds.clone(), profiles.clone(), notices.clone(), &config);
    (service, builds, profiles, notices)
}

pub(super) fn guard() -> ListingGuard {
    ListingGuard::from_config(&marketplace_config())
}

#[derive(Default, Clone)]
pub(super) struct MemoryBuilds {
    pub(super) records: Arc<Mutex<HashMap<BuildId, BuildListing>>>,
}

impl BuildRepository for MemoryBuilds {
    fn insert(&self, listing: BuildListing) -> Result<BuildListing, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&listing.build_id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(listing.build_id.clone(), listing.clone());
        Ok(listing)
    }

    fn update_if(
        &self,
        listing: BuildListing,
        expected: ListingStatus,
    ) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        match guard.get_mut(&listing.build_id) {
            Some(current) if current.status == expected => {
                *current = listing;
                Ok(())
            }
            Some(_) => Err(RepositoryError::Conflict),
            None => Err(RepositoryError::NotFound),
        }
    }

    fn fetch(&self, id: &BuildId) -> Result<Option<BuildListing>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn list_by_status(
        &self,
        status: ListingStatus,
        limit: usize,
    ) -> Result<Vec<BuildListing>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        let mut listings: Vec<BuildListing> = guard
            .values()
            .filter(|listing| listing.status == status)
            .cloned()
            .collect();
        listings.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.build_id.cmp(&b.build_id))
        });
        listings.truncate(limit);
        Ok(listings)
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryProfiles {
    records: Arc<Mutex<HashMap<BuyerId, PlaystyleVector>>>,
}

impl PlaystyleRepository for MemoryProfiles {
    fn upsert(&self, buyer: &BuyerId, vector: PlaystyleVector) -> Result<(), RepositoryError> {
        self.records
            .lock()
            .expect("profile mutex poisoned")
            .insert(buyer.clone(), vector);
        Ok(())
    }

    fn fetch(&self, buyer: &BuyerId) -> Result<Option<PlaystyleVector>, RepositoryError> {
        Ok(self
            .records
            .lock()
            .expect("profile mutex poisoned")
            .get(buyer)
            .copied())
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryNotices {
    events: Arc<Mutex<Vec<ListingNotice>>>,
}

impl MemoryNotices {
    pub(super) fn events(&self) -> Vec<ListingNotice> {
        self.events.lock().expect("notice mutex poisoned").clone()
    }
}

impl NoticePublisher for MemoryNotices {
    fn publish(&self, notice: ListingNotice) -> Result<(), NoticeError> {
        self.events
            .lock()
            .expect("notice mutex poisoned")
            .push(notice);
        Ok(())
    }
}

pub(super) struct OfflineNotices;

impl NoticePublisher for OfflineNotices {
    fn publish(&self, _notice: ListingNotice) -> Result<(), NoticeError> {
        Err(NoticeError::Transport("smtp relay offline".to_string()))
    }
}

pub(super) struct UnavailableBuilds;

impl BuildRepository for UnavailableBuilds {
    fn insert(&self, _listing: BuildListing) -> Result<BuildListing, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn update_if(
        &self,
        _listing: BuildListing,
        _expected: ListingStatus,
    ) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: &BuildId) -> Result<Option<BuildListing>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn list_by_status(
        &self,
        _status: ListingStatus,
        _limit: usize,
    ) -> Result<Vec<BuildListing>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) struct ConflictBuilds;

impl BuildRepository for ConflictBuilds {
    fn insert(&self, _listing: BuildListing) -> Result<BuildListing, RepositoryError> {
        Err(RepositoryError::Conflict)
    }

    fn update_if(
        &self,
        _listing: BuildListing,
        _expected: ListingStatus,
    ) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("read only".to_string()))
    }

    fn fetch(&self, _id: &BuildId) -> Result<Option<BuildListing>, RepositoryError> {
        Ok(None)
    }

    fn list_by_status(
        &self,
        _status: ListingStatus,
        _limit: usize,
    ) -> Result<Vec<BuildListing>, RepositoryError> {
        Ok(Vec::new())
    }
}

pub(super) fn router_with_service(service: TestService) -> axum::Router {
    marketplace_router(Arc::new(service))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
