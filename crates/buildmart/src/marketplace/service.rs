use std::cmp::Reverse;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tracing::{info, warn};

use super::domain::{
    BrowseQuery, BuildId, BuildListing, BuildSubmission, BuyerId, ListingStatus,
    ModerationDecision, SellerId,
};
use super::guard::{ListingGuard, ListingViolation};
use super::repository::{
    BuildRepository, ListingNotice, NoticePublisher, PlaystyleRepository, RepositoryError,
};
use crate::config::MarketplaceConfig;
use crate::playstyle::{self, CompatibilityResult, PlaystyleVector};

const DEFAULT_BROWSE_LIMIT: usize = 50;
const MAX_BROWSE_LIMIT: usize = 100;

/// Service composing the listing guard, repositories, and compatibility scorer.
pub struct MarketplaceService<B, P, N> {
    guard: ListingGuard,
    builds: Arc<B>,
    profiles: Arc<P>,
    notices: Arc<N>,
    require_moderation: bool,
    sequence: AtomicU64,
}

/// Listing paired with how well it suits the requesting buyer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BrowseEntry {
    #[serde(flatten)]
    pub listing: BuildListing,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compatibility: Option<CompatibilityResult>,
}

pub type BuildDetail = BrowseEntry;

impl<B, P, N> MarketplaceService<B, P, N>
where
    B: BuildRepository + 'static,
    P: PlaystyleRepository + 'static,
    N: NoticePublisher + 'static,
{
    pub fn new(
        builds: Arc<B>,
        profiles: Arc<P>,
        notices: Arc<N>,
        config: &MarketplaceConfig,
    ) -> Self {
        Self {
            guard: ListingGuard::from_config(config),
            builds,
            profiles,
            notices,
            require_moderation: config.require_moderation,
            sequence: AtomicU64::new(1),
        }
    }

    fn next_build_id(&self) -> BuildId {
        let id = self.sequence.fetch_add(1, Ordering::Relaxed);
        BuildId(format!("build-{id:06}"))
    }

    fn initial_status(&self) -> ListingStatus {
        if self.require_moderation {
            ListingStatus::PendingReview
        } else {
            ListingStatus::Approved
        }
    }

    /// Validate and store a new listing for `seller`.
    pub fn submit_build(
        &self,
        seller: &SellerId,
        submission: BuildSubmission,
    ) -> Result<BuildListing, MarketplaceError> {
        let submission = self.guard.sanitize(submission)?;
        let now = Utc::now();

        let listing = BuildListing {
            build_id: self.next_build_id(),
            seller_id: seller.clone(),
            title: submission.title,
            description: submission.description,
            game: submission.game,
            price_cents: submission.price_cents,
            attributes: submission.attributes,
            performance: submission.performance,
            build_dna: submission.build_dna,
            status: self.initial_status(),
            moderation_note: None,
            created_at: now,
            updated_at: now,
        };

        let stored = self.builds.insert(listing)?;
        info!(
            build_id = %stored.build_id.0,
            seller_id = %seller.0,
            status = stored.status.label(),
            "build listing submitted"
        );
        Ok(stored)
    }

    /// Replace the seller-editable fields of an existing listing.
    pub fn update_build(
        &self,
        seller: &SellerId,
        build_id: &BuildId,
        submission: BuildSubmission,
    ) -> Result<BuildListing, MarketplaceError> {
        let mut listing = self.get_build(build_id)?;
        if &listing.seller_id != seller {
            return Err(MarketplaceError::Forbidden {
                build_id: build_id.clone(),
            });
        }

        let submission = self.guard.sanitize(submission)?;
        listing.title = submission.title;
        listing.description = submission.description;
        listing.game = submission.game;
        listing.price_cents = submission.price_cents;
        listing.attributes = submission.attributes;
        listing.performance = submission.performance;
        listing.build_dna = submission.build_dna;
        let previous_status = listing.status;
        listing.status = self.initial_status();
        listing.moderation_note = None;
        listing.updated_at = Utc::now();

        self.builds.update_if(listing.clone(), previous_status)?;
        Ok(listing)
    }

    /// Fetch a listing regardless of moderation state.
    pub fn get_build(&self, build_id: &BuildId) -> Result<BuildListing, MarketplaceError> {
        self.builds
            .fetch(build_id)?
            .ok_or_else(|| MarketplaceError::NotFound(format!("build {}", build_id.0)))
    }

    /// Buyer-facing detail view; listings that are not approved are hidden.
    pub fn build_detail(
        &self,
        build_id: &BuildId,
        buyer: Option<&BuyerId>,
    ) -> Result<BuildDetail, MarketplaceError> {
        let listing = self.approved_build(build_id)?;
        let compatibility = match buyer {
            Some(buyer) => Some(score_listing(&listing, self.profiles.fetch(buyer)?)),
            None => None,
        };

        Ok(BrowseEntry {
            listing,
            compatibility,
        })
    }

    /// Approve or reject a listing that is awaiting review.
    pub fn moderate(
        &self,
        build_id: &BuildId,
        decision: ModerationDecision,
    ) -> Result<BuildListing, MarketplaceError> {
        let mut listing = self.get_build(build_id)?;
        if listing.status != ListingStatus::PendingReview {
            return Err(MarketplaceError::InvalidTransition {
                build_id: build_id.clone(),
                status: listing.status,
            });
        }

        let mut details = BTreeMap::new();
        details.insert("title".to_string(), listing.title.clone());
        let template = match decision {
            ModerationDecision::Approve => {
                listing.status = ListingStatus::Approved;
                listing.moderation_note = None;
                "listing_approved"
            }
            ModerationDecision::Reject { reason } => {
                details.insert("reason".to_string(), reason.clone());
                listing.status = ListingStatus::Rejected;
                listing.moderation_note = Some(reason);
                "listing_rejected"
            }
        };
        listing.updated_at = Utc::now();
        match self
            .builds
            .update_if(listing.clone(), ListingStatus::PendingReview)
        {
            Ok(()) => {}
            Err(RepositoryError::Conflict) => {
                // Another decision or an edit landed between the read and the write.
                let current = self.get_build(build_id)?;
                return Err(MarketplaceError::InvalidTransition {
                    build_id: build_id.clone(),
                    status: current.status,
                });
            }
            Err(err) => return Err(err.into()),
        }

        info!(
            build_id = %listing.build_id.0,
            status = listing.status.label(),
            "build listing moderated"
        );

        let notice = ListingNotice {
            template: template.to_string(),
            build_id: listing.build_id.clone(),
            seller_id: listing.seller_id.clone(),
            details,
        };
        if let Err(err) = self.notices.publish(notice) {
            warn!(build_id = %listing.build_id.0, error = %err, "seller notice not delivered");
        }

        Ok(listing)
    }

    pub fn pending_reviews(&self, limit: usize) -> Result<Vec<BuildListing>, MarketplaceError> {
        Ok(self
            .builds
            .list_by_status(ListingStatus::PendingReview, limit)?)
    }

    /// Store the buyer's onboarding answers.
    pub fn save_playstyle(
        &self,
        buyer: &BuyerId,
        vector: PlaystyleVector,
    ) -> Result<(), MarketplaceError> {
        self.profiles.upsert(buyer, vector)?;
        Ok(())
    }

    pub fn playstyle(&self, buyer: &BuyerId) -> Result<PlaystyleVector, MarketplaceError> {
        self.profiles
            .fetch(buyer)?
            .ok_or_else(|| MarketplaceError::NotFound(format!("playstyle for {}", buyer.0)))
    }

    /// Approved listings matching `query`, best fit first when a buyer is supplied.
    pub fn browse(&self, query: &BrowseQuery) -> Result<Vec<BrowseEntry>, MarketplaceError> {
        let buyer_vector = match query.buyer_id.as_deref() {
            Some(buyer) => Some(self.profiles.fetch(&BuyerId(buyer.to_string()))?),
            None => None,
        };
        let limit = query
            .limit
            .unwrap_or(DEFAULT_BROWSE_LIMIT)
            .clamp(1, MAX_BROWSE_LIMIT);

        let mut entries: Vec<BrowseEntry> = self
            .builds
            .list_by_status(ListingStatus::Approved, usize::MAX)?
            .into_iter()
            .filter(|listing| query.game.map_or(true, |game| listing.game == game))
            .filter(|listing| {
                query
                    .max_price_cents
                    .map_or(true, |max| listing.price_cents <= max)
            })
            .map(|listing| {
                let compatibility = buyer_vector
                    .as_ref()
                    .map(|vector| score_listing(&listing, *vector));
                BrowseEntry {
                    listing,
                    compatibility,
                }
            })
            .collect();

        entries.sort_by_key(|entry| {
            (
                Reverse(entry.compatibility.as_ref().map(|result| result.score)),
                Reverse(entry.listing.created_at),
                entry.listing.build_id.clone(),
            )
        });
        entries.truncate(limit);
        Ok(entries)
    }

    /// Score one approved listing for one buyer. Missing playstyle data on either side yields
    /// the neutral fallback rather than an error.
    pub fn compatibility(
        &self,
        build_id: &BuildId,
        buyer: Option<&BuyerId>,
    ) -> Result<CompatibilityResult, MarketplaceError> {
        let listing = self.approved_build(build_id)?;
        let buyer_vector = match buyer {
            Some(buyer) => self.profiles.fetch(buyer)?,
            None => None,
        };
        Ok(score_listing(&listing, buyer_vector))
    }

    /// Listings that are not approved do not exist for buyers.
    fn approved_build(&self, build_id: &BuildId) -> Result<BuildListing, MarketplaceError> {
        let listing = self.get_build(build_id)?;
        if listing.status != ListingStatus::Approved {
            return Err(MarketplaceError::NotFound(format!("build {}", build_id.0)));
        }
        Ok(listing)
    }
}

fn score_listing(listing: &BuildListing, buyer: Option<PlaystyleVector>) -> CompatibilityResult {
    let buyer = buyer.map(|vector| vector.to_scores());
    let build = listing.build_dna.map(|vector| vector.to_scores());
    playstyle::score(
        buyer.as_ref().map(|ratings| ratings.as_slice()),
        build.as_ref().map(|ratings| ratings.as_slice()),
        listing.performance.shooting,
    )
}

/// Error raised by the marketplace service.
#[derive(Debug, thiserror::Error)]
pub enum MarketplaceError {
    #[error(transparent)]
    Invalid(#[from] ListingViolation),
    #[error("build {} belongs to another seller", .build_id.0)]
    Forbidden { build_id: BuildId },
    #[error("{0} not found")]
    NotFound(String),
    #[error("build {} is already {}", .build_id.0, .status.label())]
    InvalidTransition {
        build_id: BuildId,
        status: ListingStatus,
    },
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
