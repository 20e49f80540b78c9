use buildmart::marketplace::{
    BuildId, BuildListing, BuildRepository, BuyerId, ListingNotice, ListingStatus, NoticeError,
    NoticePublisher, PlaystyleRepository, RepositoryError,
};
use buildmart::playstyle::PlaystyleVector;
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryBuildRepository {
    records: Arc<Mutex<HashMap<BuildId, BuildListing>>>,
}

impl BuildRepository for InMemoryBuildRepository {
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
pub(crate) struct InMemoryPlaystyleRepository {
    records: Arc<Mutex<HashMap<BuyerId, PlaystyleVector>>>,
}

impl PlaystyleRepository for InMemoryPlaystyleRepository {
    fn upsert(&self, buyer: &BuyerId, vector: PlaystyleVector) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("profile mutex poisoned");
        guard.insert(buyer.clone(), vector);
        Ok(())
    }

    fn fetch(&self, buyer: &BuyerId) -> Result<Option<PlaystyleVector>, RepositoryError> {
        let guard = self.records.lock().expect("profile mutex poisoned");
        Ok(guard.get(buyer).copied())
    }
}

/// Records seller notices and writes them to the log until an e-mail adapter is wired in.
#[derive(Default, Clone)]
pub(crate) struct LoggingNoticePublisher {
    events: Arc<Mutex<Vec<ListingNotice>>>,
}

impl NoticePublisher for LoggingNoticePublisher {
    fn publish(&self, notice: ListingNotice) -> Result<(), NoticeError> {
        info!(
            template = %notice.template,
            build_id = %notice.build_id.0,
            seller_id = %notice.seller_id.0,
            "seller notice queued"
        );
        let mut guard = self.events.lock().expect("notice mutex poisoned");
        guard.push(notice);
        Ok(())
    }
}

#[cfg(test)]
impl LoggingNoticePublisher {
    pub(crate) fn events(&self) -> Vec<ListingNotice> {
        self.events.lock().expect("notice mutex poisoned").clone()
    }
}
