//! Per-process watch state and the body of one scrape cycle.

use std::sync::Arc;

use crate::cache::ValidityCache;
use crate::classify::Classifier;
use crate::detect::NewListingDetector;
use crate::rank::{TOP_N, rank_top};
use crate::results::CycleReport;
use crate::{CandidateSet, DescriptionFetcher, Error, Listing, NewListingEvent, Notifier};

/// Everything that survives from one cycle to the next.
///
/// Built once at startup and threaded through every cycle. The notifier is
/// registered here exactly once.
pub struct WatchSession {
    classifier: Classifier,
    cache: ValidityCache,
    detector: NewListingDetector,
    notifier: Arc<dyn Notifier>,
    top: Vec<Listing>,
    top_n: usize,
}

impl WatchSession {
    pub fn new(classifier: Classifier, cache: ValidityCache, notifier: Arc<dyn Notifier>) -> Self {
        Self { classifier, cache, detector: NewListingDetector::new(), notifier, top: Vec::new(), top_n: TOP_N }
    }

    /// Override the size of the top list.
    pub fn with_top_n(mut self, top_n: usize) -> Self {
        self.top_n = top_n;
        self
    }

    /// Run detection and ranking over one cycle's candidates.
    ///
    /// Returns `Ok(None)` when the page had no listings. Classifier and fetch
    /// errors abort the cycle; verdicts cached before the failure are kept.
    pub async fn run_cycle(
        &mut self, candidates: &CandidateSet, fetcher: &dyn DescriptionFetcher,
    ) -> Result<Option<CycleReport>, Error> {
        let Some(primary) = &candidates.primary else {
            tracing::info!("no listings found");
            return Ok(None);
        };

        match self.detector.observe(primary) {
            Some(new) => {
                tracing::info!(url = %new.url, "checking new listing");
                let verdict = self.classifier.classify(&new, fetcher).await;
                self.detector.settle();

                if verdict? {
                    tracing::info!(
                        name = %new.name,
                        price = %new.price,
                        url = %new.url,
                        total_items = candidates.total_items(),
                        "new listing"
                    );
                    let event = NewListingEvent::new(&new, candidates.total_items());
                    if let Err(e) = self.notifier.notify(&event).await {
                        tracing::warn!(error = %e, "notification failed");
                    }
                }
            }
            None => tracing::info!("no changes since last check"),
        }

        tracing::info!(candidates = candidates.sorted_by_price.len(), "ranking lowest valid prices");
        self.top =
            rank_top(&candidates.sorted_by_price, &self.classifier, &mut self.cache, fetcher, self.top_n).await?;

        Ok(Some(CycleReport {
            total_items: candidates.total_items(),
            top_lowest_prices: self.top.clone(),
            items: candidates.items.clone(),
        }))
    }

    /// Top list from the last completed ranking; a failed ranking keeps it.
    pub fn top(&self) -> &[Listing] {
        &self.top
    }

    pub fn detector(&self) -> &NewListingDetector {
        &self.detector
    }

    pub fn cache(&self) -> &ValidityCache {
        &self.cache
    }
}
