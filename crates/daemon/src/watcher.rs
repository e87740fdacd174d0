//! Per-cycle browser lifecycle and the top-level recovery boundary.

use std::path::PathBuf;
use std::time::Duration;

use dealwatch_client::{BrowserOptions, BrowserSession};
use dealwatch_core::{CandidateSource, CycleReport, DescriptionFetcher, Error, WatchSession, write_results};

/// Opens and closes the page source used by one cycle.
#[async_trait::async_trait]
pub trait PageLauncher: Send + Sync {
    type Page: CandidateSource + DescriptionFetcher;

    async fn launch(&self) -> Result<Self::Page, Error>;

    async fn close(&self, page: Self::Page);
}

/// Launches a fresh headless browser for every cycle.
pub struct ChromeLauncher {
    opts: BrowserOptions,
}

impl ChromeLauncher {
    pub fn new(opts: BrowserOptions) -> Self {
        Self { opts }
    }
}

#[async_trait::async_trait]
impl PageLauncher for ChromeLauncher {
    type Page = BrowserSession;

    async fn launch(&self) -> Result<BrowserSession, Error> {
        Ok(BrowserSession::launch(self.opts.clone()).await?)
    }

    async fn close(&self, page: BrowserSession) {
        page.close().await;
    }
}

/// Drives the watch session once per tick.
pub struct Watcher<L: PageLauncher> {
    search_url: String,
    results_path: PathBuf,
    session: WatchSession,
    launcher: L,
}

impl<L: PageLauncher> Watcher<L> {
    pub fn new(search_url: impl Into<String>, results_path: impl Into<PathBuf>, session: WatchSession, launcher: L) -> Self {
        Self { search_url: search_url.into(), results_path: results_path.into(), session, launcher }
    }

    /// Run one cycle: scrape, validate, rank and write the results file.
    ///
    /// The page source is closed whatever the outcome.
    pub async fn run_once(&mut self) -> Result<Option<CycleReport>, Error> {
        let page = self.launcher.launch().await?;
        let outcome = self.cycle(&page).await;
        self.launcher.close(page).await;
        outcome
    }

    async fn cycle(&mut self, page: &L::Page) -> Result<Option<CycleReport>, Error> {
        let candidates = page.fetch_candidates(&self.search_url).await?;
        tracing::debug!(items = candidates.total_items(), "candidates fetched");

        let report = self.session.run_cycle(&candidates, page).await?;
        if let Some(report) = &report {
            write_results(&self.results_path, report)?;
        }
        Ok(report)
    }

    /// Run one cycle, log its outcome and the time of the next check.
    ///
    /// Never fails; errors end the cycle and the next tick starts afresh.
    pub async fn tick(&mut self, interval: Duration) {
        match self.run_once().await {
            Ok(Some(report)) => tracing::info!(
                total_items = report.total_items,
                top = report.top_lowest_prices.len(),
                path = %self.results_path.display(),
                "cycle complete"
            ),
            Ok(None) => tracing::info!("cycle complete, nothing to rank"),
            Err(e) => tracing::error!(error = %e, "cycle failed"),
        }

        let next = chrono::TimeDelta::from_std(interval)
            .ok()
            .and_then(|delta| chrono::Local::now().checked_add_signed(delta));
        if let Some(next) = next {
            tracing::info!("next check at {}", next.format("%H:%M:%S"));
        }
    }

    pub fn session(&self) -> &WatchSession {
        &self.session
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dealwatch_core::{CandidateSet, Classifier, Listing, NewListingEvent, Notifier, Strategy, ValidityCache};
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    const SEARCH: &str = "https://m.example/search?keywords=bicicleta";

    #[derive(Clone)]
    struct StubPage {
        listings: Option<Vec<Listing>>,
        descriptions: HashMap<String, String>,
    }

    #[async_trait::async_trait]
    impl CandidateSource for StubPage {
        async fn fetch_candidates(&self, search_url: &str) -> Result<CandidateSet, Error> {
            assert_eq!(search_url, SEARCH);
            match &self.listings {
                Some(items) => Ok(CandidateSet::from_items(items.clone())),
                None => Err(Error::Navigation("timeout waiting for listings".into())),
            }
        }
    }

    #[async_trait::async_trait]
    impl DescriptionFetcher for StubPage {
        async fn fetch_description(&self, url: &str) -> Result<String, Error> {
            Ok(self.descriptions.get(url).cloned().unwrap_or_default())
        }
    }

    struct StubLauncher {
        page: StubPage,
        fail_launch: bool,
        launched: AtomicUsize,
        closed: AtomicUsize,
    }

    impl StubLauncher {
        fn new(page: StubPage) -> Self {
            Self { page, fail_launch: false, launched: AtomicUsize::new(0), closed: AtomicUsize::new(0) }
        }
    }

    #[async_trait::async_trait]
    impl PageLauncher for StubLauncher {
        type Page = StubPage;

        async fn launch(&self) -> Result<StubPage, Error> {
            if self.fail_launch {
                return Err(Error::Navigation("no browser".into()));
            }
            self.launched.fetch_add(1, Ordering::SeqCst);
            Ok(self.page.clone())
        }

        async fn close(&self, _page: StubPage) {
            self.closed.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[derive(Clone, Default)]
    struct Recording {
        events: Arc<Mutex<Vec<NewListingEvent>>>,
    }

    #[async_trait::async_trait]
    impl Notifier for Recording {
        async fn notify(&self, event: &NewListingEvent) -> Result<(), Error> {
            self.events.lock().unwrap().push(event.clone());
            Ok(())
        }
    }

    fn item(name: &str, price: &str, id: u32) -> Listing {
        Listing::new(name, price, format!("https://m.example/item/{id}"))
    }

    fn watcher(page: StubPage, results: PathBuf) -> (Watcher<StubLauncher>, Recording) {
        let classifier = Classifier::new("bicicleta", &["eléctrica".to_string()], Strategy::Heuristic)
            .with_fetch_delay(Duration::ZERO);
        let notifier = Recording::default();
        let session = WatchSession::new(classifier, ValidityCache::in_memory(SEARCH), Arc::new(notifier.clone()));
        (Watcher::new(SEARCH, results, session, StubLauncher::new(page)), notifier)
    }

    #[tokio::test]
    async fn test_run_once_writes_results() {
        let dir = tempfile::tempdir().unwrap();
        let results = dir.path().join("results.json");
        let page = StubPage {
            listings: Some(vec![item("bicicleta eléctrica", "50 €", 1), item("bicicleta montaña", "80 €", 2)]),
            descriptions: HashMap::new(),
        };
        let (mut watcher, notifier) = watcher(page, results.clone());

        let report = watcher.run_once().await.unwrap().unwrap();
        assert_eq!(report.total_items, 2);
        assert_eq!(report.top_lowest_prices, vec![item("bicicleta montaña", "80 €", 2)]);
        assert!(notifier.events.lock().unwrap().is_empty());

        let written = std::fs::read_to_string(&results).unwrap();
        assert!(written.contains("\"totalItems\": 2"));
        assert_eq!(watcher.launcher.closed.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_failed_cycle_still_closes_page() {
        let dir = tempfile::tempdir().unwrap();
        let results = dir.path().join("results.json");
        let (mut watcher, _) = watcher(StubPage { listings: None, descriptions: HashMap::new() }, results.clone());

        assert!(watcher.run_once().await.is_err());
        assert_eq!(watcher.launcher.launched.load(Ordering::SeqCst), 1);
        assert_eq!(watcher.launcher.closed.load(Ordering::SeqCst), 1);
        assert!(!results.exists());
    }

    #[tokio::test]
    async fn test_empty_page_skips_results_file() {
        let dir = tempfile::tempdir().unwrap();
        let results = dir.path().join("results.json");
        let (mut watcher, _) = watcher(StubPage { listings: Some(Vec::new()), descriptions: HashMap::new() }, results.clone());

        assert!(watcher.run_once().await.unwrap().is_none());
        assert!(!results.exists());
    }

    #[tokio::test]
    async fn test_tick_recovers_from_launch_failure() {
        let dir = tempfile::tempdir().unwrap();
        let page = StubPage { listings: Some(vec![item("bicicleta", "80 €", 1)]), descriptions: HashMap::new() };
        let (mut watcher, notifier) = watcher(page, dir.path().join("results.json"));

        watcher.launcher.fail_launch = true;
        watcher.tick(Duration::from_secs(60)).await;
        assert_eq!(watcher.launcher.closed.load(Ordering::SeqCst), 0);

        watcher.launcher.fail_launch = false;
        watcher.tick(Duration::from_secs(60)).await;
        assert_eq!(notifier.events.lock().unwrap().len(), 1);
        assert_eq!(watcher.session().top().len(), 1);
    }
}
