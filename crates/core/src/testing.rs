//! Test mocks for the validation pipeline.
//!
//! One mock per collaborator trait:
//! - MockFetcher (DescriptionFetcher): HashMap-based URL→description
//! - FixedModel (ZeroShotModel): HashMap-based text→positive score
//! - RecordingNotifier (Notifier): keeps every delivered event

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::classify::{LabelSet, ZeroShotModel, ZeroShotOutput};
use crate::{DescriptionFetcher, Error, NewListingEvent, Notifier};

/// URL→description fetcher. Returns `Err` for unregistered URLs.
pub struct MockFetcher {
    pages: HashMap<String, String>,
    calls: Mutex<Vec<String>>,
}

impl MockFetcher {
    pub fn new() -> Self {
        Self { pages: HashMap::new(), calls: Mutex::new(Vec::new()) }
    }

    pub fn on_page(mut self, url: &str, description: &str) -> Self {
        self.pages.insert(url.to_string(), description.to_string());
        self
    }

    /// URLs fetched so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl DescriptionFetcher for MockFetcher {
    async fn fetch_description(&self, url: &str) -> Result<String, Error> {
        self.calls.lock().unwrap().push(url.to_string());
        self.pages
            .get(url)
            .cloned()
            .ok_or_else(|| Error::Navigation(format!("no page registered for {url}")))
    }
}

/// Model that scores the positive label with a fixed value per input text.
///
/// Unknown texts score 0.0. Scores of the remaining labels share what is left
/// so every response sums to 1, like a softmax over labels.
pub struct FixedModel {
    labels: LabelSet,
    scores: HashMap<String, f64>,
    fail: bool,
    calls: Mutex<Vec<String>>,
}

impl FixedModel {
    pub fn new(labels: LabelSet) -> Self {
        Self { labels, scores: HashMap::new(), fail: false, calls: Mutex::new(Vec::new()) }
    }

    pub fn score(mut self, text: &str, positive: f64) -> Self {
        self.scores.insert(text.to_string(), positive);
        self
    }

    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ZeroShotModel for FixedModel {
    async fn classify_zero_shot(&self, text: &str, labels: &[String]) -> Result<ZeroShotOutput, Error> {
        self.calls.lock().unwrap().push(text.to_string());
        if self.fail {
            return Err(Error::Classifier("model offline".into()));
        }

        let positive = self.scores.get(text).copied().unwrap_or(0.0);
        let others = labels.len().saturating_sub(1).max(1) as f64;
        let scores = labels
            .iter()
            .map(|label| if *label == self.labels.positive { positive } else { (1.0 - positive) / others })
            .collect();

        Ok(ZeroShotOutput { labels: labels.to_vec(), scores })
    }
}

/// Notifier that remembers every event.
#[derive(Default)]
pub struct RecordingNotifier {
    events: Mutex<Vec<NewListingEvent>>,
}

impl RecordingNotifier {
    pub fn events(&self) -> Vec<NewListingEvent> {
        self.events.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, event: &NewListingEvent) -> Result<(), Error> {
        self.events.lock().unwrap().push(event.clone());
        Ok(())
    }
}
