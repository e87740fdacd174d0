//! Listing relevance classification.
//!
//! ### Heuristic strategy
//! - The lowercased name must contain the keyword and no blacklist term.
//! - Otherwise the description is fetched: the keyword must appear in its
//!   first 77 characters and no blacklist term anywhere in it.
//! - A matching name never triggers a description fetch.
//!
//! ### Model strategy
//! - Name and description are each scored against a [`LabelSet`]; a text is
//!   relevant when the positive label scores above 0.5.
//! - Verdict is `name && description`, except that a rejected name with an
//!   accepted description falls back to the heuristic name check.
//!
//! Every description fetch is preceded by a short fixed delay.

pub mod heuristic;
pub mod model;

pub use model::{LabelSet, POSITIVE_THRESHOLD, ZeroShotModel, ZeroShotOutput};

use std::sync::Arc;
use std::time::Duration;

use crate::{DescriptionFetcher, Error, Listing};

/// How relevance is decided.
#[derive(Clone)]
pub enum Strategy {
    Heuristic,
    Model(Arc<dyn ZeroShotModel>),
}

impl std::fmt::Debug for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Strategy::Heuristic => f.write_str("Heuristic"),
            Strategy::Model(_) => f.write_str("Model"),
        }
    }
}

/// Decides whether a listing is a genuine offer for the searched product.
#[derive(Debug, Clone)]
pub struct Classifier {
    keyword: String,
    blacklist: Vec<String>,
    labels: LabelSet,
    strategy: Strategy,
    fetch_delay: Duration,
}

impl Classifier {
    /// Create a classifier; keyword and blacklist are lowercased once here.
    pub fn new(keyword: &str, blacklist: &[String], strategy: Strategy) -> Self {
        let keyword = keyword.trim().to_lowercase();
        let blacklist: Vec<String> = blacklist.iter().map(|w| w.trim().to_lowercase()).collect();
        let labels = LabelSet::new(&keyword, &blacklist);
        Self { keyword, blacklist, labels, strategy, fetch_delay: Duration::from_millis(250) }
    }

    /// Pause applied before every description fetch.
    pub fn with_fetch_delay(mut self, delay: Duration) -> Self {
        self.fetch_delay = delay;
        self
    }

    pub fn keyword(&self) -> &str {
        &self.keyword
    }

    pub fn labels(&self) -> &LabelSet {
        &self.labels
    }

    pub fn uses_model(&self) -> bool {
        matches!(self.strategy, Strategy::Model(_))
    }

    /// Classify one listing. Fetch and model errors are returned as-is.
    pub async fn classify(&self, listing: &Listing, fetcher: &dyn DescriptionFetcher) -> Result<bool, Error> {
        let valid = match &self.strategy {
            Strategy::Heuristic => self.classify_heuristic(listing, fetcher).await?,
            Strategy::Model(model) => self.classify_with_model(model.as_ref(), listing, fetcher).await?,
        };
        tracing::debug!(url = %listing.url, price = %listing.price, valid, "listing classified");
        Ok(valid)
    }

    async fn classify_heuristic(&self, listing: &Listing, fetcher: &dyn DescriptionFetcher) -> Result<bool, Error> {
        if heuristic::name_matches(&listing.name, &self.keyword, &self.blacklist) {
            return Ok(true);
        }

        tracing::debug!(url = %listing.url, "name does not match, checking description");
        let description = self.fetch_description(listing, fetcher).await?;
        let valid = heuristic::description_matches(&description, &self.keyword, &self.blacklist);
        if !valid {
            tracing::debug!(url = %listing.url, "description does not match");
        }
        Ok(valid)
    }

    async fn classify_with_model(
        &self, model: &dyn ZeroShotModel, listing: &Listing, fetcher: &dyn DescriptionFetcher,
    ) -> Result<bool, Error> {
        let name = listing.name.to_lowercase();
        let name_valid = self.model_accepts(model, &name).await?;
        if !name_valid {
            tracing::debug!(url = %listing.url, "model rejected name, checking description");
        }

        let description = self.fetch_description(listing, fetcher).await?;
        let description_valid = self.model_accepts(model, &description).await?;
        if !description_valid {
            tracing::debug!(url = %listing.url, "model rejected description");
        }

        if !name_valid && description_valid {
            return Ok(heuristic::name_matches(&name, &self.keyword, &self.blacklist));
        }

        Ok(name_valid && description_valid)
    }

    async fn model_accepts(&self, model: &dyn ZeroShotModel, text: &str) -> Result<bool, Error> {
        if text.trim().is_empty() {
            return Ok(false);
        }
        let output = model.classify_zero_shot(text, &self.labels.all()).await?;
        self.labels.is_positive(&output)
    }

    async fn fetch_description(&self, listing: &Listing, fetcher: &dyn DescriptionFetcher) -> Result<String, Error> {
        if !self.fetch_delay.is_zero() {
            tokio::time::sleep(self.fetch_delay).await;
        }
        fetcher.fetch_description(&listing.url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FixedModel, MockFetcher};

    const URL: &str = "https://m.example/item/1";

    fn heuristic(keyword: &str, blacklist: &[&str]) -> Classifier {
        let blacklist: Vec<String> = blacklist.iter().map(|w| w.to_string()).collect();
        Classifier::new(keyword, &blacklist, Strategy::Heuristic).with_fetch_delay(Duration::ZERO)
    }

    fn with_model(keyword: &str, model: FixedModel) -> (Classifier, Arc<FixedModel>) {
        let model = Arc::new(model);
        let classifier =
            Classifier::new(keyword, &[], Strategy::Model(model.clone())).with_fetch_delay(Duration::ZERO);
        (classifier, model)
    }

    #[tokio::test]
    async fn test_heuristic_name_match_skips_description() {
        let classifier = heuristic("bicicleta", &[]);
        let fetcher = MockFetcher::new();
        let listing = Listing::new("Bicicleta montaña", "80 €", URL);

        assert!(classifier.classify(&listing, &fetcher).await.unwrap());
        assert!(fetcher.calls().is_empty());
    }

    #[tokio::test]
    async fn test_heuristic_blacklisted_name_falls_through_to_description() {
        let classifier = heuristic("bicicleta", &["eléctrica"]);
        let fetcher = MockFetcher::new().on_page(URL, "bicicleta eléctrica con batería nueva");
        let listing = Listing::new("Bicicleta eléctrica", "50 €", URL);

        assert!(!classifier.classify(&listing, &fetcher).await.unwrap());
        assert_eq!(fetcher.calls(), vec![URL]);
    }

    #[tokio::test]
    async fn test_heuristic_description_rescues_name() {
        let classifier = heuristic("bicicleta", &[]);
        let fetcher = MockFetcher::new().on_page(URL, "vendo bicicleta de carretera talla m");
        let listing = Listing::new("BH Speedrom", "400 €", URL);

        assert!(classifier.classify(&listing, &fetcher).await.unwrap());
    }

    #[tokio::test]
    async fn test_heuristic_keyword_outside_window() {
        let classifier = heuristic("ps5", &[]);
        let description = format!("{}ps5", "x".repeat(77));
        let fetcher = MockFetcher::new().on_page(URL, &description);
        let listing = Listing::new("Consola", "300 €", URL);

        assert!(!classifier.classify(&listing, &fetcher).await.unwrap());
    }

    #[tokio::test]
    async fn test_heuristic_is_deterministic() {
        let classifier = heuristic("ps5", &["mando"]);
        let fetcher = MockFetcher::new().on_page(URL, "ps5 sin mando");
        let listing = Listing::new("Consola", "300 €", URL);

        let first = classifier.classify(&listing, &fetcher).await.unwrap();
        let second = classifier.classify(&listing, &fetcher).await.unwrap();
        assert_eq!(first, second);
        assert!(!first);
    }

    #[tokio::test(start_paused = true)]
    async fn test_description_fetch_waits_for_delay() {
        let delay = Duration::from_millis(250);
        let classifier = heuristic("ps5", &[]).with_fetch_delay(delay);
        let fetcher = MockFetcher::new().on_page(URL, "vendo ps5");
        let listing = Listing::new("Consola", "300 €", URL);

        let start = tokio::time::Instant::now();
        assert!(classifier.classify(&listing, &fetcher).await.unwrap());
        assert!(start.elapsed() >= delay);
        assert_eq!(fetcher.calls(), vec![URL]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_name_match_does_not_wait() {
        let classifier = heuristic("ps5", &[]).with_fetch_delay(Duration::from_millis(250));
        let fetcher = MockFetcher::new();
        let listing = Listing::new("PS5 Slim", "450 €", URL);

        let start = tokio::time::Instant::now();
        assert!(classifier.classify(&listing, &fetcher).await.unwrap());
        assert_eq!(start.elapsed(), Duration::ZERO);
        assert!(fetcher.calls().is_empty());
    }

    #[test]
    fn test_default_fetch_delay() {
        let classifier = Classifier::new("ps5", &[], Strategy::Heuristic);
        assert_eq!(classifier.fetch_delay, Duration::from_millis(250));
    }

    #[tokio::test]
    async fn test_fetch_error_propagates() {
        let classifier = heuristic("ps5", &[]);
        let fetcher = MockFetcher::new();
        let listing = Listing::new("Consola", "300 €", URL);

        let result = classifier.classify(&listing, &fetcher).await;
        assert!(matches!(result, Err(Error::Navigation(_))));
    }

    #[test]
    fn test_classifier_lowercases_inputs() {
        let classifier = Classifier::new("  PS5 ", &["Mando".into()], Strategy::Heuristic);
        assert_eq!(classifier.keyword(), "ps5");
        assert!(classifier.labels().negatives.last().unwrap().contains("\"mando\""));
        assert!(!classifier.uses_model());
    }

    #[tokio::test]
    async fn test_model_name_and_description_valid() {
        let labels = LabelSet::new("ps5", &[]);
        let model = FixedModel::new(labels).score("ps5 slim 1tb", 0.9).score("consola nueva", 0.8);
        let (classifier, model) = with_model("ps5", model);
        let fetcher = MockFetcher::new().on_page(URL, "consola nueva");
        let listing = Listing::new("PS5 Slim 1TB", "450 €", URL);

        assert!(classifier.classify(&listing, &fetcher).await.unwrap());
        assert_eq!(model.calls(), vec!["ps5 slim 1tb", "consola nueva"]);
    }

    #[tokio::test]
    async fn test_model_name_valid_description_invalid() {
        let labels = LabelSet::new("ps5", &[]);
        let model = FixedModel::new(labels).score("ps5 slim", 0.9).score("solo la caja", 0.1);
        let (classifier, _) = with_model("ps5", model);
        let fetcher = MockFetcher::new().on_page(URL, "solo la caja");
        let listing = Listing::new("PS5 Slim", "20 €", URL);

        assert!(!classifier.classify(&listing, &fetcher).await.unwrap());
    }

    #[tokio::test]
    async fn test_model_fallback_to_name_heuristic() {
        let labels = LabelSet::new("ps5", &[]);
        // Name rejected by the model, description accepted: the substring
        // check on the name decides.
        let model = FixedModel::new(labels).score("ps5 digital", 0.2).score("vendo consola", 0.9);
        let (classifier, _) = with_model("ps5", model);
        let fetcher = MockFetcher::new().on_page(URL, "vendo consola");

        let with_keyword = Listing::new("PS5 Digital", "300 €", URL);
        assert!(classifier.classify(&with_keyword, &fetcher).await.unwrap());
    }

    #[tokio::test]
    async fn test_model_fallback_rejects_name_without_keyword() {
        let labels = LabelSet::new("ps5", &[]);
        let model = FixedModel::new(labels).score("vendo consola", 0.9);
        let (classifier, _) = with_model("ps5", model);
        let fetcher = MockFetcher::new().on_page(URL, "vendo consola");

        let listing = Listing::new("Consola Sony", "300 €", URL);
        assert!(!classifier.classify(&listing, &fetcher).await.unwrap());
    }

    #[tokio::test]
    async fn test_model_both_invalid() {
        let labels = LabelSet::new("ps5", &[]);
        let (classifier, _) = with_model("ps5", FixedModel::new(labels));
        let fetcher = MockFetcher::new().on_page(URL, "funda para mando");

        let listing = Listing::new("Funda mando", "5 €", URL);
        assert!(!classifier.classify(&listing, &fetcher).await.unwrap());
    }

    #[tokio::test]
    async fn test_model_empty_description_not_sent() {
        let labels = LabelSet::new("ps5", &[]);
        let model = FixedModel::new(labels).score("ps5", 0.9);
        let (classifier, model) = with_model("ps5", model);
        let fetcher = MockFetcher::new().on_page(URL, "");

        let listing = Listing::new("PS5", "300 €", URL);
        assert!(!classifier.classify(&listing, &fetcher).await.unwrap());
        assert_eq!(model.calls(), vec!["ps5"]);
    }

    #[tokio::test]
    async fn test_model_is_deterministic() {
        let labels = LabelSet::new("ps5", &[]);
        let model = FixedModel::new(labels).score("ps5 digital", 0.2).score("vendo consola", 0.9);
        let (classifier, model) = with_model("ps5", model);
        let fetcher = MockFetcher::new().on_page(URL, "vendo consola");
        let listing = Listing::new("PS5 Digital", "300 €", URL);

        let first = classifier.classify(&listing, &fetcher).await.unwrap();
        let second = classifier.classify(&listing, &fetcher).await.unwrap();
        assert_eq!(first, second);
        assert!(first);
        assert_eq!(model.calls(), vec!["ps5 digital", "vendo consola", "ps5 digital", "vendo consola"]);
    }

    #[tokio::test]
    async fn test_model_error_propagates() {
        let labels = LabelSet::new("ps5", &[]);
        let (classifier, _) = with_model("ps5", FixedModel::new(labels).failing());
        let fetcher = MockFetcher::new().on_page(URL, "vendo ps5");

        let listing = Listing::new("PS5", "300 €", URL);
        let result = classifier.classify(&listing, &fetcher).await;
        assert!(matches!(result, Err(Error::Classifier(_))));
    }
}
