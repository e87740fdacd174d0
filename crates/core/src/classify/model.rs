//! Zero-shot model contract and the label set listings are scored against.

use serde::{Deserialize, Serialize};

use crate::Error;

/// Score the positive label must exceed for a text to count as relevant.
pub const POSITIVE_THRESHOLD: f64 = 0.5;

/// Scores returned by a zero-shot classifier.
///
/// `labels[i]` is scored `scores[i]`; order is whatever the provider returns.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ZeroShotOutput {
    pub labels: Vec<String>,
    pub scores: Vec<f64>,
}

impl ZeroShotOutput {
    /// Score assigned to `label`, if the provider returned it.
    pub fn score_for(&self, label: &str) -> Option<f64> {
        self.labels
            .iter()
            .position(|l| l == label)
            .and_then(|i| self.scores.get(i).copied())
    }
}

/// Any zero-shot text classification backend.
#[async_trait::async_trait]
pub trait ZeroShotModel: Send + Sync {
    async fn classify_zero_shot(&self, text: &str, labels: &[String]) -> Result<ZeroShotOutput, Error>;
}

/// Candidate labels for one search keyword.
///
/// One positive label describing a genuine sale of the product, six fixed
/// negatives, and one negative per blacklist term.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelSet {
    pub positive: String,
    pub negatives: Vec<String>,
}

impl LabelSet {
    pub fn new(keyword: &str, blacklist: &[String]) -> Self {
        let positive = format!("Exclusive sale or purchase of the product \"{keyword}\" with commercial intent");

        let mut negatives = vec![
            format!("General mention of the product \"{keyword}\" in a description"),
            format!("Mention of another model of {keyword}"),
            format!("Not related to \"{keyword}\""),
            "A tag to improve the visibility of another product".to_string(),
            "The description may be a scam or deception".to_string(),
            "Typographical errors that suggest a scam or deception".to_string(),
        ];
        negatives.extend(blacklist.iter().map(|word| format!("Exclusive mention of the word: \"{word}\"")));

        Self { positive, negatives }
    }

    /// All labels, positive first.
    pub fn all(&self) -> Vec<String> {
        std::iter::once(self.positive.clone())
            .chain(self.negatives.iter().cloned())
            .collect()
    }

    /// Whether `output` scores the positive label above [`POSITIVE_THRESHOLD`].
    pub fn is_positive(&self, output: &ZeroShotOutput) -> Result<bool, Error> {
        output
            .score_for(&self.positive)
            .map(|score| score > POSITIVE_THRESHOLD)
            .ok_or_else(|| Error::Classifier("model response is missing the positive label".into()))
    }
}
