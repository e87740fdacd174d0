//! Zero-shot inference request body and validation.

use serde::Serialize;

use super::ZeroShotError;

/// Longest input sent to the model, in characters.
///
/// Descriptions can be arbitrarily long; the provider rejects oversize
/// inputs and the model only attends to the first few hundred tokens.
pub const MAX_INPUT_CHARS: usize = 2000;

/// Body of a zero-shot classification call.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ZeroShotRequest {
    pub inputs: String,
    pub parameters: ZeroShotParameters,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ZeroShotParameters {
    pub candidate_labels: Vec<String>,

    /// Scores sum to one across labels when false.
    pub multi_label: bool,
}

impl ZeroShotRequest {
    /// Build a single-label request, truncating `text` to [`MAX_INPUT_CHARS`].
    pub fn new(text: &str, labels: &[String]) -> Self {
        Self {
            inputs: truncate_chars(text.trim(), MAX_INPUT_CHARS).to_string(),
            parameters: ZeroShotParameters { candidate_labels: labels.to_vec(), multi_label: false },
        }
    }

    pub fn validate(&self) -> Result<(), ZeroShotError> {
        if self.inputs.is_empty() {
            return Err(ZeroShotError::InvalidRequest("input text cannot be empty".to_string()));
        }

        if self.parameters.candidate_labels.is_empty() {
            return Err(ZeroShotError::InvalidRequest("at least one candidate label is required".to_string()));
        }

        if self.parameters.candidate_labels.iter().any(|l| l.trim().is_empty()) {
            return Err(ZeroShotError::InvalidRequest("candidate labels cannot be blank".to_string()));
        }

        Ok(())
    }
}

fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
