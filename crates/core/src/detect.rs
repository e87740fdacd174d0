//! New-listing detection on the primary (newest) listing.

use crate::Listing;

/// Detector state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DetectorState {
    /// No comparison pending.
    #[default]
    Idle,
    /// The current primary listing is being classified.
    Checking,
}

/// Remembers the last primary listing URL and flags changes.
///
/// `last_seen` moves to the new URL as soon as a change is observed, before
/// classification finishes, so a failed or rejected listing is never
/// re-checked on later cycles.
#[derive(Debug, Default)]
pub struct NewListingDetector {
    last_seen: Option<String>,
    state: DetectorState,
}

impl NewListingDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the listing to classify when `primary` differs from the last
    /// seen one, entering [`DetectorState::Checking`]. Returns `None` when
    /// nothing changed.
    pub fn observe(&mut self, primary: &Listing) -> Option<Listing> {
        if self.last_seen.as_deref() == Some(primary.url.as_str()) {
            return None;
        }
        self.last_seen = Some(primary.url.clone());
        self.state = DetectorState::Checking;
        Some(primary.clone())
    }

    /// Classification finished (any outcome).
    pub fn settle(&mut self) {
        self.state = DetectorState::Idle;
    }

    pub fn last_seen(&self) -> Option<&str> {
        self.last_seen.as_deref()
    }

    pub fn state(&self) -> DetectorState {
        self.state
    }
}
