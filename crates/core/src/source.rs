//! Collaborator traits at the edges of the pipeline.
//!
//! The pipeline never touches the network itself; the client crate provides
//! browser, HTTP and notification implementations of these traits.

use serde::{Deserialize, Serialize};

use crate::{CandidateSet, Error, Listing};

/// Produces the listings currently shown for a search.
#[async_trait::async_trait]
pub trait CandidateSource: Send + Sync {
    async fn fetch_candidates(&self, search_url: &str) -> Result<CandidateSet, Error>;
}

/// Fetches the lowercased description text of a listing page.
///
/// Returns an empty string when the page has no description block.
#[async_trait::async_trait]
pub trait DescriptionFetcher: Send + Sync {
    async fn fetch_description(&self, url: &str) -> Result<String, Error>;
}

/// A newly posted listing that passed validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewListingEvent {
    pub title: String,
    pub name: String,
    pub price: String,
    /// Link opened when the notification is clicked.
    pub url: String,
    pub total_items: usize,
}

impl NewListingEvent {
    pub fn new(listing: &Listing, total_items: usize) -> Self {
        Self {
            title: "New listing found".to_string(),
            name: listing.name.clone(),
            price: listing.price.clone(),
            url: listing.url.clone(),
            total_items,
        }
    }

    /// Short body text for popups and chat messages.
    pub fn message(&self) -> String {
        format!("{} | Price: {}", self.name, self.price)
    }
}

/// Delivers new-listing events to the user.
#[async_trait::async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, event: &NewListingEvent) -> Result<(), Error>;
}
