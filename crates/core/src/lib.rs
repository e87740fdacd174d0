//! Core types and the listing validation pipeline for dealwatch.
//!
//! This crate provides:
//! - Listing types and price ordering
//! - Relevance classification (heuristic and zero-shot model)
//! - JSON validity cache with write-through persistence
//! - Top-N ranking and new-listing detection
//! - Configuration structures and unified error types

pub mod cache;
pub mod classify;
pub mod config;
pub mod detect;
pub mod error;
pub mod listing;
pub mod rank;
pub mod results;
pub mod session;
pub mod source;

#[cfg(test)]
pub(crate) mod testing;

pub use cache::ValidityCache;
pub use classify::{Classifier, Strategy};
pub use config::AppConfig;
pub use error::Error;
pub use listing::{CandidateSet, Listing};
pub use results::{CycleReport, write_results};
pub use session::WatchSession;
pub use source::{CandidateSource, DescriptionFetcher, NewListingEvent, Notifier};
