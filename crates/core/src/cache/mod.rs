//! Persistent cache of listing validity verdicts.
//!
//! Verdicts are keyed by listing URL and trusted only while the listing's
//! formatted price is unchanged. The whole store is tied to one search URL:
//! opening it for a different search starts over with an empty store.
//!
//! - JSON file format shared with earlier versions of the watcher
//! - Write-through persistence (one full rewrite per mutation)
//! - Atomic replacement via temp file + rename

pub mod store;

pub use crate::Error;

pub use store::{CacheEntry, CacheStore, LoadOutcome, ValidityCache};
