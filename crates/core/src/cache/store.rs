//! Write-through validity cache backed by a JSON file.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::Error;

/// Cached verdict for one listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntry {
    /// Formatted price observed when the verdict was computed.
    pub price: String,
    pub valid: bool,
}

/// On-disk shape of the cache file.
///
/// `url` is the search query the verdicts were computed for; a different
/// search makes every entry stale.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CacheStore {
    pub url: String,
    #[serde(rename = "cachedProducts")]
    pub entries: BTreeMap<String, CacheEntry>,
}

/// How the cache was initialised by [`ValidityCache::open`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Existing file matched the current search and was loaded.
    Loaded,
    /// Existing file belonged to another search and was reset.
    SearchChanged,
    /// Existing file could not be read or parsed and was reset.
    Unreadable,
    /// No file existed; an empty one was created.
    Created,
    /// Not backed by a file.
    InMemory,
}

/// Listing URL -> verdict cache, persisted after every mutation.
#[derive(Debug)]
pub struct ValidityCache {
    path: Option<PathBuf>,
    store: CacheStore,
    outcome: LoadOutcome,
}

impl ValidityCache {
    /// Open the cache file for `search_url`.
    ///
    /// A missing, unreadable, malformed, or stale file (recorded search URL
    /// differs) is replaced by an empty store that is persisted immediately.
    /// Only failing to write that replacement is an error.
    pub fn open(path: impl AsRef<Path>, search_url: &str) -> Result<Self, Error> {
        let path = path.as_ref().to_path_buf();
        if search_url.is_empty() {
            return Err(Error::InvalidInput("search url cannot be empty".into()));
        }

        let outcome = match std::fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str::<CacheStore>(&raw) {
                Ok(store) if store.url == search_url => {
                    tracing::info!(path = %path.display(), entries = store.entries.len(), "validity cache loaded");
                    return Ok(Self { path: Some(path), store, outcome: LoadOutcome::Loaded });
                }
                Ok(_) => LoadOutcome::SearchChanged,
                Err(e) => {
                    tracing::debug!(error = %e, "cache file did not parse");
                    LoadOutcome::Unreadable
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => LoadOutcome::Created,
            Err(e) => {
                tracing::debug!(error = %e, "cache file could not be read");
                LoadOutcome::Unreadable
            }
        };

        match outcome {
            LoadOutcome::SearchChanged => tracing::warn!(path = %path.display(), "search changed, cache reset"),
            LoadOutcome::Unreadable => tracing::warn!(path = %path.display(), "cache unreadable, cache reset"),
            _ => tracing::info!(path = %path.display(), "no cache file found, created a new one"),
        }

        let cache = Self {
            path: Some(path),
            store: CacheStore { url: search_url.to_string(), entries: BTreeMap::new() },
            outcome,
        };
        cache.persist()?;
        Ok(cache)
    }

    /// Cache that lives only as long as the process, for tests.
    pub fn in_memory(search_url: &str) -> Self {
        Self {
            path: None,
            store: CacheStore { url: search_url.to_string(), entries: BTreeMap::new() },
            outcome: LoadOutcome::InMemory,
        }
    }

    /// Cached entry for `url`, only if it was computed at `current_price`.
    pub fn lookup(&self, url: &str, current_price: &str) -> Option<&CacheEntry> {
        self.store.entries.get(url).filter(|entry| entry.price == current_price)
    }

    /// Record a verdict and rewrite the cache file before returning.
    pub fn store(&mut self, url: &str, price: &str, valid: bool) -> Result<(), Error> {
        self.store
            .entries
            .insert(url.to_string(), CacheEntry { price: price.to_string(), valid });
        self.persist()
    }

    pub fn search_url(&self) -> &str {
        &self.store.url
    }

    pub fn outcome(&self) -> LoadOutcome {
        self.outcome
    }

    pub fn len(&self) -> usize {
        self.store.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.entries.is_empty()
    }

    /// Write the full store to a sibling temp file, then rename it into place.
    fn persist(&self) -> Result<(), Error> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        let json = serde_json::to_string_pretty(&self.store)?;
        let mut tmp = path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, path)?;
        Ok(())
    }
}
