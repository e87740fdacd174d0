//! Unified error types for dealwatch.
//!
//! Every variant's display starts with a stable upper-case code so log lines
//! can be grepped by failure class.

/// Unified error type shared by the pipeline and its collaborators.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid input parameters (e.g., empty search URL).
    #[error("INVALID_INPUT: {0}")]
    InvalidInput(String),

    /// Cache file could not be read or written.
    #[error("CACHE_ERROR: {0}")]
    CacheIo(#[from] std::io::Error),

    /// Cache contents could not be encoded or decoded.
    #[error("CACHE_ERROR: {0}")]
    CacheFormat(#[from] serde_json::Error),

    /// Results file could not be written.
    #[error("RESULTS_ERROR: {0}")]
    Results(String),

    /// Browser launch or page navigation failed.
    #[error("NAVIGATION_FAILED: {0}")]
    Navigation(String),

    /// The page loaded but its listings or description could not be read.
    #[error("SCRAPE_FAILED: {0}")]
    Scrape(String),

    /// The zero-shot model call failed or returned an unusable answer.
    #[error("CLASSIFIER_FAILED: {0}")]
    Classifier(String),

    /// A notification backend rejected the event.
    #[error("NOTIFY_FAILED: {0}")]
    Notify(String),

    /// HTTP error response from a collaborator service.
    #[error("HTTP_ERROR: {0}")]
    HttpError(String),
}
