//! Configuration validation rules.
//!
//! This module provides validation logic for `AppConfig` values
//! after they have been loaded from environment, files, or defaults.

use crate::config::AppConfig;
use thiserror::Error;

/// Configuration validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("invalid configuration: {field} - {reason}")]
    Invalid { field: String, reason: String },

    #[error("missing required configuration: {field} ({hint})")]
    Missing { field: String, hint: String },
}

impl AppConfig {
    /// Validate configuration values after loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if:
    /// - `search_keyword` is empty or whitespace
    /// - a blacklist entry is blank
    /// - `max_price` is 0 or below `min_price`
    /// - `time_interval_minutes` is outside 1..=1440
    /// - `page_timeout_ms` is outside 1s..=5min
    /// - the search origin is not a valid coordinate
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.search_keyword.trim().is_empty() {
            return Err(ConfigError::Invalid { field: "search_keyword".into(), reason: "must not be empty".into() });
        }

        if self.blacklist_keywords.iter().any(|word| word.trim().is_empty()) {
            return Err(ConfigError::Invalid {
                field: "blacklist_keywords".into(),
                reason: "entries must not be blank".into(),
            });
        }

        if self.max_price == 0 {
            return Err(ConfigError::Invalid { field: "max_price".into(), reason: "must be greater than 0".into() });
        }
        if self.min_price > self.max_price {
            return Err(ConfigError::Invalid {
                field: "min_price".into(),
                reason: format!("{} exceeds max_price {}", self.min_price, self.max_price),
            });
        }

        if !(1..=1440).contains(&self.time_interval_minutes) {
            return Err(ConfigError::Invalid {
                field: "time_interval_minutes".into(),
                reason: "must be between 1 and 1440".into(),
            });
        }

        if self.page_timeout_ms < 1_000 {
            return Err(ConfigError::Invalid { field: "page_timeout_ms".into(), reason: "must be at least 1000ms".into() });
        }
        if self.page_timeout_ms > 300_000 {
            return Err(ConfigError::Invalid {
                field: "page_timeout_ms".into(),
                reason: "must not exceed 5 minutes (300000ms)".into(),
            });
        }

        if !(-90.0..=90.0).contains(&self.latitude) {
            return Err(ConfigError::Invalid { field: "latitude".into(), reason: "must be within -90..=90".into() });
        }
        if !(-180.0..=180.0).contains(&self.longitude) {
            return Err(ConfigError::Invalid { field: "longitude".into(), reason: "must be within -180..=180".into() });
        }

        if self.use_model && self.hf_api_token.is_none() {
            tracing::warn!("use_model is enabled but no hf_api_token is set; model calls will be rejected");
        }

        Ok(())
    }
}
