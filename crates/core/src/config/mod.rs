//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (DEALWATCH_*)
//! 2. Config file (if DEALWATCH_CONFIG_FILE set): `.json` or TOML
//! 3. Built-in defaults

use std::path::{Path, PathBuf};
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Json, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

mod legacy;
mod validation;

pub use validation::ConfigError;

use legacy::LegacyFileConfig;

/// Watcher configuration, loaded once at startup and never mutated.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (DEALWATCH_*)
/// 2. Config file (if DEALWATCH_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Keyword searched for and required in listing names or descriptions.
    #[serde(default)]
    pub search_keyword: String,

    /// Terms that disqualify a listing when found in its name or description.
    #[serde(default)]
    pub blacklist_keywords: Vec<String>,

    /// Lower bound of the marketplace price filter, in whole currency units.
    #[serde(default)]
    pub min_price: u32,

    /// Upper bound of the marketplace price filter, in whole currency units.
    #[serde(default = "default_max_price")]
    pub max_price: u32,

    /// Only return listings that can be shipped.
    #[serde(default)]
    pub shipping: bool,

    /// Marketplace category filter.
    #[serde(default)]
    pub category_ids: Vec<u32>,

    /// Marketplace object-type filter.
    #[serde(default)]
    pub object_type_ids: Vec<u32>,

    /// Minutes between two scrape cycles.
    #[serde(default = "default_interval_minutes")]
    pub time_interval_minutes: u64,

    /// Use the zero-shot model instead of substring heuristics.
    #[serde(default)]
    pub use_model: bool,

    /// Search origin latitude.
    #[serde(default = "default_latitude")]
    pub latitude: f64,

    /// Search origin longitude.
    #[serde(default = "default_longitude")]
    pub longitude: f64,

    /// Path of the JSON validity cache.
    #[serde(default = "default_cache_path")]
    pub cache_path: PathBuf,

    /// Path of the JSON results file rewritten every cycle.
    #[serde(default = "default_results_path")]
    pub results_path: PathBuf,

    /// Pause before each description fetch, in milliseconds.
    #[serde(default = "default_description_delay_ms")]
    pub description_delay_ms: u64,

    /// Pause between two lazy-load scroll steps, in milliseconds.
    #[serde(default = "default_scroll_pause_ms")]
    pub scroll_pause_ms: u64,

    /// Upper bound for a single page navigation or selector wait, in milliseconds.
    #[serde(default = "default_page_timeout_ms")]
    pub page_timeout_ms: u64,

    /// Run the browser without a window.
    #[serde(default = "default_true")]
    pub headless: bool,

    /// Hosted zero-shot classification model.
    #[serde(default = "default_model_id")]
    pub model_id: String,

    /// Inference API token.
    ///
    /// Set via DEALWATCH_HF_API_TOKEN environment variable.
    /// Required only when `use_model` is enabled.
    #[serde(default)]
    pub hf_api_token: Option<String>,

    /// Optional webhook that receives new-listing notifications as JSON.
    #[serde(default)]
    pub webhook_url: Option<String>,

    /// Show a desktop popup for each new listing; clicking it opens the listing.
    #[serde(default = "default_true")]
    pub desktop_notifications: bool,

    /// Image shown in desktop popups.
    #[serde(default)]
    pub notification_icon: Option<PathBuf>,
}

fn default_max_price() -> u32 {
    10_000
}

fn default_interval_minutes() -> u64 {
    5
}

fn default_latitude() -> f64 {
    43.3602825
}

fn default_longitude() -> f64 {
    -5.8447919
}

fn default_cache_path() -> PathBuf {
    PathBuf::from("./cache.json")
}

fn default_results_path() -> PathBuf {
    PathBuf::from("./results.json")
}

fn default_description_delay_ms() -> u64 {
    250
}

fn default_scroll_pause_ms() -> u64 {
    1_500
}

fn default_page_timeout_ms() -> u64 {
    30_000
}

fn default_true() -> bool {
    true
}

fn default_model_id() -> String {
    "facebook/bart-large-mnli".into()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            search_keyword: String::new(),
            blacklist_keywords: Vec::new(),
            min_price: 0,
            max_price: default_max_price(),
            shipping: false,
            category_ids: Vec::new(),
            object_type_ids: Vec::new(),
            time_interval_minutes: default_interval_minutes(),
            use_model: false,
            latitude: default_latitude(),
            longitude: default_longitude(),
            cache_path: default_cache_path(),
            results_path: default_results_path(),
            description_delay_ms: default_description_delay_ms(),
            scroll_pause_ms: default_scroll_pause_ms(),
            page_timeout_ms: default_page_timeout_ms(),
            headless: true,
            model_id: default_model_id(),
            hf_api_token: None,
            webhook_url: None,
            desktop_notifications: true,
            notification_icon: None,
        }
    }
}

impl AppConfig {
    /// Time between two cycles.
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.time_interval_minutes * 60)
    }

    /// Page navigation timeout as Duration.
    pub fn page_timeout(&self) -> Duration {
        Duration::from_millis(self.page_timeout_ms)
    }

    pub fn description_delay(&self) -> Duration {
        Duration::from_millis(self.description_delay_ms)
    }

    pub fn scroll_pause(&self) -> Duration {
        Duration::from_millis(self.scroll_pause_ms)
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// Priority (highest wins):
    /// 1. Environment variables prefixed with `DEALWATCH_`
    /// 2. File from `DEALWATCH_CONFIG_FILE` (if set)
    /// 3. Built-in defaults via `Default::default()`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        let file = std::env::var("DEALWATCH_CONFIG_FILE").ok().map(PathBuf::from);
        let config = Self::figment(file.as_deref())?
            .merge(
                Env::prefixed("DEALWATCH_")
                    .ignore(&["config_file", "log_json"])
                    .map(|key| key.as_str().to_lowercase().into())
                    .split("__"),
            )
            .extract::<Self>()
            .map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }

    /// Load configuration from a single file on top of the defaults, ignoring the environment.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let config: Self = Self::figment(Some(path))?
            .extract()
            .map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }

    fn figment(file: Option<&Path>) -> Result<Figment, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(path) = file {
            let is_json = path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
            if is_json {
                let overlay: LegacyFileConfig = Figment::from(Json::file(path))
                    .extract()
                    .map_err(|e| ConfigError::LoadFailed(format!("{}: {e}", path.display())))?;
                figment = figment.merge(Serialized::defaults(overlay));
            } else {
                figment = figment.merge(Toml::file(path));
            }
        }

        Ok(figment)
    }

    /// Check if the inference token is available (for deferred validation).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Missing` if the token is not set.
    pub fn require_hf_api_token(&self) -> Result<&str, ConfigError> {
        self.hf_api_token
            .as_deref()
            .filter(|token| !token.trim().is_empty())
            .ok_or_else(|| ConfigError::Missing {
                field: "hf_api_token".into(),
                hint: "Set DEALWATCH_HF_API_TOKEN or disable use_model".into(),
            })
    }
}
