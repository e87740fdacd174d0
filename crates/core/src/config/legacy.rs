//! JSON config files written for the first version of the watcher.
//!
//! Those files use camelCase keys (`searchKeyword`, `useIA`, ...). They are
//! decoded here and re-emitted with the snake_case names `AppConfig` uses, so
//! only the keys actually present override the defaults.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Deserialize, Serialize)]
pub(super) struct LegacyFileConfig {
    #[serde(alias = "searchKeyword", skip_serializing_if = "Option::is_none")]
    search_keyword: Option<String>,
    #[serde(alias = "blackListKeywords", skip_serializing_if = "Option::is_none")]
    blacklist_keywords: Option<Vec<String>>,
    #[serde(alias = "minPrice", skip_serializing_if = "Option::is_none")]
    min_price: Option<u32>,
    #[serde(alias = "maxPrice", skip_serializing_if = "Option::is_none")]
    max_price: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    shipping: Option<bool>,
    #[serde(alias = "categoryIds", skip_serializing_if = "Option::is_none")]
    category_ids: Option<Vec<u32>>,
    #[serde(alias = "objectTypeIds", skip_serializing_if = "Option::is_none")]
    object_type_ids: Option<Vec<u32>>,
    #[serde(alias = "timeIntervalMinutes", skip_serializing_if = "Option::is_none")]
    time_interval_minutes: Option<u64>,
    #[serde(alias = "useIA", skip_serializing_if = "Option::is_none")]
    use_model: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    latitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    longitude: Option<f64>,
    #[serde(alias = "cachePath", skip_serializing_if = "Option::is_none")]
    cache_path: Option<PathBuf>,
    #[serde(alias = "resultsPath", skip_serializing_if = "Option::is_none")]
    results_path: Option<PathBuf>,
    #[serde(alias = "descriptionDelayMs", skip_serializing_if = "Option::is_none")]
    description_delay_ms: Option<u64>,
    #[serde(alias = "scrollPauseMs", skip_serializing_if = "Option::is_none")]
    scroll_pause_ms: Option<u64>,
    #[serde(alias = "pageTimeoutMs", skip_serializing_if = "Option::is_none")]
    page_timeout_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    headless: Option<bool>,
    #[serde(alias = "modelId", skip_serializing_if = "Option::is_none")]
    model_id: Option<String>,
    #[serde(alias = "hfApiToken", skip_serializing_if = "Option::is_none")]
    hf_api_token: Option<String>,
    #[serde(alias = "webhookUrl", skip_serializing_if = "Option::is_none")]
    webhook_url: Option<String>,
    #[serde(alias = "desktopNotifications", skip_serializing_if = "Option::is_none")]
    desktop_notifications: Option<bool>,
    #[serde(alias = "notificationIcon", skip_serializing_if = "Option::is_none")]
    notification_icon: Option<PathBuf>,
}
