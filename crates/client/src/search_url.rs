//! Marketplace search URL construction.
//!
//! The resulting URL doubles as the validity cache's staleness key, so the
//! parameter order is fixed and must not depend on anything but the config.

use dealwatch_core::AppConfig;
use url::Url;

/// Search page of the marketplace.
pub const DEFAULT_SEARCH_BASE: &str = "https://es.wallapop.com/app/search";

/// Error type for search URL construction failures.
#[derive(Debug, Clone, thiserror::Error)]
pub enum UrlError {
    #[error("empty search keyword")]
    EmptyKeyword,

    #[error("unsupported scheme: {0}")]
    UnsupportedScheme(String),

    #[error("invalid URL: {0}")]
    InvalidUrl(String),
}

/// Build the newest-first search URL for `config` on the default marketplace.
pub fn build_search_url(config: &AppConfig) -> Result<Url, UrlError> {
    build_search_url_with_base(DEFAULT_SEARCH_BASE, config)
}

/// Build the search URL against an arbitrary base.
///
/// Query parameters, in order:
/// 1. `min_sale_price`, `max_sale_price`
/// 2. `shipping=true` when shipping is required
/// 3. `category_ids`, `object_type_ids` (comma-joined, omitted when empty)
/// 4. `filters_source=default_filters`, `keywords`
/// 5. `latitude`, `longitude`, `order_by=newest`
pub fn build_search_url_with_base(base: &str, config: &AppConfig) -> Result<Url, UrlError> {
    let keyword = config.search_keyword.trim();
    if keyword.is_empty() {
        return Err(UrlError::EmptyKeyword);
    }

    let mut url = Url::parse(base.trim()).map_err(|e| UrlError::InvalidUrl(e.to_string()))?;
    match url.scheme() {
        "http" | "https" => {}
        scheme => return Err(UrlError::UnsupportedScheme(scheme.to_string())),
    }
    url.set_fragment(None);
    url.set_query(None);

    {
        let mut query = url.query_pairs_mut();
        query.append_pair("min_sale_price", &config.min_price.to_string());
        query.append_pair("max_sale_price", &config.max_price.to_string());
        if config.shipping {
            query.append_pair("shipping", "true");
        }
        if !config.category_ids.is_empty() {
            query.append_pair("category_ids", &join_ids(&config.category_ids));
        }
        if !config.object_type_ids.is_empty() {
            query.append_pair("object_type_ids", &join_ids(&config.object_type_ids));
        }
        query.append_pair("filters_source", "default_filters");
        query.append_pair("keywords", keyword);
        query.append_pair("latitude", &config.latitude.to_string());
        query.append_pair("longitude", &config.longitude.to_string());
        query.append_pair("order_by", "newest");
    }

    Ok(url)
}

fn join_ids(ids: &[u32]) -> String {
    ids.iter().map(u32::to_string).collect::<Vec<_>>().join(",")
}
