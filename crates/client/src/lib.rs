//! Client code for dealwatch.
//!
//! This crate provides the marketplace-facing collaborators of the core
//! pipeline: search URL construction, HTML scraping, the headless browser
//! session, the hosted zero-shot model and notification backends (log,
//! desktop popup, webhook).

pub mod notify;
pub mod scrape;
pub mod search_url;
pub mod zeroshot;

#[cfg(feature = "render")]
pub mod browser;

#[cfg(test)]
pub(crate) mod test_server;

#[cfg(feature = "render")]
pub use browser::{BrowserError, BrowserOptions, BrowserSession};
#[cfg(feature = "desktop")]
pub use notify::DesktopNotifier;
pub use notify::{FanoutNotifier, LogNotifier, WebhookNotifier, build_notifier};
pub use scrape::{parse_description, parse_listings};
pub use search_url::{UrlError, build_search_url};
pub use zeroshot::{HfConfig, HfZeroShotClient, ZeroShotError};
