//! dealwatch daemon entry point.
//!
//! Loads configuration once, then runs a watch cycle immediately and every
//! configured interval until interrupted. Logs go to stderr.

use std::sync::Arc;

use anyhow::{Context, Result};
use dealwatch_client::{BrowserOptions, HfZeroShotClient, build_notifier, build_search_url};
use dealwatch_core::{AppConfig, Classifier, Strategy, ValidityCache, WatchSession};
use tokio::time::MissedTickBehavior;
use tracing_subscriber::EnvFilter;

mod watcher;

use watcher::{ChromeLauncher, Watcher};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr);

    if std::env::var_os("DEALWATCH_LOG_JSON").is_some() {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn build_strategy(config: &AppConfig) -> Result<Strategy> {
    if !config.use_model {
        return Ok(Strategy::Heuristic);
    }
    let client = HfZeroShotClient::from_app_config(config).context("zero-shot classifier unavailable")?;
    tracing::info!(model = %config.model_id, "using zero-shot model");
    Ok(Strategy::Model(Arc::new(client)))
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let config = AppConfig::load().context("failed to load configuration")?;
    let search_url = build_search_url(&config)?;
    tracing::info!(keyword = %config.search_keyword, url = %search_url, "starting dealwatch");

    let cache = ValidityCache::open(&config.cache_path, search_url.as_str())?;
    tracing::info!(entries = cache.len(), outcome = ?cache.outcome(), "validity cache ready");

    let classifier = Classifier::new(&config.search_keyword, &config.blacklist_keywords, build_strategy(&config)?)
        .with_fetch_delay(config.description_delay());
    let session = WatchSession::new(classifier, cache, build_notifier(&config)?);

    let launcher = ChromeLauncher::new(BrowserOptions {
        headless: config.headless,
        page_timeout: config.page_timeout(),
        scroll_pause: config.scroll_pause(),
        ..Default::default()
    });
    let mut watcher = Watcher::new(search_url.as_str(), config.results_path.clone(), session, launcher);

    let interval = config.interval();
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let run = async {
        loop {
            ticker.tick().await;
            watcher.tick(interval).await;
        }
    };

    tokio::select! {
        _ = run => {}
        res = tokio::signal::ctrl_c() => {
            res.context("failed to listen for shutdown signal")?;
            tracing::info!("shutting down");
        }
    }

    Ok(())
}
