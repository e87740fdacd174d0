//! Notification backends for new-listing events.
//!
//! The daemon builds one notifier at startup with [`build_notifier`]; the
//! watch session owns it for the life of the process.

#[cfg(feature = "desktop")]
pub mod desktop;
pub mod log;
pub mod webhook;

#[cfg(feature = "desktop")]
pub use desktop::DesktopNotifier;
pub use log::LogNotifier;
pub use webhook::WebhookNotifier;

use std::sync::Arc;

use dealwatch_core::{AppConfig, Error, NewListingEvent, Notifier};

/// Delivers each event to every backend in turn.
///
/// A failing backend is logged and does not stop the others; the fan-out
/// itself only fails when every backend did.
pub struct FanoutNotifier {
    backends: Vec<Box<dyn Notifier>>,
}

impl FanoutNotifier {
    pub fn new(backends: Vec<Box<dyn Notifier>>) -> Self {
        Self { backends }
    }

    pub fn len(&self) -> usize {
        self.backends.len()
    }

    pub fn is_empty(&self) -> bool {
        self.backends.is_empty()
    }
}

#[async_trait::async_trait]
impl Notifier for FanoutNotifier {
    async fn notify(&self, event: &NewListingEvent) -> Result<(), Error> {
        let mut failures = 0;
        for backend in &self.backends {
            if let Err(e) = backend.notify(event).await {
                tracing::warn!(error = %e, url = %event.url, "notification backend failed");
                failures += 1;
            }
        }

        if failures > 0 && failures == self.backends.len() {
            return Err(Error::Notify(format!("all {failures} backends failed")));
        }
        Ok(())
    }
}

/// Build the notifier described by `config`.
///
/// Called once at startup; the session keeps the result for its lifetime.
pub fn build_notifier(config: &AppConfig) -> Result<Arc<dyn Notifier>, Error> {
    Ok(Arc::new(build_fanout(config)?))
}

/// Always logs; adds the desktop popup unless disabled and the webhook when
/// one is configured.
pub fn build_fanout(config: &AppConfig) -> Result<FanoutNotifier, Error> {
    let mut backends: Vec<Box<dyn Notifier>> = vec![Box::new(LogNotifier)];

    if config.desktop_notifications {
        #[cfg(feature = "desktop")]
        {
            backends.push(Box::new(DesktopNotifier::new(config.notification_icon.clone())));
            tracing::info!("desktop notifications enabled");
        }
        #[cfg(not(feature = "desktop"))]
        tracing::warn!("desktop notifications requested but built without the desktop feature");
    }

    if let Some(url) = config.webhook_url.as_deref().filter(|u| !u.trim().is_empty()) {
        backends.push(Box::new(WebhookNotifier::new(url)?));
        tracing::info!("webhook notifications enabled");
    }

    Ok(FanoutNotifier::new(backends))
}
