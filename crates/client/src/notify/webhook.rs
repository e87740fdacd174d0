//! Incoming-webhook notification backend.

use std::time::Duration;

use dealwatch_core::{Error, NewListingEvent, Notifier};
use serde_json::json;
use url::Url;

const WEBHOOK_TIMEOUT: Duration = Duration::from_secs(10);

/// Posts each event as JSON to a chat or automation webhook.
///
/// The payload carries a ready-made `text` line plus the raw event fields.
pub struct WebhookNotifier {
    webhook_url: Url,
    http: reqwest::Client,
}

impl WebhookNotifier {
    pub fn new(webhook_url: &str) -> Result<Self, Error> {
        let webhook_url =
            Url::parse(webhook_url.trim()).map_err(|e| Error::InvalidInput(format!("webhook url: {e}")))?;
        if !matches!(webhook_url.scheme(), "http" | "https") {
            return Err(Error::InvalidInput(format!("webhook url: unsupported scheme {}", webhook_url.scheme())));
        }

        let http = reqwest::Client::builder()
            .timeout(WEBHOOK_TIMEOUT)
            .build()
            .map_err(|e| Error::Notify(e.to_string()))?;

        Ok(Self { webhook_url, http })
    }

    pub fn payload(event: &NewListingEvent) -> serde_json::Value {
        json!({
            "text": format!("{}: {}\n{}", event.title, event.message(), event.url),
            "title": event.title,
            "name": event.name,
            "price": event.price,
            "url": event.url,
            "totalItems": event.total_items,
        })
    }
}

#[async_trait::async_trait]
impl Notifier for WebhookNotifier {
    async fn notify(&self, event: &NewListingEvent) -> Result<(), Error> {
        let resp = self
            .http
            .post(self.webhook_url.clone())
            .json(&Self::payload(event))
            .send()
            .await
            .map_err(|e| Error::Notify(e.to_string()))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            tracing::warn!(status = %status, body = %body, "webhook returned non-success");
            return Err(Error::HttpError(format!("webhook returned {status}")));
        }

        Ok(())
    }
}
