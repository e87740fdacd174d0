//! Log-line notification backend.

use dealwatch_core::{Error, NewListingEvent, Notifier};

/// Writes each event as a structured log line.
///
/// The `link` field renders as `name - url` so terminals that linkify URLs
/// make it clickable.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl LogNotifier {
    pub fn link(event: &NewListingEvent) -> String {
        format!("({} - {})", event.name, event.url)
    }
}

#[async_trait::async_trait]
impl Notifier for LogNotifier {
    async fn notify(&self, event: &NewListingEvent) -> Result<(), Error> {
        tracing::info!(
            title = %event.title,
            total_items = event.total_items,
            link = %Self::link(event),
            "{}",
            event.message()
        );
        Ok(())
    }
}
