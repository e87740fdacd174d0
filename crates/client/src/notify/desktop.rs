//! Desktop popup notifications.
//!
//! Each popup carries a default action; clicking the popup opens the listing
//! in the system browser. Click reporting depends on the notification server
//! (XDG desktops report it, other platforms only show the popup).

use std::path::PathBuf;

use dealwatch_core::{Error, NewListingEvent, Notifier};
use notify_rust::Notification;
use tokio::sync::oneshot;

const APP_NAME: &str = "dealwatch";

/// Action id XDG servers report when the popup body is clicked.
pub const DEFAULT_ACTION: &str = "default";

pub struct DesktopNotifier {
    icon: Option<PathBuf>,
}

impl DesktopNotifier {
    pub fn new(icon: Option<PathBuf>) -> Self {
        Self { icon }
    }

    /// Popup for `event`: title, `name | Price: price` body, optional icon.
    pub fn notification(&self, event: &NewListingEvent) -> Notification {
        let mut notification = Notification::new();
        notification
            .appname(APP_NAME)
            .summary(&event.title)
            .body(&event.message())
            .action(DEFAULT_ACTION, "Open listing");
        if let Some(icon) = &self.icon {
            notification.icon(&icon.to_string_lossy());
        }
        notification
    }
}

#[async_trait::async_trait]
impl Notifier for DesktopNotifier {
    /// Resolves once the popup is shown. The click is awaited on a detached
    /// thread so an unanswered popup never holds up the cycle.
    async fn notify(&self, event: &NewListingEvent) -> Result<(), Error> {
        let notification = self.notification(event);
        let url = event.url.clone();
        let (shown_tx, shown_rx) = oneshot::channel();

        std::thread::Builder::new()
            .name("desktop-notify".into())
            .spawn(move || show_and_wait(notification, url, shown_tx))
            .map_err(|e| Error::Notify(format!("desktop notification thread: {e}")))?;

        shown_rx
            .await
            .map_err(|_| Error::Notify("desktop notification thread ended early".into()))?
    }
}

#[cfg(all(unix, not(target_os = "macos")))]
fn show_and_wait(notification: Notification, url: String, shown: oneshot::Sender<Result<(), Error>>) {
    match notification.show() {
        Ok(handle) => {
            shown.send(Ok(())).ok();
            handle.wait_for_action(|action| {
                if action == DEFAULT_ACTION {
                    open_listing(&url);
                }
            });
        }
        Err(e) => {
            shown.send(Err(Error::Notify(e.to_string()))).ok();
        }
    }
}

#[cfg(not(all(unix, not(target_os = "macos"))))]
fn show_and_wait(notification: Notification, _url: String, shown: oneshot::Sender<Result<(), Error>>) {
    let result = notification.show().map(|_| ()).map_err(|e| Error::Notify(e.to_string()));
    shown.send(result).ok();
}

fn open_listing(url: &str) {
    tracing::info!(url, "opening listing");
    if let Err(e) = opener::open_browser(url) {
        tracing::warn!(error = %e, url, "could not open listing");
    }
}
