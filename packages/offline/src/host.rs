//! OS notification seam.

use crate::GatewayError;

/// Display options of a system notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationOptions {
    /// Body text.
    pub body: String,
    /// Icon asset path.
    pub icon: String,
    /// Badge asset path.
    pub badge: String,
    /// Vibration pattern in milliseconds.
    pub vibrate: Vec<u32>,
    /// Window to open on click.
    pub url: String,
}

/// A notification handed to the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayedNotification {
    /// Host-visible identifier.
    pub id: String,
    /// Title line.
    pub title: String,
    /// Display options.
    pub options: NotificationOptions,
}

/// The platform that actually shows notifications and opens windows.
pub trait NotificationHost: Send + Sync {
    /// Shows a notification.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Host`] if the platform refuses.
    fn show_notification(&self, notification: &DisplayedNotification) -> Result<(), GatewayError>;

    /// Opens `url` in a client window.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Host`] if no window can be opened.
    fn open_window(&self, url: &str) -> Result<(), GatewayError>;

    /// Dismisses a displayed notification.
    fn close(&self, id: &str);
}

/// Host that only logs. Used by the headless server.
pub struct LogHost;

impl NotificationHost for LogHost {
    fn show_notification(&self, notification: &DisplayedNotification) -> Result<(), GatewayError> {
        log::info!(
            "[notification {}] {}: {}",
            notification.id,
            notification.title,
            notification.options.body
        );
        Ok(())
    }

    fn open_window(&self, url: &str) -> Result<(), GatewayError> {
        log::info!("Opening window at {url}");
        Ok(())
    }

    fn close(&self, id: &str) {
        log::debug!("Closed notification {id}");
    }
}
