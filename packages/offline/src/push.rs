//! Push payload parsing and display options.

use serde::{Deserialize, Serialize};

use crate::GatewayError;
use crate::host::{DisplayedNotification, NotificationOptions};

/// Icon shown on every push notification.
pub const PUSH_ICON: &str = "assets/icons/icon-192.png";

/// Badge shown on every push notification.
pub const PUSH_BADGE: &str = "assets/icons/badge.png";

/// Vibration pattern of every push notification.
pub const PUSH_VIBRATE: [u32; 3] = [100, 50, 100];

/// Window opened on click when the payload has no `url`.
pub const DEFAULT_PUSH_URL: &str = "/";

/// Body of a push message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PushPayload {
    /// Title line.
    pub title: String,
    /// Body text.
    pub body: String,
    /// Window to open on click.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl PushPayload {
    /// Parses a JSON push body.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::InvalidPushPayload`] if the bytes are not a
    /// `{title, body, url?}` object.
    pub fn parse(bytes: &[u8]) -> Result<Self, GatewayError> {
        Ok(serde_json::from_slice(bytes)?)
    }

    /// Builds the notification to display, with a fresh id.
    #[must_use]
    pub fn into_notification(self) -> DisplayedNotification {
        DisplayedNotification {
            id: uuid::Uuid::new_v4().to_string(),
            title: self.title,
            options: NotificationOptions {
                body: self.body,
                icon: PUSH_ICON.to_string(),
                badge: PUSH_BADGE.to_string(),
                vibrate: PUSH_VIBRATE.to_vec(),
                url: self.url.unwrap_or_else(|| DEFAULT_PUSH_URL.to_string()),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_url_defaults_to_root() {
        let payload = PushPayload::parse(br#"{"title":"t","body":"b"}"#).unwrap();
        let notification = payload.into_notification();
        assert_eq!(notification.options.url, "/");
        assert_eq!(notification.options.icon, PUSH_ICON);
        assert_eq!(notification.options.vibrate, [100, 50, 100]);
    }

    #[test]
    fn explicit_url_is_kept() {
        let payload =
            PushPayload::parse(br#"{"title":"t","body":"b","url":"/alerts"}"#).unwrap();
        assert_eq!(payload.into_notification().options.url, "/alerts");
    }

    #[test]
    fn missing_title_is_rejected() {
        assert!(matches!(
            PushPayload::parse(br#"{"body":"b"}"#),
            Err(GatewayError::InvalidPushPayload(_))
        ));
    }

    #[test]
    fn ids_are_unique() {
        let payload = PushPayload {
            title: "t".to_string(),
            body: "b".to_string(),
            url: None,
        };
        assert_ne!(
            payload.clone().into_notification().id,
            payload.into_notification().id
        );
    }
}
