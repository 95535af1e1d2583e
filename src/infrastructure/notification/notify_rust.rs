//! Desktop notifications through notify-rust

use async_trait::async_trait;
use notify_rust::{Notification, Timeout};

use crate::application::ports::{NotificationError, NotificationIcon, Notifier};

const APP_NAME: &str = "screen-rec";

/// Recording started / stopped
const TRANSIENT_TIMEOUT_MS: u32 = 3000;

/// Failures and forced kills stay up longer
const ATTENTION_TIMEOUT_MS: u32 = 10_000;

fn timeout_for(icon: NotificationIcon) -> Timeout {
    match icon {
        NotificationIcon::Warning | NotificationIcon::Error => {
            Timeout::Milliseconds(ATTENTION_TIMEOUT_MS)
        }
        NotificationIcon::Info | NotificationIcon::Recording | NotificationIcon::Stopped => {
            Timeout::Milliseconds(TRANSIENT_TIMEOUT_MS)
        }
    }
}

#[cfg(all(unix, not(target_os = "macos")))]
fn mark_urgency(notification: &mut Notification, icon: NotificationIcon) {
    if icon == NotificationIcon::Error {
        notification.urgency(notify_rust::Urgency::Critical);
    }
}

#[cfg(not(all(unix, not(target_os = "macos"))))]
fn mark_urgency(_notification: &mut Notification, _icon: NotificationIcon) {}

fn build_notification(title: &str, message: &str, icon: NotificationIcon) -> Notification {
    let mut notification = Notification::new();
    notification
        .appname(APP_NAME)
        .summary(title)
        .body(message)
        .icon(icon.icon_name())
        .timeout(timeout_for(icon));
    mark_urgency(&mut notification, icon);
    notification
}

/// Notifier backed by the desktop notification service
#[derive(Debug, Default)]
pub struct NotifyRustNotifier;

impl NotifyRustNotifier {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Notifier for NotifyRustNotifier {
    async fn notify(
        &self,
        title: &str,
        message: &str,
        icon: NotificationIcon,
    ) -> Result<(), NotificationError> {
        let notification = build_notification(title, message, icon);

        // Talking to the notification daemon blocks
        tokio::task::spawn_blocking(move || {
            notification
                .show()
                .map(|_| ())
                .map_err(|e| NotificationError::SendFailed(e.to_string()))
        })
        .await
        .map_err(|e| NotificationError::SendFailed(format!("Task join error: {}", e)))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_changes_are_transient() {
        assert_eq!(
            timeout_for(NotificationIcon::Recording),
            Timeout::Milliseconds(TRANSIENT_TIMEOUT_MS)
        );
        assert_eq!(
            timeout_for(NotificationIcon::Stopped),
            Timeout::Milliseconds(TRANSIENT_TIMEOUT_MS)
        );
    }

    #[test]
    fn problems_stay_up_longer() {
        assert_eq!(
            timeout_for(NotificationIcon::Warning),
            Timeout::Milliseconds(ATTENTION_TIMEOUT_MS)
        );
        assert_eq!(
            timeout_for(NotificationIcon::Error),
            Timeout::Milliseconds(ATTENTION_TIMEOUT_MS)
        );
    }

    #[test]
    fn notification_carries_title_body_and_icon() {
        let notification = build_notification(
            "Recording started",
            "/tmp/screen-rec-1.mp4",
            NotificationIcon::Recording,
        );
        assert_eq!(notification.appname, APP_NAME);
        assert_eq!(notification.summary, "Recording started");
        assert_eq!(notification.body, "/tmp/screen-rec-1.mp4");
        assert_eq!(notification.icon, "media-record");
    }
}
