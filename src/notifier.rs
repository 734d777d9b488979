//! User-facing notifications for order progress.
//!
//! A platform notification facility is used when it is present and allowed;
//! everything else degrades to a blocking alert.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, instrument, warn};

/// Something able to tell the user about an event.
pub trait Notifier: Send + Sync {
    fn notify(&self, title: &str, body: Option<&str>);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    Granted,
    Denied,
    /// Not asked yet.
    Default,
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum NotifyError {
    #[error("Notification rejected by the platform: {0}")]
    Rejected(String),
}

/// Platform notification API (desktop notifications, push bridge...).
#[async_trait]
pub trait NotificationFacility: Send + Sync {
    fn permission(&self) -> Permission;
    async fn request_permission(&self) -> Permission;
    fn show(&self, title: &str, body: Option<&str>) -> Result<(), NotifyError>;
}

/// Modal fallback shown when notifications are unavailable.
pub trait AlertDialog: Send + Sync {
    fn alert(&self, message: &str);
}

/// `title`, or `title` and `body` separated by a blank line.
pub fn alert_text(title: &str, body: Option<&str>) -> String {
    match body {
        Some(body) => format!("{title}\n\n{body}"),
        None => title.to_string(),
    }
}

/// Prints alerts on stdout.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleAlert;

impl AlertDialog for ConsoleAlert {
    fn alert(&self, message: &str) {
        println!("{message}");
    }
}

/// Notifier that prefers the platform facility and falls back to an alert.
#[derive(Clone)]
pub struct SystemNotifier {
    facility: Option<Arc<dyn NotificationFacility>>,
    alert: Arc<dyn AlertDialog>,
}

impl SystemNotifier {
    pub fn new(facility: Option<Arc<dyn NotificationFacility>>, alert: Arc<dyn AlertDialog>) -> Self {
        Self { facility, alert }
    }

    /// No platform facility: every notification becomes an alert.
    pub fn alert_only(alert: Arc<dyn AlertDialog>) -> Self {
        Self::new(None, alert)
    }

    fn show_or_alert(facility: &dyn NotificationFacility, alert: &dyn AlertDialog, title: &str, body: Option<&str>) {
        if let Err(e) = facility.show(title, body) {
            warn!(error = %e, "Notification failed, falling back to alert");
            alert.alert(&alert_text(title, body));
        }
    }
}

impl Notifier for SystemNotifier {
    #[instrument(skip(self, body))]
    fn notify(&self, title: &str, body: Option<&str>) {
        let Some(facility) = &self.facility else {
            self.alert.alert(&alert_text(title, body));
            return;
        };
        match facility.permission() {
            Permission::Granted => Self::show_or_alert(facility.as_ref(), self.alert.as_ref(), title, body),
            Permission::Denied => self.alert.alert(&alert_text(title, body)),
            Permission::Default => {
                let Ok(runtime) = tokio::runtime::Handle::try_current() else {
                    debug!("No runtime to ask for permission");
                    self.alert.alert(&alert_text(title, body));
                    return;
                };
                let facility = facility.clone();
                let alert = self.alert.clone();
                let title = title.to_string();
                let body = body.map(str::to_string);
                runtime.spawn(async move {
                    match facility.request_permission().await {
                        Permission::Granted => {
                            Self::show_or_alert(facility.as_ref(), alert.as_ref(), &title, body.as_deref())
                        }
                        permission => {
                            debug!(?permission, "Notification permission not granted");
                            alert.alert(&alert_text(&title, body.as_deref()));
                        }
                    }
                });
            }
        }
    }
}

/// Sends an operator-composed test notification. Blank fields are treated as absent.
pub fn send_test_notification(notifier: &dyn Notifier, title: &str, body: &str) {
    let title = match title.trim() {
        "" => "Notification",
        t => t,
    };
    let body = Some(body.trim()).filter(|b| !b.is_empty());
    notifier.notify(title, body);
}

#[cfg(test)]
pub use testing::RecordingNotifier;
