/// User-facing notifications for the outcome of an action
use std::sync::Mutex;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: Level,
    pub message: String,
}

/// Receives one notification per finished user action.
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);

    fn success(&self, message: &str) {
        self.notify(Notification {
            level: Level::Success,
            message: message.to_string(),
        });
    }

    fn error(&self, message: &str) {
        self.notify(Notification {
            level: Level::Error,
            message: message.to_string(),
        });
    }
}

/// Writes each notification to stderr once. The log only gets a debug record.
#[derive(Debug, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, notification: Notification) {
        match notification.level {
            Level::Success => {
                debug!(message = %notification.message, "Action succeeded");
                eprintln!("✔ {}", notification.message);
            }
            Level::Error => {
                debug!(message = %notification.message, "Action failed");
                eprintln!("✘ {}", notification.message);
            }
        }
    }
}

/// Keeps every notification in memory.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    seen: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn all(&self) -> Vec<Notification> {
        self.seen.lock().map(|v| v.clone()).unwrap_or_default()
    }

    pub fn errors(&self) -> Vec<Notification> {
        self.all()
            .into_iter()
            .filter(|n| n.level == Level::Error)
            .collect()
    }

    pub fn successes(&self) -> Vec<Notification> {
        self.all()
            .into_iter()
            .filter(|n| n.level == Level::Success)
            .collect()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        if let Ok(mut seen) = self.seen.lock() {
            seen.push(notification);
        }
    }
}
