use std::sync::Mutex;
use tracing::{error, info, warn};

pub const DEFAULT_TOAST_TIMEOUT_MS: u64 = 3000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub message: String,
    pub severity: Severity,
    pub timeout_ms: u64,
}

/// Fire-and-forget user-facing notification surface. The core never awaits a
/// notification and never treats one as fallible.
pub trait Notifier: Send + Sync {
    fn notify(&self, message: &str, severity: Severity, timeout_ms: u64);
}

impl<N: Notifier + ?Sized> Notifier for std::sync::Arc<N> {
    fn notify(&self, message: &str, severity: Severity, timeout_ms: u64) {
        (**self).notify(message, severity, timeout_ms);
    }
}

/// Collects notifications in memory; the presentation layer drains them, and
/// tests assert on them.
#[derive(Debug, Default)]
pub struct MemoryNotifier {
    entries: Mutex<Vec<Notification>>,
}

impl MemoryNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn take(&self) -> Vec<Notification> {
        std::mem::take(&mut self.entries.lock().expect("notifier mutex poisoned"))
    }

    pub fn messages(&self) -> Vec<String> {
        self.entries
            .lock()
            .expect("notifier mutex poisoned")
            .iter()
            .map(|entry| entry.message.clone())
            .collect()
    }
}

impl Notifier for MemoryNotifier {
    fn notify(&self, message: &str, severity: Severity, timeout_ms: u64) {
        self.entries
            .lock()
            .expect("notifier mutex poisoned")
            .push(Notification {
                message: message.to_string(),
                severity,
                timeout_ms,
            });
    }
}

/// Routes notifications to the tracing output; used by the binaries where
/// there is no toast layer.
#[derive(Debug, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, message: &str, severity: Severity, _timeout_ms: u64) {
        match severity {
            Severity::Info => info!("{message}"),
            Severity::Warning => warn!("{message}"),
            Severity::Error => error!("{message}"),
        }
    }
}
