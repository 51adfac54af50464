use std::time::{Duration, Instant};

use tracing::{error, info, warn};

pub const TOAST_DURATION: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Error,
    Warning,
    Info,
}

impl Severity {
    pub fn css_class(self) -> &'static str {
        match self {
            Severity::Success => "success",
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Info => "info",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub message: String,
    pub severity: Severity,
    pub shown_at: Instant,
}

impl Toast {
    pub fn is_visible(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.shown_at) < TOAST_DURATION
    }
}

/// Single toast slot; a new toast replaces whatever was showing.
#[derive(Debug, Clone, Default)]
pub struct Notifier {
    last: Option<Toast>,
}

impl Notifier {
    pub fn show(&mut self, message: impl Into<String>, severity: Severity) {
        self.show_at(message, severity, Instant::now());
    }

    pub fn show_at(&mut self, message: impl Into<String>, severity: Severity, now: Instant) {
        let message = message.into();
        match severity {
            Severity::Error => error!(%message, "toast"),
            Severity::Warning => warn!(%message, "toast"),
            _ => info!(%message, "toast"),
        }
        self.last = Some(Toast {
            message,
            severity,
            shown_at: now,
        });
    }

    /// The toast still on screen at `now`.
    pub fn current(&self, now: Instant) -> Option<&Toast> {
        self.last.as_ref().filter(|t| t.is_visible(now))
    }

    /// Most recent toast regardless of age.
    pub fn last(&self) -> Option<&Toast> {
        self.last.as_ref()
    }
}
