//! Transient user-facing status messages
//!
//! One message at a time. A new message replaces the current one and
//! restarts the auto-hide deadline (last call wins, nothing queues).
//! The deadline is polled via `tick(now)` like every other UI timer.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// How many past messages `history()` keeps
const HISTORY_LIMIT: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Error,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Error => "error",
        }
    }
}

/// A message waiting to be shown (produced by components that do not own the center)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub message: String,
    pub severity: Severity,
    /// `None` = the center's default duration
    pub duration: Option<Duration>,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            severity: Severity::Info,
            duration: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            severity: Severity::Error,
            duration: None,
        }
    }

    pub fn lasting(mut self, duration: Duration) -> Self {
        self.duration = Some(duration);
        self
    }
}

/// A message that has been shown
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub severity: Severity,
    pub shown_at: Instant,
    pub hide_at: Instant,
}

#[derive(Debug, Clone)]
pub struct NotificationCenter {
    default_duration: Duration,
    current: Option<Notification>,
    history: VecDeque<Notification>,
}

impl Default for NotificationCenter {
    fn default() -> Self {
        Self::new(Duration::from_millis(3200))
    }
}

impl NotificationCenter {
    pub fn new(default_duration: Duration) -> Self {
        Self {
            default_duration,
            current: None,
            history: VecDeque::new(),
        }
    }

    /// Show `message` now for the default duration
    pub fn notify(&mut self, message: impl Into<String>, severity: Severity) {
        self.notify_at(message, severity, self.default_duration, Instant::now());
    }

    /// Show a notice now
    pub fn push(&mut self, notice: Notice) {
        let duration = notice.duration.unwrap_or(self.default_duration);
        self.notify_at(notice.message, notice.severity, duration, Instant::now());
    }

    /// Show `message` as of `now`, hiding it at `now + duration` unless replaced
    pub fn notify_at(
        &mut self,
        message: impl Into<String>,
        severity: Severity,
        duration: Duration,
        now: Instant,
    ) {
        let notification = Notification {
            message: message.into(),
            severity,
            shown_at: now,
            hide_at: now + duration,
        };
        match severity {
            Severity::Info => tracing::info!(text = %notification.message, "notification"),
            Severity::Error => tracing::warn!(text = %notification.message, "notification"),
        }

        if self.history.len() == HISTORY_LIMIT {
            self.history.pop_front();
        }
        self.history.push_back(notification.clone());
        self.current = Some(notification);
    }

    /// Hide the current message if its deadline has passed. Returns true if it hid one.
    pub fn tick(&mut self, now: Instant) -> bool {
        let expired = self
            .current
            .as_ref()
            .is_some_and(|current| now >= current.hide_at);
        if expired {
            self.current = None;
        }
        expired
    }

    /// Currently visible message
    pub fn visible(&self) -> Option<&Notification> {
        self.current.as_ref()
    }

    /// Hide immediately
    pub fn dismiss(&mut self) {
        self.current = None;
    }

    /// Every message shown, oldest first
    pub fn history(&self) -> impl Iterator<Item = &Notification> {
        self.history.iter()
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.history.iter().filter(|n| n.severity == severity).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEFAULT: Duration = Duration::from_millis(3200);

    #[test]
    fn test_message_hides_after_duration() {
        let mut center = NotificationCenter::new(DEFAULT);
        let t0 = Instant::now();
        center.notify_at("Loaded", Severity::Info, DEFAULT, t0);

        assert!(!center.tick(t0 + Duration::from_millis(3199)));
        assert_eq!(center.visible().map(|n| n.message.as_str()), Some("Loaded"));
        assert!(center.tick(t0 + DEFAULT));
        assert!(center.visible().is_none());
    }

    #[test]
    fn test_second_call_replaces_and_restarts_timer() {
        let mut center = NotificationCenter::new(DEFAULT);
        let t0 = Instant::now();
        let t1 = t0 + Duration::from_millis(1000);
        center.notify_at("first", Severity::Info, DEFAULT, t0);
        center.notify_at("second", Severity::Error, DEFAULT, t1);

        // First deadline passes: nothing hides
        assert!(!center.tick(t0 + DEFAULT));
        let visible = center.visible().unwrap();
        assert_eq!(visible.message, "second");
        assert_eq!(visible.severity, Severity::Error);

        // Hidden exactly once, at the second deadline
        assert!(!center.tick(t1 + DEFAULT - Duration::from_millis(1)));
        assert!(center.tick(t1 + DEFAULT));
        assert!(!center.tick(t1 + DEFAULT + Duration::from_millis(5000)));
    }

    #[test]
    fn test_notice_duration_override() {
        let mut center = NotificationCenter::new(DEFAULT);
        center.push(Notice::error("Snapshot failed").lasting(Duration::from_secs(8)));
        let shown = center.visible().unwrap();
        assert_eq!(shown.hide_at - shown.shown_at, Duration::from_secs(8));
        assert_eq!(center.count(Severity::Error), 1);
        assert_eq!(center.count(Severity::Info), 0);
    }

    #[test]
    fn test_history_is_bounded() {
        let mut center = NotificationCenter::default();
        for i in 0..(HISTORY_LIMIT + 10) {
            center.notify(format!("n{}", i), Severity::Info);
        }
        assert_eq!(center.history().count(), HISTORY_LIMIT);
        assert_eq!(center.history().next().unwrap().message, "n10");
    }
}
