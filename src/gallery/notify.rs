use log::{error, info, warn};
use std::time::{Duration, Instant};

/// Display time for error notifications
pub const ERROR_TOAST_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// A timed, dismissible notification
#[derive(Debug, Clone)]
pub struct Toast {
    pub id: u64,
    pub level: ToastLevel,
    pub title: String,
    pub message: String,
    pub created_at: Instant,
    pub timeout: Duration,
}

impl Toast {
    pub fn is_expired(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.created_at) >= self.timeout
    }

    pub fn remaining(&self, now: Instant) -> Duration {
        self.timeout.saturating_sub(now.saturating_duration_since(self.created_at))
    }
}

/// Sink for user-visible notifications
pub trait Notifier {
    fn notify(&mut self, level: ToastLevel, title: &str, message: &str, timeout: Duration);

    fn error(&mut self, message: &str, title: &str, timeout: Duration) {
        self.notify(ToastLevel::Error, title, message, timeout);
    }
}

#[derive(Debug, Default)]
pub struct ToastQueue {
    toasts: Vec<Toast>,
    next_id: u64,
}

impl ToastQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, level: ToastLevel, title: &str, message: &str, timeout: Duration, now: Instant) -> u64 {
        self.next_id += 1;
        self.toasts.push(Toast {
            id: self.next_id,
            level,
            title: title.to_string(),
            message: message.to_string(),
            created_at: now,
            timeout,
        });
        self.next_id
    }

    /// Toasts still on screen at `now`, oldest first
    pub fn visible(&self, now: Instant) -> impl Iterator<Item = &Toast> {
        self.toasts.iter().filter(move |toast| !toast.is_expired(now))
    }

    /// Drop expired toasts
    pub fn prune(&mut self, now: Instant) {
        self.toasts.retain(|toast| !toast.is_expired(now));
    }

    pub fn dismiss(&mut self, id: u64) -> bool {
        let before = self.toasts.len();
        self.toasts.retain(|toast| toast.id != id);
        self.toasts.len() != before
    }

    /// Dismiss the most recent toast
    pub fn dismiss_latest(&mut self) -> bool {
        self.toasts.pop().is_some()
    }

    pub fn all(&self) -> &[Toast] {
        &self.toasts
    }

    pub fn len(&self) -> usize {
        self.toasts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }
}

impl Notifier for ToastQueue {
    fn notify(&mut self, level: ToastLevel, title: &str, message: &str, timeout: Duration) {
        match level {
            ToastLevel::Error => error!("{}: {}", title, message),
            ToastLevel::Warning => warn!("{}: {}", title, message),
            _ => info!("{}: {}", title, message),
        }
        self.push(level, title, message, timeout, Instant::now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toast_expires_after_timeout() {
        let mut queue = ToastQueue::new();
        let start = Instant::now();
        queue.push(ToastLevel::Error, "Error", "boom", ERROR_TOAST_TIMEOUT, start);

        assert_eq!(queue.visible(start).count(), 1);
        assert_eq!(queue.visible(start + Duration::from_millis(4999)).count(), 1);
        assert_eq!(queue.visible(start + ERROR_TOAST_TIMEOUT).count(), 0);

        queue.prune(start + Duration::from_secs(6));
        assert!(queue.is_empty());
    }

    #[test]
    fn test_remaining_counts_down() {
        let mut queue = ToastQueue::new();
        let start = Instant::now();
        queue.push(ToastLevel::Info, "Info", "hi", Duration::from_secs(5), start);
        let toast = &queue.all()[0];
        assert_eq!(toast.remaining(start + Duration::from_secs(2)), Duration::from_secs(3));
        assert_eq!(toast.remaining(start + Duration::from_secs(9)), Duration::ZERO);
    }

    #[test]
    fn test_dismiss() {
        let mut queue = ToastQueue::new();
        let now = Instant::now();
        let first = queue.push(ToastLevel::Info, "A", "a", ERROR_TOAST_TIMEOUT, now);
        queue.push(ToastLevel::Warning, "B", "b", ERROR_TOAST_TIMEOUT, now);

        assert!(queue.dismiss(first));
        assert!(!queue.dismiss(first));
        assert!(queue.dismiss_latest());
        assert!(queue.is_empty());
    }

    #[test]
    fn test_notifier_error_records_level_and_title() {
        let mut queue = ToastQueue::new();
        queue.error("Error loading plugins: offline", "Error", ERROR_TOAST_TIMEOUT);

        let toast = &queue.all()[0];
        assert_eq!(toast.level, ToastLevel::Error);
        assert_eq!(toast.title, "Error");
        assert_eq!(toast.timeout, ERROR_TOAST_TIMEOUT);
    }
}
