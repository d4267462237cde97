//! Short-lived, self-expiring status notifications.
//!
//! Decouples mutation results from display: services return a
//! [`crate::MutationOutcome`], the presentation layer forwards it here,
//! and the bus owns the visible lifetime. Each notification expires on
//! its own timer 5 seconds after posting unless dismissed earlier.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use crate::services::MutationOutcome;

/// Visible lifetime of a notification.
const DISPLAY_TTL: Duration = Duration::from_millis(5000);

/// Notification id, unique for the life of the bus.
pub type NotificationId = u64;

/// Severity of a notification, mirroring the display variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Warning,
    Danger,
    Info,
}

impl Severity {
    /// Display variant name (e.g., a CSS class suffix).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Danger => "danger",
            Self::Info => "info",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A posted notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Unique id, assigned monotonically at post time.
    pub id: NotificationId,
    /// Display severity.
    pub severity: Severity,
    /// Message to show the user.
    pub message: String,
}

/// The notification bus.
///
/// Cheaply cloneable; all clones share the same active set. Insertion
/// order is display order.
#[derive(Clone)]
pub struct Notifier {
    inner: Arc<NotifierInner>,
}

struct NotifierInner {
    active: Mutex<Vec<Notification>>,
    next_id: AtomicU64,
}

impl Notifier {
    /// Create an empty bus.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Arc::new(NotifierInner {
                active: Mutex::new(Vec::new()),
                next_id: AtomicU64::new(0),
            }),
        }
    }

    /// Post a notification and schedule its removal after 5 seconds.
    ///
    /// Each notification gets its own timer; dismissing one never
    /// disturbs the others.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime (the expiry timer is a
    /// spawned task).
    pub fn post(&self, severity: Severity, message: impl Into<String>) -> NotificationId {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);

        self.lock().push(Notification {
            id,
            severity,
            message: message.into(),
        });

        // Deadline is fixed at post time; the spawned task may not be
        // polled until later and must not slide it.
        let deadline = tokio::time::Instant::now() + DISPLAY_TTL;
        let bus = self.clone();
        tokio::spawn(async move {
            tokio::time::sleep_until(deadline).await;
            bus.dismiss(id);
        });

        id
    }

    /// Post the notification for a mutation outcome.
    pub fn report(&self, outcome: &MutationOutcome) -> NotificationId {
        self.post(outcome.severity(), outcome.message.clone())
    }

    /// Remove a notification immediately.
    ///
    /// Idempotent: dismissing an already-removed id is a no-op.
    pub fn dismiss(&self, id: NotificationId) {
        self.lock().retain(|notification| notification.id != id);
    }

    /// The currently visible notifications, in insertion order.
    #[must_use]
    pub fn active(&self) -> Vec<Notification> {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Notification>> {
        self.inner
            .active
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn messages(bus: &Notifier) -> Vec<String> {
        bus.active().into_iter().map(|n| n.message).collect()
    }

    #[tokio::test(start_paused = true)]
    async fn test_notification_expires_after_five_seconds() {
        let bus = Notifier::new();
        let id = bus.post(Severity::Success, "Item added to cart");

        tokio::time::advance(Duration::from_millis(4999)).await;
        tokio::task::yield_now().await;
        assert!(bus.active().iter().any(|n| n.id == id));

        tokio::time::advance(Duration::from_millis(2)).await;
        tokio::task::yield_now().await;
        assert!(bus.active().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_deadline_measured_from_post_time() {
        let bus = Notifier::new();
        bus.post(Severity::Info, "posted");

        // Advance past the lifetime before the timer task ever runs; the
        // notification must still be gone once it does.
        tokio::time::advance(Duration::from_millis(5001)).await;
        tokio::task::yield_now().await;
        assert!(bus.active().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_independent_timers() {
        let bus = Notifier::new();
        bus.post(Severity::Info, "first");

        tokio::time::advance(Duration::from_millis(3000)).await;
        bus.post(Severity::Info, "second");

        // 5s after "first" was posted, only "second" remains
        tokio::time::advance(Duration::from_millis(2001)).await;
        tokio::task::yield_now().await;
        assert_eq!(messages(&bus), vec!["second"]);

        tokio::time::advance(Duration::from_millis(3000)).await;
        tokio::task::yield_now().await;
        assert!(bus.active().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_dismiss_is_idempotent_and_isolated() {
        let bus = Notifier::new();
        let first = bus.post(Severity::Warning, "first");
        bus.post(Severity::Warning, "second");

        bus.dismiss(first);
        bus.dismiss(first); // no-op, not an error
        assert_eq!(messages(&bus), vec!["second"]);

        // The survivor still expires on its own timer
        tokio::time::advance(Duration::from_millis(5001)).await;
        tokio::task::yield_now().await;
        assert!(bus.active().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_insertion_order_is_display_order() {
        let bus = Notifier::new();
        bus.post(Severity::Info, "a");
        bus.post(Severity::Info, "b");
        bus.post(Severity::Info, "c");

        assert_eq!(messages(&bus), vec!["a", "b", "c"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_ids_are_unique() {
        let bus = Notifier::new();
        let a = bus.post(Severity::Info, "a");
        let b = bus.post(Severity::Info, "b");
        assert_ne!(a, b);
    }
}
