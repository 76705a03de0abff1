//! "Cart changed" notifications.
//!
//! Built on a `tokio::sync::watch` channel carrying a generation counter.
//! The signal is level-triggered: listeners learn *that* the cart changed,
//! never *what* changed, and must re-read the store. Several writes between
//! two polls collapse into a single wake-up.

use std::sync::Arc;

use tokio::sync::watch;

/// Broadcast side of the cart-changed signal.
///
/// Cheap to clone; all clones share the same channel.
#[derive(Debug, Clone)]
pub struct CartEvents {
    tx: Arc<watch::Sender<u64>>,
}

impl Default for CartEvents {
    fn default() -> Self {
        Self::new()
    }
}

impl CartEvents {
    #[must_use]
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(0);
        Self { tx: Arc::new(tx) }
    }

    /// Raise the signal. Works with or without listeners.
    pub fn notify(&self) {
        self.tx.send_modify(|generation| *generation = generation.wrapping_add(1));
    }

    /// Register a new listener. It starts out having seen the current state.
    #[must_use]
    pub fn subscribe(&self) -> CartSubscription {
        CartSubscription {
            rx: self.tx.subscribe(),
        }
    }

    /// Number of notifications raised so far.
    #[must_use]
    pub fn generation(&self) -> u64 {
        *self.tx.borrow()
    }

    /// Number of live listeners.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

/// Listener side of the cart-changed signal.
#[derive(Debug)]
pub struct CartSubscription {
    rx: watch::Receiver<u64>,
}

impl CartSubscription {
    /// Wait until the cart changes after the last observed change.
    ///
    /// Returns `false` if every [`CartEvents`] handle has been dropped.
    pub async fn changed(&mut self) -> bool {
        self.rx.changed().await.is_ok()
    }

    /// Whether a change happened that this listener has not yet acknowledged.
    #[must_use]
    pub fn has_changed(&self) -> bool {
        self.rx.has_changed().unwrap_or(false)
    }

    /// Acknowledge pending changes without waiting.
    pub fn mark_seen(&mut self) {
        self.rx.borrow_and_update();
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn test_new_subscription_starts_clean() {
        let events = CartEvents::new();
        events.notify();
        let sub = events.subscribe();
        assert!(!sub.has_changed());
    }

    #[test]
    fn test_notifications_collapse_until_seen() {
        let events = CartEvents::new();
        let mut sub = events.subscribe();

        events.notify();
        events.notify();
        assert!(sub.has_changed());
        assert_eq!(events.generation(), 2);

        sub.mark_seen();
        assert!(!sub.has_changed());
    }

    #[test]
    fn test_every_listener_sees_the_signal() {
        let events = CartEvents::new();
        let first = events.subscribe();
        let second = events.clone().subscribe();
        assert_eq!(events.listener_count(), 2);

        events.notify();
        assert!(first.has_changed());
        assert!(second.has_changed());
    }

    #[tokio::test]
    async fn test_changed_wakes_waiting_listener() {
        let events = CartEvents::new();
        let mut sub = events.subscribe();

        let notifier = events.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            notifier.notify();
        });

        let woke = tokio::time::timeout(Duration::from_secs(1), sub.changed()).await;
        assert_eq!(woke.ok(), Some(true));
    }

    #[tokio::test]
    async fn test_changed_reports_closed_channel() {
        let events = CartEvents::new();
        let mut sub = events.subscribe();
        drop(events);
        assert!(!sub.changed().await);
    }
}
