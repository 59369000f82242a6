use crate::api::Case;
use std::sync::Arc;
use tokio::sync::watch;

/// Single-slot broadcast channel holding the current case.
///
/// Holds at most one case (or none). Updates replace the whole slot, so
/// observers never see a partially written value. New subscribers receive
/// the value present at subscription time before any later update.
#[derive(Clone)]
pub struct CaseChannel {
    sender: Arc<watch::Sender<Option<Case>>>,
}

impl CaseChannel {
    pub fn new() -> Self {
        let (sender, _) = watch::channel(None);
        Self {
            sender: Arc::new(sender),
        }
    }

    /// Replace the current case and notify every subscriber
    pub fn publish(&self, case: Case) {
        log::debug!("Publishing current case: {}", case.display_name());
        self.sender.send_replace(Some(case));
    }

    /// Snapshot of the slot
    pub fn current(&self) -> Option<Case> {
        self.sender.borrow().clone()
    }

    pub fn subscribe(&self) -> CaseSubscription {
        let mut receiver = self.sender.subscribe();
        // Replay the present value to the new observer
        receiver.mark_changed();
        CaseSubscription { receiver }
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for CaseChannel {
    fn default() -> Self {
        Self::new()
    }
}

/// Observer side of a [`CaseChannel`]
pub struct CaseSubscription {
    receiver: watch::Receiver<Option<Case>>,
}

impl CaseSubscription {
    /// Take the latest value if it has not been seen yet
    pub fn try_next(&mut self) -> Option<Option<Case>> {
        match self.receiver.has_changed() {
            Ok(true) => Some(self.receiver.borrow_and_update().clone()),
            _ => None,
        }
    }

    /// Wait for the next unseen value. Returns `None` once the channel is gone.
    pub async fn next(&mut self) -> Option<Option<Case>> {
        self.receiver.changed().await.ok()?;
        Some(self.receiver.borrow_and_update().clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_value_is_unset() {
        let channel = CaseChannel::new();
        assert!(channel.current().is_none());

        let mut subscription = channel.subscribe();
        assert_eq!(subscription.try_next(), Some(None));
        assert_eq!(subscription.try_next(), None);
    }

    #[test]
    fn test_late_subscriber_receives_last_value() {
        let channel = CaseChannel::new();
        channel.publish(Case::new("first"));
        channel.publish(Case::new("second"));

        let mut subscription = channel.subscribe();
        let replayed = subscription.try_next().flatten().unwrap();
        assert_eq!(replayed.name.as_deref(), Some("second"));
    }

    #[test]
    fn test_every_subscriber_sees_updates() {
        let channel = CaseChannel::new();
        let mut a = channel.subscribe();
        let mut b = channel.subscribe();
        a.try_next();
        b.try_next();

        channel.publish(Case::new("shared"));

        assert_eq!(a.try_next().flatten().unwrap().name.as_deref(), Some("shared"));
        assert_eq!(b.try_next().flatten().unwrap().name.as_deref(), Some("shared"));
        assert_eq!(channel.subscriber_count(), 2);
    }

    #[tokio::test]
    async fn test_next_waits_for_publish() {
        let channel = CaseChannel::new();
        let mut subscription = channel.subscribe();
        assert_eq!(subscription.next().await, Some(None));

        let publisher = channel.clone();
        tokio::spawn(async move {
            publisher.publish(Case::new("async"));
        });

        let next = subscription.next().await.flatten().unwrap();
        assert_eq!(next.name.as_deref(), Some("async"));
    }
}
