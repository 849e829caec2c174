//! Full-state push to real-time subscribers.
//!
//! After a successful mutation the caller invokes [`HabitFanout::notify`], which re-reads the
//! whole collection through the repository and broadcasts it. Every message is a complete
//! snapshot, so a subscriber that missed earlier messages is consistent again as soon as it
//! receives the next one.
//!
//! Delivery is best-effort:
//! - no subscribers is not an error;
//! - a subscriber that falls more than `capacity` snapshots behind skips to the newest ones
//!   (`RecvError::Lagged` on its receiver);
//! - a failed re-read is logged and the push is skipped.
//!
//! None of these outcomes is reported back to the mutation that triggered the push.

use crate::habit::Habit;
use crate::repository::HabitRepository;
use std::sync::Arc;
use tokio::sync::broadcast;

/// One full, ordered copy of the collection.
pub type HabitSnapshot = Arc<Vec<Habit>>;

#[derive(Clone, Debug)]
pub struct HabitFanout {
    tx: broadcast::Sender<HabitSnapshot>,
}

impl HabitFanout {
    /// Creates a fan-out buffering up to `capacity` snapshots per subscriber.
    ///
    /// `capacity` is clamped to at least 1.
    pub fn new(capacity: usize) -> Self {
        let (tx, _rx) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<HabitSnapshot> {
        self.tx.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }

    /// Broadcasts `snapshot` to current subscribers and returns how many were reached.
    pub fn publish(&self, snapshot: Vec<Habit>) -> usize {
        let len = snapshot.len();
        match self.tx.send(Arc::new(snapshot)) {
            Ok(receivers) => {
                tracing::debug!("pushed {} habits to {} subscribers", len, receivers);
                receivers
            }
            Err(_) => 0,
        }
    }

    /// Re-reads the collection and broadcasts it. Never fails.
    pub fn notify(&self, repo: &HabitRepository) -> usize {
        if self.subscriber_count() == 0 {
            return 0;
        }

        match repo.list() {
            Ok(habits) => self.publish(habits),
            Err(e) => {
                tracing::warn!("skipping habit push, failed to read collection: {}", e);
                0
            }
        }
    }
}

impl Default for HabitFanout {
    fn default() -> Self {
        Self::new(crate::DEFAULT_FANOUT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::NewHabit;
    use tokio::sync::broadcast::error::RecvError;

    #[tokio::test]
    async fn test_notify_delivers_current_list_to_every_subscriber() {
        let repo = HabitRepository::in_memory();
        let fanout = HabitFanout::new(4);
        let mut a = fanout.subscribe();
        let mut b = fanout.subscribe();

        repo.create(NewHabit::new("Run", "Health")).unwrap();
        repo.create(NewHabit::new("Read", "Mind")).unwrap();
        assert_eq!(fanout.notify(&repo), 2);

        let expected = repo.list().unwrap();
        assert_eq!(*a.recv().await.unwrap(), expected);
        assert_eq!(*b.recv().await.unwrap(), expected);
    }

    #[test]
    fn test_notify_without_subscribers_is_a_no_op() {
        let repo = HabitRepository::in_memory();
        let fanout = HabitFanout::default();
        assert_eq!(fanout.notify(&repo), 0);
    }

    #[tokio::test]
    async fn test_lagging_subscriber_skips_to_newest_snapshot() {
        let repo = HabitRepository::in_memory();
        let fanout = HabitFanout::new(1);
        let mut slow = fanout.subscribe();

        for name in ["a", "b", "c"] {
            repo.create(NewHabit::new(name, "Health")).unwrap();
            fanout.notify(&repo);
        }

        assert!(matches!(slow.recv().await, Err(RecvError::Lagged(2))));
        let latest = slow.recv().await.unwrap();
        assert_eq!(*latest, repo.list().unwrap());
        assert_eq!(latest.len(), 3);
    }

    #[tokio::test]
    async fn test_dropped_subscriber_does_not_affect_others() {
        let repo = HabitRepository::in_memory();
        let fanout = HabitFanout::new(4);
        let gone = fanout.subscribe();
        let mut live = fanout.subscribe();
        drop(gone);

        repo.create(NewHabit::new("Run", "Health")).unwrap();
        assert_eq!(fanout.notify(&repo), 1);
        assert_eq!(live.recv().await.unwrap().len(), 1);
    }
}
