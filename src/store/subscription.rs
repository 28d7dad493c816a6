//! Live snapshots of a user's data.
//!
//! Each user with at least one subscriber has a `watch` channel. Every write
//! to the store publishes a fresh snapshot, and a subscriber that falls
//! behind only sees the latest one.

use std::{
    collections::HashMap,
    sync::{Mutex, PoisonError},
};

use tokio::sync::watch;

use crate::user::UserID;

/// A stream of snapshots, starting with the snapshot current when it was created.
#[derive(Debug)]
pub struct Subscription<T> {
    receiver: Option<watch::Receiver<T>>,
    initial_pending: bool,
}

impl<T: Clone> Subscription<T> {
    fn new(receiver: watch::Receiver<T>) -> Self {
        Self {
            receiver: Some(receiver),
            initial_pending: true,
        }
    }

    /// A subscription that never yields a snapshot.
    pub fn inactive() -> Self {
        Self {
            receiver: None,
            initial_pending: false,
        }
    }

    /// Whether the subscription can still yield snapshots.
    pub fn is_active(&self) -> bool {
        self.receiver.is_some()
    }

    /// Wait for the next snapshot.
    ///
    /// The first call returns immediately with the snapshot taken when the
    /// subscription was created. Later calls wait for the next change and
    /// return only the most recent snapshot if several changes happened in
    /// between. Returns `None` once the subscription is inactive.
    pub async fn next(&mut self) -> Option<T> {
        let receiver = self.receiver.as_mut()?;

        if self.initial_pending {
            self.initial_pending = false;
            return Some(receiver.borrow_and_update().clone());
        }

        match receiver.changed().await {
            Ok(()) => Some(receiver.borrow_and_update().clone()),
            Err(_) => {
                self.receiver = None;
                None
            }
        }
    }

    /// The most recent snapshot without waiting, or `None` if inactive.
    pub fn latest(&self) -> Option<T> {
        self.receiver
            .as_ref()
            .map(|receiver| receiver.borrow().clone())
    }

    /// Stop receiving snapshots. Calling this more than once has no further effect.
    pub fn unsubscribe(&mut self) {
        self.receiver = None;
        self.initial_pending = false;
    }
}

/// The per-user channels that snapshots are published on.
#[derive(Debug)]
pub(crate) struct Feeds<T> {
    senders: Mutex<HashMap<UserID, watch::Sender<T>>>,
}

impl<T: Clone> Feeds<T> {
    pub(crate) fn new() -> Self {
        Self {
            senders: Mutex::new(HashMap::new()),
        }
    }

    /// Subscribe to `user_id`'s snapshots.
    ///
    /// `current` must be the user's snapshot at the time of the call and
    /// seeds the channel if nobody else is subscribed.
    pub(crate) fn subscribe(&self, user_id: UserID, current: T) -> Subscription<T> {
        let mut senders = self.senders.lock().unwrap_or_else(PoisonError::into_inner);

        let receiver = match senders.get(&user_id) {
            Some(sender) => {
                sender.send_replace(current);
                sender.subscribe()
            }
            None => {
                let (sender, receiver) = watch::channel(current);
                senders.insert(user_id, sender);
                receiver
            }
        };

        Subscription::new(receiver)
    }

    /// Whether anyone is listening to `user_id`'s snapshots.
    ///
    /// Channels whose subscribers have all gone away are dropped.
    pub(crate) fn has_subscribers(&self, user_id: UserID) -> bool {
        let mut senders = self.senders.lock().unwrap_or_else(PoisonError::into_inner);

        match senders.get(&user_id) {
            Some(sender) if sender.receiver_count() > 0 => true,
            Some(_) => {
                senders.remove(&user_id);
                false
            }
            None => false,
        }
    }

    /// Send `snapshot` to every subscriber of `user_id`.
    pub(crate) fn publish(&self, user_id: UserID, snapshot: T) {
        let senders = self.senders.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some(sender) = senders.get(&user_id) {
            sender.send_replace(snapshot);
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        store::{Subscription, subscription::Feeds},
        user::UserID,
    };

    #[tokio::test]
    async fn first_snapshot_is_immediate() {
        let feeds = Feeds::new();
        let mut subscription = feeds.subscribe(UserID::new(1), vec![1]);

        assert_eq!(subscription.next().await, Some(vec![1]));
    }

    #[tokio::test]
    async fn only_latest_snapshot_is_delivered() {
        let feeds = Feeds::new();
        let user_id = UserID::new(1);
        let mut subscription = feeds.subscribe(user_id, vec![1]);
        subscription.next().await;

        feeds.publish(user_id, vec![1, 2]);
        feeds.publish(user_id, vec![1, 2, 3]);

        assert_eq!(subscription.next().await, Some(vec![1, 2, 3]));
        assert_eq!(subscription.latest(), Some(vec![1, 2, 3]));
    }

    #[tokio::test]
    async fn snapshots_are_per_user() {
        let feeds = Feeds::new();
        let mut first = feeds.subscribe(UserID::new(1), "a");
        let mut second = feeds.subscribe(UserID::new(2), "b");
        first.next().await;
        second.next().await;

        feeds.publish(UserID::new(2), "c");

        assert_eq!(second.next().await, Some("c"));
        assert_eq!(first.latest(), Some("a"));
    }

    #[tokio::test]
    async fn unsubscribe_is_idempotent() {
        let feeds = Feeds::new();
        let user_id = UserID::new(1);
        let mut subscription = feeds.subscribe(user_id, 1);

        subscription.unsubscribe();
        subscription.unsubscribe();

        assert!(!subscription.is_active());
        assert_eq!(subscription.next().await, None);
        assert!(!feeds.has_subscribers(user_id));
    }

    #[tokio::test]
    async fn inactive_subscription_yields_nothing() {
        let mut subscription: Subscription<u8> = Subscription::inactive();

        assert_eq!(subscription.next().await, None);
        assert_eq!(subscription.latest(), None);
    }

    #[test]
    fn dropped_subscriptions_are_forgotten() {
        let feeds = Feeds::new();
        let user_id = UserID::new(1);
        let subscription = feeds.subscribe(user_id, 1);

        assert!(feeds.has_subscribers(user_id));

        drop(subscription);

        assert!(!feeds.has_subscribers(user_id));
    }
}
