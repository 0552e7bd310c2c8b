//! Single-value push streams.
//!
//! # Responsibility
//! - Hold exactly one current value per stream.
//! - Re-emit to every live subscriber on each publish.
//!
//! # Invariants
//! - A new subscriber receives the current value first.
//! - Subscribers whose receiver was dropped are pruned on the next publish.
//! - Only the owner of the `Observable` publishes; subscribers are read-only.

use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::time::Duration;

/// Observable value with an observer list of channel senders.
#[derive(Debug)]
pub struct Observable<T: Clone> {
    current: T,
    subscribers: Vec<Sender<T>>,
}

impl<T: Clone> Observable<T> {
    pub fn new(initial: T) -> Self {
        Self {
            current: initial,
            subscribers: Vec::new(),
        }
    }

    pub fn current(&self) -> &T {
        &self.current
    }

    /// Replaces the current value and pushes it to every subscriber.
    pub fn publish(&mut self, value: T) {
        self.current = value;
        let current = &self.current;
        self.subscribers
            .retain(|subscriber| subscriber.send(current.clone()).is_ok());
    }

    pub fn subscribe(&mut self) -> Subscription<T> {
        let (sender, receiver) = mpsc::channel();
        // A fresh channel cannot be disconnected yet.
        let _ = sender.send(self.current.clone());
        self.subscribers.push(sender);
        Subscription { receiver }
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

/// Receiving end of an [`Observable`]; dropping it cancels the subscription.
#[derive(Debug)]
pub struct Subscription<T> {
    receiver: Receiver<T>,
}

impl<T> Subscription<T> {
    /// Returns the next pending emission without blocking.
    pub fn try_next(&self) -> Option<T> {
        match self.receiver.try_recv() {
            Ok(value) => Some(value),
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => None,
        }
    }

    /// Drains pending emissions and returns only the newest one.
    pub fn latest(&self) -> Option<T> {
        let mut latest = None;
        while let Some(value) = self.try_next() {
            latest = Some(value);
        }
        latest
    }

    /// Waits up to `timeout` for the next emission.
    pub fn next_timeout(&self, timeout: Duration) -> Option<T> {
        match self.receiver.recv_timeout(timeout) {
            Ok(value) => Some(value),
            Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Observable;

    #[test]
    fn subscriber_sees_current_value_then_updates() {
        let mut stream = Observable::new(1);
        let subscription = stream.subscribe();
        assert_eq!(subscription.try_next(), Some(1));
        assert_eq!(subscription.try_next(), None);

        stream.publish(2);
        stream.publish(3);
        assert_eq!(subscription.latest(), Some(3));
        assert_eq!(*stream.current(), 3);
    }

    #[test]
    fn dropped_subscribers_are_pruned_on_publish() {
        let mut stream = Observable::new("a".to_string());
        let kept = stream.subscribe();
        let dropped = stream.subscribe();
        assert_eq!(stream.subscriber_count(), 2);

        drop(dropped);
        stream.publish("b".to_string());
        assert_eq!(stream.subscriber_count(), 1);
        assert_eq!(kept.latest().as_deref(), Some("b"));
    }
}
