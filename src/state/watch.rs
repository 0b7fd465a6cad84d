//! Watch - Observable state published over channels
//!
//! Holds the current value and fans every change out to subscribers. A
//! subscriber receives the current value on subscribe, then one message
//! per change. Subscribers whose receiver was dropped are pruned on the
//! next change.
//!
//! # Example
//!
//! ```ignore
//! let mut mode = Watch::new(DataMode::ModeA);
//! let rx = mode.subscribe();
//! mode.set(DataMode::ModeB);
//! assert_eq!(rx.try_iter().last(), Some(DataMode::ModeB));
//! ```

use std::sync::mpsc::{self, Receiver, Sender};

#[derive(Debug)]
pub struct Watch<T: Clone + PartialEq> {
    value: T,
    subscribers: Vec<Sender<T>>,
}

impl<T: Clone + PartialEq> Watch<T> {
    pub fn new(value: T) -> Self {
        Self {
            value,
            subscribers: Vec::new(),
        }
    }

    pub fn get(&self) -> T {
        self.value.clone()
    }

    /// Replace the value. Returns false (and notifies nobody) if it is unchanged.
    pub fn set(&mut self, value: T) -> bool {
        if self.value == value {
            return false;
        }
        self.value = value;
        let current = &self.value;
        self.subscribers.retain(|tx| tx.send(current.clone()).is_ok());
        true
    }

    /// Receive the current value now and every later change.
    pub fn subscribe(&mut self) -> Receiver<T> {
        let (tx, rx) = mpsc::channel();
        if tx.send(self.value.clone()).is_ok() {
            self.subscribers.push(tx);
        }
        rx
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subscribe_gets_current_then_changes() {
        let mut watch = Watch::new(1);
        let rx = watch.subscribe();
        assert!(watch.set(2));
        assert!(watch.set(3));
        assert_eq!(rx.try_iter().collect::<Vec<_>>(), vec![1, 2, 3]);
        assert_eq!(watch.get(), 3);
    }

    #[test]
    fn test_unchanged_value_not_published() {
        let mut watch = Watch::new("a");
        let rx = watch.subscribe();
        rx.try_recv().unwrap();

        assert!(!watch.set("a"));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_dropped_subscribers_pruned() {
        let mut watch = Watch::new(0u8);
        let kept = watch.subscribe();
        drop(watch.subscribe());
        assert_eq!(watch.subscriber_count(), 2);

        watch.set(1);
        assert_eq!(watch.subscriber_count(), 1);
        assert_eq!(kept.try_iter().last(), Some(1));
    }
}
