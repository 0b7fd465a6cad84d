//! Events delivered on the surface's serialized main queue.
//!
//! Engine callbacks, host lifecycle hooks and app foreground/background
//! notifications all travel through one mpsc channel and are handled one at
//! a time by [`crate::pipeline::EventLoop`]. The engine receives an
//! [`EventSender`] at initialization and posts its callbacks through it.

use std::sync::mpsc::{self, Receiver, Sender};

use crate::types::Size;

// =============================================================================
// EVENT TYPES
// =============================================================================

/// Callbacks fired by the map engine.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    AuthenticationSucceeded,
    AuthenticationFailed { code: i32, message: String },
    /// The engine started and is ready for views to be added.
    AddViews,
    /// The view container changed size.
    ContainerResized(Size),
    ViewWillBeDestroyed { view: String },
    /// A user-driven pan/zoom on `view` finished.
    CameraStopped { view: String },
}

/// Lifecycle hooks raised by the hosting application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostEvent {
    BecomeVisible,
    WillHide,
    DidHide,
    WillResignActive,
    DidBecomeActive,
    /// The hosting view is being destroyed.
    Teardown,
}

/// Everything that can arrive on the main queue.
#[derive(Debug, Clone, PartialEq)]
pub enum MapEvent {
    Engine(EngineEvent),
    Host(HostEvent),
}

impl From<EngineEvent> for MapEvent {
    fn from(event: EngineEvent) -> Self {
        MapEvent::Engine(event)
    }
}

impl From<HostEvent> for MapEvent {
    fn from(event: HostEvent) -> Self {
        MapEvent::Host(event)
    }
}

// =============================================================================
// SENDER
// =============================================================================

/// Cloneable handle for posting events onto the main queue.
#[derive(Debug, Clone)]
pub struct EventSender {
    tx: Sender<MapEvent>,
}

impl EventSender {
    pub fn new(tx: Sender<MapEvent>) -> Self {
        Self { tx }
    }

    /// Post an event. Returns false if the queue has been dropped.
    pub fn send(&self, event: impl Into<MapEvent>) -> bool {
        self.tx.send(event.into()).is_ok()
    }
}

/// Create a connected sender/receiver pair for the main queue.
pub fn channel() -> (EventSender, Receiver<MapEvent>) {
    let (tx, rx) = mpsc::channel();
    (EventSender::new(tx), rx)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_send_preserves_order() {
        let (sender, rx) = channel();
        assert!(sender.send(HostEvent::BecomeVisible));
        assert!(sender.send(EngineEvent::AddViews));

        assert_eq!(rx.try_recv().unwrap(), MapEvent::Host(HostEvent::BecomeVisible));
        assert_eq!(rx.try_recv().unwrap(), MapEvent::Engine(EngineEvent::AddViews));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_send_after_receiver_dropped() {
        let (sender, rx) = channel();
        drop(rx);
        assert!(!sender.send(EngineEvent::AuthenticationSucceeded));
    }
}
