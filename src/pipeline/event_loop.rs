//! Event Loop - The serialized main queue
//!
//! Blocks on the channel until an event arrives or the retry deadline
//! elapses, then hands the event to the surface. All surface state is
//! touched from this one thread.
//!
//! ```text
//! engine callbacks ─┐
//!                   ├─→ mpsc ─→ EventLoop::tick ─→ MapSurface::handle
//! host hooks ───────┘                  └─(timeout)─→ MapSurface::on_timer
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{Receiver, RecvTimeoutError, TryRecvError};
use std::time::{Duration, Instant};

use tracing::{debug, trace};

use super::provider::DataProvider;
use super::surface::MapSurface;
use crate::engine::MapEngine;
use crate::events::{self, EventSender, MapEvent};

/// Longest `run` sleeps before re-checking its running flag.
const IDLE_WAIT: Duration = Duration::from_millis(250);

pub struct EventLoop {
    sender: EventSender,
    rx: Receiver<MapEvent>,
}

impl EventLoop {
    pub fn new() -> Self {
        let (sender, rx) = events::channel();
        Self { sender, rx }
    }

    /// Handle for posting onto this queue (given to the engine and host).
    pub fn sender(&self) -> EventSender {
        self.sender.clone()
    }

    /// Handle every event already queued. Returns how many were handled.
    pub fn drain<E: MapEngine, P: DataProvider>(&self, surface: &mut MapSurface<E, P>, now: Instant) -> usize {
        let mut handled = 0;
        loop {
            match self.rx.try_recv() {
                Ok(event) => {
                    trace!(?event, "dispatch");
                    surface.handle(event, now);
                    handled += 1;
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        handled
    }

    /// Wait up to `max_wait` (shortened to the retry deadline) for one event.
    ///
    /// Returns false once the queue is disconnected.
    pub fn tick<E: MapEngine, P: DataProvider>(&self, surface: &mut MapSurface<E, P>, max_wait: Duration) -> bool {
        let wait = match surface.next_deadline(Instant::now()) {
            Some(deadline) => deadline.min(max_wait),
            None => max_wait,
        };

        match self.rx.recv_timeout(wait) {
            Ok(event) => {
                trace!(?event, "dispatch");
                surface.handle(event, Instant::now());
                true
            }
            Err(RecvTimeoutError::Timeout) => {
                surface.on_timer(Instant::now());
                true
            }
            Err(RecvTimeoutError::Disconnected) => {
                debug!("main queue disconnected");
                false
            }
        }
    }

    /// Run until `running` is cleared.
    pub fn run<E: MapEngine, P: DataProvider>(&self, surface: &mut MapSurface<E, P>, running: &AtomicBool) {
        while running.load(Ordering::SeqCst) {
            if !self.tick(surface, IDLE_WAIT) {
                break;
            }
        }
        debug!("event loop stopped");
    }
}

impl Default for EventLoop {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// TESTS
// =============================================================================
