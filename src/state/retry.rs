//! Retry Timer - Cancellable deferred authentication retry
//!
//! A single-slot timer on the main queue. Scheduling replaces whatever was
//! pending, so at most one retry is ever outstanding. Each pending retry
//! carries the generation it was scheduled under; [`RetryTimer::invalidate`]
//! bumps the generation so a retry that outlived its controller never fires.
//!
//! The timer never sleeps. The event loop asks for [`RetryTimer::next_deadline`]
//! and uses it as its receive timeout, mirroring the cursor blink deadlines.

use std::time::{Duration, Instant};

/// A scheduled retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingRetry {
    pub generation: u64,
    pub due: Instant,
}

#[derive(Debug)]
pub struct RetryTimer {
    delay: Duration,
    generation: u64,
    pending: Option<PendingRetry>,
    fired: u64,
}

impl RetryTimer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            generation: 0,
            pending: None,
            fired: 0,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn pending(&self) -> Option<PendingRetry> {
        self.pending
    }

    /// Total retries that have fired.
    pub fn fired_count(&self) -> u64 {
        self.fired
    }

    /// Schedule a retry `delay` after `now`, replacing any pending one.
    pub fn schedule(&mut self, now: Instant) -> PendingRetry {
        let pending = PendingRetry {
            generation: self.generation,
            due: now + self.delay,
        };
        self.pending = Some(pending);
        pending
    }

    /// Drop the pending retry and reject any retry scheduled before now.
    pub fn invalidate(&mut self) {
        self.generation += 1;
        self.pending = None;
    }

    pub fn is_current(&self, retry: &PendingRetry) -> bool {
        retry.generation == self.generation
    }

    /// Time left until the pending retry is due (zero if overdue).
    pub fn next_deadline(&self, now: Instant) -> Option<Duration> {
        self.pending.map(|p| p.due.saturating_duration_since(now))
    }

    /// Take the pending retry if it is due at `now` and still current.
    pub fn fire(&mut self, now: Instant) -> Option<PendingRetry> {
        let pending = self.pending?;
        if now < pending.due {
            return None;
        }
        self.pending = None;
        if !self.is_current(&pending) {
            return None;
        }
        self.fired += 1;
        Some(pending)
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const DELAY: Duration = Duration::from_secs(5);

    #[test]
    fn test_schedule_sets_due_time() {
        let t0 = Instant::now();
        let mut timer = RetryTimer::new(DELAY);
        let pending = timer.schedule(t0);
        assert_eq!(pending.due, t0 + DELAY);
        assert_eq!(timer.next_deadline(t0), Some(DELAY));
    }

    #[test]
    fn test_fires_exactly_once_at_due_time() {
        let t0 = Instant::now();
        let mut timer = RetryTimer::new(DELAY);
        timer.schedule(t0);

        assert!(timer.fire(t0 + Duration::from_millis(4999)).is_none());
        assert!(timer.fire(t0 + DELAY).is_some());
        assert!(timer.fire(t0 + DELAY * 2).is_none());
        assert_eq!(timer.fired_count(), 1);
        assert_eq!(timer.next_deadline(t0), None);
    }

    #[test]
    fn test_reschedule_replaces_pending() {
        let t0 = Instant::now();
        let mut timer = RetryTimer::new(DELAY);
        timer.schedule(t0);
        timer.schedule(t0 + Duration::from_secs(1));

        assert!(timer.fire(t0 + DELAY).is_none());
        assert!(timer.fire(t0 + Duration::from_secs(6)).is_some());
        assert_eq!(timer.fired_count(), 1);
    }

    #[test]
    fn test_invalidate_cancels_pending() {
        let t0 = Instant::now();
        let mut timer = RetryTimer::new(DELAY);
        let stale = timer.schedule(t0);
        timer.invalidate();

        assert!(!timer.is_current(&stale));
        assert!(timer.pending().is_none());
        assert!(timer.fire(t0 + DELAY).is_none());
        assert_eq!(timer.fired_count(), 0);
    }

    #[test]
    fn test_overdue_deadline_is_zero() {
        let t0 = Instant::now();
        let mut timer = RetryTimer::new(DELAY);
        timer.schedule(t0);
        assert_eq!(timer.next_deadline(t0 + DELAY * 3), Some(Duration::ZERO));
    }
}
