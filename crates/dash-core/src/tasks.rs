//! Scheduling primitives: generation tokens for cancellation and a debouncer

use std::time::{Duration, Instant};

/// A monotonically increasing token identifying one unit of scheduled work
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Generation(u64);

impl Generation {
    pub fn value(self) -> u64 {
        self.0
    }
}

/// Hands out generations; only the latest one is current.
///
/// Continuations check [`GenerationCounter::is_current`] before applying their
/// result, so cancelling everything outstanding is a single `next()` call.
#[derive(Debug, Default)]
pub struct GenerationCounter {
    current: u64,
}

impl GenerationCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new generation, superseding all previous ones
    pub fn next(&mut self) -> Generation {
        self.current += 1;
        Generation(self.current)
    }

    pub fn is_current(&self, generation: Generation) -> bool {
        generation.0 == self.current
    }
}

/// Coalesces bursts of triggers into one firing after a quiet period
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    deadline: Option<Instant>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Record a trigger at `now`, pushing the deadline back
    pub fn trigger(&mut self, now: Instant) {
        self.deadline = Some(now + self.delay);
    }

    /// Returns true exactly once when the quiet period has elapsed
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    /// Time left before the pending trigger fires
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.deadline.map(|d| d.saturating_duration_since(now))
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generation_supersedes() {
        let mut counter = GenerationCounter::new();
        let first = counter.next();
        let second = counter.next();
        assert!(second > first);
        assert!(!counter.is_current(first));
        assert!(counter.is_current(second));
    }

    #[test]
    fn test_debouncer_coalesces_bursts() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(Duration::from_millis(100));

        debouncer.trigger(start);
        debouncer.trigger(start + Duration::from_millis(50));
        assert!(!debouncer.poll(start + Duration::from_millis(120)));
        assert_eq!(
            debouncer.remaining(start + Duration::from_millis(120)),
            Some(Duration::from_millis(30))
        );

        assert!(debouncer.poll(start + Duration::from_millis(150)));
        assert!(!debouncer.poll(start + Duration::from_millis(500)));
        assert!(!debouncer.is_pending());
    }

    #[test]
    fn test_debouncer_cancel() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(Duration::from_millis(100));
        debouncer.trigger(start);
        debouncer.cancel();
        assert!(!debouncer.is_pending());
        assert!(!debouncer.poll(start + Duration::from_secs(1)));

        // A later trigger starts a fresh quiet period
        debouncer.trigger(start + Duration::from_secs(2));
        assert!(!debouncer.poll(start + Duration::from_millis(2050)));
        assert!(debouncer.poll(start + Duration::from_millis(2100)));
    }
}
