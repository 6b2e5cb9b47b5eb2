//! Poll interval backoff

use std::time::Duration;

/// First poll interval, in seconds
pub const INITIAL_POLL_WAIT_SECS: f64 = 0.2;

/// Growth factor applied after every poll
pub const POLL_WAIT_FACTOR: f64 = 1.5;

/// Default ceiling for the poll interval
pub const DEFAULT_MAX_POLL_WAIT: Duration = Duration::from_secs(30);

/// Bounded exponential backoff for status polling
///
/// Yields 0.2s, 0.3s, 0.45s, ... and stays at the ceiling once reached.
/// A ceiling below the 0.2s seed is raised to the seed, so polling never
/// degenerates into a busy loop.
#[derive(Debug, Clone)]
pub struct PollBackoff {
    current: f64,
    max: f64,
}

impl PollBackoff {
    pub fn new(max_poll_wait: Duration) -> Self {
        Self {
            current: INITIAL_POLL_WAIT_SECS,
            max: max_poll_wait.as_secs_f64().max(INITIAL_POLL_WAIT_SECS),
        }
    }

    /// Interval to wait before the next poll
    pub fn current(&self) -> Duration {
        Duration::from_secs_f64(self.current)
    }

    /// Moves to the next interval
    pub fn advance(&mut self) {
        self.current = (self.current * POLL_WAIT_FACTOR).min(self.max);
    }
}

impl Default for PollBackoff {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_POLL_WAIT)
    }
}

impl Iterator for PollBackoff {
    type Item = Duration;

    fn next(&mut self) -> Option<Duration> {
        let wait = self.current();
        self.advance();
        Some(wait)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secs(backoff: PollBackoff, n: usize) -> Vec<f64> {
        backoff.take(n).map(|d| d.as_secs_f64()).collect()
    }

    #[test]
    fn test_sequence_starts_at_seed() {
        let seq = secs(PollBackoff::default(), 4);
        let expected = [0.2, 0.3, 0.45, 0.675];
        for (got, want) in seq.iter().zip(expected) {
            assert!((got - want).abs() < 1e-6, "got {got}, want {want}");
        }
    }

    #[test]
    fn test_sequence_is_non_decreasing_and_clamped() {
        let seq = secs(PollBackoff::default(), 40);
        for pair in seq.windows(2) {
            assert!(pair[1] >= pair[0]);
        }
        assert!(seq.iter().all(|s| *s <= 30.0));
        assert_eq!(*seq.last().unwrap(), 30.0);
    }

    #[test]
    fn test_zero_ceiling_keeps_seed() {
        let seq = secs(PollBackoff::new(Duration::ZERO), 5);
        assert!(seq.iter().all(|s| (s - 0.2).abs() < 1e-9));
    }

    #[test]
    fn test_custom_ceiling() {
        let seq = secs(PollBackoff::new(Duration::from_secs(1)), 10);
        assert_eq!(*seq.last().unwrap(), 1.0);
        assert!(seq.iter().all(|s| *s <= 1.0));
    }
}
