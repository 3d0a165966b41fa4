//! Exponential backoff schedule used to pace retries.
//!
//! One [`ExponentialBackoff`] is created per outbound operation and
//! consumed by the retry loop; schedules are never shared between calls.
//! Growth is exponential with randomized jitter, capped per interval, and
//! optionally bounded by a maximum elapsed time after which the schedule
//! stops producing intervals.

use std::time::{Duration, Instant};

use rand::Rng;

/// Default wait before the first retry.
pub const DEFAULT_INITIAL_INTERVAL: Duration = Duration::from_millis(500);

/// Default multiplicative growth factor per retry.
const DEFAULT_MULTIPLIER: f64 = 1.5;

/// Default jitter applied to each interval (`±50%`).
const DEFAULT_RANDOMIZATION_FACTOR: f64 = 0.5;

/// Default cap on a single interval.
const DEFAULT_MAX_INTERVAL: Duration = Duration::from_secs(60);

/// A stateful schedule of retry wait durations.
///
/// [`next_backoff`](Self::next_backoff) yields successive jittered
/// intervals, returning `None` once the cumulative elapsed time since the
/// schedule was created would exceed the configured budget.
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
/// use ti_client::ExponentialBackoff;
///
/// // Bounded schedule: gives up after ten minutes.
/// let mut backoff = ExponentialBackoff::new(Duration::from_secs(600));
/// assert!(backoff.next_backoff().is_some());
///
/// // A zero budget means unbounded retries.
/// let mut infinite = ExponentialBackoff::new(Duration::ZERO);
/// assert!(infinite.next_backoff().is_some());
/// ```
#[derive(Debug)]
pub struct ExponentialBackoff {
    current_interval: Duration,
    multiplier: f64,
    randomization_factor: f64,
    max_interval: Duration,
    max_elapsed: Option<Duration>,
    start: Instant,
}

impl ExponentialBackoff {
    /// Creates a schedule bounded by `max_elapsed` total time.
    ///
    /// `Duration::ZERO` means unbounded: the schedule never stops.
    #[must_use]
    pub fn new(max_elapsed: Duration) -> Self {
        Self::with_initial_interval(DEFAULT_INITIAL_INTERVAL, max_elapsed)
    }

    /// Creates a schedule with a custom first interval.
    #[must_use]
    pub fn with_initial_interval(initial_interval: Duration, max_elapsed: Duration) -> Self {
        Self {
            current_interval: initial_interval,
            multiplier: DEFAULT_MULTIPLIER,
            randomization_factor: DEFAULT_RANDOMIZATION_FACTOR,
            max_interval: DEFAULT_MAX_INTERVAL,
            max_elapsed: if max_elapsed.is_zero() {
                None
            } else {
                Some(max_elapsed)
            },
            start: Instant::now(),
        }
    }

    /// Returns the next wait duration, or `None` once the elapsed-time
    /// budget would be exceeded.
    pub fn next_backoff(&mut self) -> Option<Duration> {
        let interval = self.current_interval;
        self.current_interval = Duration::from_secs_f64(
            (interval.as_secs_f64() * self.multiplier).min(self.max_interval.as_secs_f64()),
        );

        let next = Self::randomize(interval, self.randomization_factor);
        if let Some(max_elapsed) = self.max_elapsed {
            if self.start.elapsed() + next > max_elapsed {
                return None;
            }
        }
        Some(next)
    }

    /// Picks a uniformly random duration in
    /// `[interval * (1 - factor), interval * (1 + factor)]`.
    fn randomize(interval: Duration, factor: f64) -> Duration {
        if factor <= 0.0 || interval.is_zero() {
            return interval;
        }
        let delta = interval.as_secs_f64() * factor;
        let low = interval.as_secs_f64() - delta;
        let high = interval.as_secs_f64() + delta;
        Duration::from_secs_f64(rand::thread_rng().gen_range(low..=high))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_interval_within_jitter_range() {
        let mut backoff =
            ExponentialBackoff::with_initial_interval(Duration::from_millis(100), Duration::ZERO);
        let next = backoff.next_backoff().unwrap();
        assert!(next >= Duration::from_millis(50), "got {next:?}");
        assert!(next <= Duration::from_millis(150), "got {next:?}");
    }

    #[test]
    fn test_intervals_grow_exponentially() {
        let mut backoff =
            ExponentialBackoff::with_initial_interval(Duration::from_millis(100), Duration::ZERO);
        backoff.next_backoff();
        backoff.next_backoff();
        // After two draws the raw interval is 100ms * 1.5^2.
        assert_eq!(backoff.current_interval, Duration::from_millis(225));
    }

    #[test]
    fn test_interval_is_capped() {
        let mut backoff =
            ExponentialBackoff::with_initial_interval(Duration::from_secs(50), Duration::ZERO);
        for _ in 0..10 {
            backoff.next_backoff();
        }
        assert_eq!(backoff.current_interval, DEFAULT_MAX_INTERVAL);
    }

    #[test]
    fn test_zero_budget_means_unbounded() {
        let mut backoff =
            ExponentialBackoff::with_initial_interval(Duration::from_millis(1), Duration::ZERO);
        for _ in 0..1000 {
            assert!(backoff.next_backoff().is_some());
        }
    }

    #[test]
    fn test_stops_once_budget_would_be_exceeded() {
        // The first jittered interval is at least 25ms, well past a 10ms
        // budget, so the schedule must stop immediately.
        let mut backoff = ExponentialBackoff::with_initial_interval(
            Duration::from_millis(50),
            Duration::from_millis(10),
        );
        assert!(backoff.next_backoff().is_none());
    }

    #[test]
    fn test_bounded_schedule_eventually_stops() {
        let mut backoff = ExponentialBackoff::with_initial_interval(
            Duration::from_millis(40),
            Duration::from_millis(100),
        );
        let mut stopped = false;
        for _ in 0..64 {
            if backoff.next_backoff().is_none() {
                stopped = true;
                break;
            }
        }
        assert!(stopped);
    }
}
