//! Wall-clock sources for stamping movie events.
//!
//! Every event carries the wall-clock time of the tick that produced it.
//! [`SystemClock`] reads the system time directly. [`TokioClock`] anchors
//! one system-time reading to the Tokio monotonic clock, so its readings
//! never go backwards and follow Tokio's paused time in tests.

use chrono::{DateTime, TimeDelta, Utc};
use tokio::time::Instant;

/// A source of wall-clock timestamps.
pub trait Clock: Send + Sync {
    /// The current time.
    fn now(&self) -> DateTime<Utc>;
}

/// Reads [`Utc::now`] on every call.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Wall clock derived from the Tokio monotonic clock.
///
/// Captures `(Utc::now(), Instant::now())` at construction and reports
/// the anchor plus elapsed monotonic time.
#[derive(Debug, Clone, Copy)]
pub struct TokioClock {
    wall_anchor: DateTime<Utc>,
    mono_anchor: Instant,
}

impl TokioClock {
    /// Anchor a new clock at the current instant.
    pub fn new() -> Self {
        Self::anchored_at(Utc::now())
    }

    /// Anchor a new clock so that "now" reads as `wall`.
    pub fn anchored_at(wall: DateTime<Utc>) -> Self {
        Self {
            wall_anchor: wall,
            mono_anchor: Instant::now(),
        }
    }
}

impl Default for TokioClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for TokioClock {
    fn now(&self) -> DateTime<Utc> {
        let elapsed = Instant::now().saturating_duration_since(self.mono_anchor);
        TimeDelta::from_std(elapsed)
            .ok()
            .and_then(|delta| self.wall_anchor.checked_add_signed(delta))
            .unwrap_or(self.wall_anchor)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[tokio::test(start_paused = true)]
    async fn tokio_clock_follows_paused_time() {
        let clock = TokioClock::new();
        let start = clock.now();

        tokio::time::advance(Duration::from_millis(1500)).await;

        assert_eq!(clock.now() - start, TimeDelta::milliseconds(1500));
    }

    #[tokio::test(start_paused = true)]
    async fn tokio_clock_reads_anchor_before_any_advance() {
        let anchor = Utc::now();
        let clock = TokioClock::anchored_at(anchor);
        assert_eq!(clock.now(), anchor);
    }

    #[test]
    fn system_clock_is_monotone_enough() {
        let clock = SystemClock;
        let a = clock.now();
        let b = clock.now();
        assert!(b >= a);
    }
}
