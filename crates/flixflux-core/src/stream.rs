//! Per-movie event streams.
//!
//! A stream is two independently advancing sequences paired index for
//! index: a periodic tick source and an unbounded generator yielding the
//! captured [`Movie`]. Tick *n* is paired with generated value *n*, and the
//! pair becomes a [`MovieEvent`] stamped by the [`Clock`] at that moment.
//! The generator never blocks, so cadence is set by the timer alone.
//!
//! Each subscription owns its own [`tokio::time::Interval`]. Dropping the
//! stream drops the interval, which deregisters the timer. [`ActiveTimers`]
//! counts intervals that are still alive so tests (and the API) can observe
//! that cancellation released them.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use flixflux_types::{Movie, MovieEvent, MovieId};
use futures::stream::{self, BoxStream, Stream, StreamExt};
use tokio::time::{Instant, Interval, MissedTickBehavior};

use crate::clock::Clock;

/// A boxed, lazily-started, unbounded stream of events for one movie.
pub type MovieEventStream = BoxStream<'static, MovieEvent>;

/// Shared count of live tick timers.
///
/// Cloning shares the count.
#[derive(Debug, Clone, Default)]
pub struct ActiveTimers {
    live: Arc<AtomicUsize>,
}

impl ActiveTimers {
    /// Create a counter starting at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of tick timers currently alive.
    pub fn count(&self) -> usize {
        self.live.load(Ordering::Acquire)
    }

    fn register(&self, movie_id: MovieId) -> TimerGuard {
        self.live.fetch_add(1, Ordering::AcqRel);
        TimerGuard {
            live: Arc::clone(&self.live),
            movie_id,
        }
    }
}

/// Keeps a timer counted in [`ActiveTimers`] until dropped.
#[derive(Debug)]
struct TimerGuard {
    live: Arc<AtomicUsize>,
    movie_id: MovieId,
}

impl Drop for TimerGuard {
    fn drop(&mut self) {
        self.live.fetch_sub(1, Ordering::AcqRel);
        tracing::debug!(movie_id = %self.movie_id, "Event stream cancelled, timer released");
    }
}

/// Build the periodic tick source.
///
/// The first tick fires one full `period` after this is called, not
/// immediately. Missed ticks are skipped rather than replayed, so a
/// consumer slower than the period sees fewer events instead of a burst.
/// Must be called from within a Tokio runtime.
fn tick_source(period: Duration, guard: TimerGuard) -> impl Stream<Item = Instant> + Send {
    let start = Instant::now()
        .checked_add(period)
        .unwrap_or_else(Instant::now);
    let mut interval: Interval = tokio::time::interval_at(start, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    stream::unfold((interval, guard), |(mut interval, guard)| async move {
        let fired_at = interval.tick().await;
        Some((fired_at, (interval, guard)))
    })
}

/// Unbounded stream of events for an already-resolved `movie`.
///
/// The movie is captured by value; later changes to the store do not
/// reach this stream.
pub fn movie_events(
    movie: Movie,
    period: Duration,
    clock: Arc<dyn Clock>,
    timers: &ActiveTimers,
) -> impl Stream<Item = MovieEvent> + Send + use<> {
    let guard = timers.register(movie.id.clone());
    let ticks = tick_source(period, guard);
    let generated = stream::repeat(movie);

    ticks
        .zip(generated)
        .map(move |(_tick, movie)| MovieEvent::new(movie, clock.now()))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::indexing_slicing)]

    use chrono::TimeDelta;
    use futures::FutureExt;

    use super::*;
    use crate::clock::TokioClock;

    const SECOND: Duration = Duration::from_secs(1);

    fn lambs() -> Movie {
        Movie::new("id1", "Silence of the Lambdas")
    }

    #[tokio::test(start_paused = true)]
    async fn first_event_after_one_period() {
        let timers = ActiveTimers::new();
        let clock = Arc::new(TokioClock::new());
        let start = clock.now();
        let mut events = Box::pin(movie_events(lambs(), SECOND, clock, &timers));

        let first = events.next().await.unwrap();
        assert_eq!(first.movie, lambs());
        let waited = first.date - start;
        assert!(waited >= TimeDelta::seconds(1), "fired early: {waited}");
        assert!(waited < TimeDelta::milliseconds(1010), "fired late: {waited}");
    }

    #[tokio::test(start_paused = true)]
    async fn events_are_one_period_apart_with_constant_movie() {
        let timers = ActiveTimers::new();
        let clock = Arc::new(TokioClock::new());
        let events: Vec<MovieEvent> = movie_events(lambs(), SECOND, clock, &timers)
            .take(5)
            .collect()
            .await;

        assert_eq!(events.len(), 5);
        for pair in events.windows(2) {
            assert_eq!(pair[0].movie, pair[1].movie);
            let gap = pair[1].date - pair[0].date;
            assert!(gap > TimeDelta::milliseconds(800), "gap too short: {gap}");
            assert!(gap < TimeDelta::milliseconds(1200), "gap too long: {gap}");
        }
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_stream_releases_timer() {
        let timers = ActiveTimers::new();
        let clock: Arc<dyn Clock> = Arc::new(TokioClock::new());

        let mut events = Box::pin(movie_events(lambs(), SECOND, Arc::clone(&clock), &timers));
        assert_eq!(timers.count(), 1);
        events.next().await.unwrap();
        assert_eq!(timers.count(), 1);

        drop(events);
        assert_eq!(timers.count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn repeated_subscribe_cancel_cycles_do_not_leak() {
        let timers = ActiveTimers::new();
        let clock: Arc<dyn Clock> = Arc::new(TokioClock::new());

        for _ in 0..50 {
            let mut events = Box::pin(movie_events(lambs(), SECOND, Arc::clone(&clock), &timers));
            events.next().await.unwrap();
        }
        assert_eq!(timers.count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn independent_streams_each_hold_a_timer() {
        let timers = ActiveTimers::new();
        let clock: Arc<dyn Clock> = Arc::new(TokioClock::new());

        let a = movie_events(lambs(), SECOND, Arc::clone(&clock), &timers);
        let b = movie_events(Movie::new("id2", "AEon Flux"), SECOND, clock, &timers);
        assert_eq!(timers.count(), 2);

        drop(a);
        assert_eq!(timers.count(), 1);
        drop(b);
        assert_eq!(timers.count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn slow_consumer_gets_no_burst() {
        let timers = ActiveTimers::new();
        let clock = Arc::new(TokioClock::new());
        let mut events = Box::pin(movie_events(lambs(), SECOND, clock, &timers));

        events.next().await.unwrap();

        // Stall for several periods without polling.
        tokio::time::sleep(Duration::from_millis(5500)).await;

        // One event is ready immediately, the missed ones are not replayed.
        assert!(events.next().now_or_never().flatten().is_some());
        assert!(events.next().now_or_never().is_none());
    }
}
