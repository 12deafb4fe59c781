//! Periodic tick scheduling for the countdown

use std::{fmt, time::Duration};
use tokio::{
    task::JoinHandle,
    time::{interval_at, Instant, MissedTickBehavior},
};
use tracing::debug;

/// Callback fired on every tick with the 1-based tick index
pub type TickCallback = Box<dyn FnMut(u64) + Send + 'static>;

/// Callback fired once after the last tick
pub type CompleteCallback = Box<dyn FnOnce() + Send + 'static>;

/// Something that can fire a callback every `interval`, `repetitions` times,
/// and then fire a completion callback
pub trait TickScheduler: Send + Sync + fmt::Debug {
    fn schedule(
        &self,
        interval: Duration,
        repetitions: u64,
        on_tick: TickCallback,
        on_complete: CompleteCallback,
    ) -> TickerHandle;
}

/// Handle to a scheduled ticker
///
/// Dropping the handle does not stop the ticker, call `cancel` for that.
#[derive(Debug)]
pub struct TickerHandle {
    task: JoinHandle<()>,
}

impl TickerHandle {
    pub fn new(task: JoinHandle<()>) -> Self {
        Self { task }
    }

    /// Stop the ticker; no further tick or completion callbacks fire
    pub fn cancel(&self) {
        self.task.abort();
    }

    /// Whether the ticker completed or was cancelled
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

/// Scheduler backed by a tokio task and `tokio::time::interval`
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioScheduler;

impl TokioScheduler {
    pub fn new() -> Self {
        Self
    }
}

impl TickScheduler for TokioScheduler {
    fn schedule(
        &self,
        interval: Duration,
        repetitions: u64,
        mut on_tick: TickCallback,
        on_complete: CompleteCallback,
    ) -> TickerHandle {
        // interval_at panics on a zero period
        let period = interval.max(Duration::from_millis(1));
        debug!("Scheduling {} ticks every {:?}", repetitions, period);

        // The first tick is one period after scheduling, not after the task is first polled
        let first = Instant::now() + period;
        let task = tokio::spawn(async move {
            let mut ticks = interval_at(first, period);
            // Late ticks are delivered in a burst so the count matches elapsed time
            ticks.set_missed_tick_behavior(MissedTickBehavior::Burst);

            for tick in 1..=repetitions {
                ticks.tick().await;
                on_tick(tick);
            }

            on_complete();
        });

        TickerHandle::new(task)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{
        atomic::{AtomicBool, AtomicU64, Ordering},
        Arc,
    };
    use tokio::time::advance;

    fn counters() -> (Arc<AtomicU64>, Arc<AtomicBool>) {
        (Arc::new(AtomicU64::new(0)), Arc::new(AtomicBool::new(false)))
    }

    async fn settle() {
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
    }

    fn schedule(
        repetitions: u64,
        ticks: &Arc<AtomicU64>,
        done: &Arc<AtomicBool>,
    ) -> TickerHandle {
        let ticks = Arc::clone(ticks);
        let done = Arc::clone(done);
        TokioScheduler::new().schedule(
            Duration::from_secs(1),
            repetitions,
            Box::new(move |n| {
                ticks.store(n, Ordering::SeqCst);
            }),
            Box::new(move || done.store(true, Ordering::SeqCst)),
        )
    }

    #[tokio::test(start_paused = true)]
    async fn fires_once_per_interval_then_completes() {
        let (ticks, done) = counters();
        let handle = schedule(3, &ticks, &done);

        settle().await;
        assert_eq!(ticks.load(Ordering::SeqCst), 0);

        advance(Duration::from_secs(1)).await;
        settle().await;
        assert_eq!(ticks.load(Ordering::SeqCst), 1);
        assert!(!done.load(Ordering::SeqCst));

        advance(Duration::from_secs(2)).await;
        settle().await;
        assert_eq!(ticks.load(Ordering::SeqCst), 3);
        assert!(done.load(Ordering::SeqCst));
        assert!(handle.is_finished());
    }

    #[tokio::test(start_paused = true)]
    async fn zero_repetitions_complete_immediately() {
        let (ticks, done) = counters();
        let _handle = schedule(0, &ticks, &done);
        settle().await;
        assert_eq!(ticks.load(Ordering::SeqCst), 0);
        assert!(done.load(Ordering::SeqCst));
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_stops_further_callbacks() {
        let (ticks, done) = counters();
        let handle = schedule(5, &ticks, &done);

        advance(Duration::from_secs(2)).await;
        settle().await;
        assert_eq!(ticks.load(Ordering::SeqCst), 2);

        handle.cancel();
        advance(Duration::from_secs(10)).await;
        settle().await;
        assert_eq!(ticks.load(Ordering::SeqCst), 2);
        assert!(!done.load(Ordering::SeqCst));
        assert!(handle.is_finished());
    }
}
