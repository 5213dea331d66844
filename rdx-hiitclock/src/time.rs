//! The periodic tick source that drives a running session.

use crate::session::SessionSnapshot;
use std::future::Future;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

/// Broadcast after every tick the engine processes while a session runs.
#[derive(Debug, Clone)]
pub struct TickEvent {
    /// Ticks drained since the session started.
    pub tick_count: u64,
    pub timestamp: Instant,
    /// The session state right after this tick.
    pub snapshot: SessionSnapshot,
}

/// An owned, cancellable periodic task.
///
/// The task is aborted when the `TickSource` is dropped, so releasing the
/// handle is all it takes to stop the ticks.
#[derive(Debug)]
pub(crate) struct TickSource {
    handle: JoinHandle<()>,
}

impl TickSource {
    /// Spawns a task that calls `on_tick` once per `period`, starting one
    /// period from now. The task ends as soon as `on_tick` resolves to `false`.
    pub(crate) fn spawn<F, Fut>(period: Duration, mut on_tick: F) -> Self
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = bool> + Send + 'static,
    {
        let mut ticker = interval_at(Instant::now() + period, period);
        // Every tick is a fixed quantum of countdown, so late ticks are
        // delivered in a burst rather than skipped.
        ticker.set_missed_tick_behavior(MissedTickBehavior::Burst);
        let handle = tokio::spawn(async move {
            loop {
                ticker.tick().await;
                if !on_tick().await {
                    break;
                }
            }
        });
        Self { handle }
    }

    #[cfg(test)]
    pub(crate) fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for TickSource {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    #[tokio::test(start_paused = true)]
    async fn fires_once_per_period_until_told_to_stop() {
        let count = Arc::new(AtomicU32::new(0));
        let counter = count.clone();
        let source = TickSource::spawn(Duration::from_millis(10), move || {
            let counter = counter.clone();
            async move { counter.fetch_add(1, Ordering::SeqCst) + 1 < 5 }
        });

        tokio::time::sleep(Duration::from_millis(25)).await;
        assert_eq!(count.load(Ordering::SeqCst), 2);

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(count.load(Ordering::SeqCst), 5);
        assert!(source.is_finished());
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_the_source_cancels_the_task() {
        let count = Arc::new(AtomicU32::new(0));
        let counter = count.clone();
        let source = TickSource::spawn(Duration::from_millis(10), move || {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                true
            }
        });

        tokio::time::sleep(Duration::from_millis(35)).await;
        drop(source);
        let seen = count.load(Ordering::SeqCst);
        assert_eq!(seen, 3);

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(count.load(Ordering::SeqCst), seen);
    }
}
