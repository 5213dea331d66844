//! Defines all public event types broadcast by the Hiitclock engine.
//!
//! This module acts as the public API for the engine's event system. A
//! presentation layer subscribes to these strongly-typed events instead of
//! polling the session.

use crate::common::Phase;
use crate::session::SessionSnapshot;
use tokio::sync::broadcast::{self, error::RecvError};
use tracing::warn;

/// Changes in the lifecycle of a training session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// `start()` moved the session into its first get-ready countdown.
    Started { snapshot: SessionSnapshot },
    /// `start()` was ignored because the workout has no sets to run.
    StartRejected,
    /// The countdown was frozen by `pause()`.
    Paused { snapshot: SessionSnapshot },
    /// The countdown continues after `resume()`.
    Resumed { snapshot: SessionSnapshot },
    /// A zero-crossing moved the session into a new phase.
    ///
    /// Zero-duration phases can produce several of these within one tick.
    PhaseChanged { from: Phase, snapshot: SessionSnapshot },
    /// An active session was cut short by `stop()` or `reconfigure()`.
    Stopped,
    /// The last exercise of the last set completed; the session is idle again.
    Finished { sets_completed: u32 },
    /// A new workout replaced the previous one.
    Reconfigured,
}

/// Receives the next event from a broadcast stream, skipping over anything the
/// receiver fell behind on.
///
/// A lag is logged and the receiver carries on from the oldest event still
/// buffered. Returns `None` only once every sender is gone.
pub async fn recv_skipping_lag<T: Clone>(rx: &mut broadcast::Receiver<T>) -> Option<T> {
    loop {
        match rx.recv().await {
            Ok(event) => return Some(event),
            Err(RecvError::Lagged(missed)) => {
                warn!("Event subscriber fell behind; {} event(s) skipped.", missed);
            }
            Err(RecvError::Closed) => return None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn lagging_receivers_resume_from_the_oldest_buffered_event() {
        let (tx, mut rx) = broadcast::channel(2);
        for n in 0..5 {
            tx.send(n).unwrap();
        }
        drop(tx);

        assert_eq!(recv_skipping_lag(&mut rx).await, Some(3));
        assert_eq!(recv_skipping_lag(&mut rx).await, Some(4));
        assert_eq!(recv_skipping_lag(&mut rx).await, None);
    }
}
