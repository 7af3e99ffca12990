//! Tokio-backed [`ScrollTimer`].
//!
//! The tick itself runs as a spawned task driving `tokio::time::interval`
//! and posts [`ScrollTick`] messages into an unbounded channel that the UI
//! loop drains. Stopping (or dropping) the timer aborts the task, so no
//! tick can be produced once the owning viewport is gone.

use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::collab::ScrollTimer;

/// Message posted on every tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollTick;

pub struct IntervalTimer {
    runtime: Handle,
    tick_tx: mpsc::UnboundedSender<ScrollTick>,
    task: Option<JoinHandle<()>>,
}

impl IntervalTimer {
    /// Create a timer that spawns onto `runtime` and reports through `tick_tx`.
    pub fn new(runtime: Handle, tick_tx: mpsc::UnboundedSender<ScrollTick>) -> Self {
        Self {
            runtime,
            tick_tx,
            task: None,
        }
    }

    /// Create a timer plus the receiver the UI loop should poll.
    pub fn with_channel(runtime: Handle) -> (Self, mpsc::UnboundedReceiver<ScrollTick>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(runtime, tx), rx)
    }
}

impl ScrollTimer for IntervalTimer {
    fn start(&mut self, period: Duration) {
        if self.task.is_some() {
            return;
        }

        let tx = self.tick_tx.clone();
        self.task = Some(self.runtime.spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            // The first tick completes immediately; the first scroll step
            // happens one period after the pointer reached the edge.
            interval.tick().await;
            loop {
                interval.tick().await;
                if tx.send(ScrollTick).is_err() {
                    break;
                }
            }
        }));
    }

    fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }

    fn is_running(&self) -> bool {
        self.task.is_some()
    }
}

impl Drop for IntervalTimer {
    fn drop(&mut self) {
        self.stop();
    }
}
