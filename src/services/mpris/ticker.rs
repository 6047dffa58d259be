//! Pausable periodic clock that advances a player's position between
//! authoritative updates.

use std::{sync::Arc, time::Duration};

use futures::future::BoxFuture;
use tokio::{
    sync::{oneshot, watch},
    task::JoinHandle,
    time::{Instant, MissedTickBehavior},
};
use tracing::trace;

/// Work run on every tick
pub type TickCallback = Arc<dyn Fn() -> BoxFuture<'static, ()> + Send + Sync>;

/// Lifecycle state of a [`ResumableTicker`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickerState {
    /// Not firing
    Idle,
    /// Firing once per period (possibly still waiting out an initial delay)
    Running,
    /// Stopped with the unelapsed part of the period remembered
    Paused,
}

struct Worker {
    done: oneshot::Sender<()>,
    handle: JoinHandle<()>,
}

/// Periodic clock with start, pause, resume and stop transitions.
///
/// Each running ticker owns exactly one worker task. Transitions that are not
/// valid from the current state are no-ops, and delays are waited out inside
/// the worker so callers never block.
pub struct ResumableTicker {
    period: Duration,
    callback: TickCallback,
    state: TickerState,
    remaining: Duration,
    checkpoint: Arc<watch::Sender<Instant>>,
    worker: Option<Worker>,
}

impl ResumableTicker {
    /// Create an idle ticker that will invoke `callback` once per `period`.
    pub fn new(period: Duration, callback: TickCallback) -> Self {
        let (checkpoint, _) = watch::channel(Instant::now());
        Self {
            period,
            callback,
            state: TickerState::Idle,
            remaining: Duration::ZERO,
            checkpoint: Arc::new(checkpoint),
            worker: None,
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> TickerState {
        self.state
    }

    /// Unelapsed part of the period recorded by the last pause.
    pub fn remaining(&self) -> Duration {
        self.remaining
    }

    /// Instant of the last start or fire.
    pub fn checkpoint(&self) -> Instant {
        *self.checkpoint.borrow()
    }

    /// Start firing once per period. Only valid from `Idle`.
    pub fn start(&mut self) {
        if self.state != TickerState::Idle {
            return;
        }
        self.spawn(Duration::ZERO);
    }

    /// Halt firing and remember how much of the period was left. Only valid
    /// from `Running`; the remainder never goes below zero.
    pub fn pause(&mut self) {
        if self.state != TickerState::Running {
            return;
        }
        let elapsed = self.checkpoint().elapsed();
        self.remaining = self.remaining.saturating_sub(elapsed);
        self.halt();
        self.state = TickerState::Paused;
        trace!(remaining = ?self.remaining, "ticker paused");
    }

    /// Start again once the remembered remainder has passed. Only valid from
    /// `Paused`.
    pub fn resume(&mut self) {
        if self.state != TickerState::Paused {
            return;
        }
        self.halt();
        self.spawn(self.remaining);
    }

    /// After `delay`, resume a paused ticker or start an idle one. A running
    /// ticker is left alone.
    pub fn resume_or_start_after(&mut self, delay: Duration) {
        match self.state {
            TickerState::Running => {}
            TickerState::Paused => {
                self.halt();
                self.spawn(delay + self.remaining);
            }
            TickerState::Idle => self.spawn(delay),
        }
    }

    /// Like [`resume_or_start_after`](Self::resume_or_start_after), but a
    /// running ticker is restarted so its next period begins after `delay`.
    pub fn restart_after(&mut self, delay: Duration) {
        if self.state == TickerState::Running {
            self.halt();
            self.spawn(delay);
        } else {
            self.resume_or_start_after(delay);
        }
    }

    /// Halt firing and return to `Idle`. Safe to call repeatedly.
    pub fn stop(&mut self) {
        if self.state == TickerState::Idle {
            return;
        }
        self.halt();
        self.state = TickerState::Idle;
        trace!("ticker stopped");
    }

    fn halt(&mut self) {
        if let Some(worker) = self.worker.take() {
            let _ = worker.done.send(());
            worker.handle.abort();
        }
    }

    fn spawn(&mut self, delay: Duration) {
        let (done, done_rx) = oneshot::channel();
        self.checkpoint.send_replace(Instant::now());

        let handle = tokio::spawn(run_worker(
            self.period,
            delay,
            Arc::clone(&self.callback),
            Arc::clone(&self.checkpoint),
            done_rx,
        ));

        self.worker = Some(Worker { done, handle });
        self.state = TickerState::Running;
        trace!(?delay, period = ?self.period, "ticker running");
    }
}

impl Drop for ResumableTicker {
    fn drop(&mut self) {
        self.halt();
    }
}

async fn run_worker(
    period: Duration,
    delay: Duration,
    callback: TickCallback,
    checkpoint: Arc<watch::Sender<Instant>>,
    mut done: oneshot::Receiver<()>,
) {
    tokio::select! {
        _ = &mut done => return,
        () = tokio::time::sleep(delay) => {}
    }

    let started = Instant::now();
    checkpoint.send_replace(started);

    let mut interval = tokio::time::interval_at(started + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = &mut done => return,
            _ = interval.tick() => {
                checkpoint.send_replace(Instant::now());
                callback().await;
            }
        }
    }
}
