//! Busy tracking and the spinner ticker.
//!
//! All busy/animation state lives in one `watch` channel. Leaf activations
//! mark a node busy and clear it through a [`BusyHandle`]; the ticker task
//! advances frames through the same sender. Readers take a snapshot with
//! `borrow()`, so no node-level lock exists and the widget lock is never
//! taken from inside the channel.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use log::{debug, trace};
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::LOG_TARGET;

/// Busy bookkeeping for one node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct BusyState {
    /// Activations whose callback has not finished yet.
    in_flight: usize,
    /// Current spinner frame.
    frame: usize,
}

/// Point-in-time view of every busy node, keyed by node ID.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BusySnapshot {
    nodes: HashMap<String, BusyState>,
}

impl BusySnapshot {
    pub fn is_busy(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn frame(&self, id: &str) -> Option<usize> {
        self.nodes.get(id).map(|state| state.frame)
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Write access to the busy channel.
#[derive(Debug, Clone)]
pub struct BusyHandle {
    tx: Arc<watch::Sender<BusySnapshot>>,
}

impl BusyHandle {
    fn new() -> Self {
        let (tx, _rx) = watch::channel(BusySnapshot::default());
        Self { tx: Arc::new(tx) }
    }

    /// Mark a node busy. The first activation restarts its animation.
    pub fn begin(&self, id: &str) {
        self.tx.send_modify(|snapshot| {
            let state = snapshot.nodes.entry(id.to_string()).or_default();
            if state.in_flight == 0 {
                state.frame = 0;
            }
            state.in_flight += 1;
        });
    }

    /// Record that one activation of a node finished.
    pub fn finish(&self, id: &str) {
        self.tx.send_if_modified(|snapshot| {
            let Some(state) = snapshot.nodes.get_mut(id) else {
                return false;
            };
            state.in_flight = state.in_flight.saturating_sub(1);
            if state.in_flight == 0 {
                snapshot.nodes.remove(id);
            }
            true
        });
    }

    /// Step every busy node to its next frame. Returns whether any moved.
    pub fn advance(&self, frame_count: usize) -> bool {
        if frame_count == 0 {
            return false;
        }
        self.tx.send_if_modified(|snapshot| {
            for state in snapshot.nodes.values_mut() {
                state.frame = (state.frame + 1) % frame_count;
            }
            !snapshot.nodes.is_empty()
        })
    }

    pub fn with_snapshot<R>(&self, f: impl FnOnce(&BusySnapshot) -> R) -> R {
        f(&self.tx.borrow())
    }

    pub fn subscribe(&self) -> watch::Receiver<BusySnapshot> {
        self.tx.subscribe()
    }
}

/// Owns the busy channel and the periodic task that animates it.
#[derive(Debug)]
pub struct SpinnerScheduler {
    busy: BusyHandle,
    cancel: CancellationToken,
    stopped: AtomicBool,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl SpinnerScheduler {
    /// Start the scheduler on `runtime`.
    ///
    /// With no frames to show, busy tracking still works but no ticker runs.
    pub fn start(runtime: &Handle, frame_count: usize, interval: Duration, debug_logging: bool) -> Self {
        let busy = BusyHandle::new();
        let cancel = CancellationToken::new();

        let task = (frame_count > 0).then(|| {
            runtime.spawn(run_ticker(
                busy.clone(),
                frame_count,
                interval,
                cancel.clone(),
                debug_logging,
            ))
        });

        Self {
            busy,
            cancel,
            stopped: AtomicBool::new(false),
            task: Mutex::new(task),
        }
    }

    pub fn busy(&self) -> &BusyHandle {
        &self.busy
    }

    /// Signal the ticker to exit. Only the first call has an effect.
    pub fn stop(&self) -> bool {
        if self.stopped.swap(true, Ordering::SeqCst) {
            debug!(target: LOG_TARGET, "spinner already stopped");
            return false;
        }
        self.cancel.cancel();
        true
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }

    /// Whether the ticker task has exited (or never ran).
    pub fn is_finished(&self) -> bool {
        self.task
            .lock()
            .map(|task| task.as_ref().is_none_or(JoinHandle::is_finished))
            .unwrap_or(true)
    }
}

impl Drop for SpinnerScheduler {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

async fn run_ticker(
    busy: BusyHandle,
    frame_count: usize,
    period: Duration,
    cancel: CancellationToken,
    debug_logging: bool,
) {
    let mut interval = tokio::time::interval_at(Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            _ = interval.tick() => {
                if busy.advance(frame_count) && debug_logging {
                    trace!(target: LOG_TARGET, "spinner frames advanced");
                }
            }
        }
    }
    debug!(target: LOG_TARGET, "spinner ticker stopped");
}
