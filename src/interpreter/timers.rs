//! Backing store for `setTimeout`/`setInterval`/`clearTimeout`/
//! `clearInterval` (§4.E). One real OS thread per pending timer sleeps for
//! its delay and signals a bare `u64` id back over an `mpsc::channel` —
//! never the callback `Value` itself, since `Value` (a `Gc` handle into a
//! thread-local heap) is not `Send`. The callback stays in `pending` on
//! the interpreter's own thread and only ever runs when
//! `Interpreter::pump_background` drains it, so a timer callback can never
//! interleave with whatever the script itself is doing (§5).

use crate::value::Value;
use rustc_hash::FxHashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::time::Duration;

struct Pending {
    callback: Value,
    args: Vec<Value>,
    /// `Some` for `setInterval`, re-armed after every fire; `None` for a
    /// one-shot `setTimeout`, removed from `pending` after it fires once.
    interval: Option<Duration>,
    cancelled: Arc<AtomicBool>,
    seq: u64,
}

pub struct TimerQueue {
    next_id: u64,
    next_seq: u64,
    pending: FxHashMap<u64, Pending>,
    tx: Sender<u64>,
    rx: Receiver<u64>,
}

impl TimerQueue {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        TimerQueue { next_id: 1, next_seq: 0, pending: FxHashMap::default(), tx, rx }
    }

    fn spawn(&self, id: u64, delay: Duration, cancelled: Arc<AtomicBool>) {
        let tx = self.tx.clone();
        std::thread::spawn(move || {
            std::thread::sleep(delay);
            if !cancelled.load(Ordering::SeqCst) {
                let _ = tx.send(id);
            }
        });
    }

    pub fn set_timeout(&mut self, callback: Value, args: Vec<Value>, delay_ms: f64) -> u64 {
        self.schedule(callback, args, delay_ms, None)
    }

    pub fn set_interval(&mut self, callback: Value, args: Vec<Value>, delay_ms: f64) -> u64 {
        let interval = Duration::from_secs_f64(delay_ms.max(0.0) / 1000.0);
        self.schedule(callback, args, delay_ms, Some(interval))
    }

    fn schedule(&mut self, callback: Value, args: Vec<Value>, delay_ms: f64, interval: Option<Duration>) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        let seq = self.next_seq;
        self.next_seq += 1;
        let cancelled = Arc::new(AtomicBool::new(false));
        let delay = Duration::from_secs_f64(delay_ms.max(0.0) / 1000.0);
        self.spawn(id, delay, cancelled.clone());
        self.pending.insert(id, Pending { callback, args, interval, cancelled, seq });
        id
    }

    /// Idempotent and race-free (§5): clearing an id that never existed,
    /// was already cleared, or already fired and was reaped is a no-op —
    /// there's no window where a second `clear` of the same id does
    /// anything observable.
    pub fn clear(&mut self, id: u64) {
        if let Some(pending) = self.pending.remove(&id) {
            pending.cancelled.store(true, Ordering::SeqCst);
        }
    }

    /// Drains every id whose background thread has signalled since the
    /// last poll, sorted by insertion sequence so ties between timers that
    /// happened to fire in the same poll resolve in scheduling order (§5
    /// "fire in non-decreasing deadline order; ties resolved in insertion
    /// order") regardless of which background thread's `sleep` happened to
    /// wake first. Interval timers are rearmed for their next tick before
    /// their callback is returned, so a callback that calls
    /// `clearInterval` on itself observes its own timer as still pending
    /// exactly once more (matching `setInterval`'s usual semantics) rather
    /// than racing the rearm.
    pub fn drain_ready(&mut self) -> Vec<(Value, Vec<Value>)> {
        let mut ready_ids: Vec<u64> = self.rx.try_iter().collect();
        ready_ids.sort_by_key(|id| self.pending.get(id).map(|p| p.seq).unwrap_or(u64::MAX));

        let mut fired = Vec::new();
        for id in ready_ids {
            let Some(pending) = self.pending.get(&id) else { continue };
            if pending.cancelled.load(Ordering::SeqCst) {
                self.pending.remove(&id);
                continue;
            }
            fired.push((pending.callback.clone(), pending.args.clone()));
            match pending.interval {
                Some(interval) => self.spawn(id, interval, pending.cancelled.clone()),
                None => {
                    self.pending.remove(&id);
                }
            }
        }
        fired
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

impl Default for TimerQueue {
    fn default() -> Self {
        Self::new()
    }
}
