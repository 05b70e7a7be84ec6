//! Main-thread side of the `Worker` bridge (§4.E). Each live worker owns a
//! real OS thread running its own independent `Realm`/`Interpreter` — sound
//! because the `gc` heap is thread-local, so no `Gc<ValueData>` ever
//! crosses a thread boundary. Only `serde_json::Value` (which *is* `Send`)
//! travels over the channel in either direction, converted at each end
//! through `facade::json`'s bridge.

use crate::value::Value;
use std::sync::mpsc::Receiver;

pub struct WorkerHandle {
    pub from_worker: Receiver<serde_json::Value>,
    /// The JS-visible `Worker` instance on the parent side; dispatch reads
    /// its `onmessage` property and `"message"` listeners off of this.
    pub worker_value: Value,
}

#[derive(Default)]
pub struct WorkerRegistry {
    handles: Vec<WorkerHandle>,
}

impl WorkerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, handle: WorkerHandle) {
        self.handles.push(handle);
    }

    /// Drops handles whose worker thread has terminated and the channel
    /// has gone empty *and* disconnected, so a long-running program
    /// doesn't accumulate dead entries.
    pub fn drain_ready(&mut self) -> Vec<(Value, serde_json::Value)> {
        let mut out = Vec::new();
        self.handles.retain(|handle| {
            loop {
                match handle.from_worker.try_recv() {
                    Ok(msg) => out.push((handle.worker_value.clone(), msg)),
                    Err(std::sync::mpsc::TryRecvError::Empty) => return true,
                    Err(std::sync::mpsc::TryRecvError::Disconnected) => return false,
                }
            }
        });
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::undefined;
    use std::sync::mpsc;

    #[test]
    fn drain_ready_collects_pending_messages_and_keeps_live_handle() {
        let (tx, rx) = mpsc::channel();
        tx.send(serde_json::json!({"x": 1})).unwrap();
        let mut registry = WorkerRegistry::new();
        registry.register(WorkerHandle { from_worker: rx, worker_value: undefined() });
        let drained = registry.drain_ready();
        assert_eq!(drained.len(), 1);
        assert_eq!(registry.handles.len(), 1);
    }

    #[test]
    fn disconnected_handle_is_dropped_after_draining() {
        let (tx, rx) = mpsc::channel();
        tx.send(serde_json::json!(1)).unwrap();
        drop(tx);
        let mut registry = WorkerRegistry::new();
        registry.register(WorkerHandle { from_worker: rx, worker_value: undefined() });
        let drained = registry.drain_ready();
        assert_eq!(drained.len(), 1);
        assert!(registry.handles.is_empty());
    }

    #[test]
    fn empty_channel_yields_no_messages() {
        let (_tx, rx) = mpsc::channel();
        let mut registry = WorkerRegistry::new();
        registry.register(WorkerHandle { from_worker: rx, worker_value: undefined() });
        assert!(registry.drain_ready().is_empty());
        assert_eq!(registry.handles.len(), 1);
    }
}
