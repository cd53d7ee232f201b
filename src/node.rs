//! The per-node causal replication engine: Clock + Store + Buffer behind one mutex, and the three
//! ingress entry points (`local_write`, `remote_receive`, `read`) that mutate them atomically.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::clock::{PeerId, VectorClock};
use crate::delivery::is_deliverable;
use crate::error::NodeError;
use crate::protocol::ReplicaMessage;
use crate::store::Store;

/// The mutable state a single mutex guards as one atomic unit.
struct NodeState {
    clock: VectorClock,
    store: Store,
    buffer: Vec<ReplicaMessage>,
}

/// A write that has been committed locally and is ready for the [`crate::replicator::Replicator`]
/// to fan out to every peer.
pub struct AppliedWrite {
    pub key: String,
    pub value: serde_json::Value,
    pub timestamp: VectorClock,
}

/// A node's identity and causal engine. Cheaply cloneable (an `Arc` handle) so both the HTTP
/// handlers and the background buffer watcher can share it.
#[derive(Clone)]
pub struct Node {
    pub id: PeerId,
    state: Arc<Mutex<NodeState>>,
}

impl Node {
    pub fn new(id: PeerId, peers: Vec<PeerId>) -> Self {
        let clock = VectorClock::zeroed(peers.iter());
        Self {
            id,
            state: Arc::new(Mutex::new(NodeState {
                clock,
                store: Store::new(),
                buffer: Vec::new(),
            })),
        }
    }

    /// Accepts a local client write. Merges `context` (if any) into the clock, commits to the
    /// store, ticks the local clock entry, and returns a snapshot of the clock at commit time.
    ///
    /// The caller is responsible for handing the returned snapshot, together with `key`/`value`,
    /// to the [`crate::replicator::Replicator`] — that fan-out happens outside this call so the
    /// mutex is never held across network I/O.
    pub async fn local_write(
        &self,
        key: String,
        value: serde_json::Value,
        context: Option<VectorClock>,
    ) -> Result<AppliedWrite, NodeError> {
        if key.is_empty() {
            return Err(NodeError::BadInput("key must not be empty".to_string()));
        }

        let mut state = self.state.lock().await;
        if let Some(context) = &context {
            state.clock.merge(context);
        }
        state.store.put(key.clone(), value.clone());
        state.clock.tick(&self.id);
        let timestamp = state.clock.snapshot();
        drop(state);

        info!(node = %self.id, %key, clock = ?timestamp, "local write committed");
        Ok(AppliedWrite { key, value, timestamp })
    }

    /// Accepts a replica message from another node. Applies it immediately if the delivery
    /// predicate permits, otherwise parks it in the buffer for the watcher to retry later.
    ///
    /// Returns `true` if the message was applied now, `false` if it was buffered. Either way this
    /// never fails: receipt is always acknowledged, delivery is a separate, eventual concern.
    pub async fn remote_receive(&self, message: ReplicaMessage) -> bool {
        let mut state = self.state.lock().await;
        if is_deliverable(&message.timestamp, &message.sender, &state.clock) {
            apply(&mut state, &message);
            true
        } else {
            debug!(node = %self.id, sender = %message.sender, key = %message.key, "buffering non-deliverable replica");
            state.buffer.push(message);
            false
        }
    }

    /// Reads the current value at `key` and a snapshot of the node's clock. Never blocks on
    /// replication; absent keys read as `null` alongside the current clock.
    pub async fn read(&self, key: &str) -> (serde_json::Value, VectorClock) {
        let state = self.state.lock().await;
        let value = state.store.get(key).cloned().unwrap_or(serde_json::Value::Null);
        (value, state.clock.snapshot())
    }

    /// A snapshot of the node's clock, for `/health`.
    pub async fn clock_snapshot(&self) -> VectorClock {
        self.state.lock().await.clock.snapshot()
    }

    /// Runs one buffer sweep: re-evaluates every buffered message against the current clock,
    /// applying whichever are now deliverable. Loops to a fixed point within the sweep, since
    /// applying one message may advance the clock enough to unblock another buffered message
    /// examined earlier in the same pass.
    pub async fn sweep_buffer(&self) -> usize {
        let mut state = self.state.lock().await;
        let mut applied_count = 0;
        loop {
            let pending = std::mem::take(&mut state.buffer);
            if pending.is_empty() {
                break;
            }
            let mut progressed = false;
            for message in pending {
                if is_deliverable(&message.timestamp, &message.sender, &state.clock) {
                    apply(&mut state, &message);
                    applied_count += 1;
                    progressed = true;
                } else {
                    state.buffer.push(message);
                }
            }
            if !progressed {
                break;
            }
        }
        if applied_count > 0 {
            info!(node = %self.id, applied_count, remaining = state.buffer.len(), "buffer sweep applied messages");
        }
        applied_count
    }
}

/// Applies an already-deliverable message: commits the value and merges (never ticks) the clock.
fn apply(state: &mut NodeState, message: &ReplicaMessage) {
    state.store.put(message.key.clone(), message.value.clone());
    state.clock.merge(&message.timestamp);
}
