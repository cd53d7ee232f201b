//! Wire types shared by the HTTP surface and the causal replication engine.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::clock::{PeerId, VectorClock};

/// A replica message as exchanged between peers: the unit the Delivery Predicate judges.
///
/// Identity of a message is the triple `(sender, timestamp[sender], key)`; the buffer may contain
/// duplicates of a message already applied, and must tolerate them idempotently (a duplicate's
/// `timestamp[sender]` will no longer be `current_clock[sender] + 1` once the original has been
/// applied, so the predicate naturally rejects the replay).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplicaMessage {
    pub key: String,
    pub value: Value,
    pub sender: PeerId,
    pub timestamp: VectorClock,
}

/// Body of `POST /write`.
#[derive(Debug, Deserialize)]
pub struct WriteRequest {
    pub key: String,
    pub value: Value,
    #[serde(default)]
    pub context: Option<VectorClock>,
}

/// Response of `POST /write`.
#[derive(Debug, Serialize)]
pub struct WriteResponse {
    pub status: &'static str,
    pub timestamp: VectorClock,
}

/// Response of `POST /receive`.
#[derive(Debug, Serialize)]
pub struct ReceiveResponse {
    pub status: &'static str,
}

/// Response of `GET /read`.
#[derive(Debug, Serialize)]
pub struct ReadResponse {
    pub value: Value,
    pub timestamp: VectorClock,
}

/// Response of `GET /health`.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub node: PeerId,
    pub timestamp: VectorClock,
}
