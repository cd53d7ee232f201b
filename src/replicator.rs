//! Fans out a locally-applied write to every other peer.
//!
//! Each peer gets its own `tokio::spawn`ed send so a slow or unreachable peer cannot stall
//! delivery to the others. Failures are logged and dropped: retrying a lost send is explicitly out
//! of scope (the receiver-side Buffer Watcher handles reordering, not loss).

use std::time::Duration;

use reqwest::Client;
use tracing::warn;

use crate::clock::PeerId;
use crate::node::AppliedWrite;
use crate::protocol::ReplicaMessage;

const REPLICATION_TIMEOUT: Duration = Duration::from_secs(3);
/// The fixed port every peer's inter-node HTTP surface listens on: peer hostnames are resolved on
/// a constant port regardless of a given node's own `PORT` (each peer runs in its own container,
/// internally bound to this port).
const PEER_PORT: u16 = 5000;

#[derive(Clone)]
pub struct Replicator {
    client: Client,
    local_id: PeerId,
    peers: Vec<PeerId>,
}

impl Replicator {
    pub fn new(local_id: PeerId, peers: Vec<PeerId>) -> Self {
        let client = Client::builder()
            .timeout(REPLICATION_TIMEOUT)
            .build()
            .expect("reqwest client construction cannot fail with this configuration");
        Self { client, local_id, peers }
    }

    /// Dispatches `write` to every peer except the local node. Returns immediately; each send
    /// runs as an independent task and never holds the node's mutex.
    pub fn replicate(&self, write: &AppliedWrite) {
        let message = ReplicaMessage {
            key: write.key.clone(),
            value: write.value.clone(),
            sender: self.local_id.clone(),
            timestamp: write.timestamp.clone(),
        };

        for peer in &self.peers {
            if *peer == self.local_id {
                continue;
            }
            let client = self.client.clone();
            let peer = peer.clone();
            let message = message.clone();
            tokio::spawn(async move {
                send_one(client, peer, message).await;
            });
        }
    }
}

async fn send_one(client: Client, peer: PeerId, message: ReplicaMessage) {
    let url = format!("http://{peer}:{PEER_PORT}/receive");
    if let Err(err) = client.post(&url).json(&message).send().await {
        warn!(%peer, key = %message.key, error = %err, "replication to peer failed");
    }
}
