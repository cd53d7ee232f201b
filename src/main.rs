//! causal-kv entrypoint.
//!
//! Wires together the five cooperating components of one node:
//! - `config` reads `NODE_ID` / `NODES` / `PORT` from the environment.
//! - `node::Node` owns the mutex-guarded Clock + Store + Buffer and exposes the three ingress
//!   entry points (`local_write`, `remote_receive`, `read`).
//! - `replicator::Replicator` fans out locally-applied writes to every peer, one task per peer.
//! - `watcher` sweeps the buffer on a fixed cadence, retrying messages that were not yet
//!   deliverable when they first arrived.
//! - `http` exposes all of the above over `/health`, `/write`, `/receive`, `/read`.
//!
//! The buffer watcher and the HTTP server run concurrently as independent Tokio tasks; neither
//! blocks the other, and outbound replication never holds the node's mutex.

mod clock;
mod config;
mod delivery;
mod error;
mod http;
mod node;
mod protocol;
mod replicator;
mod store;
mod watcher;

use anyhow::Result;

use crate::config::NodeConfig;
use crate::http::AppState;
use crate::node::Node;
use crate::replicator::Replicator;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let config = NodeConfig::from_env()?;
    tracing::info!(node = %config.node_id, peers = ?config.peers, port = config.port, "starting node");

    let node = Node::new(config.node_id.clone(), config.peers.clone());
    let replicator = Replicator::new(config.node_id.clone(), config.peers.clone());

    tokio::spawn(watcher::run(node.clone()));

    let app = http::router(AppState { node, replicator });
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "listening");
    axum::serve(listener, app).await?;

    Ok(())
}
