//! The background task that periodically retries buffered replica messages.
//!
//! A `tokio::time::interval` wakes at a fixed cadence and drains whatever the causal gate (here,
//! [`crate::delivery`]) now allows through.

use std::time::Duration;

use tracing::debug;

use crate::node::Node;

const SWEEP_INTERVAL: Duration = Duration::from_secs(1);

/// Runs forever, sweeping `node`'s buffer once per [`SWEEP_INTERVAL`]. Intended to be
/// `tokio::spawn`ed alongside the HTTP server.
pub async fn run(node: Node) {
    let mut ticker = tokio::time::interval(SWEEP_INTERVAL);
    loop {
        ticker.tick().await;
        let applied = node.sweep_buffer().await;
        if applied == 0 {
            debug!(node = %node.id, "buffer sweep found nothing deliverable");
        }
    }
}
