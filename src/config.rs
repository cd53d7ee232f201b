//! Startup configuration, read once from the environment.
//!
//! `NODE_ID` and `NODES` are required, `PORT` defaults to `5000`. A missing or malformed variable
//! is a fatal startup error — distinct from the *bad-input* request-time error kind, since no
//! caller is waiting on a response yet.

use std::env;

use anyhow::{bail, Context, Result};

use crate::clock::PeerId;

#[derive(Debug, Clone)]
pub struct NodeConfig {
    /// This node's own identifier; must appear in `peers`.
    pub node_id: PeerId,
    /// The full fixed peer set, including `node_id`.
    pub peers: Vec<PeerId>,
    /// Local HTTP listen port.
    pub port: u16,
}

impl NodeConfig {
    pub fn from_env() -> Result<Self> {
        let node_id = env::var("NODE_ID").context("NODE_ID must be set")?;
        if node_id.is_empty() {
            bail!("NODE_ID must not be empty");
        }

        let nodes_raw = env::var("NODES").context("NODES must be set")?;
        let peers: Vec<PeerId> = nodes_raw
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();
        if peers.is_empty() {
            bail!("NODES must list at least one peer");
        }
        if !peers.contains(&node_id) {
            bail!("NODE_ID {node_id:?} must appear in NODES ({peers:?})");
        }

        let port = match env::var("PORT") {
            Ok(raw) => raw.parse().with_context(|| format!("PORT {raw:?} is not a valid port"))?,
            Err(env::VarError::NotPresent) => 5000,
            Err(err) => return Err(err).context("PORT"),
        };

        Ok(Self { node_id, peers, port })
    }
}
