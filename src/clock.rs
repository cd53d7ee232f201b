//! Vector clocks used to track causal dependencies between writes.
//!
//! Minkowski-KV's sibling project reasoned about causality through spacetime intervals; this
//! crate reasons about it the conventional way, through a vector clock: a mapping from peer id to
//! a monotonically-increasing counter. `T <= T'` iff every entry of `T` is `<=` the corresponding
//! entry of `T'`; clocks that are neither `<=` one another are concurrent.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A peer identifier, e.g. `"node1"`.
pub type PeerId = String;

/// A vector clock: one counter per configured peer.
///
/// Invariant: every peer listed in the node's configuration is present as a key once the clock
/// has been constructed via [`VectorClock::zeroed`]; counters never decrease except through
/// [`VectorClock::zeroed`] at process start.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct VectorClock(BTreeMap<PeerId, u64>);

impl VectorClock {
    /// Builds a clock with a zero entry for every given peer.
    pub fn zeroed<'a>(peers: impl IntoIterator<Item = &'a PeerId>) -> Self {
        Self(peers.into_iter().map(|p| (p.clone(), 0)).collect())
    }

    /// Returns the counter for `peer`, or `0` if the peer is unknown to this clock.
    ///
    /// A client-supplied `context` may be missing peers the server itself tracks (or vice versa);
    /// an absent entry is always treated as zero.
    pub fn get(&self, peer: &str) -> u64 {
        self.0.get(peer).copied().unwrap_or(0)
    }

    /// Increments the entry for `peer` (the local node's own id) and returns the counter value.
    pub fn tick(&mut self, peer: &str) -> u64 {
        let entry = self.0.entry(peer.to_string()).or_insert(0);
        *entry += 1;
        *entry
    }

    /// Merges `other` into `self`, taking the pointwise maximum of every entry.
    ///
    /// Monotone and idempotent: merging the same clock twice has no further effect after the
    /// first merge. Does not touch the local node's own counter beyond taking the max.
    pub fn merge(&mut self, other: &VectorClock) {
        for (peer, &value) in &other.0 {
            let entry = self.0.entry(peer.clone()).or_insert(0);
            *entry = (*entry).max(value);
        }
    }

    /// Returns `true` iff every entry of `self` is less than or equal to the corresponding entry
    /// of `other` (treating entries absent from either side as zero).
    pub fn le(&self, other: &VectorClock) -> bool {
        self.0.keys().chain(other.0.keys()).all(|peer| self.get(peer) <= other.get(peer))
    }

    /// Returns a copy of this clock with `peer`'s entry removed.
    ///
    /// Used to strip the sender's own entry out of a [`VectorClock::le`] comparison: the delivery
    /// predicate's clause 2 ranges over every peer *other than* the sender, and a removed entry
    /// reads back as zero on both sides of `le`, so it never affects the comparison.
    pub fn excluding(&self, peer: &str) -> VectorClock {
        let mut copy = self.clone();
        copy.0.remove(peer);
        copy
    }

    /// Iterates over every peer id known to either this clock alone.
    ///
    /// Used by the delivery predicate to walk "every other peer" without assuming both clocks
    /// were built from the same peer set (a client-supplied `context` may mention peers the
    /// receiver has never heard of, or omit ones it has).
    pub fn peers(&self) -> impl Iterator<Item = &PeerId> {
        self.0.keys()
    }

    /// An immutable copy suitable for handing to callers outside the critical section.
    pub fn snapshot(&self) -> VectorClock {
        self.clone()
    }
}
