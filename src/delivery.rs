//! The causal delivery predicate.
//!
//! Given a message `m` with clock `T` from sender `s`, and the receiver's current clock `V`, `m`
//! is deliverable iff:
//!
//! 1. `T[s] == V[s] + 1` — `m` is the next expected update from its sender, and
//! 2. for every other peer `p != s`, `T[p] <= V[p]` — the receiver has already seen every other
//!    causal dependency the sender observed.
//!
//! Equality in clause 2 is permitted; strict inequality `T[p] > V[p]` defers the message.

use crate::clock::VectorClock;

/// Returns `true` iff `timestamp` (from `sender`) may be applied against `current`.
pub fn is_deliverable(timestamp: &VectorClock, sender: &str, current: &VectorClock) -> bool {
    if timestamp.get(sender) != current.get(sender) + 1 {
        return false;
    }
    timestamp.excluding(sender).le(&current.excluding(sender))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::VectorClock;

    fn clock(pairs: &[(&str, u64)]) -> VectorClock {
        let peers: Vec<String> = pairs.iter().map(|(p, _)| p.to_string()).collect();
        let mut c = VectorClock::zeroed(peers.iter());
        for (p, v) in pairs {
            for _ in 0..*v {
                c.tick(p);
            }
        }
        c
    }

    #[test]
    fn next_expected_update_is_deliverable() {
        let current = clock(&[("n1", 0), ("n2", 0), ("n3", 0)]);
        let incoming = clock(&[("n1", 1), ("n2", 0), ("n3", 0)]);
        assert!(is_deliverable(&incoming, "n1", &current));
    }

    #[test]
    fn missing_dependency_is_rejected() {
        let current = clock(&[("n1", 0), ("n2", 0), ("n3", 0)]);
        // Sender is one ahead, but depends on n2 having already seen an update we haven't.
        let mut incoming = clock(&[("n1", 1), ("n3", 0)]);
        incoming.merge(&clock(&[("n2", 1)]));
        assert!(!is_deliverable(&incoming, "n1", &current));
    }

    #[test]
    fn equality_on_other_peers_is_permitted() {
        let current = clock(&[("n1", 1), ("n2", 2), ("n3", 0)]);
        let incoming = clock(&[("n1", 2), ("n2", 2), ("n3", 0)]);
        assert!(is_deliverable(&incoming, "n1", &current));
    }

    #[test]
    fn sender_too_far_ahead_is_rejected() {
        let current = clock(&[("n1", 0), ("n2", 0), ("n3", 0)]);
        let incoming = clock(&[("n1", 5), ("n2", 0), ("n3", 0)]);
        assert!(!is_deliverable(&incoming, "n1", &current));
    }

    #[test]
    fn duplicate_replay_is_rejected_after_first_apply() {
        let mut current = clock(&[("n1", 0), ("n2", 0), ("n3", 0)]);
        let incoming = clock(&[("n1", 1), ("n2", 0), ("n3", 0)]);
        assert!(is_deliverable(&incoming, "n1", &current));
        current.merge(&incoming);
        // Same message again: sender's entry now equals current, not current + 1.
        assert!(!is_deliverable(&incoming, "n1", &current));
    }
}
