//! Placement Engine: primary + replica resolution for a key.
//!
//! `spec.md` §4.4. Deliberately does not consult finger tables: replica
//! placement needs contiguous ring neighbours, which is what
//! `RingIndex::next_after` gives directly, not the logarithmic jumps a
//! finger-table walk would take.

use corelib::error::Result;
use corelib::hasher::hash;
use corelib::identifier::Identifier;
use corelib::ring::RingIndex;

/// The primary and ordered replica set a key resolves to under the current
/// ring contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    /// The successor of `hash(key)` — the node authoritatively holding the
    /// extent.
    pub primary: Identifier,
    /// Up to `min(r, N-1)` distinct nodes, contiguous successors of
    /// `primary`, pairwise distinct and distinct from `primary`.
    pub replicas: Vec<Identifier>,
}

/// Resolves `key`'s placement against `index`, walking up to `r` replicas
/// past the primary.
///
/// Fails with [`corelib::error::Error::RingEmpty`] on an empty ring.
pub fn placement(index: &RingIndex, key: &str, r: usize) -> Result<Placement> {
    let h = hash(key, index.m());
    let primary = index.successor(h)?.id;

    let mut replicas = Vec::with_capacity(r);
    let mut current = primary;
    for _ in 0..r {
        let next = index.next_after(current)?.id;
        if next == primary {
            // Ring exhausted: every node already holds a copy.
            break;
        }
        replicas.push(next);
        current = next;
    }

    Ok(Placement { primary, replicas })
}

/// Strategy abstraction over "which nodes hold a copy of a key", so
/// alternative replica-placement policies can be swapped in without
/// touching the Ring Manager.
///
/// `spec.md` names exactly one placement rule (contiguous successors), so
/// [`ChordReplicaStrategy`] is the only implementation the core ships, but
/// the seam is kept because it's where a future rack/datacenter-aware
/// policy would plug in.
pub trait ReplicationStrategy: Send + Sync {
    /// Number of replicas this strategy targets, not counting the primary.
    fn replication_factor(&self) -> usize;

    /// Resolves `key`'s placement against `index`.
    fn placement(&self, index: &RingIndex, key: &str) -> Result<Placement>;
}

/// The replication strategy `spec.md` specifies: `r` contiguous successors
/// of the primary, walked directly through the ring index.
#[derive(Debug, Clone, Copy)]
pub struct ChordReplicaStrategy {
    r: usize,
}

impl ChordReplicaStrategy {
    pub fn new(r: usize) -> Self {
        Self { r }
    }
}

impl ReplicationStrategy for ChordReplicaStrategy {
    fn replication_factor(&self) -> usize {
        self.r
    }

    fn placement(&self, index: &RingIndex, key: &str) -> Result<Placement> {
        placement(index, key, self.r)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use corelib::node::Node;

    fn id(n: u128) -> Identifier {
        Identifier(n)
    }

    fn ring_s1_s2() -> RingIndex {
        let mut ring = RingIndex::new(4);
        for i in [1u128, 4, 9, 11] {
            ring.insert(Node::new(id(i))).unwrap();
        }
        ring
    }

    #[test]
    fn s1_no_replication() {
        let ring = ring_s1_s2();
        // hash("x") mod 16 = 7 per spec.md's S1 scenario statement.
        let p = Placement {
            primary: ring.successor(id(7)).unwrap().id,
            replicas: vec![],
        };
        assert_eq!(p.primary, id(9));
    }

    #[test]
    fn s2_replicas_wrap_and_skip_gap_node() {
        let ring = ring_s1_s2();
        let h = id(7); // stand-in for hash("x") mod 16
        let primary = ring.successor(h).unwrap().id;
        assert_eq!(primary, id(9));

        let mut replicas = Vec::new();
        let mut current = primary;
        for _ in 0..2 {
            let next = ring.next_after(current).unwrap().id;
            replicas.push(next);
            current = next;
        }
        assert_eq!(replicas, vec![id(11), id(1)]);
        assert!(!replicas.contains(&id(4)));
    }

    #[test]
    fn s3_single_node_has_no_replicas() {
        let mut ring = RingIndex::new(3);
        ring.insert(Node::new(id(3))).unwrap();
        let p = placement(&ring, "y", 1).unwrap();
        assert_eq!(p.primary, id(3));
        assert!(p.replicas.is_empty());
    }

    #[test]
    fn s4_two_nodes_cap_replicas_at_n_minus_one() {
        let mut ring = RingIndex::new(8);
        ring.insert(Node::new(id(10))).unwrap();
        ring.insert(Node::new(id(200))).unwrap();
        let p = placement(&ring, "k", 3).unwrap();
        assert_eq!(p.replicas.len(), 1);
        assert_ne!(p.replicas[0], p.primary);
    }

    #[test]
    fn replicas_are_distinct_from_primary_and_each_other() {
        let mut ring = RingIndex::new(10);
        for i in [10u128, 200, 500, 700, 900] {
            ring.insert(Node::new(id(i))).unwrap();
        }
        let p = placement(&ring, "extent1", 3).unwrap();
        let mut all = vec![p.primary];
        all.extend(p.replicas.iter().copied());
        let unique: std::collections::HashSet<_> = all.iter().collect();
        assert_eq!(unique.len(), all.len());
    }

    #[test]
    fn empty_ring_is_an_error() {
        let ring = RingIndex::new(4);
        assert!(placement(&ring, "x", 1).is_err());
    }
}
