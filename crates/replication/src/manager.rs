//! Ring Manager: join/leave/store/lookup and redistribution.
//!
//! `spec.md` §4.6–§4.8. Owns the [`RingIndex`] and every [`Node`]'s store;
//! external callers only ever go through these operations (see `spec.md`
//! §5 on the single-owner resource model).

use std::collections::HashMap;

use rand::Rng;
use tracing::{debug, warn};

use corelib::error::{Error, Result};
use corelib::finger::rebuild_all;
use corelib::hasher::hash;
use corelib::identifier::Identifier;
use corelib::node::Node;
use corelib::ring::RingIndex;
use corelib::RingConfig;

use crate::placement::{placement, Placement};

/// Maximum number of attempts `join_random` makes before giving up with
/// [`Error::CollisionExhausted`].
const JOIN_RANDOM_MAX_ATTEMPTS: u32 = 64;

/// Coordinates ring topology changes and the store/lookup operations that
/// depend on the current topology.
#[derive(Debug)]
pub struct RingManager {
    index: RingIndex,
    config: RingConfig,
    /// Monotone counter mixed into `join_random`'s candidate attribute so
    /// repeated attempts (and repeated calls across a run) never collide
    /// on the attribute itself, only possibly on its hash.
    clock: u64,
}

impl RingManager {
    /// Builds an empty ring from a validated config.
    ///
    /// Panics if `config` hasn't been validated — call
    /// [`RingConfig::validate`] first; this mirrors the teacher crate's
    /// convention of keeping config validation a startup concern separate
    /// from the runtime error taxonomy.
    pub fn new(config: RingConfig) -> Self {
        debug_assert!(config.validate().is_ok(), "RingConfig must be validated before use");
        Self {
            index: RingIndex::new(config.m),
            config,
            clock: 0,
        }
    }

    /// The ring's configuration.
    pub fn config(&self) -> RingConfig {
        self.config
    }

    /// `true` if no nodes have joined yet.
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// All nodes, in ring order.
    pub fn nodes(&self) -> &[Node] {
        self.index.nodes()
    }

    /// Adds a node at `id`, rebuilds every finger table, then migrates
    /// primary-owned keys onto it.
    pub fn join(&mut self, id: Identifier) -> Result<()> {
        self.index.insert(Node::new(id)).map_err(|e| {
            warn!(%id, error = %e, "join rejected");
            e
        })?;
        rebuild_all(&mut self.index);
        self.redistribute_on_join(id)?;
        debug!(%id, node_count = self.index.len(), "node joined");
        Ok(())
    }

    /// Synthesizes a unique attribute (a monotone counter concatenated with
    /// a random suffix from `rng`), hashes it to an identifier, and joins.
    /// Retries on hash collision up to a bounded number of attempts.
    pub fn join_random<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<Identifier> {
        for _ in 0..JOIN_RANDOM_MAX_ATTEMPTS {
            self.clock += 1;
            const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
            let suffix: String = (0..12)
                .map(|_| CHARSET[rng.gen_range(0..CHARSET.len())] as char)
                .collect();
            let attribute = format!("{}-{}", self.clock, suffix);
            let id = hash(&attribute, self.config.m);
            match self.join(id) {
                Ok(()) => return Ok(id),
                Err(Error::DuplicateNode(_)) => continue,
                Err(e) => return Err(e),
            }
        }
        warn!(attempts = JOIN_RANDOM_MAX_ATTEMPTS, "join_random exhausted its attempt budget");
        Err(Error::CollisionExhausted(JOIN_RANDOM_MAX_ATTEMPTS))
    }

    /// Removes the node at `id`, migrates its store onto its successor,
    /// then rebuilds finger tables.
    pub fn leave(&mut self, id: Identifier) -> Result<()> {
        let removed = self.index.remove(id).ok_or_else(|| {
            warn!(%id, "leave rejected: unknown node");
            Error::UnknownNode(id)
        })?;
        self.redistribute_on_leave(removed)?;
        rebuild_all(&mut self.index);
        debug!(%id, node_count = self.index.len(), "node left");
        Ok(())
    }

    /// Resolves `key`'s placement and writes `value` to the primary and
    /// every replica, bumping each chosen node's write counter once.
    pub fn store(&mut self, key: &str, value: &str) -> Result<()> {
        let p = placement(&self.index, key, self.config.replication_factor)?;
        for id in std::iter::once(p.primary).chain(p.replicas.iter().copied()) {
            if let Some(node) = self.index.get_mut(id) {
                node.store_data(key, value);
            }
        }
        Ok(())
    }

    /// Returns the primary's id, the key, and the primary's stored value
    /// for `key` (`None` if absent). Deliberately does not consult
    /// replicas, so replica-only placement bugs surface as lookup misses.
    pub fn lookup(&self, key: &str) -> Result<(Identifier, String, Option<String>)> {
        let p = placement(&self.index, key, self.config.replication_factor)?;
        let value = self
            .index
            .get(p.primary)
            .and_then(|n| n.store.get(key))
            .cloned();
        Ok((p.primary, key.to_string(), value))
    }

    /// Resolves `key`'s current placement without mutating anything.
    pub fn placement(&self, key: &str) -> Result<Placement> {
        placement(&self.index, key, self.config.replication_factor)
    }

    /// `spec.md` §4.7: for every other node, migrate any key whose new
    /// primary is `new_id` onto it. Keys already replicated onto `new_id`
    /// from an earlier store stay put on their other holders — only
    /// primary handoff is modeled, replicas are not rebuilt on join. This
    /// is an explicit, documented limitation (`spec.md` §9), not an
    /// oversight: a "complete" variant would re-derive every key's full
    /// placement at `O(stored_keys * (1 + r))` cost instead.
    fn redistribute_on_join(&mut self, new_id: Identifier) -> Result<()> {
        let other_ids: Vec<Identifier> = self
            .index
            .nodes()
            .iter()
            .map(|n| n.id)
            .filter(|&id| id != new_id)
            .collect();

        let mut moves: Vec<(Identifier, String, String)> = Vec::new();
        for from in other_ids {
            let node = match self.index.get(from) {
                Some(n) => n,
                None => continue,
            };
            for (k, v) in node.store.iter() {
                let new_primary = placement(&self.index, k, self.config.replication_factor)?.primary;
                if new_primary == new_id {
                    moves.push((from, k.clone(), v.clone()));
                }
            }
        }

        let moved = moves.len();
        for (from, key, value) in moves {
            if let Some(node) = self.index.get_mut(from) {
                node.store.remove(&key);
            }
            if let Some(node) = self.index.get_mut(new_id) {
                // Direct insert, not `store_data`: a handoff is not a new
                // write and must not inflate the destination's write
                // counter.
                node.store.insert(key, value);
            }
        }
        if moved > 0 {
            debug!(%new_id, moved, "keys migrated to new primary");
        }
        Ok(())
    }

    /// `spec.md` §4.8: hand every key the departing node held to the
    /// successor of `(z.node_id + 1) mod 2^m`, computed *after* `z` has
    /// already been removed from the index. Replicas are not rebalanced
    /// here either, for the same reason as join.
    fn redistribute_on_leave(&mut self, departed: Node) -> Result<()> {
        if departed.store.is_empty() {
            return Ok(());
        }
        let successor_point = departed.id.next(self.config.m);
        let successor_id = match self.index.successor(successor_point) {
            Ok(n) => n.id,
            Err(Error::RingEmpty) => return Ok(()), // last node left; nothing to hand off to
            Err(e) => return Err(e),
        };

        let count = departed.store.len();
        if let Some(node) = self.index.get_mut(successor_id) {
            for (k, v) in departed.store {
                node.store.insert(k, v);
            }
        }
        debug!(%successor_id, count, "keys handed off from departed node");
        Ok(())
    }
}

/// `spec.md` §4.9's per-node stored-key counts: `|node.store|` for each
/// node currently in the ring.
pub fn load_distribution(manager: &RingManager) -> HashMap<Identifier, usize> {
    manager
        .nodes()
        .iter()
        .map(|n| (n.id, n.store.len()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(n: u128) -> Identifier {
        Identifier(n)
    }

    fn manager(m: u32, num_extents: u32, r: usize) -> RingManager {
        RingManager::new(RingConfig::new(m, num_extents, r))
    }

    #[test]
    fn s1_store_and_lookup_round_trip() {
        let mut mgr = manager(4, 10, 0);
        for i in [1u128, 4, 9, 11] {
            mgr.join(id(i)).unwrap();
        }
        mgr.store("x", "v").unwrap();
        let (node_id, key, value) = mgr.lookup("x").unwrap();
        assert_eq!(key, "x");
        assert_eq!(value.as_deref(), Some("v"));
        // Node 4 should not hold "x" under S1/S2's ring shape.
        assert_ne!(node_id, id(4));
    }

    #[test]
    fn duplicate_join_leaves_ring_unchanged() {
        let mut mgr = manager(4, 10, 0);
        mgr.join(id(1)).unwrap();
        let err = mgr.join(id(1)).unwrap_err();
        assert_eq!(err, Error::DuplicateNode(id(1)));
        assert_eq!(mgr.nodes().len(), 1);
    }

    #[test]
    fn leave_unknown_node_errors() {
        let mut mgr = manager(4, 10, 0);
        mgr.join(id(1)).unwrap();
        assert_eq!(mgr.leave(id(2)).unwrap_err(), Error::UnknownNode(id(2)));
    }

    #[test]
    fn store_on_empty_ring_errors() {
        let mut mgr = manager(4, 10, 0);
        assert_eq!(mgr.store("x", "v").unwrap_err(), Error::RingEmpty);
    }

    #[test]
    fn join_migrates_keys_to_new_primary() {
        let mut mgr = manager(4, 10, 0);
        mgr.join(id(1)).unwrap();
        mgr.join(id(9)).unwrap();
        mgr.store("x", "v").unwrap(); // primary is 9 (hash mod 16 assumed < 9 region not guaranteed, but key point is migration)
        let (before_primary, _, _) = mgr.lookup("x").unwrap();

        // Insert a node between 1 and before_primary to force a handoff
        // for any key whose hash now falls in the new gap.
        mgr.join(id(5)).unwrap();
        let (after_primary, _, after_value) = mgr.lookup("x").unwrap();
        if before_primary != after_primary {
            assert_eq!(after_value.as_deref(), Some("v"));
        }
    }

    #[test]
    fn leave_hands_off_to_successor() {
        let mut mgr = manager(4, 10, 0);
        mgr.join(id(1)).unwrap();
        mgr.join(id(9)).unwrap();
        mgr.store("x", "v").unwrap();
        let (primary_before, _, _) = mgr.lookup("x").unwrap();

        mgr.leave(primary_before).unwrap();
        let (primary_after, _, value_after) = mgr.lookup("x").unwrap();
        assert_ne!(primary_after, primary_before);
        assert_eq!(value_after.as_deref(), Some("v"));
    }

    #[test]
    fn join_random_is_reproducible_under_a_seeded_rng() {
        use rand::SeedableRng;
        let mut rng1 = rand::rngs::StdRng::seed_from_u64(42);
        let mut rng2 = rand::rngs::StdRng::seed_from_u64(42);

        let mut mgr1 = manager(16, 100, 2);
        let mut mgr2 = manager(16, 100, 2);

        let ids1: Vec<_> = (0..5).map(|_| mgr1.join_random(&mut rng1).unwrap()).collect();
        let ids2: Vec<_> = (0..5).map(|_| mgr2.join_random(&mut rng2).unwrap()).collect();
        assert_eq!(ids1, ids2);
    }

    #[test]
    fn load_distribution_sums_to_num_extents_times_replica_count() {
        let mut mgr = manager(10, 50, 2);
        for i in [10u128, 200, 500, 700, 900] {
            mgr.join(id(i)).unwrap();
        }
        for i in 0..mgr.config().num_extents {
            let key = format!("extent{i}");
            mgr.store(&key, "v").unwrap();
        }
        let dist = load_distribution(&mgr);
        let total: usize = dist.values().sum();
        // Every node count, 5 nodes and r=2, so every extent is on exactly 3.
        assert_eq!(total, mgr.config().num_extents as usize * 3);
    }
}
