//! Node state held inside the ring.
//!
//! Finger entries are stored as bare [`Identifier`]s, not owning references
//! to other `Node`s: the [`RingIndex`](crate::ring::RingIndex) is the single
//! owner of node state, and every other reference into the ring is a key
//! back into it. This sidesteps the cyclic-reference problem a `Node ->
//! Node` graph would otherwise create.

use std::collections::HashMap;

use crate::identifier::Identifier;

/// A participant in the ring.
#[derive(Clone, Debug)]
pub struct Node {
    /// This node's position on the ring.
    pub id: Identifier,
    /// Extents currently assigned to this node (as primary or replica).
    pub store: HashMap<String, String>,
    /// `finger[k]` is the successor of `(id + 2^k) mod 2^m`, for `k` in
    /// `0..m`. Rebuilt wholesale after every join/leave.
    pub finger: Vec<Identifier>,
    /// Writes served while acting as primary or replica for a key, summed
    /// over the node's lifetime.
    pub writes_served: u64,
}

impl Node {
    /// Creates a new node with an empty store and no finger entries yet.
    pub fn new(id: Identifier) -> Self {
        Self {
            id,
            store: HashMap::new(),
            finger: Vec::new(),
            writes_served: 0,
        }
    }

    /// Inserts or overwrites `key` and bumps the write counter once.
    ///
    /// A repeated `store_data(key, same_value)` call still increments the
    /// counter, matching `spec.md` §8's idempotence note (contents are
    /// unchanged, but the counter advances).
    pub fn store_data(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.store.insert(key.into(), value.into());
        self.writes_served += 1;
    }
}
