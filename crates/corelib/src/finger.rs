//! Finger-table construction.
//!
//! `spec.md` §4.3. `finger[k]` for a node at `x` is the successor of
//! `(x + 2^k) mod 2^m`, for `k` in `0..m`. A node is its own `finger[0]`
//! only when it is the sole node in the ring.

use crate::identifier::Identifier;
use crate::ring::RingIndex;

/// Computes the `m`-entry finger table for `node_id` against the current
/// contents of `index`.
///
/// `index` must already contain `node_id`; this only reads the index, it
/// does not require `node_id`'s own finger table to be populated yet.
pub fn build_for(index: &RingIndex, node_id: Identifier) -> Vec<Identifier> {
    let m = index.m();
    (0..m)
        .map(|k| {
            let offset = node_id.offset_pow2(k, m);
            index
                .successor(offset)
                .map(|n| n.id)
                .unwrap_or(node_id) // only reachable if index became empty mid-build
        })
        .collect()
}

/// Rebuilds every node's finger table in `index` from scratch.
///
/// Cost is `O(N * m * log N)`: `N` nodes, `m` entries each, each entry a
/// binary-search successor lookup. Called after every join and leave.
pub fn rebuild_all(index: &mut RingIndex) {
    let ids: Vec<Identifier> = index.nodes().iter().map(|n| n.id).collect();
    for id in ids {
        let table = build_for(index, id);
        if let Some(node) = index.get_mut(id) {
            node.finger = table;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::Node;

    #[test]
    fn single_node_fingers_point_to_self() {
        let mut index = RingIndex::new(4);
        index.insert(Node::new(Identifier(3))).unwrap();
        rebuild_all(&mut index);
        let node = index.get(Identifier(3)).unwrap();
        assert_eq!(node.finger.len(), 4);
        assert!(node.finger.iter().all(|&f| f == Identifier(3)));
    }

    #[test]
    fn finger_table_matches_brute_force_successor() {
        let mut index = RingIndex::new(10);
        for id in [10u128, 200, 500, 700, 900] {
            index.insert(Node::new(Identifier(id))).unwrap();
        }
        rebuild_all(&mut index);

        for &id in &[10u128, 200, 500, 700, 900] {
            let node = index.get(Identifier(id)).unwrap();
            for k in 0..index.m() {
                let offset = Identifier(id).offset_pow2(k, index.m());
                let expected = index.successor(offset).unwrap().id;
                assert_eq!(node.finger[k as usize], expected, "k={k} id={id}");
            }
        }
    }
}
