//! Synthetic write-sequence generation.
//!
//! `spec.md` §4.9. Drives `num_ops` stores of `extent{i mod num_extents}`
//! through a [`RingManager`] and tallies, per node, how many times that
//! node was chosen as primary or replica.

use std::collections::HashMap;

use corelib::error::Result;
use corelib::identifier::Identifier;
use replication::RingManager;
use tracing::debug;

/// Per-node operation counts returned by [`simulate_workload`]: how many
/// times each node was chosen as primary or replica across the run.
pub type OperationCounts = HashMap<Identifier, u64>;

/// Runs `num_ops` synthetic writes against `manager`.
///
/// For `i` in `1..=num_ops`, stores `("extent{i mod num_extents}",
/// "data{i}")` and credits one operation to the primary and to each
/// replica chosen for that store. The returned map's values sum to
/// `num_ops * (1 + min(r, N-1))`.
///
/// Fails with [`corelib::error::Error::RingEmpty`] if `manager` has no
/// nodes.
pub fn simulate_workload(manager: &mut RingManager, num_ops: u64) -> Result<OperationCounts> {
    let num_extents = manager.config().num_extents as u64;
    let mut counts: OperationCounts = HashMap::new();

    for i in 1..=num_ops {
        let key = format!("extent{}", i % num_extents);
        let value = format!("data{i}");

        // Resolved before the store so a single hash computation captures
        // exactly who this operation credits; `store` would otherwise
        // require either returning its own placement or re-hashing.
        let placement = manager.placement(&key)?;
        manager.store(&key, &value)?;

        *counts.entry(placement.primary).or_insert(0) += 1;
        for replica in placement.replicas {
            *counts.entry(replica).or_insert(0) += 1;
        }
    }

    debug!(num_ops, nodes_touched = counts.len(), "workload simulation complete");
    Ok(counts)
}
