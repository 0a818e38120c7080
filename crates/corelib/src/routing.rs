//! Routed (finger-table) successor lookup.
//!
//! `spec.md` §4.5. This is the decentralized Chord routing procedure: given
//! an origin node, find the successor of `h` by hopping through finger
//! entries rather than consulting the global [`RingIndex`] directly. It
//! exists so the simulator can exercise and test the same routing behavior
//! a real Chord node would use, even though the Ring Manager itself takes
//! the cheaper direct path via `RingIndex::successor`. Both MUST agree for
//! every `(origin, h)` — see the `routed_lookup_matches_successor`
//! property test.

use crate::error::{Error, Result};
use crate::identifier::{in_modular_interval, Identifier};
use crate::ring::RingIndex;

/// Finds the successor of `h`, starting the search at `origin` and hopping
/// through `origin`'s (and subsequent nodes') finger tables.
///
/// Fails with [`Error::UnknownNode`] if `origin` is not present in `index`.
pub fn find_successor_from(index: &RingIndex, origin: Identifier, h: Identifier) -> Result<Identifier> {
    let m = index.m();
    let mut current = index.get(origin).ok_or(Error::UnknownNode(origin))?.id;

    // A correctly built finger table makes forward progress every hop, so
    // this terminates well within this bound; it guards against acting on
    // a finger table that was never rebuilt after a topology change.
    let max_hops = 4 * m as usize + 4;

    for _ in 0..max_hops {
        let node = index.get(current).ok_or(Error::UnknownNode(current))?;
        let finger0 = *node.finger.first().unwrap_or(&node.id);

        if in_modular_interval(h, current, finger0, m, true) {
            return Ok(finger0);
        }

        let next = node
            .finger
            .iter()
            .rev()
            .find(|&&y| in_modular_interval(y, current, h, m, false))
            .copied();

        match next {
            Some(y) if y != current => current = y,
            _ => return Ok(current),
        }
    }

    Ok(current)
}
