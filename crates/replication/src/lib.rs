//! Placement and topology orchestration for the Chord ring.
//!
//! This crate generalizes the teacher repository's `ReplicationStrategy`
//! abstraction (originally "which nodes hold a copy of a key") into the
//! full orchestration `spec.md` assigns it: resolving primary/replica
//! placement for a key, and driving join/leave/store/lookup against a
//! [`corelib::RingIndex`] while keeping placement and finger tables
//! consistent.

pub mod manager;
pub mod placement;

pub use manager::{load_distribution, RingManager};
pub use placement::{placement, ChordReplicaStrategy, Placement, ReplicationStrategy};
