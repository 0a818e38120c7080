//! Workload Driver: synthetic write sequences and load inspection.
//!
//! `spec.md` §4.9. This crate used to stream ring-state synchronization
//! messages between nodes in the teacher repository; repurposed here to
//! drive synthetic workloads through a [`replication::RingManager`] and
//! report where the resulting writes and extents land (see `DESIGN.md`
//! for why this crate, rather than a new one, took on that role).

pub mod driver;

pub use driver::{simulate_workload, OperationCounts};
pub use replication::load_distribution;
