//! Core library for the Chord-style consistent hashing ring.
//!
//! This crate provides the fundamental abstractions the rest of the
//! workspace builds on:
//! - [`Identifier`], the modular address-space value every node and key is
//!   mapped onto
//! - [`hasher`], the fixed SHA-1 mapping from byte strings to identifiers
//! - [`Node`], the per-node state (store, finger table, write counter)
//! - [`RingIndex`], the sorted node sequence with successor lookup
//! - [`finger`], finger-table construction
//! - [`routing`], the Chord `find_successor_from` routed lookup
//!
//! Higher-level orchestration (placement, join/leave, redistribution) lives
//! in the `replication` crate; workload generation lives in `workload`.

pub mod config;
pub mod error;
pub mod finger;
pub mod hasher;
pub mod identifier;
pub mod node;
pub mod ring;
pub mod routing;

pub use config::RingConfig;
pub use error::{Error, Result};
pub use identifier::Identifier;
pub use node::Node;
pub use ring::RingIndex;
