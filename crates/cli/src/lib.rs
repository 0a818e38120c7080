//! CLI driver for the consistent-hashing ring simulator.
//!
//! Not part of the specified core — parses flags, builds a
//! [`replication::RingManager`], and dispatches one [`commands::Command`]
//! against it: store/lookup/placement, the workload driver, load
//! distribution snapshots, and the incremental `grow` loop.

pub mod commands;
pub mod config;

pub use commands::{Command, CommandResult};
pub use config::CliConfig;
