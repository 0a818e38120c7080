//! Ring construction configuration.
//!
//! `spec.md` §6 lists `m`, `num_extents`, and `replication_factor` as the
//! configuration recognised at ring construction. Bundling them in a value
//! type lets the `cli` crate load them from a config file, JSON, or flags
//! interchangeably.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Parameters a [`replication::RingManager`](../replication/struct.RingManager.html)
/// is constructed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RingConfig {
    /// Address-space width: identifiers live in `[0, 2^m)`.
    pub m: u32,
    /// Size of the declared extent universe used by the workload driver.
    pub num_extents: u32,
    /// Number of replicas to place after the primary for each extent.
    pub replication_factor: usize,
}

/// A `RingConfig` that failed validation before a ring was ever built.
///
/// Distinct from the runtime ring errors in [`crate::error::Error`]: this is
/// a program-startup concern, not something that happens mid-simulation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("m must be between 1 and 64, got {0}")]
    InvalidWidth(u32),
    #[error("num_extents must be at least 1")]
    NoExtents,
}

impl RingConfig {
    /// Creates a config without validating it; call [`Self::validate`]
    /// before using it to construct a ring.
    pub fn new(m: u32, num_extents: u32, replication_factor: usize) -> Self {
        Self {
            m,
            num_extents,
            replication_factor,
        }
    }

    /// Checks the invariants `spec.md` §6 requires of construction
    /// parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=64).contains(&self.m) {
            return Err(ConfigError::InvalidWidth(self.m));
        }
        if self.num_extents == 0 {
            return Err(ConfigError::NoExtents);
        }
        Ok(())
    }
}
