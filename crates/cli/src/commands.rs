//! Subcommands exposed by the CLI driver.
//!
//! Each variant is a thin wrapper around one or two `replication`/`workload`
//! operations; the core algorithms live entirely in `corelib`,
//! `replication`, and `workload` — this module only shapes their results
//! for printing.

use std::collections::BTreeMap;

use clap::Subcommand;
use rand::SeedableRng;
use replication::RingManager;
use serde::Serialize;

/// A single CLI invocation's action against an already-populated ring.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Write a key/value extent and report where it landed.
    Store {
        key: String,
        value: String,
    },

    /// Look up a key's primary node and stored value (replicas are not
    /// consulted, per `spec.md` §4.6).
    Lookup {
        key: String,
    },

    /// Resolve a key's primary and replica set without storing anything.
    Placement {
        key: String,
    },

    /// Run the synthetic workload driver for `num_ops` writes and report
    /// per-node operation counts.
    Workload {
        #[arg(long, default_value_t = 1000)]
        num_ops: u64,
    },

    /// Report how many keys each node currently stores.
    LoadDistribution,

    /// Reproduce the "grow, then measure" loop from the original source:
    /// add nodes in batches via `join_random`, snapshotting the load
    /// distribution after each batch (`SPEC_FULL.md` §4.13).
    Grow {
        /// Number of growth steps to take.
        #[arg(long, default_value_t = 4)]
        batches: u32,
        /// Nodes added via `join_random` per batch.
        #[arg(long, default_value_t = 1)]
        nodes_per_batch: u32,
    },
}

impl Command {
    /// Runs this command against `manager`, mutating it as needed.
    ///
    /// `seed` drives `Grow`'s `join_random` calls; it is independent of the
    /// seed `CliConfig` already used to pre-populate the ring so a `grow`
    /// run's batches don't collide with the initial `--random-nodes` draw.
    pub fn execute(&self, manager: &mut RingManager, seed: u64) -> anyhow::Result<CommandResult> {
        match self {
            Command::Store { key, value } => {
                manager.store(key, value)?;
                let placement = manager.placement(key)?;
                Ok(CommandResult::Stored {
                    key: key.clone(),
                    primary: placement.primary.to_string(),
                    replicas: placement.replicas.iter().map(ToString::to_string).collect(),
                })
            }
            Command::Lookup { key } => {
                let (node_id, key, value) = manager.lookup(key)?;
                Ok(CommandResult::Lookup {
                    node_id: node_id.to_string(),
                    key,
                    value,
                })
            }
            Command::Placement { key } => {
                let placement = manager.placement(key)?;
                Ok(CommandResult::Placement {
                    primary: placement.primary.to_string(),
                    replicas: placement.replicas.iter().map(ToString::to_string).collect(),
                })
            }
            Command::Workload { num_ops } => {
                let counts = workload::simulate_workload(manager, *num_ops)?;
                let operation_counts = counts.into_iter().map(|(id, n)| (id.to_string(), n)).collect();
                Ok(CommandResult::Workload { operation_counts })
            }
            Command::LoadDistribution => {
                let dist = replication::load_distribution(manager);
                let store_sizes = dist.into_iter().map(|(id, n)| (id.to_string(), n)).collect();
                Ok(CommandResult::LoadDistribution { store_sizes })
            }
            Command::Grow { batches, nodes_per_batch } => {
                let mut rng = rand::rngs::StdRng::seed_from_u64(seed ^ 0x9E37_79B9_7F4A_7C15);
                let mut steps = Vec::with_capacity(*batches as usize);
                for batch in 0..*batches {
                    let mut joined = Vec::with_capacity(*nodes_per_batch as usize);
                    for _ in 0..*nodes_per_batch {
                        joined.push(manager.join_random(&mut rng)?.to_string());
                    }
                    let dist = replication::load_distribution(manager);
                    steps.push(GrowStep {
                        batch,
                        nodes_joined: joined,
                        store_sizes: dist.into_iter().map(|(id, n)| (id.to_string(), n)).collect(),
                    });
                }
                Ok(CommandResult::Grown { steps })
            }
        }
    }
}

/// One batch of `Command::Grow`'s incremental growth-then-measure loop.
#[derive(Debug, Serialize)]
pub struct GrowStep {
    pub batch: u32,
    pub nodes_joined: Vec<String>,
    pub store_sizes: BTreeMap<String, usize>,
}

/// The result of executing a [`Command`], shaped for JSON output.
///
/// Identifiers are rendered as decimal strings rather than numbers: `m` can
/// be as wide as 64 bits and JSON numbers don't round-trip `u64` reliably
/// across all parsers.
#[derive(Debug, Serialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum CommandResult {
    Stored {
        key: String,
        primary: String,
        replicas: Vec<String>,
    },
    Lookup {
        node_id: String,
        key: String,
        value: Option<String>,
    },
    Placement {
        primary: String,
        replicas: Vec<String>,
    },
    Workload {
        operation_counts: BTreeMap<String, u64>,
    },
    LoadDistribution {
        store_sizes: BTreeMap<String, usize>,
    },
    Grown {
        steps: Vec<GrowStep>,
    },
}
