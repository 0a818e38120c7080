//! Argument parsing and top-level wiring for the ring simulator CLI.
//!
//! Not part of the specified core (`spec.md` §1 names the driver an
//! external collaborator); this module's only job is to turn CLI flags into
//! a validated [`corelib::RingConfig`], pre-populate a [`RingManager`] with
//! whatever nodes the caller asked for, and hand off to whichever
//! [`crate::commands::Command`] was selected.

use anyhow::Context;
use clap::Parser;
use corelib::identifier::Identifier;
use corelib::RingConfig;
use rand::SeedableRng;
use replication::RingManager;

use crate::commands::Command;

/// Consistent-hashing ring simulator: build a ring, place extents, and
/// inspect load distribution.
#[derive(Debug, Parser)]
#[command(name = "consistent-hash-rs", version, about)]
pub struct CliConfig {
    /// Address-space width: identifiers live in `[0, 2^m)`.
    #[arg(long, default_value_t = 16)]
    pub m: u32,

    /// Size of the declared extent universe the workload driver draws from.
    #[arg(long, default_value_t = 1000)]
    pub num_extents: u32,

    /// Number of replicas placed after the primary for each extent.
    #[arg(long, short = 'r', default_value_t = 2)]
    pub replication_factor: usize,

    /// Explicit node identifiers to join before running the command. May be
    /// repeated: `--node 10 --node 200`.
    #[arg(long = "node")]
    pub nodes: Vec<u128>,

    /// Additional nodes to add via `join_random` before running the
    /// command.
    #[arg(long, default_value_t = 0)]
    pub random_nodes: u32,

    /// Seed for the RNG driving `join_random`, kept explicit so runs are
    /// reproducible (`spec.md` §9: "random generators are passed in
    /// explicitly").
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Increase log verbosity: `-v` for debug, `-vv` for trace.
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

impl CliConfig {
    /// Installs the `tracing` subscriber, builds a ring from the `-m`,
    /// `--num-extents`, `--replication-factor`, `--node`, and
    /// `--random-nodes` flags, then executes the selected subcommand and
    /// prints its result as JSON.
    pub fn run(&self) -> anyhow::Result<()> {
        self.install_tracing();

        let ring_config = RingConfig::new(self.m, self.num_extents, self.replication_factor);
        ring_config
            .validate()
            .map_err(|e| anyhow::anyhow!(e.to_string()))
            .context("invalid ring configuration")?;

        let mut manager = RingManager::new(ring_config);
        for &raw_id in &self.nodes {
            manager
                .join(Identifier(raw_id))
                .with_context(|| format!("joining node {raw_id}"))?;
        }

        if self.random_nodes > 0 {
            let mut rng = rand::rngs::StdRng::seed_from_u64(self.seed);
            for _ in 0..self.random_nodes {
                manager.join_random(&mut rng).context("join_random")?;
            }
        }

        if manager.is_empty() {
            anyhow::bail!("no nodes in the ring; pass --node or --random-nodes");
        }

        let result = self.command.execute(&mut manager, self.seed)?;
        println!("{}", serde_json::to_string_pretty(&result)?);
        Ok(())
    }

    fn install_tracing(&self) {
        use tracing_subscriber::EnvFilter;

        let level = match self.verbose {
            0 => "warn",
            1 => "debug",
            _ => "trace",
        };
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
        let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
    }
}
