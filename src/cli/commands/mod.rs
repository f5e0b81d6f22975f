//! cli::commands
//!
//! Command dispatch and handlers.
//!
//! # Architecture
//!
//! Each command handler:
//! 1. Loads the topology and builds the lattice
//! 2. Calls the core to derive shards, failure views or routes
//! 3. Renders a report from [`crate::ui::report`]
//!
//! Diagnostics (config warnings, debug lines) go to stderr so that stdout
//! carries only the report.

mod completion;
mod fail;
mod init;
mod inspect;
mod overlap;
mod route;
mod shuffle;

// Re-export command functions for testing and direct invocation
pub use completion::completion;
pub use fail::fail;
pub use init::init;
pub use inspect::inspect;
pub use overlap::overlap;
pub use route::route;
pub use shuffle::shuffle;

use anyhow::{bail, Context as _, Result};

use crate::cli::args::{Command, ShardArgs};
use crate::cli::Context;
use crate::core::config::Config;
use crate::core::lattice::Lattice;
use crate::core::shuffler::Shuffler;
use crate::ui::output::{self, Verbosity};
use crate::ui::report::{LatticeReport, ShardReport};

/// Dispatch a command to its handler.
pub fn dispatch(command: Command, ctx: &Context) -> Result<()> {
    match command {
        Command::Init { path, force } => init(ctx, path.as_deref(), force),
        Command::Inspect => inspect(ctx),
        Command::Shuffle { identifier, shard } => shuffle(ctx, &identifier, &shard),
        Command::Fail {
            failures,
            identifier,
            shard,
        } => fail(ctx, &failures, identifier.as_deref(), &shard),
        Command::Route { address, shard } => route(ctx, &address, &shard),
        Command::Overlap {
            first,
            second,
            shard,
        } => overlap(ctx, &first, &second, &shard),
        Command::Completion { shell } => completion(shell),
    }
}

/// A loaded topology and the lattice it describes.
struct Topology {
    config: Config,
    lattice: Lattice<String>,
}

/// Load the topology, report its warnings and build the lattice.
fn load_topology(ctx: &Context) -> Result<Topology> {
    let verbosity = ctx.verbosity();
    let loaded = Config::load(ctx.config.as_deref()).context("Failed to load topology")?;

    for warning in &loaded.warnings {
        output::warn(
            format!("{}: {}", warning.path.display(), warning.message),
            verbosity,
        );
    }

    let config = loaded.config;
    if let Some(path) = config.loaded_from() {
        output::debug(format!("topology: {}", path.display()), verbosity);
    }

    let lattice = config.build_lattice().context("Failed to build lattice")?;
    output::debug(
        format!(
            "lattice: {} dimensions, {} sectors, {} endpoints",
            lattice.dimensionality(),
            lattice.sector_count(),
            lattice.endpoint_count()
        ),
        verbosity,
    );

    Ok(Topology { config, lattice })
}

/// Shuffler and cell size after applying command-line overrides.
struct ShardSettings {
    shuffler: Shuffler,
    endpoints_per_cell: usize,
}

/// A shard together with its report.
struct DerivedShard {
    lattice: Lattice<String>,
    report: ShardReport,
}

impl ShardSettings {
    /// Resolve settings: flags first, then the topology, then defaults.
    fn resolve(config: &Config, args: &ShardArgs) -> Result<Self> {
        let endpoints_per_cell = args
            .per_cell
            .unwrap_or_else(|| config.endpoints_per_cell());
        if endpoints_per_cell == 0 {
            bail!("--per-cell must be at least 1");
        }

        let seed = args.seed.as_deref().unwrap_or_else(|| config.seed());
        if seed.is_empty() {
            bail!("--seed cannot be empty");
        }

        Ok(Self {
            shuffler: Shuffler::new(seed),
            endpoints_per_cell,
        })
    }

    /// Derive the shard of `identifier`, labelled `label` in reports.
    fn derive(
        &self,
        lattice: &Lattice<String>,
        label: &str,
        identifier: &[u8],
        verbosity: Verbosity,
    ) -> Result<DerivedShard> {
        let digest = self.shuffler.digest(identifier);
        output::debug(format!("digest: {}", digest), verbosity);
        output::debug(
            format!("generator seed: {}", digest.generator_seed()),
            verbosity,
        );

        let shard = self
            .shuffler
            .shuffle_shard(lattice, identifier, self.endpoints_per_cell)
            .with_context(|| format!("Failed to derive shard for '{}'", label))?;

        for (coordinate, endpoints) in shard.sectors() {
            output::debug(
                format!("visited {} ({} endpoints)", coordinate, endpoints.len()),
                verbosity,
            );
        }

        let report = ShardReport {
            identifier: label.to_string(),
            digest,
            endpoints_per_cell: self.endpoints_per_cell,
            shard: LatticeReport::new(&shard),
        };

        Ok(DerivedShard {
            lattice: shard,
            report,
        })
    }
}
