//! cli::args
//!
//! Command-line argument definitions using clap derive.
//!
//! # Global Flags
//!
//! These flags are available on all commands:
//! - `--help` / `-h`: Show help
//! - `--version`: Show version
//! - `--config <path>`: Use this topology file
//! - `--debug`: Enable debug logging
//! - `--quiet` / `-q`: Minimal output
//! - `--json`: Print reports as JSON

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::core::types::FaultDomain;

/// shard - Shuffle sharding over multi-dimensional resource lattices
#[derive(Parser, Debug)]
#[command(name = "shard")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Topology file to use instead of the default locations
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Print reports as JSON
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Parser::parse()
    }
}

/// Shuffler overrides shared by commands that derive shards.
#[derive(Args, Debug, Clone, Default)]
pub struct ShardArgs {
    /// Endpoints kept per visited sector (overrides the topology)
    #[arg(long, value_name = "N")]
    pub per_cell: Option<usize>,

    /// Shuffler seed (overrides the topology)
    #[arg(long, value_name = "SEED")]
    pub seed: Option<String>,
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Write an example topology file
    #[command(
        name = "init",
        long_about = "Write an example topology file.\n\n\
            The example describes three availability zones crossed with two \
            software versions, three endpoints per sector. Edit it to match \
            your fleet before deriving shards from it.",
        after_help = "\
WORKFLOW EXAMPLES:
    # Write ~/.shuffleshard/topology.toml
    shard init

    # Write a topology next to your service
    shard init --path ./topology.toml

    # Replace an existing file
    shard init --path ./topology.toml --force"
    )]
    Init {
        /// Where to write the topology (default: ~/.shuffleshard/topology.toml)
        #[arg(long, value_name = "PATH")]
        path: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Show dimensions, values and sectors of the topology
    #[command(
        name = "inspect",
        long_about = "Show the lattice described by the topology.\n\n\
            Lists every dimension with its registered values, then every \
            sector in coordinate order with its endpoints.",
        after_help = "\
WORKFLOW EXAMPLES:
    # Check a topology before rolling it out
    shard --config ./topology.toml inspect

    # Feed the lattice to other tools
    shard inspect --json"
    )]
    Inspect,

    /// Print the shuffle shard of an identifier
    #[command(
        name = "shuffle",
        long_about = "Print the shuffle shard of an identifier.\n\n\
            The shard is derived deterministically from the identifier and the \
            shuffler seed. With one dimension every sector is visited and no \
            endpoints are dropped. With two or more dimensions the shard walks \
            a diagonal of distinct values and keeps at most --per-cell \
            endpoints from each visited sector.",
        after_help = "\
WORKFLOW EXAMPLES:
    # Shard for a customer
    shard shuffle customer-42

    # Same customer, wider cells
    shard shuffle customer-42 --per-cell 3

    # Preview the effect of rotating the seed
    shard shuffle customer-42 --seed prod-2027"
    )]
    Shuffle {
        /// Identifier to shard (customer, tenant, API key, ...)
        identifier: String,

        #[command(flatten)]
        shard: ShardArgs,
    },

    /// Show what survives the failure of one or more fault domains
    #[command(
        name = "fail",
        long_about = "Show what survives the failure of one or more fault domains.\n\n\
            Each failure names a dimension and the value that failed, such as \
            AZ=us-east-1a. Failures are applied in order and every sector \
            with a failed value is removed. With --identifier, the shard is \
            re-derived from the surviving lattice.",
        after_help = "\
WORKFLOW EXAMPLES:
    # Lose a zone
    shard fail AZ=us-east-1a

    # Lose a zone and a bad deploy at the same time
    shard fail AZ=us-east-1a Version=2

    # Where does customer-42 land after losing a zone?
    shard fail AZ=us-east-1a --identifier customer-42"
    )]
    Fail {
        /// Failed fault domains, as DIMENSION=VALUE
        #[arg(required = true, value_name = "DIM=VALUE")]
        failures: Vec<FaultDomain>,

        /// Re-derive this identifier's shard from the survivors
        #[arg(long, value_name = "IDENTIFIER")]
        identifier: Option<String>,

        #[command(flatten)]
        shard: ShardArgs,
    },

    /// Route a client address to an endpoint in its shard
    #[command(
        name = "route",
        long_about = "Route a client address to an endpoint in its shard.\n\n\
            The client identifier is the SHA-256 of the address, with the port \
            of an ip:port address ignored. The identifier selects a shard, and \
            one endpoint inside that shard.",
        after_help = "\
WORKFLOW EXAMPLES:
    # Where does this client go?
    shard route 203.0.113.7:51234

    # Ports do not matter
    shard route 203.0.113.7"
    )]
    Route {
        /// Client address, usually ip:port
        address: String,

        #[command(flatten)]
        shard: ShardArgs,
    },

    /// Show what two identifiers' shards have in common
    #[command(
        name = "overlap",
        long_about = "Show what two identifiers' shards have in common.\n\n\
            Lists the sectors and endpoints both shards contain. Shared \
            endpoints are how a failure caused through one identifier can \
            reach the other.",
        after_help = "\
WORKFLOW EXAMPLES:
    # Can a poison request from customer-1 hurt customer-2?
    shard overlap customer-1 customer-2"
    )]
    Overlap {
        /// First identifier
        first: String,

        /// Second identifier
        second: String,

        #[command(flatten)]
        shard: ShardArgs,
    },

    /// Generate shell completion scripts
    #[command(
        name = "completion",
        long_about = "Generate shell completion scripts.\n\n\
            Outputs a completion script for the specified shell to stdout.",
        after_help = "\
INSTALLATION:
    # Bash
    shard completion bash > ~/.local/share/bash-completion/completions/shard

    # Zsh
    shard completion zsh > ~/.zfunc/_shard

    # Fish
    shard completion fish > ~/.config/fish/completions/shard.fish

    # PowerShell
    shard completion powershell >> $PROFILE"
    )]
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Supported shells for completion
#[derive(clap::ValueEnum, Debug, Clone, Copy)]
#[allow(clippy::enum_variant_names)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
}
