//! shuffle command - Print the shuffle shard of an identifier

use anyhow::Result;

use super::{load_topology, ShardSettings};
use crate::cli::args::ShardArgs;
use crate::cli::Context;
use crate::ui::output;

/// Derive and print the shard of `identifier`.
pub fn shuffle(ctx: &Context, identifier: &str, args: &ShardArgs) -> Result<()> {
    let topology = load_topology(ctx)?;
    let settings = ShardSettings::resolve(&topology.config, args)?;

    let derived = settings.derive(
        &topology.lattice,
        identifier,
        identifier.as_bytes(),
        ctx.verbosity(),
    )?;

    output::report(&derived.report, ctx.json)?;
    Ok(())
}
