//! overlap command - Compare the shards of two identifiers

use anyhow::Result;

use super::{load_topology, ShardSettings};
use crate::cli::args::ShardArgs;
use crate::cli::Context;
use crate::core::routing;
use crate::ui::output;
use crate::ui::report::OverlapReport;

/// Print the sectors and endpoints shared by two identifiers' shards.
pub fn overlap(ctx: &Context, first: &str, second: &str, args: &ShardArgs) -> Result<()> {
    let verbosity = ctx.verbosity();
    let topology = load_topology(ctx)?;
    let settings = ShardSettings::resolve(&topology.config, args)?;

    let a = settings.derive(&topology.lattice, first, first.as_bytes(), verbosity)?;
    let b = settings.derive(&topology.lattice, second, second.as_bytes(), verbosity)?;

    let shared = routing::overlap(&a.lattice, &b.lattice);
    if shared.is_disjoint() {
        output::debug(format!("'{}' and '{}' share no endpoint", first, second), verbosity);
    }
    let report = OverlapReport::new(first, second, &a.lattice, &b.lattice, shared);
    output::report(&report, ctx.json)?;
    Ok(())
}
