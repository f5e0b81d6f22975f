//! inspect command - Show the lattice described by the topology

use anyhow::Result;

use super::load_topology;
use crate::cli::Context;
use crate::ui::output;
use crate::ui::report::LatticeReport;

/// Print every dimension, value and sector of the topology.
pub fn inspect(ctx: &Context) -> Result<()> {
    let topology = load_topology(ctx)?;
    output::report(&LatticeReport::new(&topology.lattice), ctx.json)?;
    Ok(())
}
