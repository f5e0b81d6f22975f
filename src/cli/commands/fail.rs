//! fail command - Show what survives failed fault domains

use anyhow::{Context as _, Result};

use super::{load_topology, ShardSettings};
use crate::cli::args::ShardArgs;
use crate::cli::Context;
use crate::core::types::FaultDomain;
use crate::ui::output;
use crate::ui::report::{FailureReport, LatticeReport};

/// Apply `failures` in order and print the survivors.
///
/// With an `identifier`, the identifier's shard is re-derived from the
/// surviving lattice and printed as well.
pub fn fail(
    ctx: &Context,
    failures: &[FaultDomain],
    identifier: Option<&str>,
    args: &ShardArgs,
) -> Result<()> {
    let verbosity = ctx.verbosity();
    let topology = load_topology(ctx)?;

    let surviving = topology
        .lattice
        .derive_failure_view_all(failures)
        .context("Failed to apply failures")?;

    output::debug(
        format!(
            "surviving: {} of {} sectors, {} of {} endpoints",
            surviving.sector_count(),
            topology.lattice.sector_count(),
            surviving.endpoint_count(),
            topology.lattice.endpoint_count()
        ),
        verbosity,
    );
    if surviving.endpoint_count() == 0 {
        output::warn("no endpoints survive these failures", verbosity);
    }

    let shard = match identifier {
        Some(identifier) => {
            let settings = ShardSettings::resolve(&topology.config, args)?;
            let derived =
                settings.derive(&surviving, identifier, identifier.as_bytes(), verbosity)?;
            Some(derived.report)
        }
        None => None,
    };

    let report = FailureReport {
        failed: failures.to_vec(),
        surviving: LatticeReport::new(&surviving),
        shard,
    };
    output::report(&report, ctx.json)?;
    Ok(())
}
