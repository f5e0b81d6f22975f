//! route command - Route a client address to an endpoint in its shard

use anyhow::Result;

use super::{load_topology, ShardSettings};
use crate::cli::args::ShardArgs;
use crate::cli::Context;
use crate::core::routing::{pick_endpoint, ClientId};
use crate::ui::output;
use crate::ui::report::RouteReport;

/// Print the endpoint `address` is routed to.
pub fn route(ctx: &Context, address: &str, args: &ShardArgs) -> Result<()> {
    let verbosity = ctx.verbosity();
    let topology = load_topology(ctx)?;
    let settings = ShardSettings::resolve(&topology.config, args)?;

    let client_id = ClientId::from_address(address);
    output::debug(format!("client id: {}", client_id), verbosity);

    let derived = settings.derive(
        &topology.lattice,
        address,
        client_id.as_bytes(),
        verbosity,
    )?;

    let endpoint = pick_endpoint(&derived.lattice, &client_id).cloned();
    if endpoint.is_none() {
        output::warn(format!("shard for '{}' has no endpoints", address), verbosity);
    }

    let report = RouteReport {
        address: address.to_string(),
        client_id,
        endpoint,
        shard: derived.report.shard,
    };
    output::report(&report, ctx.json)?;
    Ok(())
}
