//! init command - Write an example topology file

use std::path::Path;

use anyhow::{bail, Context as _, Result};

use crate::cli::Context;
use crate::core::config::{Config, TopologyConfig};
use crate::ui::output;

/// Write the example topology.
///
/// # Arguments
///
/// * `ctx` - Execution context
/// * `path` - Target file; falls back to `--config`, then the canonical path
/// * `force` - Overwrite an existing file
pub fn init(ctx: &Context, path: Option<&Path>, force: bool) -> Result<()> {
    let path = match path.or(ctx.config.as_deref()) {
        Some(path) => path.to_path_buf(),
        None => Config::default_path().context("Failed to determine topology path")?,
    };

    if path.exists() && !force {
        bail!(
            "Topology file '{}' already exists. Use --force to overwrite.",
            path.display()
        );
    }

    let topology = TopologyConfig::example();
    Config::write_topology(&path, &topology).context("Failed to write topology")?;

    let verbosity = ctx.verbosity();
    output::print(
        format!("Wrote example topology to {}", path.display()),
        verbosity,
    );
    output::print(
        format!(
            "{} dimensions, {} sectors. Change the shuffler seed before using it.",
            topology.dimensions.len(),
            topology.sectors.len()
        ),
        verbosity,
    );

    Ok(())
}
