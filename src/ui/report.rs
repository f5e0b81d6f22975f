//! ui::report
//!
//! Reports printed by `shard` commands.
//!
//! # Design
//!
//! Each report is a plain data type built from core results. It serializes to
//! JSON for `--json` and renders as indented text through `Display`. Building
//! a report never fails and has no side effects.
//!
//! # Example Output
//!
//! ```text
//! Dimensions:
//!   AZ: us-east-1a, us-east-1b
//!   Version: 1, 2
//! Sectors:
//!   [us-east-1a, 2] (2 endpoints)
//!     - 10.0.0.5:8080
//!     - 10.0.0.4:8080
//! Total: 2 endpoints in 1 sectors
//! ```

use std::fmt;

use serde::Serialize;

use super::output::format_list;
use crate::core::lattice::Lattice;
use crate::core::routing::{ClientId, Overlap};
use crate::core::types::{Coordinate, FaultDomain, ShardDigest};

/// A dimension and its registered values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DimensionReport {
    pub name: String,
    pub values: Vec<String>,
}

/// A sector and its endpoints, in sector order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectorReport {
    pub coordinates: Coordinate,
    pub endpoints: Vec<String>,
}

/// Full contents of a lattice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LatticeReport {
    pub dimensions: Vec<DimensionReport>,
    pub sectors: Vec<SectorReport>,
    pub endpoint_count: usize,
}

impl LatticeReport {
    /// Describe `lattice`, rendering endpoints with `Display`.
    pub fn new<T: fmt::Display>(lattice: &Lattice<T>) -> Self {
        let dimensions = lattice
            .dimension_names()
            .iter()
            .map(|name| DimensionReport {
                name: name.clone(),
                values: lattice
                    .dimension_values(name)
                    .into_iter()
                    .map(str::to_string)
                    .collect(),
            })
            .collect();

        let sectors = lattice
            .sectors()
            .map(|(coordinate, endpoints)| SectorReport {
                coordinates: coordinate.clone(),
                endpoints: endpoints.iter().map(ToString::to_string).collect(),
            })
            .collect();

        Self {
            dimensions,
            sectors,
            endpoint_count: lattice.endpoint_count(),
        }
    }
}

impl fmt::Display for LatticeReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Dimensions:")?;
        for dimension in &self.dimensions {
            writeln!(f, "  {}: {}", dimension.name, dimension.values.join(", "))?;
        }

        writeln!(f, "Sectors:")?;
        if self.sectors.is_empty() {
            writeln!(f, "  (none)")?;
        }
        for sector in &self.sectors {
            writeln!(
                f,
                "  {} ({} endpoints)",
                sector.coordinates,
                sector.endpoints.len()
            )?;
            if !sector.endpoints.is_empty() {
                writeln!(f, "{}", format_list(&sector.endpoints, "    - "))?;
            }
        }

        writeln!(
            f,
            "Total: {} endpoints in {} sectors",
            self.endpoint_count,
            self.sectors.len()
        )
    }
}

/// The shard derived for one identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShardReport {
    pub identifier: String,
    pub digest: ShardDigest,
    pub endpoints_per_cell: usize,
    pub shard: LatticeReport,
}

impl fmt::Display for ShardReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Shard for '{}'", self.identifier)?;
        writeln!(f, "Digest: {}", self.digest)?;
        writeln!(f, "Endpoints per cell: {}", self.endpoints_per_cell)?;
        write!(f, "{}", self.shard)
    }
}

/// What survives a sequence of failures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailureReport {
    pub failed: Vec<FaultDomain>,
    pub surviving: LatticeReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shard: Option<ShardReport>,
}

impl fmt::Display for FailureReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let failed: Vec<String> = self.failed.iter().map(ToString::to_string).collect();
        writeln!(f, "Failed: {}", failed.join(", "))?;
        match &self.shard {
            Some(shard) => {
                writeln!(
                    f,
                    "Surviving: {} endpoints in {} sectors",
                    self.surviving.endpoint_count,
                    self.surviving.sectors.len()
                )?;
                write!(f, "{}", shard)
            }
            None => write!(f, "{}", self.surviving),
        }
    }
}

/// Where a client address is routed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteReport {
    pub address: String,
    pub client_id: ClientId,
    pub endpoint: Option<String>,
    pub shard: LatticeReport,
}

impl fmt::Display for RouteReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Client: {}", self.address)?;
        writeln!(f, "Client id: {}", self.client_id)?;
        match &self.endpoint {
            Some(endpoint) => writeln!(f, "Endpoint: {}", endpoint)?,
            None => writeln!(f, "Endpoint: (none, shard is empty)")?,
        }
        write!(f, "{}", self.shard)
    }
}

/// Shared capacity between two identifiers' shards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OverlapReport {
    pub first: String,
    pub second: String,
    pub first_endpoints: usize,
    pub second_endpoints: usize,
    pub overlap: Overlap<String>,
    pub disjoint: bool,
}

impl OverlapReport {
    /// Describe the overlap between two labelled shards.
    pub fn new<T: fmt::Display>(
        first: &str,
        second: &str,
        a: &Lattice<T>,
        b: &Lattice<T>,
        overlap: Overlap<String>,
    ) -> Self {
        let disjoint = overlap.is_disjoint();
        Self {
            first: first.to_string(),
            second: second.to_string(),
            first_endpoints: a.endpoint_count(),
            second_endpoints: b.endpoint_count(),
            overlap,
            disjoint,
        }
    }
}

impl fmt::Display for OverlapReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "'{}' ({} endpoints) and '{}' ({} endpoints)",
            self.first, self.first_endpoints, self.second, self.second_endpoints
        )?;
        if self.overlap.is_disjoint() {
            writeln!(f, "Shards are disjoint")?;
        }
        writeln!(f, "Shared sectors: {}", self.overlap.sectors.len())?;
        if !self.overlap.sectors.is_empty() {
            writeln!(f, "{}", format_list(&self.overlap.sectors, "  - "))?;
        }
        writeln!(f, "Shared endpoints: {}", self.overlap.endpoints.len())?;
        if !self.overlap.endpoints.is_empty() {
            writeln!(f, "{}", format_list(&self.overlap.endpoints, "  - "))?;
        }
        Ok(())
    }
}
