//! core::config::schema
//!
//! Topology configuration schema types.
//!
//! # Topology File
//!
//! Located at (in order of precedence):
//! 1. `--config <path>` if given
//! 2. `$SHUFFLESHARD_CONFIG` if set
//! 3. `$XDG_CONFIG_HOME/shuffleshard/topology.toml`
//! 4. `~/.shuffleshard/topology.toml` (canonical write location)
//!
//! # Validation
//!
//! Values are validated after parsing: dimension names must be non-empty and
//! unique, and every sector must name one non-empty value per dimension.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::ConfigError;

/// A resource topology plus shuffler settings.
///
/// # Example
///
/// ```toml
/// dimensions = ["AZ", "Version"]
///
/// [shuffler]
/// seed = "prod-2026"
/// endpoints_per_cell = 2
///
/// [[sectors]]
/// coordinates = ["us-east-1a", "1"]
/// endpoints = ["10.0.0.1:8080", "10.0.0.2:8080"]
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct TopologyConfig {
    /// Dimension names, in coordinate order
    pub dimensions: Vec<String>,

    /// Shuffler settings
    pub shuffler: Option<ShufflerConfig>,

    /// Sectors and their endpoints
    pub sectors: Vec<SectorConfig>,
}

impl TopologyConfig {
    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.dimensions.is_empty() {
            return Err(ConfigError::InvalidValue(
                "at least one dimension is required".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for name in &self.dimensions {
            if name.is_empty() {
                return Err(ConfigError::InvalidValue(
                    "dimension names cannot be empty".to_string(),
                ));
            }
            if !seen.insert(name.as_str()) {
                return Err(ConfigError::InvalidValue(format!(
                    "duplicate dimension '{}'",
                    name
                )));
            }
        }

        for sector in &self.sectors {
            sector.validate(self.dimensions.len())?;
        }

        if let Some(shuffler) = &self.shuffler {
            shuffler.validate()?;
        }

        Ok(())
    }

    /// A small two-dimensional topology used by `shard init`.
    pub fn example() -> Self {
        let mut sectors = Vec::new();
        let mut host = 1;
        for az in ["us-east-1a", "us-east-1b", "us-east-1c"] {
            for version in ["1", "2"] {
                let endpoints = (0..3)
                    .map(|_| {
                        let endpoint = format!("10.0.0.{}:8080", host);
                        host += 1;
                        endpoint
                    })
                    .collect();
                sectors.push(SectorConfig {
                    coordinates: vec![az.to_string(), version.to_string()],
                    endpoints,
                });
            }
        }

        Self {
            dimensions: vec!["AZ".to_string(), "Version".to_string()],
            shuffler: Some(ShufflerConfig {
                seed: Some("change-me".to_string()),
                endpoints_per_cell: Some(2),
            }),
            sectors,
        }
    }
}

/// Shuffler settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ShufflerConfig {
    /// Seed mixed into every identifier's digest
    pub seed: Option<String>,

    /// Maximum endpoints kept per visited sector
    pub endpoints_per_cell: Option<usize>,
}

impl ShufflerConfig {
    /// Validate the shuffler settings.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(seed) = &self.seed {
            if seed.is_empty() {
                return Err(ConfigError::InvalidValue(
                    "shuffler seed cannot be empty".to_string(),
                ));
            }
        }
        if self.endpoints_per_cell == Some(0) {
            return Err(ConfigError::InvalidValue(
                "endpoints_per_cell must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// One sector of the topology.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct SectorConfig {
    /// One value per dimension
    pub coordinates: Vec<String>,

    /// Endpoints registered at this sector, in order
    pub endpoints: Vec<String>,
}

impl SectorConfig {
    /// Validate against the topology's dimension count.
    pub fn validate(&self, dimensionality: usize) -> Result<(), ConfigError> {
        if self.coordinates.len() != dimensionality {
            return Err(ConfigError::InvalidValue(format!(
                "sector [{}] has {} coordinate values, expected {}",
                self.coordinates.join(", "),
                self.coordinates.len(),
                dimensionality
            )));
        }
        if self.coordinates.iter().any(String::is_empty) {
            return Err(ConfigError::InvalidValue(format!(
                "sector [{}] has an empty coordinate value",
                self.coordinates.join(", ")
            )));
        }
        Ok(())
    }
}
