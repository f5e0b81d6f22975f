//! core::config
//!
//! Topology configuration and loading.
//!
//! # Overview
//!
//! A single TOML file describes the resource topology (dimensions and
//! sectors with their endpoints) and the shuffler settings. Loading
//! validates the file and builds the [`Lattice`] the rest of the crate works
//! on.
//!
//! # Locations
//!
//! Searched in order:
//! 1. An explicit path (the `--config` flag)
//! 2. `$SHUFFLESHARD_CONFIG` if set
//! 3. `$XDG_CONFIG_HOME/shuffleshard/topology.toml`
//! 4. `~/.shuffleshard/topology.toml` (canonical write location)
//!
//! # Example
//!
//! ```no_run
//! use shuffleshard::core::config::Config;
//! use std::path::Path;
//!
//! let result = Config::load(Some(Path::new("topology.toml"))).unwrap();
//! let config = result.config;
//!
//! let lattice = config.build_lattice().unwrap();
//! println!("seed: {}", config.seed());
//! println!("sectors: {}", lattice.sector_count());
//! ```

pub mod schema;

pub use schema::{SectorConfig, ShufflerConfig, TopologyConfig};

use std::collections::HashSet;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::core::lattice::Lattice;

/// Seed used when the topology does not set one.
pub const DEFAULT_SEED: &str = "shuffleshard";

/// Endpoints kept per visited sector when the topology does not say.
pub const DEFAULT_ENDPOINTS_PER_CELL: usize = 2;

/// Errors from configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("failed to write config file '{path}': {source}")]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config value: {0}")]
    InvalidValue(String),

    #[error("no topology file found (searched: {})", format_paths(.searched))]
    NotFound { searched: Vec<PathBuf> },

    #[error("home directory not found")]
    NoHomeDir,
}

fn format_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Warnings generated during config loading.
#[derive(Debug, Clone)]
pub struct ConfigWarning {
    /// The warning message.
    pub message: String,
    /// The file that triggered the warning.
    pub path: PathBuf,
}

/// Result of loading configuration.
#[derive(Debug)]
pub struct ConfigLoadResult {
    /// The loaded configuration.
    pub config: Config,
    /// Any warnings generated during loading.
    pub warnings: Vec<ConfigWarning>,
}

/// A validated topology and where it was loaded from.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// The topology file contents
    pub topology: TopologyConfig,
    /// Path the topology was loaded from
    path: Option<PathBuf>,
}

impl Config {
    /// Wrap an in-memory topology.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if the topology is invalid.
    pub fn from_topology(topology: TopologyConfig) -> Result<Self, ConfigError> {
        topology.validate()?;
        Ok(Self {
            topology,
            path: None,
        })
    }

    /// Load the topology from `explicit`, or from the default locations.
    ///
    /// # Errors
    ///
    /// - `ConfigError::ReadError` if an explicit path cannot be read
    /// - `ConfigError::NotFound` if no default location holds a file
    /// - `ConfigError::ParseError` / `InvalidValue` for a malformed file
    pub fn load(explicit: Option<&Path>) -> Result<ConfigLoadResult, ConfigError> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => Self::locate()?,
        };

        let topology = Self::read_topology(&path)?;
        let warnings = Self::collect_warnings(&topology, &path);
        let mut config = Self::from_topology(topology)?;
        config.path = Some(path);

        Ok(ConfigLoadResult { config, warnings })
    }

    /// Find the first existing topology file in the default locations.
    fn locate() -> Result<PathBuf, ConfigError> {
        let mut searched = Vec::new();

        // 1. Check $SHUFFLESHARD_CONFIG
        if let Ok(path) = std::env::var("SHUFFLESHARD_CONFIG") {
            let path = PathBuf::from(path);
            if path.exists() {
                return Ok(path);
            }
            searched.push(path);
        }

        // 2. Check $XDG_CONFIG_HOME/shuffleshard/topology.toml
        if let Ok(xdg_home) = std::env::var("XDG_CONFIG_HOME") {
            let path = PathBuf::from(xdg_home).join("shuffleshard/topology.toml");
            if path.exists() {
                return Ok(path);
            }
            searched.push(path);
        }

        // 3. Check ~/.shuffleshard/topology.toml
        if let Ok(path) = Self::default_path() {
            if path.exists() {
                return Ok(path);
            }
            searched.push(path);
        }

        Err(ConfigError::NotFound { searched })
    }

    /// Read and parse a topology file.
    fn read_topology(path: &Path) -> Result<TopologyConfig, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    fn collect_warnings(topology: &TopologyConfig, path: &Path) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();
        let mut seen = HashSet::new();

        for sector in &topology.sectors {
            let label = sector.coordinates.join(", ");
            if sector.endpoints.is_empty() {
                warnings.push(ConfigWarning {
                    message: format!("sector [{}] has no endpoints", label),
                    path: path.to_path_buf(),
                });
            }
            if !seen.insert(&sector.coordinates) {
                warnings.push(ConfigWarning {
                    message: format!(
                        "sector [{}] is listed more than once; endpoints are appended",
                        label
                    ),
                    path: path.to_path_buf(),
                });
            }
        }

        warnings
    }

    /// Get the canonical topology path.
    ///
    /// Returns `~/.shuffleshard/topology.toml`.
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        let home = dirs::home_dir().ok_or(ConfigError::NoHomeDir)?;
        Ok(home.join(".shuffleshard/topology.toml"))
    }

    /// Write a topology file atomically.
    ///
    /// Creates parent directories if needed. Writes to a temp file in the
    /// same directory, then renames it into place.
    pub fn write_topology(path: &Path, topology: &TopologyConfig) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::WriteError {
                path: path.to_path_buf(),
                source: e,
            })?;
        }

        let contents = toml::to_string_pretty(topology)
            .map_err(|e| ConfigError::InvalidValue(e.to_string()))?;

        let temp_path = path.with_extension("toml.tmp");
        let mut file = fs::File::create(&temp_path).map_err(|e| ConfigError::WriteError {
            path: temp_path.clone(),
            source: e,
        })?;

        file.write_all(contents.as_bytes())
            .map_err(|e| ConfigError::WriteError {
                path: temp_path.clone(),
                source: e,
            })?;

        file.sync_all().map_err(|e| ConfigError::WriteError {
            path: temp_path.clone(),
            source: e,
        })?;

        fs::rename(&temp_path, path).map_err(|e| ConfigError::WriteError {
            path: path.to_path_buf(),
            source: e,
        })?;

        Ok(())
    }

    /// Build the lattice described by the topology.
    ///
    /// Sectors listed more than once have their endpoints appended in file
    /// order.
    pub fn build_lattice(&self) -> Result<Lattice<String>, ConfigError> {
        let mut lattice = Lattice::new(self.topology.dimensions.iter().cloned());
        for sector in &self.topology.sectors {
            lattice
                .add_endpoints_for_sector(
                    sector.coordinates.as_slice(),
                    sector.endpoints.iter().cloned(),
                )
                .map_err(|e| {
                    ConfigError::InvalidValue(format!(
                        "sector [{}]: {}",
                        sector.coordinates.join(", "),
                        e
                    ))
                })?;
        }
        Ok(lattice)
    }

    // =========================================================================
    // Accessor methods with defaults
    // =========================================================================

    /// Get the shuffler seed.
    ///
    /// Defaults to [`DEFAULT_SEED`] if not configured.
    pub fn seed(&self) -> &str {
        self.topology
            .shuffler
            .as_ref()
            .and_then(|s| s.seed.as_deref())
            .unwrap_or(DEFAULT_SEED)
    }

    /// Get the per-sector endpoint cap.
    ///
    /// Defaults to [`DEFAULT_ENDPOINTS_PER_CELL`] if not configured.
    pub fn endpoints_per_cell(&self) -> usize {
        self.topology
            .shuffler
            .as_ref()
            .and_then(|s| s.endpoints_per_cell)
            .unwrap_or(DEFAULT_ENDPOINTS_PER_CELL)
    }

    /// Get the path the topology was loaded from.
    pub fn loaded_from(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}
