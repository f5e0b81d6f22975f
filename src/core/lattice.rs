//! core::lattice
//!
//! Multi-dimensional container of endpoints keyed by coordinate tuples.
//!
//! # Architecture
//!
//! A lattice has a fixed, ordered list of named dimensions. Each sector is
//! addressed by a [`Coordinate`] holding one value per dimension and stores
//! an ordered list of endpoints. Alongside the sectors, the lattice tracks
//! the distinct values registered on each dimension.
//!
//! # Invariants
//!
//! - Every coordinate has exactly one value per dimension; operations given
//!   a tuple of the wrong length fail before touching any state
//! - Registering endpoints for an existing sector appends, never replaces
//! - A dimension's value set holds exactly the values used by some sector
//! - Coordinate values are interned per dimension, so sectors sharing a value
//!   share its storage
//!
//! # Example
//!
//! ```
//! use shuffleshard::core::lattice::Lattice;
//!
//! let mut lattice = Lattice::new(["AZ", "Version"]);
//! lattice.add_endpoints_for_sector(&["us-east-1a", "1"], ["A", "B"]).unwrap();
//! lattice.add_endpoints_for_sector(&["us-east-1a", "1"], ["C"]).unwrap();
//! lattice.add_endpoints_for_sector(&["us-east-1b", "2"], ["D"]).unwrap();
//!
//! assert_eq!(
//!     lattice.endpoints_for_sector(&["us-east-1a", "1"]).unwrap(),
//!     &["A", "B", "C"]
//! );
//! assert_eq!(lattice.dimension_values("AZ"), vec!["us-east-1a", "us-east-1b"]);
//! assert!(lattice.endpoints_for_sector(&["us-east-1a"]).is_err());
//! ```

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use thiserror::Error;

use super::types::Coordinate;

/// Errors from lattice operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LatticeError {
    #[error("dimension mismatch in lattice: expected {expected} coordinate values, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("no endpoints found for sector {0}")]
    SectorNotFound(Coordinate),

    #[error("unknown dimension '{0}'")]
    UnknownDimension(String),
}

/// A lattice of endpoints of type `T`.
///
/// Sectors are kept in ascending coordinate order, which makes every
/// traversal (and therefore every derivation) independent of hashing state.
#[derive(Debug, Clone, PartialEq)]
pub struct Lattice<T> {
    /// Dimension names, in canonical coordinate order
    dimensions: Vec<String>,
    /// Endpoints per sector, in insertion order
    sectors: BTreeMap<Coordinate, Vec<T>>,
    /// Distinct values per dimension, indexed like `dimensions`
    values_by_dimension: Vec<BTreeSet<Arc<str>>>,
}

impl<T> Lattice<T> {
    /// Create an empty lattice over the given dimensions.
    ///
    /// Dimension names are expected to be unique but are not checked here.
    /// Lookups by name, including failure views, resolve to the first
    /// dimension carrying that name. Topologies loaded through
    /// [`Config`](crate::core::config::Config) reject repeated names.
    pub fn new<I, S>(dimensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let dimensions: Vec<String> = dimensions.into_iter().map(Into::into).collect();
        let values_by_dimension = vec![BTreeSet::new(); dimensions.len()];
        Self {
            dimensions,
            sectors: BTreeMap::new(),
            values_by_dimension,
        }
    }

    /// Create an empty lattice with the same dimensions as `self`.
    pub fn empty_like<U>(&self) -> Lattice<U> {
        Lattice::new(self.dimensions.iter().cloned())
    }

    /// Append `endpoints` to the sector at `coordinates`, creating it if needed.
    ///
    /// Each coordinate value is registered in its dimension's value set. An
    /// empty endpoint list still registers the sector.
    ///
    /// # Errors
    ///
    /// Returns `LatticeError::DimensionMismatch` if `coordinates` does not
    /// have one value per dimension. The lattice is left unchanged.
    pub fn add_endpoints_for_sector<S, I>(
        &mut self,
        coordinates: &[S],
        endpoints: I,
    ) -> Result<(), LatticeError>
    where
        S: AsRef<str>,
        I: IntoIterator<Item = T>,
    {
        self.check_arity(coordinates.len())?;

        let coordinate = self.intern(coordinates.iter().map(|c| c.as_ref()));
        self.sectors.entry(coordinate).or_default().extend(endpoints);
        Ok(())
    }

    /// Append to a sector whose key came from a lattice with the same dimensions.
    pub(crate) fn extend_sector<I>(&mut self, coordinate: &Coordinate, endpoints: I)
    where
        I: IntoIterator<Item = T>,
    {
        debug_assert_eq!(coordinate.len(), self.dimensions.len());
        let coordinate = self.intern(coordinate.values());
        self.sectors.entry(coordinate).or_default().extend(endpoints);
    }

    /// Get the endpoints registered at `coordinates`.
    ///
    /// # Errors
    ///
    /// - `LatticeError::DimensionMismatch` if the tuple has the wrong length
    ///   (checked first)
    /// - `LatticeError::SectorNotFound` if the tuple was never registered
    pub fn endpoints_for_sector<S: AsRef<str>>(
        &self,
        coordinates: &[S],
    ) -> Result<&[T], LatticeError> {
        self.check_arity(coordinates.len())?;
        self.sector(&Coordinate::new(coordinates))
    }

    /// Get the endpoints registered at a coordinate key.
    ///
    /// # Errors
    ///
    /// Same as [`Lattice::endpoints_for_sector`].
    pub fn sector(&self, coordinate: &Coordinate) -> Result<&[T], LatticeError> {
        self.check_arity(coordinate.len())?;
        self.sectors
            .get(coordinate)
            .map(Vec::as_slice)
            .ok_or_else(|| LatticeError::SectorNotFound(coordinate.clone()))
    }

    /// Check whether a sector was registered at `coordinates`.
    ///
    /// A tuple of the wrong length is never registered.
    pub fn contains_sector<S: AsRef<str>>(&self, coordinates: &[S]) -> bool {
        coordinates.len() == self.dimensions.len()
            && self.sectors.contains_key(&Coordinate::new(coordinates))
    }

    /// Iterate over every sector and its endpoints, in coordinate order.
    pub fn sectors(&self) -> impl Iterator<Item = (&Coordinate, &[T])> {
        self.sectors.iter().map(|(c, e)| (c, e.as_slice()))
    }

    /// Iterate over every endpoint, sector by sector.
    pub fn endpoints(&self) -> impl Iterator<Item = &T> {
        self.sectors.values().flatten()
    }

    /// All endpoints of all sectors, concatenated.
    ///
    /// Order within a sector is preserved. Sectors appear in coordinate order.
    pub fn all_endpoints(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.endpoints().cloned().collect()
    }

    /// Number of registered sectors.
    pub fn sector_count(&self) -> usize {
        self.sectors.len()
    }

    /// Total number of endpoints across all sectors.
    pub fn endpoint_count(&self) -> usize {
        self.sectors.values().map(Vec::len).sum()
    }

    /// True if no sector has been registered.
    pub fn is_empty(&self) -> bool {
        self.sectors.is_empty()
    }

    /// Dimension names, in coordinate order.
    pub fn dimension_names(&self) -> &[String] {
        &self.dimensions
    }

    /// Number of dimensions.
    pub fn dimensionality(&self) -> usize {
        self.dimensions.len()
    }

    /// Position of a dimension in coordinate order.
    ///
    /// For a repeated name this is the first position.
    pub fn dimension_index(&self, dimension: &str) -> Option<usize> {
        self.dimensions.iter().position(|d| d == dimension)
    }

    /// Distinct values registered on `dimension`, in ascending order.
    ///
    /// Returns an empty list for an unknown dimension.
    pub fn dimension_values(&self, dimension: &str) -> Vec<&str> {
        self.dimension_index(dimension)
            .map(|i| self.values_by_dimension[i].iter().map(|v| v.as_ref()).collect())
            .unwrap_or_default()
    }

    /// Number of distinct values registered on `dimension` (0 if unknown).
    pub fn dimension_size(&self, dimension: &str) -> usize {
        self.dimension_index(dimension)
            .map(|i| self.values_by_dimension[i].len())
            .unwrap_or(0)
    }

    /// Interned value set of the dimension at `index`.
    pub(crate) fn interned_values(&self, index: usize) -> &BTreeSet<Arc<str>> {
        &self.values_by_dimension[index]
    }

    fn check_arity(&self, actual: usize) -> Result<(), LatticeError> {
        if actual != self.dimensions.len() {
            return Err(LatticeError::DimensionMismatch {
                expected: self.dimensions.len(),
                actual,
            });
        }
        Ok(())
    }

    /// Register each value in its dimension's set and build the sector key.
    ///
    /// Callers must have checked arity.
    fn intern<'a>(&mut self, values: impl Iterator<Item = &'a str>) -> Coordinate {
        let interned = values
            .zip(self.values_by_dimension.iter_mut())
            .map(|(value, set)| {
                if let Some(existing) = set.get(value) {
                    return Arc::clone(existing);
                }
                let fresh: Arc<str> = Arc::from(value);
                set.insert(Arc::clone(&fresh));
                fresh
            })
            .collect();
        Coordinate::from_interned(interned)
    }
}
