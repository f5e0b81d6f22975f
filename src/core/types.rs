//! core::types
//!
//! Strong types for core domain concepts.
//!
//! # Types
//!
//! - [`Coordinate`] - Structural key addressing one sector of a lattice
//! - [`ShardDigest`] - Digest of a shuffler seed and request identifier
//! - [`FaultDomain`] - A `(dimension, value)` pair naming a failed domain
//!
//! # Examples
//!
//! ```
//! use shuffleshard::core::types::{Coordinate, FaultDomain, ShardDigest};
//!
//! let coord = Coordinate::new(["us-east-1a", "v2"]);
//! assert_eq!(coord.len(), 2);
//! assert_eq!(coord.get(1), Some("v2"));
//!
//! let digest = ShardDigest::compute("seed", b"client-42");
//! assert_eq!(digest, ShardDigest::compute("seed", b"client-42"));
//!
//! let domain: FaultDomain = "AZ=us-east-1a".parse().unwrap();
//! assert_eq!(domain.dimension(), "AZ");
//! assert!("no-separator".parse::<FaultDomain>().is_err());
//! ```

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Serialize, Serializer};
use sha2::{Digest, Sha256};
use thiserror::Error;

/// Errors from type validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid fault domain '{0}': expected DIMENSION=VALUE")]
    InvalidFaultDomain(String),
}

/// An ordered tuple of coordinate values, one per lattice dimension.
///
/// Coordinates are compared and hashed structurally, value by value, so a
/// separator character appearing inside a value can never make two distinct
/// tuples collide. Values handed out by a [`Lattice`](crate::core::lattice::Lattice)
/// share storage with the lattice's per-dimension value sets.
///
/// # Example
///
/// ```
/// use shuffleshard::core::types::Coordinate;
///
/// let a = Coordinate::new(["a,b", "c"]);
/// let b = Coordinate::new(["a", "b,c"]);
/// assert_ne!(a, b);
/// assert_eq!(a.to_string(), "[a,b, c]");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Coordinate(Arc<[Arc<str>]>);

impl Coordinate {
    /// Build a coordinate from its component values.
    pub fn new<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self(values.into_iter().map(|v| Arc::from(v.as_ref())).collect())
    }

    /// Build a coordinate from already-interned values.
    pub(crate) fn from_interned(values: Vec<Arc<str>>) -> Self {
        Self(values.into())
    }

    /// Number of components (equals the owning lattice's dimensionality).
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True for the zero-dimensional coordinate.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Component at `index`, in dimension order.
    pub fn get(&self, index: usize) -> Option<&str> {
        self.0.get(index).map(|v| v.as_ref())
    }

    /// Iterate the components in dimension order.
    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|v| v.as_ref())
    }

    pub(crate) fn interned(&self) -> &[Arc<str>] {
        &self.0
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.values().collect::<Vec<_>>().join(", "))
    }
}

impl Serialize for Coordinate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.values())
    }
}

/// SHA-256 digest of a shuffler seed followed by a request identifier.
///
/// The digest drives every randomized step of a shuffle: its first eight
/// bytes, read little-endian, seed the call-scoped generator.
///
/// # Example
///
/// ```
/// use shuffleshard::core::types::ShardDigest;
///
/// let a = ShardDigest::compute("seed", b"alice");
/// let b = ShardDigest::compute("seed", b"bob");
/// assert_ne!(a.generator_seed(), b.generator_seed());
/// assert_eq!(a.to_string().len(), 64);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShardDigest([u8; 32]);

impl ShardDigest {
    /// Digest `seed ‖ identifier`.
    pub fn compute(seed: &str, identifier: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(seed.as_bytes());
        hasher.update(identifier);

        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(&hasher.finalize());
        Self(bytes)
    }

    /// Generator seed: the first eight digest bytes as a little-endian `u64`.
    pub fn generator_seed(&self) -> u64 {
        let mut prefix = [0u8; 8];
        prefix.copy_from_slice(&self.0[..8]);
        u64::from_le_bytes(prefix)
    }

    /// Raw digest bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Display for ShardDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

impl Serialize for ShardDigest {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex::encode(self.0))
    }
}

/// A failed fault domain: one value along one dimension.
///
/// Parsed from `DIMENSION=VALUE`. The value may itself contain `=`; only the
/// first separator splits.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct FaultDomain {
    dimension: String,
    value: String,
}

impl FaultDomain {
    /// Create a fault domain from its parts.
    pub fn new(dimension: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            dimension: dimension.into(),
            value: value.into(),
        }
    }

    /// The dimension the failure lies on.
    pub fn dimension(&self) -> &str {
        &self.dimension
    }

    /// The failed value on that dimension.
    pub fn value(&self) -> &str {
        &self.value
    }
}

impl FromStr for FaultDomain {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('=') {
            Some((dimension, value)) if !dimension.is_empty() && !value.is_empty() => {
                Ok(Self::new(dimension, value))
            }
            _ => Err(TypeError::InvalidFaultDomain(s.to_string())),
        }
    }
}

impl fmt::Display for FaultDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.dimension, self.value)
    }
}
