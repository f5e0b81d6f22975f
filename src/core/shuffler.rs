//! core::shuffler
//!
//! Seeded, per-identifier shuffle sharding over a [`Lattice`].
//!
//! # Algorithm
//!
//! For a request identifier:
//!
//! 1. Digest `seed ‖ identifier` ([`ShardDigest`]) and seed a generator from
//!    its first eight bytes. The generator lives only for this call and drives
//!    every randomized step below.
//! 2. Shuffle each dimension's value set, in dimension order.
//! 3. One dimension: visit every sector in shuffled order and shuffle its
//!    endpoints. Nothing is dropped.
//! 4. Two or more dimensions: walk the diagonal of the shuffled value lists,
//!    pairing the `i`-th value of every dimension, for as many steps as the
//!    smallest dimension has values. Each visited sector contributes at most
//!    `endpoints_per_cell` of its shuffled endpoints.
//!
//! # Invariants
//!
//! - The same seed, identifier and lattice always produce the same shard
//! - A shard is never partially built: a missing sector on the diagonal
//!   fails the whole call
//! - Inputs are never modified

use std::sync::Arc;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use thiserror::Error;

use super::lattice::{Lattice, LatticeError};
use super::types::{Coordinate, ShardDigest};

/// Errors from shuffle sharding.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ShuffleError {
    #[error("invalid dimension: cannot shuffle shard a lattice with no dimensions")]
    InvalidDimension,

    #[error("failed to get endpoints for sector")]
    SectorLookupFailed(#[source] LatticeError),
}

/// Derives shuffle shards for identifiers under a fixed seed.
///
/// A `Shuffler` holds no mutable state; one instance can serve concurrent
/// callers.
///
/// Shards are reproducible for a given seed, identifier and lattice as long as
/// the `rand` version is unchanged. `StdRng` does not promise the same stream
/// across `rand` releases, so upgrading it may reassign every shard.
///
/// # Example
///
/// ```
/// use shuffleshard::core::lattice::Lattice;
/// use shuffleshard::core::shuffler::Shuffler;
///
/// let mut lattice = Lattice::new(["AZ", "Version"]);
/// for az in ["a", "b", "c"] {
///     for version in ["1", "2"] {
///         let endpoints = (0..4).map(|i| format!("{az}{version}-{i}"));
///         lattice.add_endpoints_for_sector(&[az, version], endpoints).unwrap();
///     }
/// }
///
/// let shuffler = Shuffler::new("prod");
/// let shard = shuffler.shuffle_shard(&lattice, b"customer-7", 2).unwrap();
///
/// // Two versions, so the diagonal visits two sectors.
/// assert_eq!(shard.sector_count(), 2);
/// assert_eq!(shard.endpoint_count(), 4);
/// assert_eq!(shard, shuffler.shuffle_shard(&lattice, b"customer-7", 2).unwrap());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shuffler {
    seed: String,
}

impl Shuffler {
    /// Create a shuffler bound to `seed`.
    pub fn new(seed: impl Into<String>) -> Self {
        Self { seed: seed.into() }
    }

    /// The seed this shuffler was created with.
    pub fn seed(&self) -> &str {
        &self.seed
    }

    /// Digest driving the shard of `identifier`.
    pub fn digest(&self, identifier: &[u8]) -> ShardDigest {
        ShardDigest::compute(&self.seed, identifier)
    }

    /// Derive the shuffle shard of `identifier` from `lattice`.
    ///
    /// The result is a new lattice with the same dimensions, populated only at
    /// the visited sectors.
    ///
    /// # Errors
    ///
    /// - `ShuffleError::InvalidDimension` if `lattice` has no dimensions
    /// - `ShuffleError::SectorLookupFailed` if the diagonal walk reaches a
    ///   coordinate with no registered sector
    pub fn shuffle_shard<T: Clone>(
        &self,
        lattice: &Lattice<T>,
        identifier: &[u8],
        endpoints_per_cell: usize,
    ) -> Result<Lattice<T>, ShuffleError> {
        let mut rng = StdRng::seed_from_u64(self.digest(identifier).generator_seed());

        let shuffled: Vec<Vec<Arc<str>>> = (0..lattice.dimensionality())
            .map(|index| {
                let mut values: Vec<Arc<str>> =
                    lattice.interned_values(index).iter().cloned().collect();
                values.shuffle(&mut rng);
                values
            })
            .collect();

        let mut chosen = lattice.empty_like();

        match shuffled.as_slice() {
            [] => return Err(ShuffleError::InvalidDimension),
            [only] => {
                for value in only {
                    let coordinate = Coordinate::from_interned(vec![Arc::clone(value)]);
                    let mut endpoints = lattice
                        .sector(&coordinate)
                        .map_err(ShuffleError::SectorLookupFailed)?
                        .to_vec();
                    endpoints.shuffle(&mut rng);
                    chosen.extend_sector(&coordinate, endpoints);
                }
            }
            dimensions => {
                let cells = dimensions.iter().map(Vec::len).min().unwrap_or(0);
                for i in 0..cells {
                    let coordinate = Coordinate::from_interned(
                        dimensions.iter().map(|values| Arc::clone(&values[i])).collect(),
                    );
                    let mut endpoints = lattice
                        .sector(&coordinate)
                        .map_err(ShuffleError::SectorLookupFailed)?
                        .to_vec();
                    endpoints.shuffle(&mut rng);
                    endpoints.truncate(endpoints_per_cell);
                    chosen.extend_sector(&coordinate, endpoints);
                }
            }
        }

        Ok(chosen)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn grid(azs: &[&str], versions: &[&str], per_sector: usize) -> Lattice<String> {
        let mut lattice = Lattice::new(["AZ", "Version"]);
        for az in azs {
            for version in versions {
                let endpoints = (0..per_sector).map(|i| format!("{az}/{version}/{i}"));
                lattice.add_endpoints_for_sector(&[*az, *version], endpoints).unwrap();
            }
        }
        lattice
    }

    fn one_dimensional(cells: usize, per_cell: usize) -> Lattice<String> {
        let mut lattice = Lattice::new(["cell"]);
        for c in 0..cells {
            let endpoints = (0..per_cell).map(|i| format!("c{c}-{i}"));
            lattice
                .add_endpoints_for_sector(&[format!("c{c}")], endpoints)
                .unwrap();
        }
        lattice
    }

    #[test]
    fn zero_dimensions_rejected() {
        let lattice: Lattice<String> = Lattice::new(Vec::<String>::new());
        let err = Shuffler::new("s").shuffle_shard(&lattice, b"id", 1).unwrap_err();
        assert_eq!(err, ShuffleError::InvalidDimension);
    }

    #[test]
    fn deterministic_for_same_identifier() {
        let lattice = grid(&["a", "b", "c"], &["1", "2", "3"], 5);
        let shuffler = Shuffler::new("seed");

        let first = shuffler.shuffle_shard(&lattice, b"client", 2).unwrap();
        for _ in 0..5 {
            let again = shuffler.shuffle_shard(&lattice, b"client", 2).unwrap();
            assert_eq!(first.all_endpoints(), again.all_endpoints());
            assert_eq!(first, again);
        }
    }

    #[test]
    fn separate_instances_with_same_seed_agree() {
        let lattice = grid(&["a", "b"], &["1", "2"], 4);
        let a = Shuffler::new("seed").shuffle_shard(&lattice, b"x", 3).unwrap();
        let b = Shuffler::new("seed").shuffle_shard(&lattice, b"x", 3).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn identifiers_spread_across_shards() {
        let lattice = grid(&["a", "b", "c", "d"], &["1", "2", "3", "4"], 6);
        let shuffler = Shuffler::new("seed");

        let shards: HashSet<Vec<String>> = (0..32)
            .map(|i| {
                shuffler
                    .shuffle_shard(&lattice, format!("client-{i}").as_bytes(), 2)
                    .unwrap()
                    .all_endpoints()
            })
            .collect();
        assert!(shards.len() > 1);
    }

    #[test]
    fn one_dimension_endpoint_order_is_deterministic() {
        let lattice = one_dimensional(6, 8);
        let shuffler = Shuffler::new("seed");

        let first = shuffler.shuffle_shard(&lattice, b"x", 1).unwrap();
        for _ in 0..20 {
            let again = Shuffler::new("seed").shuffle_shard(&lattice, b"x", 1).unwrap();
            assert_eq!(first.all_endpoints(), again.all_endpoints());
        }
        assert_ne!(first.all_endpoints(), lattice.all_endpoints());
    }

    #[test]
    fn one_dimension_visits_every_sector_without_truncation() {
        let lattice = one_dimensional(4, 5);
        let shard = Shuffler::new("seed").shuffle_shard(&lattice, b"id", 1).unwrap();

        assert_eq!(shard.sector_count(), 4);
        for (coordinate, endpoints) in lattice.sectors() {
            let mut original = endpoints.to_vec();
            let mut shuffled = shard.sector(coordinate).unwrap().to_vec();
            original.sort();
            shuffled.sort();
            assert_eq!(original, shuffled);
        }
    }

    #[test]
    fn two_dimensions_cap_each_cell() {
        let lattice = grid(&["a", "b", "c"], &["1", "2", "3", "4"], 5);
        let shard = Shuffler::new("seed").shuffle_shard(&lattice, b"id", 2).unwrap();

        assert_eq!(shard.sector_count(), 3);
        for (_, endpoints) in shard.sectors() {
            assert_eq!(endpoints.len(), 2);
        }
    }

    #[test]
    fn diagonal_uses_each_value_at_most_once() {
        let lattice = grid(&["a", "b", "c"], &["1", "2", "3", "4"], 2);
        let shard = Shuffler::new("seed").shuffle_shard(&lattice, b"id", 1).unwrap();

        // AZ is the smaller dimension, so every zone appears exactly once.
        assert_eq!(shard.dimension_values("AZ"), vec!["a", "b", "c"]);
        assert_eq!(shard.dimension_size("Version"), 3);
    }

    #[test]
    fn cap_larger_than_sector_keeps_everything() {
        let lattice = grid(&["a", "b"], &["1", "2"], 3);
        let shard = Shuffler::new("seed").shuffle_shard(&lattice, b"id", 10).unwrap();

        assert_eq!(shard.sector_count(), 2);
        assert_eq!(shard.endpoint_count(), 6);
    }

    #[test]
    fn selected_endpoints_come_from_their_sector() {
        let lattice = grid(&["a", "b", "c"], &["1", "2", "3"], 6);
        let shard = Shuffler::new("seed").shuffle_shard(&lattice, b"id", 3).unwrap();

        for (coordinate, endpoints) in shard.sectors() {
            let source = lattice.sector(coordinate).unwrap();
            assert!(endpoints.iter().all(|e| source.contains(e)));
            let unique: HashSet<_> = endpoints.iter().collect();
            assert_eq!(unique.len(), endpoints.len());
        }
    }

    #[test]
    fn missing_diagonal_sector_aborts() {
        // (b, 2) is never registered, so any diagonal pairing b with 2 fails.
        let mut lattice = Lattice::new(["AZ", "Version"]);
        lattice.add_endpoints_for_sector(&["a", "1"], ["A"]).unwrap();
        lattice.add_endpoints_for_sector(&["a", "2"], ["B"]).unwrap();
        lattice.add_endpoints_for_sector(&["b", "1"], ["C"]).unwrap();

        let shuffler = Shuffler::new("seed");
        let mut failures = 0;
        for i in 0..64 {
            match shuffler.shuffle_shard(&lattice, format!("id-{i}").as_bytes(), 1) {
                Ok(shard) => assert_eq!(shard.sector_count(), 2),
                Err(ShuffleError::SectorLookupFailed(LatticeError::SectorNotFound(c))) => {
                    assert_eq!(c, Coordinate::new(["b", "2"]));
                    failures += 1;
                }
                Err(other) => panic!("unexpected error: {other}"),
            }
        }
        assert!(failures > 0);
    }

    #[test]
    fn source_lattice_is_untouched() {
        let lattice = grid(&["a", "b"], &["1", "2"], 4);
        let before = lattice.clone();
        let _ = Shuffler::new("seed").shuffle_shard(&lattice, b"id", 1).unwrap();
        assert_eq!(lattice, before);
    }

    #[test]
    fn concurrent_calls_reproduce_sequential_results() {
        let lattice = grid(&["a", "b", "c"], &["1", "2", "3"], 5);
        let shuffler = Shuffler::new("seed");
        let expected: Vec<_> = (0..8)
            .map(|i| {
                shuffler
                    .shuffle_shard(&lattice, format!("id-{i}").as_bytes(), 2)
                    .unwrap()
            })
            .collect();

        let actual: Vec<_> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|i| {
                    let shuffler = &shuffler;
                    let lattice = &lattice;
                    scope.spawn(move || {
                        shuffler
                            .shuffle_shard(lattice, format!("id-{i}").as_bytes(), 2)
                            .unwrap()
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        assert_eq!(expected, actual);
    }
}
