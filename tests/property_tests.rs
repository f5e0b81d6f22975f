//! Property-based tests for the lattice, failure views and the shuffler.
//!
//! These tests use proptest to verify invariants hold across
//! randomly generated topologies and identifiers.

use std::collections::BTreeSet;

use proptest::prelude::*;

use shuffleshard::core::lattice::{Lattice, LatticeError};
use shuffleshard::core::shuffler::Shuffler;

/// Strategy for dimension cardinalities of a lattice with 2-4 dimensions.
fn cardinalities() -> impl Strategy<Value = Vec<usize>> {
    prop::collection::vec(1usize..5, 2..=4)
}

/// Strategy for identifiers.
fn identifier() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 0..32)
}

/// Build a full grid over `cardinalities` with `per_sector` endpoints each.
///
/// Endpoint names encode their sector, so every endpoint is distinct.
fn grid(cardinalities: &[usize], per_sector: usize) -> Lattice<String> {
    let names: Vec<String> = (0..cardinalities.len()).map(|d| format!("d{d}")).collect();
    let mut lattice = Lattice::new(names);

    let mut coordinates: Vec<Vec<String>> = vec![Vec::new()];
    for (d, &size) in cardinalities.iter().enumerate() {
        coordinates = coordinates
            .into_iter()
            .flat_map(|prefix| {
                (0..size).map(move |v| {
                    let mut next = prefix.clone();
                    next.push(format!("d{d}v{v}"));
                    next
                })
            })
            .collect();
    }

    for coordinate in coordinates {
        let label = coordinate.join("/");
        let endpoints = (0..per_sector).map(|i| format!("{label}#{i}"));
        lattice
            .add_endpoints_for_sector(coordinate.as_slice(), endpoints)
            .unwrap();
    }
    lattice
}

/// Build a single-dimension lattice with the given sector sizes.
fn cells(sizes: &[usize]) -> Lattice<String> {
    let mut lattice = Lattice::new(["cell"]);
    for (c, &size) in sizes.iter().enumerate() {
        let endpoints = (0..size).map(|i| format!("c{c}#{i}"));
        lattice
            .add_endpoints_for_sector(&[format!("c{c}")], endpoints)
            .unwrap();
    }
    lattice
}

proptest! {
    /// Same seed, identifier and lattice always give the same shard.
    #[test]
    fn shuffle_is_deterministic(
        sizes in cardinalities(),
        per_sector in 1usize..5,
        per_cell in 1usize..4,
        id in identifier(),
    ) {
        let lattice = grid(&sizes, per_sector);
        let shuffler = Shuffler::new("prop-seed");

        let first = shuffler.shuffle_shard(&lattice, &id, per_cell).unwrap();
        let second = shuffler.shuffle_shard(&lattice, &id, per_cell).unwrap();

        let first_sectors: Vec<_> = first.sectors().map(|(c, e)| (c.clone(), e.to_vec())).collect();
        let second_sectors: Vec<_> = second.sectors().map(|(c, e)| (c.clone(), e.to_vec())).collect();
        prop_assert_eq!(first_sectors, second_sectors);
    }

    /// A one-dimensional shard keeps the same endpoint order across calls.
    #[test]
    fn one_dimension_is_deterministic(
        sizes in prop::collection::vec(0usize..8, 1..8),
        id in identifier(),
    ) {
        let lattice = cells(&sizes);

        let first = Shuffler::new("prop-seed").shuffle_shard(&lattice, &id, 1).unwrap();
        let second = Shuffler::new("prop-seed").shuffle_shard(&lattice, &id, 1).unwrap();
        prop_assert_eq!(first.all_endpoints(), second.all_endpoints());
    }

    /// Any coordinate of the wrong length is rejected and changes nothing.
    #[test]
    fn wrong_arity_rejected(
        sizes in cardinalities(),
        arity in 0usize..6,
    ) {
        prop_assume!(arity != sizes.len());
        let mut lattice = grid(&sizes, 1);
        let before = lattice.clone();
        let coordinate: Vec<String> = (0..arity).map(|i| format!("x{i}")).collect();

        let expected = LatticeError::DimensionMismatch {
            expected: sizes.len(),
            actual: arity,
        };
        prop_assert_eq!(
            lattice.add_endpoints_for_sector(coordinate.as_slice(), ["new".to_string()]),
            Err(expected.clone())
        );
        prop_assert_eq!(lattice.endpoints_for_sector(coordinate.as_slice()), Err(expected));
        prop_assert_eq!(lattice, before);
    }

    /// A one-dimensional shard visits every sector and keeps every endpoint.
    #[test]
    fn one_dimension_conserves_endpoints(
        sizes in prop::collection::vec(0usize..6, 1..8),
        per_cell in 1usize..4,
        id in identifier(),
    ) {
        let lattice = cells(&sizes);
        let shard = Shuffler::new("prop-seed").shuffle_shard(&lattice, &id, per_cell).unwrap();

        prop_assert_eq!(shard.sector_count(), sizes.len());
        let original: BTreeSet<String> = lattice.all_endpoints().into_iter().collect();
        let shuffled: BTreeSet<String> = shard.all_endpoints().into_iter().collect();
        prop_assert_eq!(shuffled, original);
        prop_assert_eq!(shard.endpoint_count(), lattice.endpoint_count());
    }

    /// A multi-dimensional shard visits min(cardinalities) sectors of exactly
    /// `per_cell` endpoints, with no dimension value repeated.
    #[test]
    fn multi_dimension_cap(
        sizes in cardinalities(),
        extra in 0usize..3,
        per_cell in 1usize..4,
        id in identifier(),
    ) {
        let lattice = grid(&sizes, per_cell + extra);
        let shard = Shuffler::new("prop-seed").shuffle_shard(&lattice, &id, per_cell).unwrap();

        let expected_sectors = *sizes.iter().min().unwrap();
        prop_assert_eq!(shard.sector_count(), expected_sectors);
        for (coordinate, endpoints) in shard.sectors() {
            prop_assert_eq!(endpoints.len(), per_cell);
            let source = lattice.sector(coordinate).unwrap();
            for endpoint in endpoints {
                prop_assert!(source.contains(endpoint));
            }
        }

        for d in 0..sizes.len() {
            let values: BTreeSet<&str> = shard
                .sectors()
                .map(|(coordinate, _)| coordinate.get(d).unwrap())
                .collect();
            prop_assert_eq!(values.len(), expected_sectors);
        }
    }

    /// A failure view holds exactly the endpoints of sectors not carrying
    /// the failed value.
    #[test]
    fn failure_view_partitions_endpoints(
        sizes in cardinalities(),
        per_sector in 0usize..4,
        dimension in 0usize..4,
        value in 0usize..5,
    ) {
        prop_assume!(dimension < sizes.len());
        let lattice = grid(&sizes, per_sector);
        let name = format!("d{dimension}");
        let failed = format!("d{dimension}v{value}");

        let view = lattice.derive_failure_view(&name, &failed).unwrap();

        let expected: Vec<String> = lattice
            .sectors()
            .filter(|(coordinate, _)| coordinate.get(dimension) != Some(failed.as_str()))
            .flat_map(|(_, endpoints)| endpoints.iter().cloned())
            .collect();
        prop_assert_eq!(view.all_endpoints(), expected);
        prop_assert!(!view.dimension_values(&name).contains(&failed.as_str()));
    }
}
