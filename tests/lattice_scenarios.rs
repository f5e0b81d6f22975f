//! End-to-end scenarios over the public lattice API.

use std::collections::BTreeSet;

use shuffleshard::core::lattice::{Lattice, LatticeError};
use shuffleshard::core::shuffler::{ShuffleError, Shuffler};
use shuffleshard::core::types::{Coordinate, FaultDomain};

fn endpoints(prefix: &str, count: usize) -> Vec<String> {
    (0..count).map(|i| format!("{prefix}-{i}")).collect()
}

#[test]
fn repeated_sector_adds_append() {
    let mut lattice = Lattice::new(["cell"]);
    lattice.add_endpoints_for_sector(&["cell"], ["A"]).unwrap();
    lattice
        .add_endpoints_for_sector(&["cell"], ["B", "C", "D"])
        .unwrap();

    assert_eq!(lattice.all_endpoints(), vec!["A", "B", "C", "D"]);
    assert_eq!(lattice.endpoint_count(), 4);
    assert_eq!(lattice.sector_count(), 1);
}

#[test]
fn losing_a_zone_keeps_the_other_zone() {
    let mut lattice = Lattice::new(["AZ"]);
    lattice
        .add_endpoints_for_sector(&["us-east-1a"], endpoints("1a", 10))
        .unwrap();
    lattice
        .add_endpoints_for_sector(&["us-east-1b"], endpoints("1b", 10))
        .unwrap();

    let view = lattice.derive_failure_view("AZ", "us-east-1a").unwrap();

    assert_eq!(view.endpoint_count(), 10);
    assert_eq!(view.all_endpoints(), endpoints("1b", 10));
    assert_eq!(lattice.endpoint_count(), 20);
}

#[test]
fn chained_failures_leave_one_sector() {
    let mut lattice = Lattice::new(["AZ", "Version"]);
    for az in ["a", "b"] {
        for version in ["1", "2"] {
            lattice
                .add_endpoints_for_sector(&[az, version], endpoints(&format!("{az}{version}"), 5))
                .unwrap();
        }
    }

    let view = lattice
        .derive_failure_view("AZ", "a")
        .unwrap()
        .derive_failure_view("Version", "1")
        .unwrap();

    assert_eq!(view.endpoint_count(), 5);
    assert_eq!(view.endpoints_for_sector(&["b", "2"]).unwrap(), endpoints("b2", 5));

    let failures = [FaultDomain::new("AZ", "a"), FaultDomain::new("Version", "1")];
    assert_eq!(lattice.derive_failure_view_all(&failures).unwrap(), view);
}

#[test]
fn zero_dimension_lattice_cannot_be_shuffled() {
    let lattice: Lattice<String> = Lattice::new(Vec::<String>::new());
    let result = Shuffler::new("seed").shuffle_shard(&lattice, b"anyone", 2);
    assert_eq!(result.unwrap_err(), ShuffleError::InvalidDimension);
}

#[test]
fn sparse_diagonal_aborts_without_partial_shard() {
    // (b, 2) is never registered, so some identifier's diagonal hits it.
    let mut lattice = Lattice::new(["AZ", "Version"]);
    for (az, version) in [("a", "1"), ("a", "2"), ("b", "1")] {
        lattice
            .add_endpoints_for_sector(&[az, version], endpoints(&format!("{az}{version}"), 3))
            .unwrap();
    }

    let shuffler = Shuffler::new("seed");
    let failure = (0..64u32)
        .map(|i| shuffler.shuffle_shard(&lattice, &i.to_le_bytes(), 2))
        .find_map(Result::err)
        .expect("some diagonal visits the missing sector");

    match failure {
        ShuffleError::SectorLookupFailed(LatticeError::SectorNotFound(coordinate)) => {
            assert_eq!(coordinate, Coordinate::new(["b", "2"]));
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[test]
fn shards_after_failure_avoid_failed_value() {
    let mut lattice = Lattice::new(["AZ", "Version"]);
    for az in ["a", "b", "c"] {
        for version in ["1", "2", "3"] {
            lattice
                .add_endpoints_for_sector(&[az, version], endpoints(&format!("{az}{version}"), 4))
                .unwrap();
        }
    }

    let surviving = lattice.derive_failure_view("AZ", "b").unwrap();
    let shuffler = Shuffler::new("seed");

    for id in ["alpha", "beta", "gamma", "delta"] {
        let shard = shuffler.shuffle_shard(&surviving, id.as_bytes(), 2).unwrap();
        assert_eq!(shard.sector_count(), 2);
        let zones: BTreeSet<&str> = shard.sectors().map(|(c, _)| c.get(0).unwrap()).collect();
        assert!(!zones.contains("b"));
        assert_eq!(shard.endpoint_count(), 4);
    }
}

#[test]
fn different_seeds_reshuffle() {
    let mut lattice = Lattice::new(["cell"]);
    for c in 0..8 {
        lattice
            .add_endpoints_for_sector(&[format!("c{c}")], endpoints(&format!("c{c}"), 4))
            .unwrap();
    }

    let orders: BTreeSet<Vec<String>> = (0..8)
        .map(|s| {
            Shuffler::new(format!("seed-{s}"))
                .shuffle_shard(&lattice, b"client", 1)
                .unwrap()
                .all_endpoints()
        })
        .collect();
    assert!(orders.len() > 1);
}
