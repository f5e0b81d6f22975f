//! shuffleshard - Shuffle sharding over multi-dimensional resource lattices
//!
//! Endpoints are placed in a lattice whose axes are fault-isolation
//! dimensions (availability zone, software version, ...). Each identifier is
//! mapped deterministically to a small shard of that lattice, so a failure
//! reached through one identifier touches only the few sectors its shard
//! visits.
//!
//! # Architecture
//!
//! - [`core`] - Lattice, failure views, shuffler, routing and configuration
//! - [`cli`] - The `shard` command-line interface
//! - [`ui`] - Output and report rendering
//!
//! # Example
//!
//! ```
//! use shuffleshard::core::lattice::Lattice;
//! use shuffleshard::core::shuffler::Shuffler;
//!
//! let mut lattice = Lattice::new(["AZ", "Version"]);
//! for az in ["a", "b", "c"] {
//!     for version in ["1", "2", "3"] {
//!         let endpoints = (0..4).map(|i| format!("{az}-{version}-{i}"));
//!         lattice.add_endpoints_for_sector(&[az, version], endpoints).unwrap();
//!     }
//! }
//!
//! let shard = Shuffler::new("seed")
//!     .shuffle_shard(&lattice, b"customer-42", 2)
//!     .unwrap();
//! assert_eq!(shard.sector_count(), 3);
//! assert_eq!(shard.endpoint_count(), 6);
//! ```

pub mod cli;
pub mod core;
pub mod ui;
