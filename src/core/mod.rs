//! core
//!
//! Core domain types and operations for shuffleshard.
//!
//! # Modules
//!
//! - [`types`] - Strong types: Coordinate, ShardDigest, FaultDomain
//! - [`lattice`] - The multi-dimensional endpoint container
//! - [`failure`] - Failure views over a lattice
//! - [`shuffler`] - Deterministic shuffle shard derivation
//! - [`routing`] - Client identifiers, endpoint picking and shard overlap
//! - [`config`] - Topology schema and loading
//!
//! # Design Principles
//!
//! - Operations return new lattices and never mutate their inputs
//! - Iteration order is fixed by coordinate order, never by hash state
//! - Nothing here logs or prints; errors are returned as values

pub mod config;
pub mod failure;
pub mod lattice;
pub mod routing;
pub mod shuffler;
pub mod types;
