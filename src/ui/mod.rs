//! ui
//!
//! User-facing output.
//!
//! # Modules
//!
//! - [`output`] - Verbosity-aware message printing
//! - [`report`] - Text and JSON reports of lattices, shards and routes
//!
//! # Design
//!
//! All output goes through this module so that quiet, debug and JSON modes
//! are handled in one place. The core library never prints.

pub mod output;
pub mod report;
