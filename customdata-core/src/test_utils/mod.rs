//! Test utilities for customdata
//!
//! Event capture, fixtures and invariant assertions shared by the in-crate
//! suites and, through the `test-utils` feature, by downstream tests.

pub mod assertions;
pub mod fixtures;

pub use assertions::*;
pub use fixtures::*;
