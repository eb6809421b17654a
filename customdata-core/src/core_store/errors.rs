/*
    errors.rs - Error types for the custom data store

    The store itself never returns errors for normal usage. These types
    describe the two failure shapes that exist internally:
    - timestamp parsing (surfaced as None by the store)
    - rename contract violations (panic in debug, logged no-op in release)
*/

use thiserror::Error;

/// Failure to interpret a stored timestamp string
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimestampError {
    /// Nothing to parse
    #[error("timestamp is empty")]
    Empty,

    /// Neither RFC 3339 nor the legacy text date layout
    #[error("unrecognised timestamp: {0}")]
    Unrecognised(String),
}

/// Broken precondition of `CustomData::rename`
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenameError {
    #[error("source key {0:?} is not present")]
    SourceMissing(String),

    #[error("destination key {0:?} already exists")]
    DestinationExists(String),
}
