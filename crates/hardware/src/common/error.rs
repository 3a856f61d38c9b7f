//! Error definitions.
//!
//! This module defines the failure modes of the simulator. It provides:
//! 1. **Construction Errors:** Invalid geometry and storage allocation failure.
//! 2. **Input Errors:** Unreadable trace or configuration sources.
//! 3. **Record Errors:** Why a single trace line was rejected.
//!
//! The cache engine itself cannot fail once built; everything here is raised
//! either before the first access or by the replay layer around it.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, SimError>;

/// Errors produced while configuring, building, or feeding the simulator.
#[derive(Debug, Error)]
pub enum SimError {
    /// The requested cache geometry cannot be modeled.
    ///
    /// Raised before any set storage is allocated.
    #[error("invalid geometry (s={s}, E={e}, b={b}): {reason}")]
    InvalidGeometry {
        /// Set-index bit count.
        s: u32,
        /// Associativity (lines per set).
        e: usize,
        /// Block-offset bit count.
        b: u32,
        /// Which constraint was violated.
        reason: &'static str,
    },

    /// Storage for `sets × ways` lines could not be reserved.
    #[error("cannot allocate {sets} sets of {ways} lines")]
    Allocation {
        /// Number of sets requested.
        sets: usize,
        /// Lines per set requested.
        ways: usize,
    },

    /// A trace or configuration file could not be opened or read.
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        /// Path of the offending file.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },

    /// Reading from an in-memory or piped trace source failed.
    #[error("failed to read trace: {0}")]
    Read(#[from] io::Error),

    /// A configuration file was readable but not valid JSON for [`crate::Config`].
    #[error("invalid configuration in {}: {source}", .path.display())]
    Config {
        /// Path of the configuration file.
        path: PathBuf,
        /// Underlying deserialization failure.
        #[source]
        source: serde_json::Error,
    },
}

/// Reasons a single trace line is rejected.
///
/// The replay layer logs these and moves on to the next line.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum TraceError {
    /// The operation code is not one of `I`, `L`, `S`, `M`.
    #[error("unknown operation '{0}'")]
    UnknownOperation(char),

    /// Nothing follows the operation code.
    #[error("missing address")]
    MissingAddress,

    /// The address field is not a hexadecimal 64-bit value.
    #[error("invalid address '{0}'")]
    InvalidAddress(String),

    /// The `,<size>` suffix is absent.
    #[error("missing access size")]
    MissingSize,

    /// The size field is not a decimal integer.
    #[error("invalid access size '{0}'")]
    InvalidSize(String),
}
