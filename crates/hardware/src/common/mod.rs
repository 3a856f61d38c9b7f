//! Common utilities and types shared by every part of the cache simulator.
//!
//! This module provides the small vocabulary the engine, the replay layer and
//! the CLI agree on. It includes:
//! 1. **Access Kinds:** Distinguishing data loads from data stores.
//! 2. **Error Handling:** The crate-wide error enum and trace-line rejection reasons.

/// Memory access type definitions.
pub mod data;

/// Error types for configuration, allocation, and trace I/O.
pub mod error;

pub use data::AccessKind;
pub use error::{Result, SimError, TraceError};
