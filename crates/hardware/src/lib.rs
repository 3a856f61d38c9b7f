//! Trace-driven set-associative cache simulator library.
//!
//! This crate models a write-allocate, write-back cache with strict LRU
//! replacement and replays memory traces against it:
//! 1. **Cache:** Geometry and address decomposition, recency-ordered sets, and the access engine.
//! 2. **Simulation:** Trace record parsing and the replay driver.
//! 3. **Configuration:** Serde-deserializable geometry settings with defaults.
//! 4. **Statistics:** Hit, miss, eviction, dirty-byte, and repeat-access counters and reports.
//!
//! ```
//! use csim_core::{AccessKind, CacheEngine, Geometry};
//!
//! let geometry = Geometry::new(0, 1, 0)?;
//! let mut cache = CacheEngine::new(geometry)?;
//! assert!(!cache.access_addr(0, AccessKind::Load).hit);
//! assert!(cache.access_addr(0, AccessKind::Store).hit);
//! assert_eq!(cache.stats().dirty_bytes_resident, 1);
//! # Ok::<(), csim_core::SimError>(())
//! ```

/// Cache state machine (geometry, lines, sets, engine).
pub mod cache;
/// Common types (access kinds, errors).
pub mod common;
/// Simulator configuration (defaults and JSON loading).
pub mod config;
/// Trace parsing and replay.
pub mod sim;
/// Counter collection and reporting.
pub mod stats;

/// Main engine type; owns all sets and counters.
pub use crate::cache::{CacheEngine, Geometry, Outcome};
/// Access kind and error types.
pub use crate::common::{AccessKind, Result, SimError, TraceError};
/// Root configuration type; use `Config::default()` or deserialize from JSON.
pub use crate::config::Config;
/// Trace driver.
pub use crate::sim::Replayer;
/// Counter snapshot.
pub use crate::stats::CacheStats;
