//! Trace parsing and replay.
//!
//! Turns a textual memory trace into cache accesses and feeds them, in order,
//! to a [`crate::CacheEngine`].

/// Trace line format and record parsing.
pub mod trace;

/// Record-by-record replay driver.
pub mod replayer;

pub use replayer::{RecordOutcome, Replayer};
pub use trace::{Operation, TraceRecord, parse_line};
