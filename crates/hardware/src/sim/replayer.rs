//! Trace Replayer.
//!
//! Drives a [`CacheEngine`] from trace records. It performs:
//! 1. **Decomposition:** Splits each address into tag and set index via the engine's geometry.
//! 2. **Expansion:** Issues one access per load/store and a load + store pair per modify.
//! 3. **Filtering:** Skips instruction fetches, and logs and skips malformed lines.

use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::{info, warn};

use super::trace::{self, Operation, TraceRecord};
use crate::cache::{CacheEngine, Geometry, Outcome};
use crate::common::{AccessKind, Result, SimError};
use crate::stats::CacheStats;

/// Cache outcomes produced by one data record.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RecordOutcome {
    /// The record that was replayed.
    pub record: TraceRecord,
    /// Outcome of the load or store (the load, for a modify).
    pub first: Outcome,
    /// Outcome of the trailing store of a modify.
    pub second: Option<Outcome>,
}

impl RecordOutcome {
    /// Outcomes in issue order.
    pub fn outcomes(&self) -> impl Iterator<Item = Outcome> {
        std::iter::once(self.first).chain(self.second)
    }
}

impl fmt::Display for RecordOutcome {
    /// Formats as `L 10,1 miss eviction`, one word group per access.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.record)?;
        for outcome in self.outcomes() {
            f.write_str(if outcome.hit { " hit" } else { " miss" })?;
            if outcome.evicted {
                f.write_str(" eviction")?;
            }
        }
        Ok(())
    }
}

/// Replays trace records against an owned cache engine.
#[derive(Debug)]
pub struct Replayer {
    engine: CacheEngine,
    records: u64,
    skipped_lines: u64,
}

impl Replayer {
    /// Builds an empty cache of the given geometry.
    ///
    /// # Errors
    ///
    /// Propagates [`SimError::Allocation`] from [`CacheEngine::new`].
    pub fn new(geometry: Geometry) -> Result<Self> {
        Ok(Self::with_engine(CacheEngine::new(geometry)?))
    }

    /// Wraps an existing engine, keeping its state.
    pub const fn with_engine(engine: CacheEngine) -> Self {
        Self {
            engine,
            records: 0,
            skipped_lines: 0,
        }
    }

    /// Engine being driven.
    pub const fn engine(&self) -> &CacheEngine {
        &self.engine
    }

    /// Releases the engine.
    pub fn into_engine(self) -> CacheEngine {
        self.engine
    }

    /// Counters accumulated so far.
    pub const fn stats(&self) -> &CacheStats {
        self.engine.stats()
    }

    /// Data records (loads, stores, modifies) replayed so far.
    pub const fn records(&self) -> u64 {
        self.records
    }

    /// Malformed lines skipped so far.
    pub const fn skipped_lines(&self) -> u64 {
        self.skipped_lines
    }

    /// Replays one record.
    ///
    /// Returns `None` for instruction fetches, which are not cache references.
    pub fn replay_record(&mut self, record: &TraceRecord) -> Option<RecordOutcome> {
        let (first_kind, second_kind) = match record.op {
            Operation::Instruction => return None,
            Operation::Load => (AccessKind::Load, None),
            Operation::Store => (AccessKind::Store, None),
            Operation::Modify => (AccessKind::Load, Some(AccessKind::Store)),
        };

        let parts = self.engine.geometry().decompose(record.addr);
        let first = self.engine.access(parts.set_index, parts.tag, first_kind);
        let second = second_kind.map(|kind| self.engine.access(parts.set_index, parts.tag, kind));
        self.records += 1;

        Some(RecordOutcome {
            record: *record,
            first,
            second,
        })
    }

    /// Parses and replays one trace line.
    ///
    /// `line_no` is only used in the warning emitted for a malformed line.
    pub fn replay_line(&mut self, line_no: usize, line: &str) -> Option<RecordOutcome> {
        match trace::parse_line(line) {
            Ok(Some(record)) => self.replay_record(&record),
            Ok(None) => None,
            Err(err) => {
                self.skipped_lines += 1;
                warn!(line = line_no, text = line.trim(), %err, "skipping malformed trace record");
                None
            }
        }
    }

    /// Replays every line of an in-memory trace.
    pub fn replay_str(&mut self, text: &str) {
        for (idx, line) in text.lines().enumerate() {
            let _ = self.replay_line(idx + 1, line);
        }
    }

    /// Replays a buffered trace source, reporting each data record to `on_record`.
    ///
    /// Lines that are not valid UTF-8 are skipped like any other malformed line.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Read`] if the source itself fails. Records replayed
    /// before the failure remain applied.
    pub fn replay_reader_with<R, F>(&mut self, mut reader: R, mut on_record: F) -> Result<()>
    where
        R: BufRead,
        F: FnMut(&RecordOutcome),
    {
        let mut buf = Vec::new();
        let mut line_no = 0;
        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf)? == 0 {
                break;
            }
            line_no += 1;
            match std::str::from_utf8(&buf) {
                Ok(line) => {
                    if let Some(outcome) = self.replay_line(line_no, line) {
                        on_record(&outcome);
                    }
                }
                Err(err) => {
                    self.skipped_lines += 1;
                    warn!(line = line_no, %err, "skipping trace line that is not valid UTF-8");
                }
            }
        }
        info!(
            records = self.records,
            skipped = self.skipped_lines,
            "trace replay finished"
        );
        Ok(())
    }

    /// Replays a buffered trace source.
    ///
    /// # Errors
    ///
    /// See [`Replayer::replay_reader_with`].
    pub fn replay_reader<R: BufRead>(&mut self, reader: R) -> Result<()> {
        self.replay_reader_with(reader, |_| {})
    }

    /// Opens and replays a trace file, reporting each data record to `on_record`.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Io`] naming `path` if the file cannot be opened or read.
    pub fn replay_file_with<F>(&mut self, path: impl AsRef<Path>, on_record: F) -> Result<()>
    where
        F: FnMut(&RecordOutcome),
    {
        let path = path.as_ref();
        let io_err = |source| SimError::Io {
            path: path.to_path_buf(),
            source,
        };
        let file = File::open(path).map_err(io_err)?;
        self.replay_reader_with(BufReader::new(file), on_record)
            .map_err(|err| match err {
                SimError::Read(source) => io_err(source),
                other => other,
            })
    }

    /// Opens and replays a trace file.
    ///
    /// # Errors
    ///
    /// See [`Replayer::replay_file_with`].
    pub fn replay_file(&mut self, path: impl AsRef<Path>) -> Result<()> {
        self.replay_file_with(path, |_| {})
    }
}
