//! Cache statistics collection and reporting.
//!
//! This module tracks the counters produced by a replay. It provides:
//! 1. **Counters:** Hits, misses, evictions, dirty bytes evicted and resident, repeat accesses.
//! 2. **Derived metrics:** Access totals and hit/miss rates.
//! 3. **Reporting:** The one-line summary, a sectioned report, and JSON via serde.

use std::io::{self, Write};

use serde::Serialize;

/// Aggregate counters maintained by [`crate::CacheEngine`].
///
/// All counters except `dirty_bytes_resident` only ever grow.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Accesses that found their block resident.
    pub hits: u64,
    /// Accesses that had to install their block.
    pub misses: u64,
    /// Valid lines displaced from full sets.
    pub evictions: u64,
    /// Bytes written back because a dirty line was evicted.
    pub dirty_bytes_evicted: u64,
    /// Bytes currently dirty across all valid lines.
    pub dirty_bytes_resident: u64,
    /// Hits on the line already in its set's MRU position.
    pub repeat_accesses: u64,
}

/// Section names for selective report output.
///
/// Pass an empty slice to `print_sections` to print all sections.
pub const STATS_SECTIONS: &[&str] = &["summary", "dirty", "locality"];

const RULE: &str = "==========================================================";
const THIN_RULE: &str = "----------------------------------------------------------";

impl CacheStats {
    /// Total accesses (`hits + misses`).
    pub const fn accesses(&self) -> u64 {
        self.hits + self.misses
    }

    /// Fraction of accesses that hit, or 0.0 before any access.
    pub fn hit_rate(&self) -> f64 {
        match self.accesses() {
            0 => 0.0,
            total => self.hits as f64 / total as f64,
        }
    }

    /// Fraction of accesses that missed, or 0.0 before any access.
    pub fn miss_rate(&self) -> f64 {
        match self.accesses() {
            0 => 0.0,
            total => self.misses as f64 / total as f64,
        }
    }

    /// One-line summary in the classic cache-lab format.
    pub fn summary_line(&self) -> String {
        format!(
            "hits:{} misses:{} evictions:{} dirty_bytes_evicted:{} dirty_bytes_in_cache:{} double_refs:{}",
            self.hits,
            self.misses,
            self.evictions,
            self.dirty_bytes_evicted,
            self.dirty_bytes_resident,
            self.repeat_accesses
        )
    }

    /// Writes the requested report sections to `out`.
    ///
    /// Each element of `sections` should be one of [`STATS_SECTIONS`]; unknown
    /// names are ignored. An empty slice selects every section.
    ///
    /// # Errors
    ///
    /// Propagates write failures from `out`.
    pub fn write_sections<W: Write>(&self, out: &mut W, sections: &[String]) -> io::Result<()> {
        let want = |s: &str| sections.is_empty() || sections.iter().any(|x| x == s);

        writeln!(out, "{RULE}")?;
        writeln!(out, "CACHE SIMULATION STATISTICS")?;
        writeln!(out, "{RULE}")?;
        if want("summary") {
            writeln!(out, "accesses                 {}", self.accesses())?;
            writeln!(out, "hits                     {}", self.hits)?;
            writeln!(out, "misses                   {}", self.misses)?;
            writeln!(out, "evictions                {}", self.evictions)?;
            writeln!(out, "hit_rate                 {:.2}%", self.hit_rate() * 100.0)?;
            writeln!(out, "miss_rate                {:.2}%", self.miss_rate() * 100.0)?;
            writeln!(out, "{THIN_RULE}")?;
        }
        if want("dirty") {
            writeln!(out, "DIRTY TRAFFIC")?;
            writeln!(out, "  bytes.evicted          {}", self.dirty_bytes_evicted)?;
            writeln!(out, "  bytes.resident         {}", self.dirty_bytes_resident)?;
            writeln!(out, "{THIN_RULE}")?;
        }
        if want("locality") {
            let share = match self.hits {
                0 => 0.0,
                hits => self.repeat_accesses as f64 / hits as f64 * 100.0,
            };
            writeln!(out, "LOCALITY")?;
            writeln!(
                out,
                "  repeat_accesses        {} ({:.2}% of hits)",
                self.repeat_accesses, share
            )?;
        }
        writeln!(out, "{RULE}")
    }

    /// Prints only the requested report sections to stdout.
    ///
    /// # Errors
    ///
    /// Returns any error from writing to stdout, such as a closed pipe.
    pub fn print_sections(&self, sections: &[String]) -> io::Result<()> {
        let stdout = io::stdout();
        self.write_sections(&mut stdout.lock(), sections)
    }

    /// Prints all report sections to stdout.
    ///
    /// # Errors
    ///
    /// See [`CacheStats::print_sections`].
    pub fn print(&self) -> io::Result<()> {
        self.print_sections(&[])
    }
}
