//! Recency-Ordered Cache Set.
//!
//! A set keeps its lines in most-recently-used-first order. That order is the
//! whole of the replacement state: there are no timestamps or age counters.
//!
//! # Performance
//!
//! - **Lookup:** O(E) linear scan of the occupied prefix.
//! - **Promotion / insertion:** O(E) rotation of a contiguous slice.
//! - **Space:** E lines, reserved once at construction and never resized.

use std::collections::TryReserveError;

use super::line::CacheLine;

/// Fixed-capacity, MRU-first collection of lines for one set index.
///
/// Invariants:
/// - `occupied <= capacity`;
/// - positions `0..occupied` hold valid lines with distinct tags;
/// - position 0 is the MRU line, position `occupied - 1` the LRU line.
#[derive(Clone, Debug)]
pub struct CacheSet {
    lines: Vec<CacheLine>,
    occupied: usize,
}

impl CacheSet {
    /// Allocates a set of `ways` invalid lines.
    ///
    /// # Errors
    ///
    /// Propagates the allocator's refusal instead of aborting.
    pub(crate) fn with_ways(ways: usize) -> Result<Self, TryReserveError> {
        let mut lines = Vec::new();
        lines.try_reserve_exact(ways)?;
        lines.resize(ways, CacheLine::default());
        Ok(Self { lines, occupied: 0 })
    }

    /// Associativity of the set.
    #[inline(always)]
    pub const fn capacity(&self) -> usize {
        self.lines.len()
    }

    /// Number of valid lines.
    #[inline(always)]
    pub const fn occupied(&self) -> usize {
        self.occupied
    }

    /// Whether every way holds a valid line.
    #[inline(always)]
    pub const fn is_full(&self) -> bool {
        self.occupied == self.lines.len()
    }

    /// Valid lines in recency order, MRU first.
    pub fn lines(&self) -> &[CacheLine] {
        &self.lines[..self.occupied]
    }

    /// Most-recently-used line, if any.
    pub fn mru(&self) -> Option<&CacheLine> {
        self.lines().first()
    }

    /// Least-recently-used line, if any.
    pub fn lru(&self) -> Option<&CacheLine> {
        self.lines().last()
    }

    /// Recency position of the line holding `tag`.
    pub fn position(&self, tag: u64) -> Option<usize> {
        self.lines().iter().position(|line| line.matches(tag))
    }

    /// Moves the line at `pos` to the MRU position and returns it.
    ///
    /// Lines ahead of it shift one step toward LRU; their relative order is kept.
    pub(crate) fn promote(&mut self, pos: usize) -> &mut CacheLine {
        self.lines[..=pos].rotate_right(1);
        &mut self.lines[0]
    }

    /// Installs `line` at the MRU position.
    ///
    /// Returns the LRU victim when the set was already full.
    pub(crate) fn insert(&mut self, line: CacheLine) -> Option<CacheLine> {
        let victim = if self.is_full() {
            self.lines.last().copied()
        } else {
            self.occupied += 1;
            None
        };
        self.lines[..self.occupied].rotate_right(1);
        self.lines[0] = line;
        victim
    }
}
