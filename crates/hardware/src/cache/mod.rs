//! Set-Associative LRU Cache Engine.
//!
//! This module implements the cache state machine replayed by the simulator.
//! It models a write-allocate, write-back cache with strict LRU replacement
//! and keeps exact counts of:
//! 1. **Traffic:** Hits, misses, and evictions.
//! 2. **Dirty Bytes:** Bytes written back on eviction and bytes still dirty in the cache.
//! 3. **Locality:** Back-to-back hits on a set's most-recently-used line.

/// Geometry validation and address decomposition.
pub mod geometry;

/// Cache line metadata.
pub mod line;

/// Recency-ordered set storage.
pub mod set;

use tracing::{debug, info, trace};

pub use self::geometry::{AddressParts, Geometry};
pub use self::line::CacheLine;
pub use self::set::CacheSet;
use crate::common::{AccessKind, Result, SimError};
use crate::stats::CacheStats;

/// Result of a single [`CacheEngine::access`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Outcome {
    /// The block was already resident.
    pub hit: bool,
    /// A valid line was displaced to make room for the block.
    pub evicted: bool,
}

/// Cache simulator owning every set and the aggregate counters.
///
/// Accesses are synchronous and applied strictly in call order; recency
/// state depends on that order.
#[derive(Clone, Debug)]
pub struct CacheEngine {
    geometry: Geometry,
    sets: Vec<CacheSet>,
    stats: CacheStats,
}

impl CacheEngine {
    /// Allocates `2^s` sets of `E` invalid lines.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Allocation`] if the line storage cannot be reserved,
    /// or [`SimError::InvalidGeometry`] if the total capacity in bytes does not
    /// fit the 64-bit byte counters.
    pub fn new(geometry: Geometry) -> Result<Self> {
        let num_sets = geometry.num_sets();
        let ways = geometry.ways();
        let alloc_failed = || SimError::Allocation {
            sets: num_sets,
            ways,
        };

        if geometry.total_lines().is_none() {
            return Err(alloc_failed());
        }
        // Bounds dirty_bytes_resident, which never exceeds the capacity.
        if geometry.capacity_bytes().is_none() {
            return Err(SimError::InvalidGeometry {
                s: geometry.set_bits(),
                e: ways,
                b: geometry.block_bits(),
                reason: "cache capacity exceeds 2^64 bytes",
            });
        }

        let mut sets = Vec::new();
        sets.try_reserve_exact(num_sets)
            .map_err(|_| alloc_failed())?;
        for _ in 0..num_sets {
            sets.push(CacheSet::with_ways(ways).map_err(|_| alloc_failed())?);
        }

        info!(
            sets = num_sets,
            ways,
            block_size = geometry.block_size(),
            "cache engine ready"
        );

        Ok(Self {
            geometry,
            sets,
            stats: CacheStats::default(),
        })
    }

    /// Geometry the engine was built with.
    pub const fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    /// Snapshot of the six counters.
    pub const fn stats(&self) -> &CacheStats {
        &self.stats
    }

    /// Set at `index`, or `None` if out of range.
    pub fn set(&self, index: usize) -> Option<&CacheSet> {
        self.sets.get(index)
    }

    /// All sets in index order.
    pub fn sets(&self) -> &[CacheSet] {
        &self.sets
    }

    /// Checks whether the block containing `addr` is resident.
    ///
    /// Does not touch recency state or counters.
    pub fn contains(&self, addr: u64) -> bool {
        let parts = self.geometry.decompose(addr);
        self.sets[parts.set_index].position(parts.tag).is_some()
    }

    /// Counts valid dirty lines across all sets.
    pub fn resident_dirty_lines(&self) -> usize {
        self.sets
            .iter()
            .flat_map(CacheSet::lines)
            .filter(|line| line.is_dirty())
            .count()
    }

    /// Decomposes `addr` and performs one access.
    pub fn access_addr(&mut self, addr: u64, kind: AccessKind) -> Outcome {
        let parts = self.geometry.decompose(addr);
        self.access(parts.set_index, parts.tag, kind)
    }

    /// Performs one load or store against the set at `set_index`.
    ///
    /// On a hit the line moves to the MRU position; a hit on the line that was
    /// already MRU counts as a repeat access. A store to a clean line dirties
    /// it. On a miss the block is installed at the MRU position (write-allocate),
    /// evicting the LRU line if the set is full.
    ///
    /// # Arguments
    ///
    /// * `set_index` - Set selected by the address, `< num_sets`.
    /// * `tag` - Tag of the referenced block.
    /// * `kind` - Load or store.
    ///
    /// # Panics
    ///
    /// Panics if `set_index` is out of range. Indices produced by
    /// [`Geometry::set_index`] never are.
    pub fn access(&mut self, set_index: usize, tag: u64, kind: AccessKind) -> Outcome {
        let block_size = self.geometry.block_size();
        let set = &mut self.sets[set_index];
        let stats = &mut self.stats;

        if let Some(pos) = set.position(tag) {
            stats.hits += 1;
            if pos == 0 {
                stats.repeat_accesses += 1;
            }
            let line = set.promote(pos);
            if kind.is_store() && !line.dirty {
                line.dirty = true;
                stats.dirty_bytes_resident += block_size;
            }
            trace!(set_index, tag, %kind, pos, "hit");
            return Outcome {
                hit: true,
                evicted: false,
            };
        }

        stats.misses += 1;
        let victim = set.insert(CacheLine::filled(tag, kind.is_store()));
        if let Some(victim) = victim {
            stats.evictions += 1;
            if victim.dirty {
                stats.dirty_bytes_resident -= block_size;
                stats.dirty_bytes_evicted = stats.dirty_bytes_evicted.saturating_add(block_size);
            }
            debug!(
                set_index,
                victim_tag = victim.tag,
                dirty = victim.dirty,
                "evicted LRU line"
            );
        }
        // Credited after the victim leaves so the counter stays within capacity.
        if kind.is_store() {
            stats.dirty_bytes_resident += block_size;
        }
        trace!(set_index, tag, %kind, "miss");

        Outcome {
            hit: false,
            evicted: victim.is_some(),
        }
    }
}
