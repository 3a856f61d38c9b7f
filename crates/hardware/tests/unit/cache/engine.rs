//! Cache Engine Unit Tests.
//!
//! Verifies the access algorithm of the set-associative LRU engine: cold
//! misses, hits and MRU promotion, LRU victim selection, write-allocate
//! dirty tracking, dirty write-back accounting, and repeat-access detection.
//!
//! Most tests use `b = 0` and `s = 0` so that an address is its own tag.

use csim_core::cache::{CacheEngine, Geometry, Outcome};
use csim_core::{AccessKind, CacheStats, SimError};
use pretty_assertions::assert_eq;

use crate::common::TestCache;

const MISS: Outcome = Outcome {
    hit: false,
    evicted: false,
};
const MISS_EVICT: Outcome = Outcome {
    hit: false,
    evicted: true,
};
const HIT: Outcome = Outcome {
    hit: true,
    evicted: false,
};

// ══════════════════════════════════════════════════════════
// 1. Construction
// ══════════════════════════════════════════════════════════

#[test]
fn new_engine_is_empty() {
    let cache = TestCache::new(2, 4, 3);
    assert_eq!(cache.engine.sets().len(), 4);
    for set in cache.engine.sets() {
        assert_eq!(set.capacity(), 4);
        assert_eq!(set.occupied(), 0);
    }
    assert_eq!(cache.stats(), CacheStats::default());
    assert!(!cache.engine.contains(0));
}

/// More lines than `usize` can count.
#[test]
fn line_count_overflow_is_allocation_error() {
    let geometry = Geometry::new(62, 8, 0).unwrap();
    let err = CacheEngine::new(geometry).unwrap_err();
    assert!(matches!(err, SimError::Allocation { ways: 8, .. }));
}

/// The set table alone exceeds the maximum allocation size.
#[test]
fn oversized_set_table_is_allocation_error() {
    let geometry = Geometry::new(60, 1, 0).unwrap();
    let err = CacheEngine::new(geometry).unwrap_err();
    assert!(matches!(err, SimError::Allocation { .. }));
    assert!(err.to_string().contains("cannot allocate"));
}

/// Two 2^63-byte lines hold more bytes than a `u64` counter can.
#[test]
fn capacity_beyond_byte_counters_is_rejected() {
    let geometry = Geometry::new(0, 2, 63).unwrap();
    let err = CacheEngine::new(geometry).unwrap_err();
    assert!(matches!(
        err,
        SimError::InvalidGeometry {
            s: 0,
            e: 2,
            b: 63,
            ..
        }
    ));
}

#[test]
fn largest_block_counts_without_overflow() {
    let mut cache = TestCache::new(0, 1, 63);
    let half = 1u64 << 63;
    assert_eq!(cache.store(0), MISS);
    assert_eq!(cache.store(half), MISS_EVICT);
    assert_eq!(cache.stats().dirty_bytes_resident, half);
    assert_eq!(cache.stats().dirty_bytes_evicted, half);

    assert_eq!(cache.store(0), MISS_EVICT);
    assert_eq!(cache.stats().dirty_bytes_resident, half);
    assert_eq!(cache.stats().dirty_bytes_evicted, u64::MAX, "saturates");
    cache.assert_invariants();
}

// ══════════════════════════════════════════════════════════
// 2. Cold Miss / Warm Hit
// ══════════════════════════════════════════════════════════

#[test]
fn cold_miss_installs_line() {
    let mut cache = TestCache::new(0, 1, 0);
    assert_eq!(cache.load(0), MISS);
    assert!(cache.engine.contains(0));
    assert_eq!(cache.stats().misses, 1);
    assert_eq!(cache.stats().hits, 0);
    cache.assert_invariants();
}

#[test]
fn second_access_to_same_block_hits() {
    let mut cache = TestCache::new(0, 1, 4);
    let _ = cache.load(0x40);
    // Different offset inside the same 16-byte block.
    assert_eq!(cache.load(0x4f), HIT);
    assert_eq!(cache.stats().hits, 1);
}

#[test]
fn access_by_set_and_tag() {
    let geometry = Geometry::new(1, 1, 0).unwrap();
    let mut engine = CacheEngine::new(geometry).unwrap();
    assert_eq!(engine.access(1, 7, AccessKind::Load), MISS);
    assert_eq!(engine.access(1, 7, AccessKind::Load), HIT);
    assert_eq!(engine.set(1).unwrap().mru().map(|l| l.tag()), Some(7));
    assert_eq!(engine.set(0).unwrap().occupied(), 0);
    // Block address of set 1 / tag 7 with s = 1, b = 0.
    assert!(engine.contains(0b1111));
}

// ══════════════════════════════════════════════════════════
// 3. LRU Ordering and Eviction
// ══════════════════════════════════════════════════════════

#[test]
fn fill_then_overflow_evicts_least_recent() {
    let mut cache = TestCache::new(0, 4, 0);
    for addr in 0..4 {
        assert_eq!(cache.load(addr), MISS);
    }
    assert_eq!(cache.tags(0), vec![3, 2, 1, 0]);

    assert_eq!(cache.load(4), MISS_EVICT);
    assert_eq!(cache.tags(0), vec![4, 3, 2, 1]);
    assert!(!cache.engine.contains(0));
    assert_eq!(cache.stats().evictions, 1);
}

#[test]
fn hit_refreshes_recency() {
    let mut cache = TestCache::new(0, 4, 0);
    for addr in 0..4 {
        let _ = cache.load(addr);
    }
    assert_eq!(cache.load(0), HIT);
    assert_eq!(cache.tags(0), vec![0, 3, 2, 1]);

    let _ = cache.load(4);
    assert!(cache.engine.contains(0), "refreshed line must survive");
    assert!(!cache.engine.contains(1), "tag 1 is now LRU");
    assert_eq!(cache.tags(0), vec![4, 0, 3, 2]);
}

#[test]
fn promotion_preserves_order_of_others() {
    let mut cache = TestCache::new(0, 4, 0);
    for addr in [10, 11, 12, 13] {
        let _ = cache.load(addr);
    }
    // [13, 12, 11, 10] -> hit 11
    let _ = cache.load(11);
    assert_eq!(cache.tags(0), vec![11, 13, 12, 10]);
}

#[test]
fn sets_are_independent() {
    // s = 1, b = 0: bit 0 selects the set, the rest is the tag.
    let mut cache = TestCache::new(1, 1, 0);
    assert_eq!(cache.load(0), MISS); // set 0, tag 0
    assert_eq!(cache.load(1), MISS); // set 1, tag 0
    assert_eq!(cache.load(2), MISS_EVICT); // set 0, tag 1
    assert_eq!(cache.tags(0), vec![1]);
    assert_eq!(cache.tags(1), vec![0]);
    assert_eq!(cache.load(1), HIT);
}

#[test]
fn direct_mapped_conflicts_thrash() {
    let mut cache = TestCache::new(0, 1, 0);
    for _ in 0..3 {
        let _ = cache.load(0);
        let _ = cache.load(1);
    }
    let stats = cache.stats();
    assert_eq!(stats.misses, 6);
    assert_eq!(stats.hits, 0);
    assert_eq!(stats.evictions, 5);
}

// ══════════════════════════════════════════════════════════
// 4. Dirty Tracking
// ══════════════════════════════════════════════════════════

#[test]
fn store_miss_allocates_dirty_line() {
    let mut cache = TestCache::new(0, 2, 3);
    assert_eq!(cache.store(0), MISS);
    assert_eq!(cache.stats().dirty_bytes_resident, 8);
    assert!(cache.engine.set(0).unwrap().mru().unwrap().is_dirty());
    cache.assert_invariants();
}

#[test]
fn store_hit_dirties_clean_line_once() {
    let mut cache = TestCache::new(0, 1, 4);
    let _ = cache.load(0);
    assert_eq!(cache.stats().dirty_bytes_resident, 0);
    let _ = cache.store(0);
    assert_eq!(cache.stats().dirty_bytes_resident, 16);
    let _ = cache.store(8);
    assert_eq!(
        cache.stats().dirty_bytes_resident,
        16,
        "already-dirty line is counted once"
    );
    cache.assert_invariants();
}

#[test]
fn load_hit_keeps_dirty_flag() {
    let mut cache = TestCache::new(0, 2, 0);
    let _ = cache.store(0);
    let _ = cache.load(1);
    let _ = cache.load(0);
    assert_eq!(cache.stats().dirty_bytes_resident, 1);
    assert!(cache.engine.set(0).unwrap().mru().unwrap().is_dirty());
}

#[test]
fn clean_eviction_writes_nothing_back() {
    let mut cache = TestCache::new(0, 1, 2);
    let _ = cache.load(0);
    let _ = cache.load(4);
    assert_eq!(cache.stats().evictions, 1);
    assert_eq!(cache.stats().dirty_bytes_evicted, 0);
}

#[test]
fn dirty_eviction_moves_bytes_from_resident_to_evicted() {
    let mut cache = TestCache::new(0, 1, 3);
    let _ = cache.store(0);
    assert_eq!(cache.load(8), MISS_EVICT);
    let stats = cache.stats();
    assert_eq!(stats.dirty_bytes_evicted, 8);
    assert_eq!(stats.dirty_bytes_resident, 0);
    cache.assert_invariants();
}

/// The new line's dirty bytes are added independently of the victim's removal.
#[test]
fn store_miss_over_dirty_victim() {
    let mut cache = TestCache::new(0, 1, 0);
    let _ = cache.store(0);
    assert_eq!(cache.store(1), MISS_EVICT);
    let stats = cache.stats();
    assert_eq!(stats.dirty_bytes_resident, 1);
    assert_eq!(stats.dirty_bytes_evicted, 1);
    cache.assert_invariants();
}

#[test]
fn dirty_bytes_evicted_accumulate() {
    let mut cache = TestCache::new(0, 2, 1);
    for addr in (0..20).step_by(2) {
        let _ = cache.store(addr);
    }
    // 10 dirty misses into 2 ways: 8 dirty evictions of 2 bytes each.
    let stats = cache.stats();
    assert_eq!(stats.evictions, 8);
    assert_eq!(stats.dirty_bytes_evicted, 16);
    assert_eq!(stats.dirty_bytes_resident, 4);
}

// ══════════════════════════════════════════════════════════
// 5. Repeat Accesses
// ══════════════════════════════════════════════════════════

#[test]
fn back_to_back_hits_count_as_repeat() {
    let mut cache = TestCache::new(0, 2, 0);
    let _ = cache.load(5);
    assert_eq!(cache.stats().repeat_accesses, 0, "a miss is never a repeat");
    let _ = cache.load(5);
    assert_eq!(cache.stats().repeat_accesses, 1);
    let _ = cache.store(5);
    assert_eq!(cache.stats().repeat_accesses, 2);
}

#[test]
fn hit_below_mru_is_not_repeat() {
    let mut cache = TestCache::new(0, 2, 0);
    let _ = cache.load(1);
    let _ = cache.load(2);
    let _ = cache.load(1);
    assert_eq!(cache.stats().hits, 1);
    assert_eq!(cache.stats().repeat_accesses, 0);
    let _ = cache.load(1);
    assert_eq!(cache.stats().repeat_accesses, 1);
}

#[test]
fn access_to_other_set_does_not_break_repeat() {
    let mut cache = TestCache::new(1, 1, 0);
    let _ = cache.load(0);
    let _ = cache.load(1);
    let _ = cache.load(0);
    assert_eq!(cache.stats().repeat_accesses, 1);
}

#[test]
fn modify_store_half_is_repeat_hit() {
    let mut cache = TestCache::new(2, 2, 2);
    let (load, store) = cache.modify(0x20);
    assert_eq!(load, MISS);
    assert_eq!(store, HIT);
    assert_eq!(
        cache.stats(),
        CacheStats {
            hits: 1,
            misses: 1,
            evictions: 0,
            dirty_bytes_evicted: 0,
            dirty_bytes_resident: 4,
            repeat_accesses: 1,
        }
    );
}
