//! Memory Access Types.
//!
//! This module defines the classification of data accesses presented to the
//! cache engine. The access kind decides two things:
//! 1. **Dirty Tracking:** Stores mark the touched line dirty; loads never do.
//! 2. **Allocation:** Both kinds allocate on miss (write-allocate).

use std::fmt;

/// Type of a single data access issued to the cache.
///
/// A modify reference in a trace is not a kind of its own: the replay layer
/// issues a `Load` followed by a `Store` to the same address.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AccessKind {
    /// Data read access.
    Load,

    /// Data write access.
    ///
    /// Leaves the target line dirty, whether it hit or was just allocated.
    Store,
}

impl AccessKind {
    /// Returns `true` for [`AccessKind::Store`].
    #[inline(always)]
    pub const fn is_store(self) -> bool {
        matches!(self, Self::Store)
    }
}

impl fmt::Display for AccessKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Load => write!(f, "load"),
            Self::Store => write!(f, "store"),
        }
    }
}
