//! Cache line metadata.

/// Cache line entry containing tag, validity, and dirty bits.
///
/// Lines carry no data and no behavior of their own; only the engine mutates
/// them. An invalid line never matches a lookup, whatever its tag says.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CacheLine {
    pub(crate) tag: u64,
    pub(crate) valid: bool,
    pub(crate) dirty: bool,
}

impl CacheLine {
    /// Builds the line installed on a miss.
    #[inline(always)]
    pub(crate) const fn filled(tag: u64, dirty: bool) -> Self {
        Self {
            tag,
            valid: true,
            dirty,
        }
    }

    /// Tag of the block held by this line.
    #[inline(always)]
    pub const fn tag(&self) -> u64 {
        self.tag
    }

    /// Whether the line holds a block.
    #[inline(always)]
    pub const fn is_valid(&self) -> bool {
        self.valid
    }

    /// Whether the block was written since it was loaded.
    #[inline(always)]
    pub const fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Whether this line currently holds the block identified by `tag`.
    #[inline(always)]
    pub const fn matches(&self, tag: u64) -> bool {
        self.valid && self.tag == tag
    }
}
