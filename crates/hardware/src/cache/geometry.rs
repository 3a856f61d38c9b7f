//! Cache Geometry and Address Decomposition.
//!
//! A geometry is described by three small integers, in the usual notation:
//! - `s`: set-index bits, giving `S = 2^s` sets;
//! - `E`: associativity, the number of lines per set;
//! - `b`: block-offset bits, giving `B = 2^b` bytes per line.
//!
//! Addresses are unsigned 64-bit values broken down as
//!
//! ```text
//!  63                       s+b   s+b-1        b   b-1        0
//! +------------------------------+---------------+-------------+
//! |             tag              |   set index   | block offset|
//! +------------------------------+---------------+-------------+
//! ```

use crate::common::{Result, SimError};

/// Width in bits of the addresses the simulator decomposes.
pub const ADDRESS_BITS: u32 = u64::BITS;

/// Validated cache geometry.
///
/// Constructed only through [`Geometry::new`], so every instance satisfies
/// `E >= 1`, `b < 64`, `s < usize::BITS` and `s + b <= 64`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Geometry {
    set_bits: u32,
    ways: usize,
    block_bits: u32,
}

/// Address split into the fields the engine consumes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AddressParts {
    /// High-order bits identifying the memory block.
    pub tag: u64,
    /// Index of the set the block maps to.
    pub set_index: usize,
    /// Byte offset within the block.
    pub offset: u64,
}

impl Geometry {
    /// Validates `s`, `E`, `b` and builds a geometry.
    ///
    /// # Arguments
    ///
    /// * `set_bits` - `s`, number of set-index bits.
    /// * `ways` - `E`, lines per set.
    /// * `block_bits` - `b`, number of block-offset bits.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidGeometry`] if `E` is zero, if the block or set
    /// count cannot be represented, or if `s + b` exceeds the address width.
    pub fn new(set_bits: u32, ways: usize, block_bits: u32) -> Result<Self> {
        let invalid = |reason| SimError::InvalidGeometry {
            s: set_bits,
            e: ways,
            b: block_bits,
            reason,
        };

        if ways == 0 {
            return Err(invalid("associativity must be at least 1"));
        }
        if block_bits >= ADDRESS_BITS {
            return Err(invalid("block size does not fit in a 64-bit address"));
        }
        if set_bits >= usize::BITS {
            return Err(invalid("set count is not addressable on this host"));
        }
        if set_bits + block_bits > ADDRESS_BITS {
            return Err(invalid("set and block bits exceed the 64-bit address width"));
        }

        Ok(Self {
            set_bits,
            ways,
            block_bits,
        })
    }

    /// Returns `s`.
    #[inline(always)]
    pub const fn set_bits(&self) -> u32 {
        self.set_bits
    }

    /// Returns `E`.
    #[inline(always)]
    pub const fn ways(&self) -> usize {
        self.ways
    }

    /// Returns `b`.
    #[inline(always)]
    pub const fn block_bits(&self) -> u32 {
        self.block_bits
    }

    /// Number of sets, `2^s`.
    #[inline(always)]
    pub const fn num_sets(&self) -> usize {
        1usize << self.set_bits
    }

    /// Bytes per line, `2^b`.
    #[inline(always)]
    pub const fn block_size(&self) -> u64 {
        1u64 << self.block_bits
    }

    /// Total number of lines, `S × E`, or `None` if it overflows `usize`.
    pub const fn total_lines(&self) -> Option<usize> {
        self.num_sets().checked_mul(self.ways)
    }

    /// Total data capacity in bytes, `S × E × B`, or `None` on overflow.
    pub fn capacity_bytes(&self) -> Option<u64> {
        u64::try_from(self.total_lines()?)
            .ok()?
            .checked_mul(self.block_size())
    }

    /// Extracts the tag of `addr`.
    ///
    /// When `s + b == 64` every address shares tag 0.
    #[inline(always)]
    pub const fn tag(&self, addr: u64) -> u64 {
        match addr.checked_shr(self.set_bits + self.block_bits) {
            Some(tag) => tag,
            None => 0,
        }
    }

    /// Extracts the set index of `addr`, always `< num_sets()`.
    #[inline(always)]
    pub const fn set_index(&self, addr: u64) -> usize {
        let mask = (self.num_sets() - 1) as u64;
        ((addr >> self.block_bits) & mask) as usize
    }

    /// Extracts the byte offset of `addr` within its block.
    #[inline(always)]
    pub const fn offset(&self, addr: u64) -> u64 {
        addr & (self.block_size() - 1)
    }

    /// Splits `addr` into tag, set index, and block offset.
    pub const fn decompose(&self, addr: u64) -> AddressParts {
        AddressParts {
            tag: self.tag(addr),
            set_index: self.set_index(addr),
            offset: self.offset(addr),
        }
    }

    /// Rebuilds the base address of the block identified by `tag` in `set_index`.
    ///
    /// Inverse of [`Geometry::decompose`] with the offset cleared.
    pub const fn block_address(&self, tag: u64, set_index: usize) -> u64 {
        let high = match tag.checked_shl(self.set_bits + self.block_bits) {
            Some(high) => high,
            None => 0,
        };
        high | ((set_index as u64) << self.block_bits)
    }
}
