//! Request address decomposition.
//!
//! An address is split, from low to high bits, into:
//! 1. **Offset:** ignored bits selecting a position inside one line.
//! 2. **Set index:** selects exactly one set of the cache array.
//! 3. **Tag:** identifies which region currently occupies a way of that set.
//!
//! The tag together with the set index uniquely identifies one line-sized
//! region of the backing store.

/// Fields extracted from a request address.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DecodedAddress {
    /// High-order tag bits.
    pub tag: u64,
    /// Set index bits.
    pub set: usize,
    /// Low-order offset bits (ignored for line selection).
    pub offset: u64,
}

/// Bit layout of a request address.
///
/// Construct through [`CacheConfig::validate`](crate::config::CacheConfig::validate),
/// which guarantees the three fields partition the address exactly.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AddressLayout {
    offset_bits: u32,
    index_bits: u32,
    tag_bits: u32,
}

/// Returns a mask with the low `bits` bits set.
#[inline(always)]
pub(crate) const fn low_mask(bits: u32) -> u64 {
    if bits >= u64::BITS {
        u64::MAX
    } else {
        (1u64 << bits) - 1
    }
}

impl AddressLayout {
    /// Creates a layout from field widths. Widths are not checked here.
    pub(crate) const fn new(offset_bits: u32, index_bits: u32, tag_bits: u32) -> Self {
        Self {
            offset_bits,
            index_bits,
            tag_bits,
        }
    }

    /// Total address width in bits.
    #[inline(always)]
    pub const fn address_bits(&self) -> u32 {
        self.offset_bits + self.index_bits + self.tag_bits
    }

    /// Number of ignored low-order offset bits.
    #[inline(always)]
    pub const fn offset_bits(&self) -> u32 {
        self.offset_bits
    }

    /// Number of set-index bits.
    #[inline(always)]
    pub const fn index_bits(&self) -> u32 {
        self.index_bits
    }

    /// Number of tag bits.
    #[inline(always)]
    pub const fn tag_bits(&self) -> u32 {
        self.tag_bits
    }

    /// Returns `true` if `addr` has no bits set above the address width.
    #[inline(always)]
    pub const fn contains(&self, addr: u64) -> bool {
        addr & !low_mask(self.address_bits()) == 0
    }

    /// Splits an address into tag, set index and offset.
    ///
    /// Bits above the address width do not take part in any field.
    #[inline]
    pub const fn decode(&self, addr: u64) -> DecodedAddress {
        let offset = addr & low_mask(self.offset_bits);
        let set = (addr >> self.offset_bits) & low_mask(self.index_bits);
        let tag = (addr >> (self.offset_bits + self.index_bits)) & low_mask(self.tag_bits);
        DecodedAddress {
            tag,
            set: set as usize,
            offset,
        }
    }

    /// Rebuilds the line-aligned address (zero offset) of a tag and set index.
    ///
    /// This is the backing-store address a write-back of that line targets.
    #[inline]
    pub const fn line_address(&self, tag: u64, set: usize) -> u64 {
        let set = (set as u64) & low_mask(self.index_bits);
        let tag = tag & low_mask(self.tag_bits);
        (tag << (self.offset_bits + self.index_bits)) | (set << self.offset_bits)
    }
}
