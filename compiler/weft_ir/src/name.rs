//! Interned string handle.

use std::fmt;

/// Handle to a string in a [`StringInterner`](crate::StringInterner).
///
/// The low [`Name::SHARD_BITS`] bits select the interner shard, the rest is
/// the slot within that shard. Slot 0 of shard 0 is the empty string.
///
/// `Ord` compares handles, not text: it depends on interning order and is
/// only useful for in-memory maps.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Default)]
#[repr(transparent)]
pub struct Name(u32);

impl Name {
    pub const EMPTY: Name = Name(0);

    pub const SHARD_BITS: u32 = 4;
    pub const SHARDS: usize = 1 << Self::SHARD_BITS;
    /// Largest slot a shard can hand out.
    pub const MAX_SLOT: u32 = u32::MAX >> Self::SHARD_BITS;

    #[inline]
    pub const fn from_parts(shard: usize, slot: u32) -> Self {
        debug_assert!(shard < Self::SHARDS);
        debug_assert!(slot <= Self::MAX_SLOT);
        #[expect(clippy::cast_possible_truncation, reason = "shard < SHARDS")]
        let shard = shard as u32;
        Name((slot << Self::SHARD_BITS) | shard)
    }

    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        Name(raw)
    }

    #[inline]
    pub const fn shard(self) -> usize {
        (self.0 & (Self::SHARDS as u32 - 1)) as usize
    }

    #[inline]
    pub const fn slot(self) -> usize {
        (self.0 >> Self::SHARD_BITS) as usize
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Name(s{}#{})", self.shard(), self.slot())
    }
}
