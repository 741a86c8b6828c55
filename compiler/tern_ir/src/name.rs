//! Interned string identifier.

use std::fmt;

/// Interned string identifier.
///
/// Layout: 32-bit index split into shard (3 bits) + local index (29 bits)
/// - Bits 31-29: shard index (0-7)
/// - Bits 28-0: local index within shard
///
/// Names are only meaningful together with the interner that produced them.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct Name(u32);

impl Name {
    /// Pre-interned empty string.
    pub const EMPTY: Name = Name(0);

    /// Maximum local index per shard.
    pub const MAX_LOCAL: u32 = 0x1FFF_FFFF;

    /// Number of interner shards.
    pub const NUM_SHARDS: usize = 8;

    /// Create from shard and local index.
    #[inline]
    pub const fn new(shard: u32, local: u32) -> Self {
        debug_assert!(shard < 8);
        debug_assert!(local <= Self::MAX_LOCAL);
        Name((shard << 29) | local)
    }

    /// Extract shard index.
    #[inline]
    pub const fn shard(self) -> usize {
        (self.0 >> 29) as usize
    }

    /// Extract local index.
    #[inline]
    pub const fn local(self) -> usize {
        (self.0 & Self::MAX_LOCAL) as usize
    }

    /// Get raw u32 value.
    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Name(shard={}, local={})", self.shard(), self.local())
    }
}

impl Default for Name {
    fn default() -> Self {
        Self::EMPTY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_round_trips_shard_and_local() {
        let name = Name::new(5, 1234);
        assert_eq!(name.shard(), 5);
        assert_eq!(name.local(), 1234);
    }

    #[test]
    fn name_max_local() {
        let name = Name::new(7, Name::MAX_LOCAL);
        assert_eq!(name.shard(), 7);
        assert_eq!(name.local(), Name::MAX_LOCAL as usize);
    }

    #[test]
    fn name_empty_is_shard_zero() {
        assert_eq!(Name::EMPTY.shard(), 0);
        assert_eq!(Name::EMPTY.local(), 0);
        assert_eq!(Name::default(), Name::EMPTY);
    }

    #[test]
    fn name_equality_is_raw_equality() {
        let a = Name::new(1, 10);
        let b = Name::new(1, 10);
        let c = Name::new(2, 10);
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.raw(), b.raw());
    }
}
