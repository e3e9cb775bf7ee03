//! Strongly-typed identifiers: size classes and region addresses.

use std::fmt;
use std::num::NonZeroUsize;

use crate::word::WORD_SIZE;

/// Number of hash buckets in a pool's size-class table.
///
/// Size classes collide into `class % BUCKET_COUNT` and chain from there.
pub const BUCKET_COUNT: usize = 256;

/// The exact element count a freed region was sized for.
///
/// `SizeClass(0)` covers scalar instances (no array header). `SizeClass(n)`
/// for `n > 0` covers arrays of exactly `n` instances plus their one-word
/// header. Regions are only ever recycled within their own class.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SizeClass(pub usize);

impl SizeClass {
    /// The scalar size class.
    pub const SCALAR: SizeClass = SizeClass(0);

    /// Classify a word-rounded region of `byte_len` bytes.
    ///
    /// Computed as `(byte_len - WORD_SIZE) / instance_size`. A scalar
    /// region resolves to class 0 because the pooled instance is at least
    /// one word wide, so the quotient floors to zero; an array region of
    /// `n` elements resolves to `n`. `instance_size` must be non-zero.
    pub fn of_region(byte_len: usize, instance_size: usize) -> Self {
        Self(byte_len.saturating_sub(WORD_SIZE) / instance_size)
    }

    /// The hash bucket this class chains from.
    pub fn bucket(self) -> usize {
        self.0 % BUCKET_COUNT
    }

    /// Whether this is the scalar class.
    pub fn is_scalar(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for SizeClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<usize> for SizeClass {
    fn from(v: usize) -> Self {
        Self(v)
    }
}

/// Address of a region inside a pool.
///
/// Each pool lays its blocks out in a private virtual address space that
/// starts above zero, so a `Region` is never null and the value `0` can
/// serve as the end-of-list marker inside freed memory. A `Region` is only
/// meaningful to the pool that produced it, and only until that pool is
/// reset.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Region(NonZeroUsize);

impl Region {
    /// Wrap a raw address. Returns `None` for the null address.
    pub fn new(addr: usize) -> Option<Self> {
        NonZeroUsize::new(addr).map(Self)
    }

    /// The raw virtual address.
    pub fn addr(self) -> usize {
        self.0.get()
    }

    /// The region starting `bytes` further on.
    ///
    /// Returns `None` if the address would overflow.
    pub fn offset(self, bytes: usize) -> Option<Self> {
        self.0.checked_add(bytes).map(Self)
    }

    /// Encode an optional region as a machine word (`0` for `None`).
    pub fn to_word(region: Option<Self>) -> usize {
        region.map_or(0, Self::addr)
    }

    /// Decode a machine word written by [`to_word`](Self::to_word).
    pub fn from_word(word: usize) -> Option<Self> {
        Self::new(word)
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0.get())
    }
}
