//! Access traits for reaching pool memory through a [`Region`].
//!
//! Free lists store their links inside the freed memory itself, so they
//! need a way to read and write bytes at a region without owning the
//! blocks. These traits decouple the list from the block storage: the
//! arena's block chain implements them for real pools, and test mocks
//! implement them over a flat buffer.

use crate::id::Region;
use crate::word::WORD_SIZE;

/// Read-only byte access to pool memory.
pub trait RegionReader {
    /// Borrow `len` bytes starting at `region`.
    ///
    /// Returns `None` if the range is not entirely inside one block.
    fn bytes(&self, region: Region, len: usize) -> Option<&[u8]>;

    /// Read the native-endian machine word stored at `region`.
    fn read_word(&self, region: Region) -> Option<usize> {
        let bytes = self.bytes(region, WORD_SIZE)?;
        let word: [u8; WORD_SIZE] = bytes.try_into().ok()?;
        Some(usize::from_ne_bytes(word))
    }
}

/// Mutable byte access to pool memory.
pub trait RegionWriter: RegionReader {
    /// Mutably borrow `len` bytes starting at `region`.
    ///
    /// Returns `None` if the range is not entirely inside one block.
    fn bytes_mut(&mut self, region: Region, len: usize) -> Option<&mut [u8]>;

    /// Store `value` as a native-endian machine word at `region`.
    ///
    /// Returns `None` (and writes nothing) if the word is out of range.
    fn write_word(&mut self, region: Region, value: usize) -> Option<()> {
        self.bytes_mut(region, WORD_SIZE)?
            .copy_from_slice(&value.to_ne_bytes());
        Some(())
    }
}
