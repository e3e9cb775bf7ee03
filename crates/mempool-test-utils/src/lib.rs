//! Test utilities and mock types for mempool development.
//!
//! Provides the pooled test object [`MemTestObj`], the [`MemTest`]
//! exercise harness, and [`MockMemory`], a flat-buffer implementation of
//! the core access traits ([`RegionReader`], [`RegionWriter`]) for testing
//! free lists without a pool.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;
pub mod harness;

pub use fixtures::MemTestObj;
pub use harness::{HarnessError, LiveKind, MemTest};

use mempool_core::{Region, RegionReader, RegionWriter};

/// Mock pool memory backed by one flat buffer.
///
/// Addresses `base..base + len` resolve into the buffer; everything else
/// is out of range. Use [`region`](MockMemory::region) to build regions
/// at byte offsets.
pub struct MockMemory {
    base: usize,
    data: Vec<u8>,
}

impl MockMemory {
    /// A zeroed buffer of `len` bytes starting at address `base`.
    ///
    /// `base` must be non-zero.
    pub fn new(base: usize, len: usize) -> Self {
        Self {
            base,
            data: vec![0; len],
        }
    }

    /// The region `offset` bytes into the buffer.
    ///
    /// # Panics
    ///
    /// Panics if the address is zero or overflows.
    pub fn region(&self, offset: usize) -> Region {
        self.base
            .checked_add(offset)
            .and_then(Region::new)
            .expect("mock region address must be non-zero")
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Raw view of the whole buffer for assertions.
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }
}

impl RegionReader for MockMemory {
    fn bytes(&self, region: Region, len: usize) -> Option<&[u8]> {
        let start = region.addr().checked_sub(self.base)?;
        self.data.get(start..start.checked_add(len)?)
    }
}

impl RegionWriter for MockMemory {
    fn bytes_mut(&mut self, region: Region, len: usize) -> Option<&mut [u8]> {
        let start = region.addr().checked_sub(self.base)?;
        self.data.get_mut(start..start.checked_add(len)?)
    }
}
