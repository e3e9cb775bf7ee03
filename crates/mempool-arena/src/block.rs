//! Contiguous memory blocks and the pool's block chain.
//!
//! A [`Block`] is a fixed-capacity byte buffer with bump allocation.
//! A [`BlockChain`] owns every block a pool has created: the active block
//! that new requests bump from, plus the exhausted blocks behind it.
//!
//! Each block occupies a disjoint range of the pool's virtual address
//! space, starting at [`BlockChain::FIRST_BASE`]. A [`Region`] is an
//! address in that space, so the chain can resolve any region back to its
//! block and offset without holding references into block memory.

use mempool_core::{Region, RegionReader, RegionWriter, WORD_SIZE};

use crate::error::PoolError;

/// A single contiguous block with bump allocation.
///
/// Blocks are the fundamental storage unit of a pool. The buffer is
/// allocated to full capacity at creation and never grows. Individual
/// ranges are never freed back to the block; the only way to reclaim
/// space is [`rewind`](Block::rewind) or dropping the block.
pub struct Block {
    /// Backing storage. Allocated to full capacity at creation.
    data: Box<[u8]>,
    /// Virtual address of `data[0]`.
    base: usize,
    /// Bump pointer: offset of the next free byte.
    cursor: usize,
}

impl Block {
    /// Create a zeroed block of `capacity` bytes at virtual address `base`.
    pub fn new(base: usize, capacity: usize) -> Self {
        Self {
            data: vec![0u8; capacity].into_boxed_slice(),
            base,
            cursor: 0,
        }
    }

    /// Bump-allocate `len` bytes from this block.
    ///
    /// Returns the region at the prior cursor, or `None` without moving
    /// the cursor if fewer than `len` bytes remain.
    pub fn try_alloc(&mut self, len: usize) -> Option<Region> {
        if len > self.remaining() {
            return None;
        }
        let region = Region::new(self.base.checked_add(self.cursor)?)?;
        self.cursor += len;
        Some(region)
    }

    /// Hand out everything between the cursor and the end of the block.
    ///
    /// Returns the leftover region and its length, or `None` if the block
    /// is already full. The cursor moves to the end.
    pub fn take_remainder(&mut self) -> Option<(Region, usize)> {
        let len = self.remaining();
        if len == 0 {
            return None;
        }
        let region = self.try_alloc(len)?;
        Some((region, len))
    }

    /// Reset the bump pointer to the start without releasing the buffer.
    ///
    /// Every region previously handed out from this block becomes invalid.
    pub fn rewind(&mut self) {
        self.cursor = 0;
    }

    /// Virtual address of the first byte.
    pub fn base(&self) -> usize {
        self.base
    }

    /// Virtual address one past the last byte.
    pub fn end(&self) -> usize {
        self.base + self.data.len()
    }

    /// Whether `addr` lies inside this block.
    pub fn contains(&self, addr: usize) -> bool {
        addr >= self.base && addr < self.end()
    }

    /// Bytes handed out so far.
    pub fn used(&self) -> usize {
        self.cursor
    }

    /// Total capacity in bytes.
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// Bytes still available for bump allocation.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.cursor
    }

    /// Borrow `len` bytes at `offset` from the start of the block.
    pub fn slice(&self, offset: usize, len: usize) -> Option<&[u8]> {
        let end = offset.checked_add(len)?;
        self.data.get(offset..end)
    }

    /// Mutably borrow `len` bytes at `offset` from the start of the block.
    pub fn slice_mut(&mut self, offset: usize, len: usize) -> Option<&mut [u8]> {
        let end = offset.checked_add(len)?;
        self.data.get_mut(offset..end)
    }
}

/// Every block owned by a pool.
///
/// Blocks are created newest-last: the active block is the one requests
/// bump from, and `retired` holds the exhausted blocks in creation order.
/// Base addresses increase strictly with creation order, so the retired
/// list is sorted by address and lookups are a binary search.
pub struct BlockChain {
    /// The block currently being filled (the newest).
    active: Block,
    /// Exhausted blocks, oldest first.
    retired: Vec<Block>,
    /// Capacity of each new block in bytes.
    block_size: usize,
}

impl BlockChain {
    /// Virtual address of the first block.
    ///
    /// Kept above zero so that zero can mark the end of a free list.
    pub const FIRST_BASE: usize = WORD_SIZE;

    /// Create a chain with one pre-allocated block.
    pub fn new(block_size: usize) -> Self {
        Self {
            active: Block::new(Self::FIRST_BASE, block_size),
            retired: Vec::new(),
            block_size,
        }
    }

    /// Capacity of each new block in bytes.
    pub fn block_size(&self) -> usize {
        self.block_size
    }

    /// The block new requests bump from.
    pub fn active(&self) -> &Block {
        &self.active
    }

    /// Mutable access to the block new requests bump from.
    pub fn active_mut(&mut self) -> &mut Block {
        &mut self.active
    }

    /// Allocate the block that will follow the active one.
    ///
    /// The block is not linked in until [`install`](Self::install), so a
    /// caller can prepare for exhaustion before mutating anything.
    pub fn fresh_block(&self) -> Result<Block, PoolError> {
        let base = self.active.end();
        base.checked_add(self.block_size)
            .ok_or(PoolError::AddressSpaceExhausted)?;
        Ok(Block::new(base, self.block_size))
    }

    /// Make `block` the active block, retiring the current one.
    pub fn install(&mut self, block: Block) {
        let previous = std::mem::replace(&mut self.active, block);
        self.retired.push(previous);
    }

    /// Drop every block except the first one ever created.
    ///
    /// With `Some(size)` the surviving block is replaced by a fresh block
    /// of `size` bytes and the chain adopts that size; with `None` it is
    /// rewound in place.
    pub fn reset(&mut self, block_size: Option<usize>) {
        if !self.retired.is_empty() {
            let mut retired = std::mem::take(&mut self.retired);
            self.active = retired.swap_remove(0);
        }
        match block_size {
            Some(size) => {
                self.active = Block::new(Self::FIRST_BASE, size);
                self.block_size = size;
            }
            None => self.active.rewind(),
        }
    }

    /// Number of blocks currently allocated.
    pub fn block_count(&self) -> usize {
        self.retired.len() + 1
    }

    /// Iterate blocks from the newest (active) to the oldest.
    pub fn iter_newest_first(&self) -> impl Iterator<Item = &Block> {
        std::iter::once(&self.active).chain(self.retired.iter().rev())
    }

    /// Total memory held by all blocks in bytes.
    pub fn memory_bytes(&self) -> usize {
        self.iter_newest_first().map(Block::capacity).sum()
    }

    /// Total bytes bumped out of all blocks.
    pub fn total_used(&self) -> usize {
        self.iter_newest_first().map(Block::used).sum()
    }

    /// Whether `region` lies inside a live block.
    pub fn contains(&self, region: Region) -> bool {
        self.locate(region.addr()).is_some()
    }

    fn locate(&self, addr: usize) -> Option<&Block> {
        if self.active.contains(addr) {
            return Some(&self.active);
        }
        let idx = self.retired.partition_point(|b| b.base() <= addr);
        let block = self.retired.get(idx.checked_sub(1)?)?;
        block.contains(addr).then_some(block)
    }

    fn locate_mut(&mut self, addr: usize) -> Option<&mut Block> {
        if self.active.contains(addr) {
            return Some(&mut self.active);
        }
        let idx = self.retired.partition_point(|b| b.base() <= addr);
        let block = self.retired.get_mut(idx.checked_sub(1)?)?;
        if block.contains(addr) {
            Some(block)
        } else {
            None
        }
    }
}

impl RegionReader for BlockChain {
    fn bytes(&self, region: Region, len: usize) -> Option<&[u8]> {
        let block = self.locate(region.addr())?;
        block.slice(region.addr() - block.base(), len)
    }
}

impl RegionWriter for BlockChain {
    fn bytes_mut(&mut self, region: Region, len: usize) -> Option<&mut [u8]> {
        let block = self.locate_mut(region.addr())?;
        let offset = region.addr() - block.base();
        block.slice_mut(offset, len)
    }
}
