//! The pool controller.
//!
//! [`Pool`] ties a [`BlockChain`] and a [`SizeClassTable`] together and
//! implements the allocate/release protocol for one pooled type:
//!
//! 1. Round the request up to whole machine words (never below one
//!    instance) and reject it if it can never fit a block.
//! 2. Pop the exact size class's free list if it has anything waiting.
//! 3. Otherwise bump-allocate from the active block.
//! 4. On exhaustion, salvage the active block's leftover into the free
//!    list for its own size class, start a fresh block, and bump from it.
//!
//! Releases push the region onto the head of its size class's list. Array
//! regions carry a one-word element-count header written by the caller;
//! [`Pool::free_array`] reads it back to find the size class.

use std::marker::PhantomData;
use std::mem::size_of;

use mempool_core::{to_word_multiple, Region, RegionReader, RegionWriter, SizeClass};
use tracing::{debug, trace, warn};

use crate::block::BlockChain;
use crate::config::PoolConfig;
use crate::error::PoolError;
use crate::report::PoolReport;
use crate::table::SizeClassTable;

/// A slab allocator for instances (and arrays) of one type `T`.
///
/// Regions are handed out as [`Region`] addresses into the pool's own
/// blocks. A region belongs to the caller until it is released with
/// [`free`](Self::free) or [`free_array`](Self::free_array); releasing a
/// region twice is not detected and will later hand the same memory out
/// twice. Memory only goes back to the system when the pool is
/// [`reconfigure`](Self::reconfigure)d or dropped.
///
/// The pool is single-threaded. One pool per pooled type is the intended
/// deployment; own it next to whatever manages instances of `T`.
pub struct Pool<T> {
    config: PoolConfig,
    blocks: BlockChain,
    classes: SizeClassTable,
    _pooled: PhantomData<fn() -> T>,
}

impl<T> Pool<T> {
    /// Size of one pooled instance in bytes.
    pub const INSTANCE_SIZE: usize = size_of::<T>();

    /// Create a pool with one pre-allocated block.
    ///
    /// Fails with [`PoolError::InvalidConfig`] if the block size is not a
    /// word multiple, is smaller than one instance, or if `T` is narrower
    /// than a machine word.
    pub fn new(config: PoolConfig) -> Result<Self, PoolError> {
        config.validate(Self::INSTANCE_SIZE)?;
        debug!(
            block_size = config.block_size,
            instance_size = Self::INSTANCE_SIZE,
            "pool created"
        );
        Ok(Self {
            blocks: BlockChain::new(config.block_size),
            classes: SizeClassTable::new(),
            config,
            _pooled: PhantomData,
        })
    }

    /// Create a pool with [`PoolConfig::default`].
    pub fn with_default_config() -> Result<Self, PoolError> {
        Self::new(PoolConfig::default())
    }

    /// The active configuration.
    pub fn config(&self) -> &PoolConfig {
        &self.config
    }

    /// Capacity of each block in bytes.
    pub fn block_size(&self) -> usize {
        self.config.block_size
    }

    /// Size of one pooled instance in bytes.
    pub fn instance_size(&self) -> usize {
        Self::INSTANCE_SIZE
    }

    /// Allocate a region for one instance of `T` (size class 0).
    pub fn alloc(&mut self) -> Result<Region, PoolError> {
        self.get_region(Self::INSTANCE_SIZE)
    }

    /// Allocate a region for an array.
    ///
    /// `total_bytes` includes the one-word element-count header, i.e.
    /// [`array_bytes(count, instance_size)`](mempool_core::array_bytes).
    /// The pool does not write the header; the caller must store the
    /// element count in the first word before the region is released
    /// with [`free_array`](Self::free_array).
    pub fn alloc_array(&mut self, total_bytes: usize) -> Result<Region, PoolError> {
        self.get_region(total_bytes)
    }

    /// Release a region obtained from [`alloc`](Self::alloc).
    pub fn free(&mut self, region: Region) -> Result<(), PoolError> {
        self.recycle(region, SizeClass::SCALAR)
    }

    /// Release a region obtained from [`alloc_array`](Self::alloc_array).
    ///
    /// The size class is the element count stored in the region's header
    /// word.
    pub fn free_array(&mut self, region: Region) -> Result<(), PoolError> {
        let count = self
            .blocks
            .read_word(region)
            .ok_or(PoolError::UnknownRegion { region })?;
        self.recycle(region, SizeClass(count))
    }

    /// Drop every block but the first, rewind it, and clear all free
    /// lists. The block size is unchanged.
    ///
    /// Every region handed out so far becomes invalid.
    pub fn reset(&mut self) {
        self.clear(None);
    }

    /// Reset the pool, optionally switching to a new block size.
    ///
    /// With `None`, or a size equal to the current one, this is
    /// [`reset`](Self::reset). With a different size the surviving block
    /// is replaced by a fresh one of that size. The new size is validated
    /// first; on error the pool is untouched.
    pub fn reconfigure(&mut self, block_size: Option<usize>) -> Result<(), PoolError> {
        let resized = match block_size {
            Some(size) if size != self.config.block_size => {
                let config = PoolConfig::new(size);
                config.validate(Self::INSTANCE_SIZE)?;
                Some(config)
            }
            _ => None,
        };
        self.clear(resized.as_ref().map(|config| config.block_size));
        if let Some(config) = resized {
            self.config = config;
        }
        Ok(())
    }

    /// Snapshot the pool's bookkeeping.
    pub fn describe(&self) -> PoolReport {
        PoolReport {
            block_size: self.config.block_size,
            block_count: self.blocks.block_count(),
            free_in_last_block: self.blocks.active().remaining(),
            size_classes: self.classes.populations(&self.blocks),
        }
    }

    /// The pool's blocks.
    pub fn blocks(&self) -> &BlockChain {
        &self.blocks
    }

    /// Number of regions waiting on the free list for `size_class`.
    pub fn free_list_len(&self, size_class: SizeClass) -> usize {
        self.classes
            .get(size_class)
            .map_or(0, |list| list.count(&self.blocks))
    }

    /// Total regions waiting across all free lists.
    pub fn free_regions(&self) -> usize {
        self.classes.free_regions(&self.blocks)
    }

    /// Total memory held by all blocks in bytes.
    pub fn memory_bytes(&self) -> usize {
        self.blocks.memory_bytes()
    }

    /// Whether `region` lies inside one of this pool's blocks.
    pub fn contains(&self, region: Region) -> bool {
        self.blocks.contains(region)
    }

    fn get_region(&mut self, requested: usize) -> Result<Region, PoolError> {
        let block_size = self.config.block_size;
        let len = to_word_multiple(requested.max(Self::INSTANCE_SIZE))
            .filter(|&len| len <= block_size)
            .ok_or_else(|| {
                warn!(requested, block_size, "requested memory is greater than block size");
                PoolError::RequestTooLarge {
                    requested,
                    block_size,
                }
            })?;
        let size_class = SizeClass::of_region(len, Self::INSTANCE_SIZE);

        if let Some(region) = self.classes.list_mut(size_class).pop_front(&self.blocks) {
            trace!(%region, %size_class, "recycled from size class");
            return Ok(region);
        }

        let region = match self.blocks.active_mut().try_alloc(len) {
            Some(region) => region,
            None => self.grow(requested, len)?,
        };
        trace!(%region, len, %size_class, "memory acquired");
        Ok(region)
    }

    // The fresh block is created before anything is mutated, so a failure
    // here leaves the pool as it was.
    fn grow(&mut self, requested: usize, len: usize) -> Result<Region, PoolError> {
        let fresh = self.blocks.fresh_block()?;
        self.salvage_remainder()?;
        self.blocks.install(fresh);
        debug!(
            block_count = self.blocks.block_count(),
            base = self.blocks.active().base(),
            "new block"
        );
        self.blocks
            .active_mut()
            .try_alloc(len)
            .ok_or(PoolError::RequestTooLarge {
                requested,
                block_size: self.config.block_size,
            })
    }

    // Leftovers narrower than one instance would land in size class 0 yet
    // could not hold a scalar, so they are dropped instead.
    fn salvage_remainder(&mut self) -> Result<(), PoolError> {
        let remaining = self.blocks.active().remaining();
        if remaining < Self::INSTANCE_SIZE {
            if remaining > 0 {
                debug!(remaining, "discarding block remainder");
            }
            return Ok(());
        }
        let Some((region, len)) = self.blocks.active_mut().take_remainder() else {
            return Ok(());
        };
        let size_class = SizeClass::of_region(len, Self::INSTANCE_SIZE);
        self.classes
            .list_mut(size_class)
            .push_front(region, &mut self.blocks)?;
        debug!(%region, len, %size_class, "salvaged block remainder");
        Ok(())
    }

    fn recycle(&mut self, region: Region, size_class: SizeClass) -> Result<(), PoolError> {
        if !self.blocks.contains(region) {
            return Err(PoolError::UnknownRegion { region });
        }
        self.classes
            .list_mut(size_class)
            .push_front(region, &mut self.blocks)?;
        trace!(%region, %size_class, "recycling region");
        Ok(())
    }

    fn clear(&mut self, block_size: Option<usize>) {
        self.blocks.reset(block_size);
        self.classes.reset();
        debug!(
            block_size = self.blocks.block_size(),
            resized = block_size.is_some(),
            "pool reset"
        );
    }
}

impl<T> RegionReader for Pool<T> {
    fn bytes(&self, region: Region, len: usize) -> Option<&[u8]> {
        self.blocks.bytes(region, len)
    }
}

impl<T> RegionWriter for Pool<T> {
    fn bytes_mut(&mut self, region: Region, len: usize) -> Option<&mut [u8]> {
        self.blocks.bytes_mut(region, len)
    }
}
