//! Intrusive size-class free lists.
//!
//! A [`FreeList`] threads together freed regions of one exact
//! [`SizeClass`]. The list itself stores only the head: each region's
//! successor is written into the region's own first machine word, so
//! recycling a region costs no allocation at all. This requires every
//! freed region to be at least one word wide, which the pool guarantees
//! by refusing pooled types narrower than a word.
//!
//! Several size classes can hash into the same bucket of the pool's
//! table. Lists sharing a bucket are chained through `next_list` in the
//! order they were first needed; the chain only ever grows until the
//! whole table is reset.

use std::iter;

use mempool_core::{Region, RegionReader, RegionWriter, SizeClass};

use crate::error::PoolError;

/// A singly linked list of freed regions sharing one size class.
pub struct FreeList {
    /// The exact element count of every region on this list.
    size_class: SizeClass,
    /// Most recently freed region, or `None` when empty.
    head: Option<Region>,
    /// Next list in the same bucket (a different size class).
    next_list: Option<Box<FreeList>>,
}

impl FreeList {
    /// Create an empty list for `size_class`.
    pub fn new(size_class: SizeClass) -> Self {
        Self {
            size_class,
            head: None,
            next_list: None,
        }
    }

    /// The size class of every region on this list.
    pub fn size_class(&self) -> SizeClass {
        self.size_class
    }

    /// The region the next [`pop_front`](Self::pop_front) will return.
    pub fn head(&self) -> Option<Region> {
        self.head
    }

    /// Whether no regions are waiting on this list.
    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    /// Push a freed region onto the front of the list.
    ///
    /// Writes the current head into the first word of `region`, then makes
    /// `region` the head. Fails with [`PoolError::UnknownRegion`] and
    /// leaves the list untouched if `memory` cannot hold a word there.
    pub fn push_front<M>(&mut self, region: Region, memory: &mut M) -> Result<(), PoolError>
    where
        M: RegionWriter + ?Sized,
    {
        memory
            .write_word(region, Region::to_word(self.head))
            .ok_or(PoolError::UnknownRegion { region })?;
        self.head = Some(region);
        Ok(())
    }

    /// Pop the most recently freed region.
    ///
    /// The successor stored in the popped region's first word becomes the
    /// new head. Returns `None` if the list is empty.
    pub fn pop_front<M>(&mut self, memory: &M) -> Option<Region>
    where
        M: RegionReader + ?Sized,
    {
        let head = self.head?;
        self.head = memory.read_word(head).and_then(Region::from_word);
        Some(head)
    }

    /// Iterate the regions on this list from head to tail.
    ///
    /// Follows the links stored in freed memory, so the iterator is only
    /// valid while `memory` is the memory the regions were pushed into.
    pub fn regions<'a, M>(&self, memory: &'a M) -> impl Iterator<Item = Region> + 'a
    where
        M: RegionReader + ?Sized,
    {
        iter::successors(self.head, move |&region| {
            memory.read_word(region).and_then(Region::from_word)
        })
    }

    /// Number of regions on this list. O(n); diagnostics only.
    pub fn count<M>(&self, memory: &M) -> usize
    where
        M: RegionReader + ?Sized,
    {
        self.regions(memory).count()
    }

    /// The next list in this bucket, if any.
    pub fn next_list(&self) -> Option<&FreeList> {
        self.next_list.as_deref()
    }

    /// Iterate this list and every list chained behind it.
    pub fn chain(&self) -> impl Iterator<Item = &FreeList> {
        iter::successors(Some(self), |list| list.next_list())
    }

    /// Find the list for `size_class` in this chain.
    pub fn find(&self, size_class: SizeClass) -> Option<&FreeList> {
        self.chain().find(|list| list.size_class == size_class)
    }

    /// Find the list for `size_class` in this chain, appending an empty
    /// one at the tail if the class has not been seen before.
    pub fn find_or_append(&mut self, size_class: SizeClass) -> &mut FreeList {
        let mut list = self;
        while list.size_class != size_class {
            list = &mut **list
                .next_list
                .get_or_insert_with(|| Box::new(FreeList::new(size_class)));
        }
        list
    }

    /// Release every list chained behind this one and empty this list.
    ///
    /// The regions themselves are not touched; their memory belongs to
    /// the pool's blocks.
    pub fn reset(&mut self) {
        self.unlink_chain();
        self.head = None;
    }

    // Unlink iteratively so a long chain cannot overflow the stack on drop.
    fn unlink_chain(&mut self) {
        let mut next = self.next_list.take();
        while let Some(mut list) = next {
            next = list.next_list.take();
        }
    }
}

impl Drop for FreeList {
    fn drop(&mut self) {
        self.unlink_chain();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::BlockChain;
    use mempool_core::WORD_SIZE;

    fn memory_with_slots(slots: usize) -> (BlockChain, Vec<Region>) {
        let mut chain = BlockChain::new(slots * 2 * WORD_SIZE);
        let regions = (0..slots)
            .map(|_| chain.active_mut().try_alloc(2 * WORD_SIZE).unwrap())
            .collect();
        (chain, regions)
    }

    #[test]
    fn empty_list_pops_none() {
        let (chain, _) = memory_with_slots(1);
        let mut list = FreeList::new(SizeClass::SCALAR);
        assert!(list.is_empty());
        assert_eq!(list.pop_front(&chain), None);
        assert_eq!(list.count(&chain), 0);
    }

    #[test]
    fn push_writes_link_into_freed_memory() {
        let (mut chain, regions) = memory_with_slots(2);
        let mut list = FreeList::new(SizeClass::SCALAR);
        list.push_front(regions[0], &mut chain).unwrap();
        assert_eq!(chain.read_word(regions[0]), Some(0));
        list.push_front(regions[1], &mut chain).unwrap();
        assert_eq!(chain.read_word(regions[1]), Some(regions[0].addr()));
        assert_eq!(list.head(), Some(regions[1]));
    }

    #[test]
    fn pop_is_lifo() {
        let (mut chain, regions) = memory_with_slots(4);
        let mut list = FreeList::new(SizeClass(3));
        for &r in &regions {
            list.push_front(r, &mut chain).unwrap();
        }
        assert_eq!(list.count(&chain), 4);
        for &r in regions.iter().rev() {
            assert_eq!(list.pop_front(&chain), Some(r));
        }
        assert!(list.is_empty());
    }

    #[test]
    fn regions_walks_head_to_tail() {
        let (mut chain, regions) = memory_with_slots(3);
        let mut list = FreeList::new(SizeClass::SCALAR);
        for &r in &regions {
            list.push_front(r, &mut chain).unwrap();
        }
        let walked: Vec<Region> = list.regions(&chain).collect();
        assert_eq!(walked, vec![regions[2], regions[1], regions[0]]);
    }

    #[test]
    fn push_of_foreign_region_fails_cleanly() {
        let (mut chain, _) = memory_with_slots(1);
        let mut list = FreeList::new(SizeClass::SCALAR);
        let foreign = Region::new(1 << 40).unwrap();
        assert_eq!(
            list.push_front(foreign, &mut chain),
            Err(PoolError::UnknownRegion { region: foreign })
        );
        assert!(list.is_empty());
    }

    #[test]
    fn find_or_append_chains_in_first_use_order() {
        let mut bucket = FreeList::new(SizeClass(1));
        bucket.find_or_append(SizeClass(257));
        bucket.find_or_append(SizeClass(513));
        bucket.find_or_append(SizeClass(257));
        let classes: Vec<SizeClass> = bucket.chain().map(FreeList::size_class).collect();
        assert_eq!(classes, vec![SizeClass(1), SizeClass(257), SizeClass(513)]);
    }

    #[test]
    fn find_or_append_returns_self_for_own_class() {
        let mut bucket = FreeList::new(SizeClass(5));
        assert_eq!(bucket.find_or_append(SizeClass(5)).size_class(), SizeClass(5));
        assert!(bucket.next_list().is_none());
        assert!(bucket.find(SizeClass(261)).is_none());
    }

    #[test]
    fn reset_drops_chain_and_head() {
        let (mut chain, regions) = memory_with_slots(1);
        let mut bucket = FreeList::new(SizeClass(0));
        bucket.push_front(regions[0], &mut chain).unwrap();
        bucket.find_or_append(SizeClass(256));
        bucket.find_or_append(SizeClass(512));
        bucket.reset();
        assert!(bucket.is_empty());
        assert_eq!(bucket.chain().count(), 1);
        assert_eq!(bucket.size_class(), SizeClass(0));
    }

    #[test]
    fn long_chain_drops_without_recursion() {
        let mut bucket = FreeList::new(SizeClass(0));
        for i in (1..100_000).rev() {
            let mut list = FreeList::new(SizeClass(i * 256));
            list.next_list = bucket.next_list.take();
            bucket.next_list = Some(Box::new(list));
        }
        assert_eq!(bucket.chain().count(), 100_000);
        drop(bucket);
    }
}
