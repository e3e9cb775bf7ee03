//! The pool's hash-bucketed table of size-class free lists.
//!
//! [`SizeClassTable`] holds [`BUCKET_COUNT`] bucket heads. Bucket `i` is
//! pre-assigned size class `i`; any other class `n` with
//! `n % BUCKET_COUNT == i` is appended to bucket `i`'s chain the first time
//! it is needed.

use mempool_core::{RegionReader, SizeClass, BUCKET_COUNT};
use smallvec::SmallVec;

use crate::free_list::FreeList;
use crate::report::SizeClassCount;

/// Fixed table of free-list buckets with chained overflow.
pub struct SizeClassTable {
    buckets: Box<[FreeList; BUCKET_COUNT]>,
}

impl SizeClassTable {
    /// Create a table whose bucket `i` holds an empty list for class `i`.
    pub fn new() -> Self {
        Self {
            buckets: Box::new(std::array::from_fn(|i| FreeList::new(SizeClass(i)))),
        }
    }

    /// The list for `size_class`, created empty on first use.
    pub fn list_mut(&mut self, size_class: SizeClass) -> &mut FreeList {
        self.buckets[size_class.bucket()].find_or_append(size_class)
    }

    /// The list for `size_class`, if it has ever been created.
    pub fn get(&self, size_class: SizeClass) -> Option<&FreeList> {
        self.buckets[size_class.bucket()].find(size_class)
    }

    /// Every list in bucket order, then chain order within a bucket.
    pub fn lists(&self) -> impl Iterator<Item = &FreeList> {
        self.buckets.iter().flat_map(|bucket| bucket.chain())
    }

    /// Number of lists, including the pre-assigned bucket heads.
    pub fn list_count(&self) -> usize {
        self.lists().count()
    }

    /// Population of every non-empty list, in [`lists`](Self::lists) order.
    pub fn populations<M>(&self, memory: &M) -> SmallVec<[SizeClassCount; 8]>
    where
        M: RegionReader + ?Sized,
    {
        self.lists()
            .filter(|list| !list.is_empty())
            .map(|list| SizeClassCount {
                size_class: list.size_class(),
                count: list.count(memory),
            })
            .collect()
    }

    /// Total number of regions waiting across all lists.
    pub fn free_regions<M>(&self, memory: &M) -> usize
    where
        M: RegionReader + ?Sized,
    {
        self.lists().map(|list| list.count(memory)).sum()
    }

    /// Empty every list and drop every chained list.
    pub fn reset(&mut self) {
        for bucket in self.buckets.iter_mut() {
            bucket.reset();
        }
    }
}

impl Default for SizeClassTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::BlockChain;
    use mempool_core::WORD_SIZE;

    #[test]
    fn buckets_are_preassigned() {
        let table = SizeClassTable::new();
        assert_eq!(table.list_count(), BUCKET_COUNT);
        for i in [0, 1, 17, BUCKET_COUNT - 1] {
            assert_eq!(table.get(SizeClass(i)).map(FreeList::size_class), Some(SizeClass(i)));
        }
        assert!(table.get(SizeClass(BUCKET_COUNT)).is_none());
    }

    #[test]
    fn colliding_classes_chain_lazily() {
        let mut table = SizeClassTable::new();
        table.list_mut(SizeClass(3 + BUCKET_COUNT));
        table.list_mut(SizeClass(3 + 2 * BUCKET_COUNT));
        assert_eq!(table.list_count(), BUCKET_COUNT + 2);
        assert!(table.get(SizeClass(3 + BUCKET_COUNT)).is_some());
    }

    #[test]
    fn populations_skip_empty_lists_and_follow_bucket_order() {
        let mut chain = BlockChain::new(64 * WORD_SIZE);
        let mut table = SizeClassTable::new();
        let mut take = || chain.active_mut().try_alloc(2 * WORD_SIZE).unwrap();
        let (a, b, c, d) = (take(), take(), take(), take());

        table.list_mut(SizeClass(BUCKET_COUNT + 1)).push_front(a, &mut chain).unwrap();
        table.list_mut(SizeClass(1)).push_front(b, &mut chain).unwrap();
        table.list_mut(SizeClass(0)).push_front(c, &mut chain).unwrap();
        table.list_mut(SizeClass(0)).push_front(d, &mut chain).unwrap();

        let pops = table.populations(&chain);
        let got: Vec<(usize, usize)> = pops.iter().map(|p| (p.size_class.0, p.count)).collect();
        assert_eq!(got, vec![(0, 2), (1, 1), (BUCKET_COUNT + 1, 1)]);
        assert_eq!(table.free_regions(&chain), 4);
    }

    #[test]
    fn reset_empties_everything() {
        let mut chain = BlockChain::new(8 * WORD_SIZE);
        let mut table = SizeClassTable::new();
        let r = chain.active_mut().try_alloc(2 * WORD_SIZE).unwrap();
        table.list_mut(SizeClass(2 * BUCKET_COUNT)).push_front(r, &mut chain).unwrap();
        table.reset();
        assert_eq!(table.list_count(), BUCKET_COUNT);
        assert_eq!(table.free_regions(&chain), 0);
    }
}
