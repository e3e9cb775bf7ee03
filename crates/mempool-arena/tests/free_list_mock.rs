//! Free lists driven over mock memory instead of a block chain.

use mempool_arena::{FreeList, PoolError};
use mempool_core::{RegionReader, SizeClass, WORD_SIZE};
use mempool_test_utils::MockMemory;

#[test]
fn links_live_inside_freed_memory() {
    let mut mem = MockMemory::new(0x100, 6 * WORD_SIZE);
    let slots: Vec<_> = (0..3).map(|i| mem.region(2 * i * WORD_SIZE)).collect();
    let mut list = FreeList::new(SizeClass(4));

    for &r in &slots {
        list.push_front(r, &mut mem).unwrap();
    }
    assert_eq!(mem.read_word(slots[0]), Some(0));
    assert_eq!(mem.read_word(slots[1]), Some(slots[0].addr()));
    assert_eq!(mem.read_word(slots[2]), Some(slots[1].addr()));
    assert_eq!(list.count(&mem), 3);

    assert_eq!(list.pop_front(&mem), Some(slots[2]));
    assert_eq!(list.head(), Some(slots[1]));
}

#[test]
fn region_too_close_to_the_end_is_refused() {
    let mut mem = MockMemory::new(0x100, 2 * WORD_SIZE);
    let tail = mem.region(WORD_SIZE + 1);
    let mut list = FreeList::new(SizeClass::SCALAR);
    assert_eq!(
        list.push_front(tail, &mut mem),
        Err(PoolError::UnknownRegion { region: tail })
    );
    assert!(list.is_empty());
}

#[test]
fn reset_leaves_memory_untouched() {
    let mut mem = MockMemory::new(0x100, 4 * WORD_SIZE);
    let a = mem.region(0);
    let b = mem.region(2 * WORD_SIZE);
    let mut list = FreeList::new(SizeClass(1));
    list.push_front(a, &mut mem).unwrap();
    list.push_front(b, &mut mem).unwrap();
    let snapshot = mem.as_slice().to_vec();

    list.reset();
    assert!(list.is_empty());
    assert_eq!(mem.as_slice(), snapshot.as_slice());
}
