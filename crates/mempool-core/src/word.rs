//! Machine-word arithmetic.
//!
//! Every region handed out by a pool is a whole number of machine words,
//! and every block is a whole number of words long. These helpers keep
//! that invariant in one place so the rest of the workspace stays
//! independent of the target's pointer width.

/// Size of one machine word in bytes.
pub const WORD_SIZE: usize = std::mem::size_of::<usize>();

/// Promote `bytes` to the nearest multiple of [`WORD_SIZE`].
///
/// With 8-byte words: `7 → 8`, `12 → 16`, `16 → 16`.
/// Returns `None` if the promotion overflows `usize`.
pub fn to_word_multiple(bytes: usize) -> Option<usize> {
    bytes.checked_next_multiple_of(WORD_SIZE)
}

/// Demote `bytes` to the nearest multiple of [`WORD_SIZE`] at or below it.
///
/// With 8-byte words: `9 → 8`, `100 → 96`.
pub fn down_to_word_multiple(bytes: usize) -> usize {
    bytes - bytes % WORD_SIZE
}

/// Whether `bytes` is an exact multiple of [`WORD_SIZE`].
pub fn is_word_multiple(bytes: usize) -> bool {
    bytes % WORD_SIZE == 0
}

/// Total region size for an array of `count` instances.
///
/// Array regions carry a one-word header (written by the construction
/// layer) that records the element count, so the size is
/// `count * instance_size + WORD_SIZE`. Returns `None` on overflow.
pub fn array_bytes(count: usize, instance_size: usize) -> Option<usize> {
    count.checked_mul(instance_size)?.checked_add(WORD_SIZE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn promote_rounds_up_to_next_word() {
        assert_eq!(to_word_multiple(0), Some(0));
        assert_eq!(to_word_multiple(1), Some(WORD_SIZE));
        assert_eq!(to_word_multiple(WORD_SIZE - 1), Some(WORD_SIZE));
        assert_eq!(to_word_multiple(WORD_SIZE), Some(WORD_SIZE));
        assert_eq!(to_word_multiple(WORD_SIZE + 4), Some(2 * WORD_SIZE));
    }

    #[test]
    fn promote_overflow_is_none() {
        assert_eq!(to_word_multiple(usize::MAX), None);
    }

    #[test]
    fn demote_rounds_down() {
        assert_eq!(down_to_word_multiple(WORD_SIZE + 1), WORD_SIZE);
        assert_eq!(down_to_word_multiple(WORD_SIZE - 1), 0);
        assert_eq!(down_to_word_multiple(12 * WORD_SIZE + 4), 12 * WORD_SIZE);
    }

    #[test]
    fn word_multiple_check() {
        assert!(is_word_multiple(0));
        assert!(is_word_multiple(3 * WORD_SIZE));
        assert!(!is_word_multiple(3 * WORD_SIZE + 1));
    }

    #[test]
    fn array_bytes_includes_header() {
        assert_eq!(array_bytes(0, 16), Some(WORD_SIZE));
        assert_eq!(array_bytes(3, 16), Some(48 + WORD_SIZE));
        assert_eq!(array_bytes(usize::MAX, 2), None);
    }

    #[cfg(not(miri))]
    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn promote_is_smallest_word_multiple_at_or_above(bytes in 0usize..1 << 20) {
                let up = to_word_multiple(bytes).unwrap();
                prop_assert!(is_word_multiple(up));
                prop_assert!(up >= bytes);
                prop_assert!(up - bytes < WORD_SIZE);
            }

            #[test]
            fn demote_is_largest_word_multiple_at_or_below(bytes in 0usize..1 << 20) {
                let down = down_to_word_multiple(bytes);
                prop_assert!(is_word_multiple(down));
                prop_assert!(down <= bytes);
                prop_assert!(bytes - down < WORD_SIZE);
            }
        }
    }
}
