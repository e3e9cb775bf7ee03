//! Read-only pool diagnostics.

use std::fmt;

use mempool_core::SizeClass;
use smallvec::SmallVec;

/// Number of regions waiting on one size-class free list.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SizeClassCount {
    /// The size class.
    pub size_class: SizeClass,
    /// Regions currently on its free list.
    pub count: usize,
}

/// Snapshot of a pool's bookkeeping, produced by
/// [`Pool::describe`](crate::Pool::describe).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PoolReport {
    /// Configured block size in bytes.
    pub block_size: usize,
    /// Number of blocks currently allocated.
    pub block_count: usize,
    /// Bytes still available in the active (most recent) block.
    pub free_in_last_block: usize,
    /// Every non-empty free list, in bucket order then chain order.
    pub size_classes: SmallVec<[SizeClassCount; 8]>,
}

impl PoolReport {
    /// Regions waiting on the free list for `size_class` (0 if none).
    pub fn free_count(&self, size_class: SizeClass) -> usize {
        self.size_classes
            .iter()
            .find(|c| c.size_class == size_class)
            .map_or(0, |c| c.count)
    }

    /// Regions waiting across all free lists.
    pub fn total_free(&self) -> usize {
        self.size_classes.iter().map(|c| c.count).sum()
    }
}

impl fmt::Display for PoolReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=========================================")?;
        writeln!(f, "=              Memory Manager           =")?;
        writeln!(f, "=========================================")?;
        writeln!(f, "* Block size            : {} Bytes", self.block_size)?;
        writeln!(f, "* Number of blocks      : {}", self.block_count)?;
        writeln!(f, "* Free mem in last block: {}", self.free_in_last_block)?;
        writeln!(f, "* Recycle list          : ")?;
        for (i, entry) in self.size_classes.iter().enumerate() {
            write!(f, "[{:>3}] = {:<10}", entry.size_class.0, entry.count)?;
            if (i + 1) % 4 == 0 {
                writeln!(f)?;
            }
        }
        writeln!(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use smallvec::smallvec;

    fn report() -> PoolReport {
        PoolReport {
            block_size: 512,
            block_count: 2,
            free_in_last_block: 96,
            size_classes: smallvec![
                SizeClassCount { size_class: SizeClass(0), count: 3 },
                SizeClassCount { size_class: SizeClass(4), count: 1 },
            ],
        }
    }

    #[test]
    fn free_count_defaults_to_zero() {
        let r = report();
        assert_eq!(r.free_count(SizeClass(0)), 3);
        assert_eq!(r.free_count(SizeClass(9)), 0);
        assert_eq!(r.total_free(), 4);
    }

    #[test]
    fn display_lists_counters_and_classes() {
        let text = report().to_string();
        assert!(text.contains("* Block size            : 512 Bytes"));
        assert!(text.contains("* Number of blocks      : 2"));
        assert!(text.contains("* Free mem in last block: 96"));
        assert!(text.contains("[  0] = 3         "));
        assert!(text.contains("[  4] = 1         "));
    }

    #[test]
    fn display_wraps_every_four_entries() {
        let mut r = report();
        r.size_classes = (0..5)
            .map(|i| SizeClassCount { size_class: SizeClass(i), count: 1 })
            .collect();
        let text = r.to_string();
        let class_lines: Vec<&str> = text.lines().filter(|l| l.starts_with('[')).collect();
        assert_eq!(class_lines.len(), 2);
        assert_eq!(class_lines[0].matches('[').count(), 4);
        assert_eq!(class_lines[1].matches('[').count(), 1);
    }
}
