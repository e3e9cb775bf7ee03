//! Workload profiles and utilities for benchmarking the mempool allocator.
//!
//! - [`churn_profile`]: a deterministic mix of create/delete operations
//! - [`run_profile`]: replay a profile against a [`MemTest`] harness

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use mempool_test_utils::{HarnessError, MemTest};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// One step of a churn workload.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChurnOp {
    /// Create this many scalar objects.
    NewObjs(usize),
    /// Create `count` arrays of `len` objects.
    NewArrs {
        /// Number of arrays.
        count: usize,
        /// Elements per array.
        len: usize,
    },
    /// Delete this many random live objects.
    DeleteObjs(usize),
    /// Delete this many random live arrays.
    DeleteArrs(usize),
}

/// Generate `ops` churn steps from `seed`.
///
/// Roughly 40% object creation, 15% array creation, 35% object deletion
/// and 10% array deletion, so the live set grows slowly while most
/// allocations are served from free lists.
pub fn churn_profile(seed: u64, ops: usize) -> Vec<ChurnOp> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..ops)
        .map(|_| match rng.random_range(0..100u32) {
            0..40 => ChurnOp::NewObjs(rng.random_range(1..=16)),
            40..55 => ChurnOp::NewArrs {
                count: rng.random_range(1..=4),
                len: rng.random_range(1..=32),
            },
            55..90 => ChurnOp::DeleteObjs(rng.random_range(1..=12)),
            _ => ChurnOp::DeleteArrs(rng.random_range(1..=3)),
        })
        .collect()
}

/// Replay `profile` against `test`.
///
/// Deletions against an empty live list are skipped; any other harness
/// error stops the replay.
pub fn run_profile(test: &mut MemTest, profile: &[ChurnOp]) -> Result<(), HarnessError> {
    for op in profile {
        let result = match *op {
            ChurnOp::NewObjs(n) => test.new_objs(n).map(drop),
            ChurnOp::NewArrs { count, len } => test.new_arrs(count, len).map(drop),
            ChurnOp::DeleteObjs(k) => test.delete_random_objs(k).map(drop),
            ChurnOp::DeleteArrs(k) => test.delete_random_arrs(k).map(drop),
        };
        match result {
            Ok(()) | Err(HarnessError::EmptyList { .. }) => {}
            Err(e) => return Err(e),
        }
    }
    Ok(())
}
