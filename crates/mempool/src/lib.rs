//! mempool: a slab allocator for many short-lived instances of one type.
//!
//! This is the top-level facade crate that re-exports the public API from
//! the mempool sub-crates. For most users, adding `mempool` as a single
//! dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use mempool::prelude::*;
//!
//! type Point = [u64; 2];
//!
//! // 64 words per block.
//! let mut pool: Pool<Point> = Pool::new(PoolConfig::with_block_words(64)).unwrap();
//!
//! let a = pool.emplace([1, 2]).unwrap();
//! let b = pool.emplace([3, 4]).unwrap();
//! assert_eq!(pool.get(b), Some([3, 4]));
//!
//! // Released regions are reused most-recent-first.
//! pool.free(a).unwrap();
//! let c = pool.emplace([5, 6]).unwrap();
//! assert_eq!(c, a);
//!
//! // Arrays carry a one-word length header and recycle by element count.
//! let xs = pool.emplace_array(&[[7, 7], [8, 8], [9, 9]]).unwrap();
//! assert_eq!(pool.array_len(xs), Some(3));
//! pool.free_array(xs).unwrap();
//! assert_eq!(pool.describe().free_count(SizeClass(3)), 1);
//!
//! // A request that can never fit a block fails without side effects.
//! let too_big = vec![[0u64; 2]; 64];
//! assert!(matches!(
//!     pool.emplace_array(&too_big),
//!     Err(PoolError::RequestTooLarge { .. })
//! ));
//!
//! pool.reset();
//! assert_eq!(pool.describe().block_count, 1);
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`arena`] | `mempool-arena` | `Pool`, blocks, free lists, config, report |
//! | [`types`] | `mempool-core` | Word arithmetic, `SizeClass`, `Region`, access traits |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// The pool and its building blocks (`mempool-arena`).
///
/// Most users only need [`arena::Pool`] and [`arena::PoolConfig`]; both
/// are also available in the [`prelude`].
pub use mempool_arena as arena;

/// Core types, traits, and word arithmetic (`mempool-core`).
///
/// Contains [`types::Region`], [`types::SizeClass`], and the access traits
/// [`types::RegionReader`] and [`types::RegionWriter`].
pub use mempool_core as types;

/// Common imports for typical mempool usage.
///
/// ```rust
/// use mempool::prelude::*;
/// ```
pub mod prelude {
    // Pool
    pub use mempool_arena::{Pool, PoolConfig, PoolReport, SizeClassCount};

    // Core types and traits
    pub use mempool_core::{array_bytes, Region, RegionReader, RegionWriter, SizeClass, WORD_SIZE};

    // Errors
    pub use mempool_arena::PoolError;
    pub use mempool_core::ConfigError;
}
