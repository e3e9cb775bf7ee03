//! Block-chained slab pool for a single pooled type.
//!
//! A [`Pool<T>`] serves fixed-size allocations of `T` (and arrays of `T`)
//! from large bump-allocated blocks, and recycles released regions through
//! exact size-class free lists instead of handing them back to the system.
//!
//! # Architecture
//!
//! ```text
//! Pool<T> (controller)
//! ├── BlockChain
//! │   ├── active Block   (bump allocation happens here)
//! │   └── retired Blocks (exhausted, oldest first)
//! └── SizeClassTable
//!     └── FreeList × 256 buckets
//!         └── next_list → FreeList → ... (classes colliding mod 256)
//! ```
//!
//! # Memory model
//!
//! Blocks are zeroed `Box<[u8]>` buffers laid out in a per-pool virtual
//! address space. A [`Region`](mempool_core::Region) is an address in that
//! space. Free lists are intrusive: the link to the next freed region is
//! stored in the first machine word of the freed region itself, which is
//! why pooled types must be at least one word wide. No `unsafe` is used.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_code)]

pub mod block;
pub mod config;
pub mod error;
pub mod free_list;
pub mod pool;
pub mod report;
pub mod table;
mod typed;

// Public re-exports for the primary API surface.
pub use block::{Block, BlockChain};
pub use config::PoolConfig;
pub use error::PoolError;
pub use free_list::FreeList;
pub use pool::Pool;
pub use report::{PoolReport, SizeClassCount};
pub use table::SizeClassTable;
