//! Core types and traits for the mempool slab allocator.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the vocabulary shared by the rest of the workspace: machine-word
//! arithmetic, size classes, region addresses, the access traits that
//! free lists use to reach pool memory, and configuration errors.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod id;
pub mod traits;
pub mod word;

pub use error::ConfigError;
pub use id::{Region, SizeClass, BUCKET_COUNT};
pub use traits::{RegionReader, RegionWriter};
pub use word::{array_bytes, down_to_word_multiple, is_word_multiple, to_word_multiple, WORD_SIZE};
