//! Configuration errors.
//!
//! A configuration error is a precondition violation: it is reported
//! before any block is allocated or touched, and the pool (if one exists)
//! is left exactly as it was.

use std::error::Error;
use std::fmt;

/// Invalid pool configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// The block size is not a multiple of the machine word size.
    BlockSizeNotWordMultiple {
        /// The rejected block size in bytes.
        block_size: usize,
        /// The machine word size in bytes.
        word_size: usize,
    },
    /// The block size cannot hold even one instance of the pooled type.
    BlockSizeTooSmall {
        /// The rejected block size in bytes.
        block_size: usize,
        /// Size of one pooled instance in bytes.
        instance_size: usize,
    },
    /// The pooled type is narrower than one machine word, so a freed
    /// instance cannot hold the free-list link.
    InstanceTooSmall {
        /// Size of one pooled instance in bytes.
        instance_size: usize,
        /// The machine word size in bytes.
        word_size: usize,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BlockSizeNotWordMultiple {
                block_size,
                word_size,
            } => {
                write!(
                    f,
                    "block size {block_size} is not a multiple of the word size ({word_size})"
                )
            }
            Self::BlockSizeTooSmall {
                block_size,
                instance_size,
            } => {
                write!(
                    f,
                    "block size {block_size} is smaller than one instance ({instance_size} bytes)"
                )
            }
            Self::InstanceTooSmall {
                instance_size,
                word_size,
            } => {
                write!(
                    f,
                    "pooled instance ({instance_size} bytes) is narrower than one word ({word_size} bytes)"
                )
            }
        }
    }
}

impl Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_offending_size() {
        let err = ConfigError::BlockSizeNotWordMultiple {
            block_size: 1001,
            word_size: 8,
        };
        assert_eq!(
            err.to_string(),
            "block size 1001 is not a multiple of the word size (8)"
        );

        let err = ConfigError::BlockSizeTooSmall {
            block_size: 8,
            instance_size: 16,
        };
        assert!(err.to_string().contains("smaller than one instance"));
    }
}
