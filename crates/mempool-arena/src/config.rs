//! Pool configuration parameters.

use mempool_core::{is_word_multiple, ConfigError, WORD_SIZE};

/// Configuration for a [`Pool`](crate::Pool).
///
/// Controls the capacity of each block. Validated at construction and on
/// every reconfiguration; an invalid configuration never touches a block.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PoolConfig {
    /// Capacity of each block in bytes.
    ///
    /// Default: 65_536. Must be a multiple of the machine word size and
    /// large enough to hold one instance of the pooled type. A single
    /// allocation can never exceed this.
    pub block_size: usize,
}

impl PoolConfig {
    /// Default block size in bytes.
    pub const DEFAULT_BLOCK_SIZE: usize = 65_536;

    /// Create a config with the given block size in bytes.
    pub fn new(block_size: usize) -> Self {
        Self { block_size }
    }

    /// Create a config whose blocks are `words` machine words long.
    pub fn with_block_words(words: usize) -> Self {
        Self::new(words.saturating_mul(WORD_SIZE))
    }

    /// Check this config against the pooled type's instance size.
    pub fn validate(&self, instance_size: usize) -> Result<(), ConfigError> {
        if instance_size < WORD_SIZE {
            return Err(ConfigError::InstanceTooSmall {
                instance_size,
                word_size: WORD_SIZE,
            });
        }
        if !is_word_multiple(self.block_size) {
            return Err(ConfigError::BlockSizeNotWordMultiple {
                block_size: self.block_size,
                word_size: WORD_SIZE,
            });
        }
        if self.block_size < instance_size {
            return Err(ConfigError::BlockSizeTooSmall {
                block_size: self.block_size,
                instance_size,
            });
        }
        Ok(())
    }

    /// Number of scalar instances a fresh block can hold.
    pub fn instances_per_block(&self, instance_size: usize) -> usize {
        match mempool_core::to_word_multiple(instance_size) {
            Some(slot) if slot > 0 => self.block_size / slot,
            _ => 0,
        }
    }
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self::new(Self::DEFAULT_BLOCK_SIZE)
    }
}
