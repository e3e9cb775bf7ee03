//! Pool-specific error types.

use std::error::Error;
use std::fmt;

use mempool_core::{ConfigError, Region};

/// Errors that can occur during pool operations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PoolError {
    /// The requested configuration was rejected before any block was touched.
    InvalidConfig(ConfigError),
    /// A single request can never fit in a block of the configured size.
    RequestTooLarge {
        /// Number of bytes requested (before word rounding).
        requested: usize,
        /// The configured block size in bytes.
        block_size: usize,
    },
    /// A region that does not lie inside any live block of this pool.
    UnknownRegion {
        /// The offending region.
        region: Region,
    },
    /// The pool's virtual address range is used up.
    AddressSpaceExhausted,
}

impl fmt::Display for PoolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidConfig(reason) => write!(f, "invalid pool configuration: {reason}"),
            Self::RequestTooLarge {
                requested,
                block_size,
            } => {
                write!(
                    f,
                    "requested memory ({requested}) is greater than block size ({block_size})"
                )
            }
            Self::UnknownRegion { region } => {
                write!(f, "region {region} does not belong to this pool")
            }
            Self::AddressSpaceExhausted => write!(f, "pool address space exhausted"),
        }
    }
}

impl Error for PoolError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidConfig(reason) => Some(reason),
            _ => None,
        }
    }
}

impl From<ConfigError> for PoolError {
    fn from(err: ConfigError) -> Self {
        Self::InvalidConfig(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_is_the_source() {
        let inner = ConfigError::BlockSizeTooSmall {
            block_size: 8,
            instance_size: 16,
        };
        let err = PoolError::from(inner.clone());
        assert_eq!(err, PoolError::InvalidConfig(inner));
        assert!(err.source().is_some());
    }

    #[test]
    fn too_large_message_matches_legacy_wording() {
        let err = PoolError::RequestTooLarge {
            requested: 1024,
            block_size: 512,
        };
        assert_eq!(
            err.to_string(),
            "requested memory (1024) is greater than block size (512)"
        );
        assert!(err.source().is_none());
    }
}
