//! Pooled test object.
//!
//! [`MemTestObj`] is the type the harness pools. Every instance carries a
//! payload derived from its id, so a test can tell whether two live
//! instances were ever handed overlapping memory: the later write would
//! leave the earlier one with a payload that no longer matches its id.

use bytemuck::{Pod, Zeroable};

/// A two-word pooled object with a self-checking payload.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Pod, Zeroable)]
#[repr(C)]
pub struct MemTestObj {
    pub id: u64,
    pub payload: u64,
}

impl MemTestObj {
    const MIX: u64 = 0x9E37_79B9_7F4A_7C15;

    pub fn new(id: u64) -> Self {
        Self {
            id,
            payload: Self::checksum(id),
        }
    }

    /// Whether the payload still matches the id it was built from.
    pub fn is_intact(&self) -> bool {
        self.payload == Self::checksum(self.id)
    }

    fn checksum(id: u64) -> u64 {
        id.wrapping_mul(Self::MIX).rotate_left(17) ^ Self::MIX
    }
}
