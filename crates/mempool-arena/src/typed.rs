//! Typed construction on top of raw pool regions.
//!
//! For plain-old-data types the pool can place values itself. Scalars
//! occupy their region from the first byte. Arrays follow the header
//! convention: the element count in the first word, elements packed
//! right after it.
//!
//! ```text
//! scalar:  [ value                        ]
//! array:   [ count | elem 0 | elem 1 | ...]
//!            ^ one word
//! ```
//!
//! Values are copied in and out by bytes, so no alignment beyond the
//! machine word is assumed. Release still goes through
//! [`Pool::free`] and [`Pool::free_array`].

use bytemuck::Pod;
use mempool_core::{array_bytes, Region, RegionReader, RegionWriter, WORD_SIZE};

use crate::error::PoolError;
use crate::pool::Pool;

impl<T: Pod> Pool<T> {
    /// Allocate a scalar region and move `value` into it.
    pub fn emplace(&mut self, value: T) -> Result<Region, PoolError> {
        let region = self.alloc()?;
        self.set(region, value)?;
        Ok(region)
    }

    /// Allocate an array region, write its header, and copy `values` in.
    pub fn emplace_array(&mut self, values: &[T]) -> Result<Region, PoolError> {
        let total = array_bytes(values.len(), Self::INSTANCE_SIZE).ok_or(
            PoolError::RequestTooLarge {
                requested: usize::MAX,
                block_size: self.block_size(),
            },
        )?;
        let region = self.alloc_array(total)?;
        self.write_word(region, values.len())
            .ok_or(PoolError::UnknownRegion { region })?;

        let bytes: &[u8] = bytemuck::cast_slice(values);
        if !bytes.is_empty() {
            let elements = Self::array_elements(region).ok_or(PoolError::UnknownRegion { region })?;
            self.bytes_mut(elements, bytes.len())
                .ok_or(PoolError::UnknownRegion { region })?
                .copy_from_slice(bytes);
        }
        Ok(region)
    }

    /// Read the value stored in a scalar region.
    pub fn get(&self, region: Region) -> Option<T> {
        self.bytes(region, Self::INSTANCE_SIZE)
            .map(bytemuck::pod_read_unaligned)
    }

    /// Overwrite the value stored in a scalar region.
    pub fn set(&mut self, region: Region, value: T) -> Result<(), PoolError> {
        self.bytes_mut(region, Self::INSTANCE_SIZE)
            .ok_or(PoolError::UnknownRegion { region })?
            .copy_from_slice(bytemuck::bytes_of(&value));
        Ok(())
    }

    /// Element count recorded in an array region's header.
    pub fn array_len(&self, region: Region) -> Option<usize> {
        self.read_word(region)
    }

    /// Copy out every element of an array region.
    pub fn get_array(&self, region: Region) -> Option<Vec<T>> {
        let len = self.array_len(region)?;
        if len == 0 {
            return Some(Vec::new());
        }
        let byte_len = len.checked_mul(Self::INSTANCE_SIZE)?;
        let bytes = self.bytes(Self::array_elements(region)?, byte_len)?;
        Some(
            bytes
                .chunks_exact(Self::INSTANCE_SIZE)
                .map(bytemuck::pod_read_unaligned)
                .collect(),
        )
    }

    /// Address of the first element of an array region.
    pub fn array_elements(region: Region) -> Option<Region> {
        region.offset(WORD_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PoolConfig;
    use bytemuck::{Pod, Zeroable};
    use mempool_core::SizeClass;

    #[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
    #[repr(C)]
    struct Particle {
        x: f64,
        y: f64,
        id: u64,
    }

    fn particle(id: u64) -> Particle {
        Particle {
            x: id as f64 * 0.5,
            y: -(id as f64),
            id,
        }
    }

    fn pool() -> Pool<Particle> {
        Pool::new(PoolConfig::with_block_words(96)).unwrap()
    }

    #[test]
    fn emplace_then_get() {
        let mut pool = pool();
        let r = pool.emplace(particle(7)).unwrap();
        assert_eq!(pool.get(r), Some(particle(7)));
        pool.set(r, particle(8)).unwrap();
        assert_eq!(pool.get(r), Some(particle(8)));
    }

    #[test]
    fn emplace_array_writes_header_and_elements() {
        let mut pool = pool();
        let values: Vec<Particle> = (0..4).map(particle).collect();
        let r = pool.emplace_array(&values).unwrap();
        assert_eq!(pool.array_len(r), Some(4));
        assert_eq!(pool.get_array(r), Some(values));
        assert_eq!(
            Pool::<Particle>::array_elements(r).map(Region::addr),
            Some(r.addr() + WORD_SIZE)
        );
    }

    #[test]
    fn empty_array_has_header_only() {
        let mut pool = pool();
        let r = pool.emplace_array(&[]).unwrap();
        assert_eq!(pool.array_len(r), Some(0));
        assert_eq!(pool.get_array(r), Some(Vec::new()));
        pool.free_array(r).unwrap();
        assert_eq!(pool.free_list_len(SizeClass::SCALAR), 1);
    }

    #[test]
    fn freed_array_lands_in_its_element_count_class() {
        let mut pool = pool();
        let values: Vec<Particle> = (0..3).map(particle).collect();
        let r = pool.emplace_array(&values).unwrap();
        pool.free_array(r).unwrap();
        assert_eq!(pool.free_list_len(SizeClass(3)), 1);

        let again = pool.emplace_array(&values).unwrap();
        assert_eq!(again, r);
        assert_eq!(pool.get_array(again), Some(values));
    }

    #[test]
    fn oversized_array_is_rejected() {
        let mut pool = pool();
        let values: Vec<Particle> = (0..40).map(particle).collect();
        assert!(matches!(
            pool.emplace_array(&values),
            Err(PoolError::RequestTooLarge { .. })
        ));
    }

    #[test]
    fn get_outside_pool_is_none() {
        let pool = pool();
        let foreign = Region::new(1 << 40).unwrap();
        assert_eq!(pool.get(foreign), None);
        assert_eq!(pool.get_array(foreign), None);
    }
}
