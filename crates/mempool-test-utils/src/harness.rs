//! The pool exercise harness.
//!
//! [`MemTest`] owns a `Pool<MemTestObj>` and the list of instances it has
//! handed out, and exposes the operations an interactive memory test
//! needs: reset, create objects or arrays, delete by position or at
//! random, and report. Positions index the live list in creation order;
//! deleting an entry shifts every later entry down by one.

use std::error::Error;
use std::fmt;

use indexmap::IndexMap;
use mempool_arena::{Pool, PoolConfig, PoolError, PoolReport};
use mempool_core::Region;
use rand::seq::index;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::debug;

use crate::fixtures::MemTestObj;

/// Which live list an operation targets.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LiveKind {
    Objects,
    Arrays,
}

impl fmt::Display for LiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Objects => write!(f, "object"),
            Self::Arrays => write!(f, "array"),
        }
    }
}

/// Errors from harness operations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HarnessError {
    /// The pool rejected the operation.
    Pool(PoolError),
    /// A position past the end of a live list.
    IndexOutOfRange {
        kind: LiveKind,
        index: usize,
        len: usize,
    },
    /// A random deletion was requested from an empty list.
    EmptyList { kind: LiveKind },
    /// A count that must be positive was zero.
    InvalidCount { count: usize },
}

impl fmt::Display for HarnessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pool(e) => write!(f, "{e}"),
            Self::IndexOutOfRange { kind, index, len } => {
                write!(f, "size of {kind} list ({len}) is <= {index}")
            }
            Self::EmptyList { kind } => write!(f, "size of {kind} list is 0"),
            Self::InvalidCount { count } => write!(f, "illegal count ({count})"),
        }
    }
}

impl Error for HarnessError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Pool(e) => Some(e),
            _ => None,
        }
    }
}

impl From<PoolError> for HarnessError {
    fn from(e: PoolError) -> Self {
        Self::Pool(e)
    }
}

/// Drives a `Pool<MemTestObj>` the way an interactive memory test would.
pub struct MemTest {
    pool: Pool<MemTestObj>,
    objs: IndexMap<u64, Region>,
    arrs: IndexMap<u64, Region>,
    rng: ChaCha8Rng,
    next_id: u64,
}

impl MemTest {
    /// Seed used by [`new`](Self::new).
    pub const DEFAULT_SEED: u64 = 0x6d65_6d74;

    pub fn new(config: PoolConfig) -> Result<Self, HarnessError> {
        Self::with_seed(config, Self::DEFAULT_SEED)
    }

    /// Create a harness whose random deletions are driven by `seed`.
    pub fn with_seed(config: PoolConfig, seed: u64) -> Result<Self, HarnessError> {
        Ok(Self {
            pool: Pool::new(config)?,
            objs: IndexMap::new(),
            arrs: IndexMap::new(),
            rng: ChaCha8Rng::seed_from_u64(seed),
            next_id: 0,
        })
    }

    /// Reconfigure the pool and forget every live instance.
    ///
    /// On error nothing changes, including the live lists.
    pub fn reset(&mut self, block_size: Option<usize>) -> Result<(), HarnessError> {
        self.pool.reconfigure(block_size)?;
        self.objs.clear();
        self.arrs.clear();
        Ok(())
    }

    /// Create `n` scalar objects. Returns their ids.
    ///
    /// Stops at the first allocation failure; objects created before it
    /// stay live.
    pub fn new_objs(&mut self, n: usize) -> Result<Vec<u64>, HarnessError> {
        if n == 0 {
            return Err(HarnessError::InvalidCount { count: n });
        }
        let mut ids = Vec::with_capacity(n);
        for _ in 0..n {
            let id = self.take_id();
            let region = self.pool.emplace(MemTestObj::new(id))?;
            self.objs.insert(id, region);
            ids.push(id);
        }
        debug!(created = n, live = self.objs.len(), "new objects");
        Ok(ids)
    }

    /// Create `count` arrays of `array_len` objects each. Returns their ids.
    ///
    /// Stops at the first allocation failure; arrays created before it
    /// stay live.
    pub fn new_arrs(&mut self, count: usize, array_len: usize) -> Result<Vec<u64>, HarnessError> {
        if count == 0 || array_len == 0 {
            return Err(HarnessError::InvalidCount {
                count: count.min(array_len),
            });
        }
        let mut ids = Vec::with_capacity(count);
        for _ in 0..count {
            let id = self.take_id();
            let elements = vec![MemTestObj::new(id); array_len];
            let region = self.pool.emplace_array(&elements)?;
            self.arrs.insert(id, region);
            ids.push(id);
        }
        debug!(created = count, array_len, live = self.arrs.len(), "new arrays");
        Ok(ids)
    }

    /// Release the object at `index` in the live list. Returns its id.
    pub fn delete_obj(&mut self, index: usize) -> Result<u64, HarnessError> {
        self.delete_at(LiveKind::Objects, index)
    }

    /// Release the array at `index` in the live list. Returns its id.
    pub fn delete_arr(&mut self, index: usize) -> Result<u64, HarnessError> {
        self.delete_at(LiveKind::Arrays, index)
    }

    /// Release `k` distinct objects chosen uniformly at random.
    ///
    /// `k` is clamped to the number of live objects. Returns the ids
    /// released.
    pub fn delete_random_objs(&mut self, k: usize) -> Result<Vec<u64>, HarnessError> {
        self.delete_random(LiveKind::Objects, k)
    }

    /// Release `k` distinct arrays chosen uniformly at random.
    pub fn delete_random_arrs(&mut self, k: usize) -> Result<Vec<u64>, HarnessError> {
        self.delete_random(LiveKind::Arrays, k)
    }

    pub fn report(&self) -> PoolReport {
        self.pool.describe()
    }

    pub fn live_objs(&self) -> usize {
        self.objs.len()
    }

    pub fn live_arrs(&self) -> usize {
        self.arrs.len()
    }

    /// Region of the object with `id`, if it is live.
    pub fn obj_region(&self, id: u64) -> Option<Region> {
        self.objs.get(&id).copied()
    }

    /// Region of the array with `id`, if it is live.
    pub fn arr_region(&self, id: u64) -> Option<Region> {
        self.arrs.get(&id).copied()
    }

    /// Whether every live object and array element still holds the value
    /// it was created with.
    pub fn all_intact(&self) -> bool {
        let objs_ok = self.objs.iter().all(|(&id, &region)| {
            self.pool
                .get(region)
                .is_some_and(|obj| obj.id == id && obj.is_intact())
        });
        let arrs_ok = self.arrs.iter().all(|(&id, &region)| {
            self.pool.get_array(region).is_some_and(|elements| {
                elements.iter().all(|obj| obj.id == id && obj.is_intact())
            })
        });
        objs_ok && arrs_ok
    }

    pub fn pool(&self) -> &Pool<MemTestObj> {
        &self.pool
    }

    fn take_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn live(&self, kind: LiveKind) -> &IndexMap<u64, Region> {
        match kind {
            LiveKind::Objects => &self.objs,
            LiveKind::Arrays => &self.arrs,
        }
    }

    fn delete_at(&mut self, kind: LiveKind, index: usize) -> Result<u64, HarnessError> {
        let len = self.live(kind).len();
        let (&id, _) = self
            .live(kind)
            .get_index(index)
            .ok_or(HarnessError::IndexOutOfRange { kind, index, len })?;
        self.release(kind, id)?;
        Ok(id)
    }

    fn delete_random(&mut self, kind: LiveKind, k: usize) -> Result<Vec<u64>, HarnessError> {
        if k == 0 {
            return Err(HarnessError::InvalidCount { count: k });
        }
        let len = self.live(kind).len();
        if len == 0 {
            return Err(HarnessError::EmptyList { kind });
        }
        let picks = index::sample(&mut self.rng, len, k.min(len));
        let ids: Vec<u64> = picks
            .into_iter()
            .filter_map(|i| self.live(kind).get_index(i).map(|(&id, _)| id))
            .collect();
        for &id in &ids {
            self.release(kind, id)?;
        }
        debug!(%kind, released = ids.len(), live = self.live(kind).len(), "random delete");
        Ok(ids)
    }

    // The live entry is only dropped once the pool accepted the release.
    fn release(&mut self, kind: LiveKind, id: u64) -> Result<(), HarnessError> {
        let live = match kind {
            LiveKind::Objects => &mut self.objs,
            LiveKind::Arrays => &mut self.arrs,
        };
        let Some(&region) = live.get(&id) else {
            return Ok(());
        };
        match kind {
            LiveKind::Objects => self.pool.free(region)?,
            LiveKind::Arrays => self.pool.free_array(region)?,
        }
        live.shift_remove(&id);
        Ok(())
    }
}
