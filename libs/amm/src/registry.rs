//! Pool Registry
//!
//! Keyed store of pool records with lazy creation and no deletion. Each
//! record lives in a [`PoolSlot`] that pairs the state with an execution lock
//! held by mutating operations for their whole duration.

use crate::pair_key::PairKey;
use crate::pool::Pool;
use dashmap::DashMap;
use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use torq_types::AssetId;
use tracing::info;

/// Shared handle to a pool record
pub type PoolHandle = Arc<PoolSlot>;

/// A pool record plus its execution lock
#[derive(Debug)]
pub struct PoolSlot {
    state: RwLock<Pool>,
    executing: AtomicBool,
}

impl PoolSlot {
    fn new(pool: Pool) -> Self {
        Self {
            state: RwLock::new(pool),
            executing: AtomicBool::new(false),
        }
    }

    /// Acquire the execution lock, or `None` if an operation is in flight
    ///
    /// Never blocks. The lock is released when the guard drops.
    pub fn try_lock(&self) -> Option<PoolLock<'_>> {
        self.executing
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .ok()
            .map(|_| PoolLock { slot: self })
    }

    pub fn is_locked(&self) -> bool {
        self.executing.load(Ordering::Acquire)
    }

    /// Brief read access for views and planning
    pub fn read(&self) -> RwLockReadGuard<'_, Pool> {
        self.state.read()
    }
}

/// Scoped execution lock over one pool
///
/// Only the holder of this guard may write the pool.
#[derive(Debug)]
pub struct PoolLock<'a> {
    slot: &'a PoolSlot,
}

impl PoolLock<'_> {
    pub fn read(&self) -> RwLockReadGuard<'_, Pool> {
        self.slot.state.read()
    }

    pub fn write(&self) -> RwLockWriteGuard<'_, Pool> {
        self.slot.state.write()
    }
}

impl Drop for PoolLock<'_> {
    fn drop(&mut self) {
        self.slot.executing.store(false, Ordering::Release);
    }
}

/// Registry of all pools, indexed by canonical pair key
#[derive(Debug, Default)]
pub struct PoolRegistry {
    pools: DashMap<PairKey, PoolHandle>,
}

impl PoolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the pool for `key`, creating an uninitialized record if absent
    ///
    /// `low` and `high` must be the canonical-ordered assets behind `key`.
    pub fn get_or_create(&self, key: PairKey, low: AssetId, high: AssetId) -> PoolHandle {
        // Clone the Arc out so no shard lock outlives this call
        self.pools
            .entry(key)
            .or_insert_with(|| {
                info!(pool = %key, asset_low = %low, asset_high = %high, "Created pool record");
                Arc::new(PoolSlot::new(Pool::new(key, low, high)))
            })
            .value()
            .clone()
    }

    /// Get the pool for `key` if a record exists
    pub fn get(&self, key: &PairKey) -> Option<PoolHandle> {
        self.pools.get(key).map(|entry| entry.value().clone())
    }

    pub fn len(&self) -> usize {
        self.pools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pools.is_empty()
    }

    /// Keys of every record, initialized or not
    pub fn pairs(&self) -> Vec<PairKey> {
        self.pools.iter().map(|entry| *entry.key()).collect()
    }

    /// Number of records that have received a deposit
    pub fn active_count(&self) -> usize {
        self.pools
            .iter()
            .filter(|entry| entry.value().read().initialized)
            .count()
    }
}
