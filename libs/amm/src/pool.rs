//! Pool record
//!
//! Reserves are stored in canonical order (lower asset address first). The
//! record never interprets caller order; the engine translates at the edge.

use crate::pair_key::PairKey;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use torq_config::amm::MINIMUM_LIQUIDITY;
use torq_types::{AssetId, HolderId};

/// Lifecycle state of a pool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PoolStatus {
    /// Created by the registry, no deposit committed yet
    Uninitialized,
    /// First deposit committed; never leaves this state
    Active,
}

/// Complete state of a single pool
#[derive(Debug, Clone)]
pub struct Pool {
    pub key: PairKey,
    pub asset_low: AssetId,
    pub asset_high: AssetId,
    pub reserve_low: u128,
    pub reserve_high: u128,
    pub total_shares: u128,
    share_balances: HashMap<HolderId, u128>,
    pub initialized: bool,
}

impl Pool {
    /// Create an uninitialized pool with zero reserves and supply
    pub fn new(key: PairKey, asset_low: AssetId, asset_high: AssetId) -> Self {
        Self {
            key,
            asset_low,
            asset_high,
            reserve_low: 0,
            reserve_high: 0,
            total_shares: 0,
            share_balances: HashMap::new(),
            initialized: false,
        }
    }

    pub fn status(&self) -> PoolStatus {
        if self.initialized {
            PoolStatus::Active
        } else {
            PoolStatus::Uninitialized
        }
    }

    /// Shares owned by `holder`, zero when absent
    pub fn share_balance(&self, holder: &HolderId) -> u128 {
        self.share_balances.get(holder).copied().unwrap_or(0)
    }

    /// Number of holders with a non-zero balance
    pub fn holder_count(&self) -> usize {
        self.share_balances.len()
    }

    /// Sum of all holder balances (excludes the locked minimum)
    pub fn held_shares(&self) -> u128 {
        self.share_balances.values().sum()
    }

    /// Shares locked on creation and owned by nobody
    pub fn locked_shares(&self) -> u128 {
        if self.initialized {
            MINIMUM_LIQUIDITY
        } else {
            0
        }
    }

    pub(crate) fn credit_shares(&mut self, holder: HolderId, shares: u128) {
        if shares == 0 {
            return;
        }
        *self.share_balances.entry(holder).or_insert(0) += shares;
    }

    /// Caller must have checked the balance covers `shares`
    pub(crate) fn debit_shares(&mut self, holder: &HolderId, shares: u128) {
        if let Some(balance) = self.share_balances.get_mut(holder) {
            *balance -= shares;
            if *balance == 0 {
                self.share_balances.remove(holder);
            }
        }
    }

    /// Serializable view of the pool
    pub fn snapshot(&self) -> PoolSnapshot {
        PoolSnapshot {
            key: self.key,
            asset_low: self.asset_low,
            asset_high: self.asset_high,
            reserve_low: self.reserve_low,
            reserve_high: self.reserve_high,
            total_shares: self.total_shares,
            locked_shares: self.locked_shares(),
            holders: self.holder_count(),
            status: self.status(),
        }
    }
}

/// Point-in-time copy of a pool's public state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolSnapshot {
    pub key: PairKey,
    pub asset_low: AssetId,
    pub asset_high: AssetId,
    pub reserve_low: u128,
    pub reserve_high: u128,
    pub total_shares: u128,
    pub locked_shares: u128,
    pub holders: usize,
    pub status: PoolStatus,
}
