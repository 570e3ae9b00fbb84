//! Pool Engine
//!
//! Public entry point of the AMM. Every mutating operation runs as one unit:
//!
//! 1. deadline admission against the [`Clock`]
//! 2. canonical pair resolution
//! 3. per-pool execution lock (a second entry while held is [`AmmError::Locked`])
//! 4. plan computed from a read snapshot
//! 5. asset transfers through the [`AssetLedger`], reversed on later failure
//! 6. commit under a brief write lock, then a [`PoolEvent`]
//!
//! Views only take the read lock, so they observe a pool either before or
//! after a commit and never in between.

use crate::clock::Clock;
use crate::error::{AmmError, AmmResult};
use crate::events::{EventReceiver, PoolEvent};
use crate::ledger::{AssetLedger, LedgerError};
use crate::liquidity_math::{apply_deposit, apply_withdrawal, plan_deposit, plan_withdrawal};
use crate::pair_key::{PairKey, ResolvedPair};
use crate::pool::PoolSnapshot;
use crate::registry::{PoolHandle, PoolRegistry};
use crate::swap_math::{self, apply_swap, plan_swap};
use crossbeam_channel::{Sender, TrySendError};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use torq_config::amm::SWAP_PATH_LEN;
use torq_config::EngineConfig;
use torq_types::{AssetId, HolderId};
use tracing::{debug, error, info, warn};

/// Deposit request, amounts in caller order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddLiquidity {
    pub asset_a: AssetId,
    pub asset_b: AssetId,
    pub desired_a: u128,
    pub desired_b: u128,
    #[serde(default)]
    pub min_a: u128,
    #[serde(default)]
    pub min_b: u128,
    pub recipient: HolderId,
    pub deadline: u64,
}

/// Withdrawal request, bounds in caller order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoveLiquidity {
    pub asset_a: AssetId,
    pub asset_b: AssetId,
    pub shares: u128,
    #[serde(default)]
    pub min_a: u128,
    #[serde(default)]
    pub min_b: u128,
    pub recipient: HolderId,
    pub deadline: u64,
}

/// Exact-input swap request; `path` is `[asset_in, asset_out]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Swap {
    pub amount_in: u128,
    #[serde(default)]
    pub min_out: u128,
    pub path: Vec<AssetId>,
    pub recipient: HolderId,
    pub deadline: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiquidityAdded {
    pub amount_a: u128,
    pub amount_b: u128,
    pub shares_minted: u128,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiquidityRemoved {
    pub amount_a: u128,
    pub amount_b: u128,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapExecuted {
    pub amount_in: u128,
    pub amount_out: u128,
}

/// Registry-wide counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineStats {
    /// Records created, including ones never seeded
    pub total_pools: usize,
    /// Records that have received a first deposit
    pub active_pools: usize,
}

/// Constant-product pool engine over a pluggable ledger and clock
pub struct PoolEngine<L: AssetLedger, C: Clock> {
    registry: PoolRegistry,
    ledger: L,
    clock: C,
    vault: HolderId,
    events: Mutex<Option<Sender<PoolEvent>>>,
}

impl<L: AssetLedger, C: Clock> PoolEngine<L, C> {
    /// Create an engine with an empty registry
    ///
    /// `vault` is the ledger account that custodies every pool's reserves.
    pub fn new(ledger: L, clock: C, vault: HolderId) -> Self {
        info!(vault = %vault, "Pool engine created");
        Self {
            registry: PoolRegistry::new(),
            ledger,
            clock,
            vault,
            events: Mutex::new(None),
        }
    }

    pub fn from_config(config: &EngineConfig, ledger: L, clock: C) -> Self {
        Self::new(ledger, clock, config.engine.vault)
    }

    pub fn vault(&self) -> HolderId {
        self.vault
    }

    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Route future events to a new bounded channel
    ///
    /// Replaces any previous subscriber. Delivery never blocks: events that
    /// do not fit are dropped with a warning.
    pub fn subscribe(&self, capacity: usize) -> EventReceiver {
        let (sender, receiver) = crossbeam_channel::bounded(capacity);
        *self.events.lock() = Some(sender);
        receiver
    }

    /// Deposit both assets and mint shares to `request.recipient`
    pub fn add_liquidity(
        &self,
        caller: HolderId,
        request: &AddLiquidity,
    ) -> AmmResult<LiquidityAdded> {
        self.check_deadline(request.deadline)?;
        let pair = ResolvedPair::new(request.asset_a, request.asset_b)?;
        let slot = self.registry.get_or_create(pair.key, pair.low, pair.high);
        let lock = slot.try_lock().ok_or(AmmError::Locked)?;

        let (desired_low, desired_high) = pair.to_canonical(request.desired_a, request.desired_b);
        let (min_low, min_high) = pair.to_canonical(request.min_a, request.min_b);
        let plan = plan_deposit(&lock.read(), desired_low, desired_high, min_low, min_high)
            .map_err(|err| in_caller_order(err, &pair))?;

        self.ledger
            .transfer_from(pair.low, caller, self.vault, plan.amount_low)?;
        if let Err(err) = self
            .ledger
            .transfer_from(pair.high, caller, self.vault, plan.amount_high)
        {
            self.compensate(pair.low, caller, plan.amount_low);
            return Err(err.into());
        }

        apply_deposit(&mut lock.write(), request.recipient, &plan);
        drop(lock);

        let (amount_a, amount_b) = pair.to_caller(plan.amount_low, plan.amount_high);
        info!(
            pool = %pair.key,
            recipient = %request.recipient,
            amount_a,
            amount_b,
            shares = plan.shares,
            locked = plan.locked,
            "Liquidity added"
        );
        self.emit(PoolEvent::LiquidityAdded {
            pair: pair.key,
            asset_a: request.asset_a,
            asset_b: request.asset_b,
            amount_a,
            amount_b,
            shares: plan.shares,
            recipient: request.recipient,
        });

        Ok(LiquidityAdded {
            amount_a,
            amount_b,
            shares_minted: plan.shares,
        })
    }

    /// Burn the caller's shares and pay the pro-rata reserves to `request.recipient`
    pub fn remove_liquidity(
        &self,
        caller: HolderId,
        request: &RemoveLiquidity,
    ) -> AmmResult<LiquidityRemoved> {
        self.check_deadline(request.deadline)?;
        let pair = ResolvedPair::new(request.asset_a, request.asset_b)?;
        let slot = self.pool(&pair.key)?;
        let lock = slot.try_lock().ok_or(AmmError::Locked)?;

        let (min_low, min_high) = pair.to_canonical(request.min_a, request.min_b);
        let plan = plan_withdrawal(&lock.read(), &caller, request.shares, min_low, min_high)
            .map_err(|err| in_caller_order(err, &pair))?;

        self.ledger
            .transfer(pair.low, request.recipient, plan.amount_low)?;
        if let Err(err) = self
            .ledger
            .transfer(pair.high, request.recipient, plan.amount_high)
        {
            self.reclaim(pair.low, request.recipient, plan.amount_low);
            return Err(err.into());
        }

        apply_withdrawal(&mut lock.write(), &caller, &plan);
        drop(lock);

        let (amount_a, amount_b) = pair.to_caller(plan.amount_low, plan.amount_high);
        info!(
            pool = %pair.key,
            holder = %caller,
            recipient = %request.recipient,
            shares = plan.shares,
            amount_a,
            amount_b,
            "Liquidity removed"
        );
        self.emit(PoolEvent::LiquidityRemoved {
            pair: pair.key,
            asset_a: request.asset_a,
            asset_b: request.asset_b,
            amount_a,
            amount_b,
            shares: plan.shares,
            recipient: request.recipient,
        });

        Ok(LiquidityRemoved { amount_a, amount_b })
    }

    /// Swap an exact input along a single-pool path
    pub fn swap_exact_for_exact(
        &self,
        caller: HolderId,
        request: &Swap,
    ) -> AmmResult<SwapExecuted> {
        self.check_deadline(request.deadline)?;
        if request.path.len() != SWAP_PATH_LEN {
            return Err(AmmError::InvalidPath {
                len: request.path.len(),
            });
        }
        let (asset_in, asset_out) = (request.path[0], request.path[1]);
        let pair = ResolvedPair::new(asset_in, asset_out)?;
        let slot = self.pool(&pair.key)?;
        let lock = slot.try_lock().ok_or(AmmError::Locked)?;

        let plan = plan_swap(&lock.read(), asset_in, request.amount_in, request.min_out)?;

        self.ledger
            .transfer_from(asset_in, caller, self.vault, plan.amount_in)?;
        if let Err(err) = self
            .ledger
            .transfer(asset_out, request.recipient, plan.amount_out)
        {
            self.compensate(asset_in, caller, plan.amount_in);
            return Err(err.into());
        }

        apply_swap(&mut lock.write(), &plan);
        drop(lock);

        info!(
            pool = %pair.key,
            asset_in = %asset_in,
            asset_out = %asset_out,
            amount_in = plan.amount_in,
            amount_out = plan.amount_out,
            recipient = %request.recipient,
            "Swap executed"
        );
        self.emit(PoolEvent::SwapExecuted {
            pair: pair.key,
            asset_in,
            asset_out,
            amount_in: plan.amount_in,
            amount_out: plan.amount_out,
            recipient: request.recipient,
        });

        Ok(SwapExecuted {
            amount_in: plan.amount_in,
            amount_out: plan.amount_out,
        })
    }

    /// Router-style name for [`Self::swap_exact_for_exact`]
    pub fn swap_exact_tokens_for_tokens(
        &self,
        caller: HolderId,
        request: &Swap,
    ) -> AmmResult<SwapExecuted> {
        self.swap_exact_for_exact(caller, request)
    }

    /// Price of `asset_a` in units of `asset_b`, scaled by 10^18
    pub fn get_price(&self, asset_a: AssetId, asset_b: AssetId) -> AmmResult<u128> {
        let (reserve_a, reserve_b) = self.get_reserves(asset_a, asset_b)?;
        swap_math::spot_price(reserve_a, reserve_b)
    }

    pub fn get_amount_out(
        &self,
        amount_in: u128,
        reserve_in: u128,
        reserve_out: u128,
    ) -> AmmResult<u128> {
        swap_math::get_amount_out(amount_in, reserve_in, reserve_out)
    }

    pub fn get_amount_in(
        &self,
        amount_out: u128,
        reserve_in: u128,
        reserve_out: u128,
    ) -> AmmResult<u128> {
        swap_math::get_amount_in(amount_out, reserve_in, reserve_out)
    }

    pub fn quote(&self, amount_a: u128, reserve_a: u128, reserve_b: u128) -> AmmResult<u128> {
        swap_math::quote(amount_a, reserve_a, reserve_b)
    }

    /// Reserves in the order the assets were passed
    pub fn get_reserves(&self, asset_a: AssetId, asset_b: AssetId) -> AmmResult<(u128, u128)> {
        let pair = ResolvedPair::new(asset_a, asset_b)?;
        let slot = self.pool(&pair.key)?;
        let pool = slot.read();
        Ok(pair.to_caller(pool.reserve_low, pool.reserve_high))
    }

    /// Shares held by `holder`, zero for pools that do not exist yet
    pub fn get_share_balance(
        &self,
        asset_a: AssetId,
        asset_b: AssetId,
        holder: HolderId,
    ) -> AmmResult<u128> {
        let pair = ResolvedPair::new(asset_a, asset_b)?;
        Ok(self
            .registry
            .get(&pair.key)
            .map(|slot| slot.read().share_balance(&holder))
            .unwrap_or(0))
    }

    /// Total share supply including the locked minimum, zero for absent pools
    pub fn get_total_shares(&self, asset_a: AssetId, asset_b: AssetId) -> AmmResult<u128> {
        let pair = ResolvedPair::new(asset_a, asset_b)?;
        Ok(self
            .registry
            .get(&pair.key)
            .map(|slot| slot.read().total_shares)
            .unwrap_or(0))
    }

    pub fn pool_snapshot(&self, asset_a: AssetId, asset_b: AssetId) -> AmmResult<PoolSnapshot> {
        let pair = ResolvedPair::new(asset_a, asset_b)?;
        let slot = self.pool(&pair.key)?;
        let snapshot = slot.read().snapshot();
        Ok(snapshot)
    }

    pub fn stats(&self) -> EngineStats {
        EngineStats {
            total_pools: self.registry.len(),
            active_pools: self.registry.active_count(),
        }
    }

    /// Existing, seeded pool for `key`
    fn pool(&self, key: &PairKey) -> AmmResult<PoolHandle> {
        self.registry
            .get(key)
            .filter(|slot| slot.read().initialized)
            .ok_or(AmmError::PoolNotFound)
    }

    fn check_deadline(&self, deadline: u64) -> AmmResult<()> {
        let now = self.clock.now();
        if deadline < now {
            debug!(deadline, now, "Rejected expired request");
            return Err(AmmError::Expired { deadline, now });
        }
        Ok(())
    }

    /// Return an amount already pulled into the vault
    fn compensate(&self, asset: AssetId, owner: HolderId, amount: u128) {
        warn!(asset = %asset, owner = %owner, amount, "Reversing deposit after failed transfer");
        if let Err(err) = self.ledger.transfer(asset, owner, amount) {
            log_failed_reversal(asset, owner, amount, &err);
        }
    }

    /// Pull back an amount already paid out of the vault
    fn reclaim(&self, asset: AssetId, recipient: HolderId, amount: u128) {
        warn!(
            asset = %asset,
            recipient = %recipient,
            amount,
            "Reversing payout after failed transfer"
        );
        if let Err(err) = self
            .ledger
            .transfer_from(asset, recipient, self.vault, amount)
        {
            log_failed_reversal(asset, recipient, amount, &err);
        }
    }

    fn emit(&self, event: PoolEvent) {
        let mut events = self.events.lock();
        let Some(sender) = events.as_ref() else {
            return;
        };
        match sender.try_send(event) {
            Ok(()) => {}
            Err(TrySendError::Full(event)) => {
                warn!(
                    kind = event.kind(),
                    pool = %event.pair(),
                    "Event channel full, dropping event"
                );
            }
            Err(TrySendError::Disconnected(event)) => {
                warn!(
                    kind = event.kind(),
                    pool = %event.pair(),
                    "Event subscriber gone, detaching channel"
                );
                *events = None;
            }
        }
    }
}

fn log_failed_reversal(asset: AssetId, holder: HolderId, amount: u128, err: &LedgerError) {
    error!(
        asset = %asset,
        holder = %holder,
        amount,
        error = %err,
        "Ledger rejected reversal transfer"
    );
}

/// Re-label canonical sides for callers that passed the pair reversed
fn in_caller_order(err: AmmError, pair: &ResolvedPair) -> AmmError {
    match err {
        AmmError::InsufficientAmount(side) if pair.flipped => {
            AmmError::InsufficientAmount(side.opposite())
        }
        other => other,
    }
}
