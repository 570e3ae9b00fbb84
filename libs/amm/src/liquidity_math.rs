//! Liquidity share minting and burning
//!
//! Works purely in canonical order: [`Side::A`] is the lower asset and
//! [`Side::B`] the higher one. The engine re-labels sides for callers that
//! passed the pair reversed.
//!
//! Plans are computed against a read-only pool and applied separately, so a
//! rejected plan can never leave a pool half-updated.

use crate::error::{AmmError, AmmResult, Side};
use crate::isqrt::isqrt_wide;
use crate::pool::Pool;
use crate::wide::{full_product, mul_div, narrow};
use torq_config::amm::MINIMUM_LIQUIDITY;
use torq_types::HolderId;
use tracing::debug;

/// Accepted deposit and the shares it mints
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DepositPlan {
    pub amount_low: u128,
    pub amount_high: u128,
    /// Shares credited to the recipient
    pub shares: u128,
    /// Shares added to supply but owned by nobody (first deposit only)
    pub locked: u128,
}

/// Amounts released by burning shares
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WithdrawalPlan {
    pub shares: u128,
    pub amount_low: u128,
    pub amount_high: u128,
}

/// Compute the accepted amounts and minted shares for a deposit
pub fn plan_deposit(
    pool: &Pool,
    desired_low: u128,
    desired_high: u128,
    min_low: u128,
    min_high: u128,
) -> AmmResult<DepositPlan> {
    let plan = if pool.initialized {
        plan_proportional_deposit(pool, desired_low, desired_high, min_low, min_high)?
    } else {
        plan_first_deposit(desired_low, desired_high)?
    };

    // Reject plans whose commit would overflow
    pool.reserve_low
        .checked_add(plan.amount_low)
        .ok_or(AmmError::Overflow)?;
    pool.reserve_high
        .checked_add(plan.amount_high)
        .ok_or(AmmError::Overflow)?;
    pool.total_shares
        .checked_add(plan.shares + plan.locked)
        .ok_or(AmmError::Overflow)?;

    debug!(
        pool = %pool.key,
        amount_low = plan.amount_low,
        amount_high = plan.amount_high,
        shares = plan.shares,
        locked = plan.locked,
        "Deposit planned"
    );
    Ok(plan)
}

/// Seed an empty pool: geometric mean minus the permanent lock
fn plan_first_deposit(amount_low: u128, amount_high: u128) -> AmmResult<DepositPlan> {
    if amount_low == 0 {
        return Err(AmmError::InsufficientAmount(Side::A));
    }
    if amount_high == 0 {
        return Err(AmmError::InsufficientAmount(Side::B));
    }

    let liquidity = narrow(isqrt_wide(full_product(amount_low, amount_high)))?;
    if liquidity <= MINIMUM_LIQUIDITY {
        return Err(AmmError::InsufficientLiquidityMinted);
    }

    Ok(DepositPlan {
        amount_low,
        amount_high,
        shares: liquidity - MINIMUM_LIQUIDITY,
        locked: MINIMUM_LIQUIDITY,
    })
}

/// Deposit at the current reserve ratio without exceeding either desired amount
fn plan_proportional_deposit(
    pool: &Pool,
    desired_low: u128,
    desired_high: u128,
    min_low: u128,
    min_high: u128,
) -> AmmResult<DepositPlan> {
    let (reserve_low, reserve_high) = (pool.reserve_low, pool.reserve_high);
    if reserve_low == 0 || reserve_high == 0 {
        return Err(AmmError::InsufficientLiquidity);
    }
    if desired_low == 0 {
        return Err(AmmError::InsufficientAmount(Side::A));
    }
    if desired_high == 0 {
        return Err(AmmError::InsufficientAmount(Side::B));
    }

    let optimal_high = mul_div(desired_low, reserve_high, reserve_low)?;
    let (amount_low, amount_high) = if optimal_high <= desired_high {
        if optimal_high < min_high {
            return Err(AmmError::InsufficientAmount(Side::B));
        }
        (desired_low, optimal_high)
    } else {
        let optimal_low = mul_div(desired_high, reserve_low, reserve_high)?;
        if optimal_low > desired_low || optimal_low < min_low {
            return Err(AmmError::InsufficientAmount(Side::A));
        }
        (optimal_low, desired_high)
    };

    let total = pool.total_shares;
    let shares_low = mul_div(amount_low, total, reserve_low)?;
    let shares_high = mul_div(amount_high, total, reserve_high)?;
    let shares = shares_low.min(shares_high);
    if shares == 0 {
        return Err(AmmError::InsufficientLiquidityMinted);
    }

    Ok(DepositPlan {
        amount_low,
        amount_high,
        shares,
        locked: 0,
    })
}

/// Compute the amounts released by burning `shares` held by `holder`
pub fn plan_withdrawal(
    pool: &Pool,
    holder: &HolderId,
    shares: u128,
    min_low: u128,
    min_high: u128,
) -> AmmResult<WithdrawalPlan> {
    if !pool.initialized || pool.total_shares == 0 {
        return Err(AmmError::PoolNotFound);
    }

    let available = pool.share_balance(holder);
    if available < shares {
        return Err(AmmError::InsufficientShares {
            requested: shares,
            available,
        });
    }

    let total = pool.total_shares;
    let amount_low = mul_div(shares, pool.reserve_low, total)?;
    let amount_high = mul_div(shares, pool.reserve_high, total)?;
    if amount_low == 0 || amount_high == 0 {
        return Err(AmmError::InsufficientLiquidityBurned);
    }
    if amount_low < min_low {
        return Err(AmmError::InsufficientAmount(Side::A));
    }
    if amount_high < min_high {
        return Err(AmmError::InsufficientAmount(Side::B));
    }

    debug!(
        pool = %pool.key,
        holder = %holder,
        shares,
        amount_low,
        amount_high,
        "Withdrawal planned"
    );
    Ok(WithdrawalPlan {
        shares,
        amount_low,
        amount_high,
    })
}

/// Apply an accepted deposit, crediting minted shares to `recipient`
pub(crate) fn apply_deposit(pool: &mut Pool, recipient: HolderId, plan: &DepositPlan) {
    pool.reserve_low += plan.amount_low;
    pool.reserve_high += plan.amount_high;
    pool.total_shares += plan.shares + plan.locked;
    pool.credit_shares(recipient, plan.shares);
    pool.initialized = true;
}

/// Apply an accepted withdrawal, debiting `holder`
pub(crate) fn apply_withdrawal(pool: &mut Pool, holder: &HolderId, plan: &WithdrawalPlan) {
    pool.debit_shares(holder, plan.shares);
    pool.total_shares -= plan.shares;
    pool.reserve_low -= plan.amount_low;
    pool.reserve_high -= plan.amount_high;
}
