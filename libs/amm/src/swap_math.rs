//! Constant-product swap math with exact integer calculations
//!
//! All results round toward the pool: outputs are floored, required inputs
//! are rounded up. Intermediates are widened past `u128`, so
//! [`AmmError::Overflow`] is only returned for results that do not fit.

use crate::error::{AmmError, AmmResult, Side};
use crate::pool::Pool;
use crate::wide::{full_product, mul_div, mul_div_wide, narrow, U256};
use torq_config::amm::{FEE_DENOMINATOR, FEE_NUMERATOR, PRICE_SCALE};
use torq_types::AssetId;
use tracing::debug;

/// Output amount for an exact input using x*y=k with the 0.3% fee
///
/// ```text
/// amount_in_with_fee = amount_in * 997
/// amount_out = amount_in_with_fee * reserve_out / (reserve_in * 1000 + amount_in_with_fee)
/// ```
pub fn get_amount_out(amount_in: u128, reserve_in: u128, reserve_out: u128) -> AmmResult<u128> {
    if amount_in == 0 {
        return Err(AmmError::InsufficientInput);
    }
    if reserve_in == 0 || reserve_out == 0 {
        return Err(AmmError::InsufficientLiquidity);
    }

    let amount_in_with_fee = full_product(amount_in, FEE_NUMERATOR);
    let denominator = full_product(reserve_in, FEE_DENOMINATOR) + amount_in_with_fee;

    mul_div_wide(amount_in_with_fee, U256::from(reserve_out), denominator)
}

/// Input required to receive an exact output (reverse calculation)
///
/// Adds 1 after the floor division so the pool never under-collects.
pub fn get_amount_in(amount_out: u128, reserve_in: u128, reserve_out: u128) -> AmmResult<u128> {
    if amount_out == 0 {
        return Err(AmmError::InsufficientOutput {
            amount_out,
            min_out: 1,
        });
    }
    if reserve_in == 0 || reserve_out == 0 || amount_out >= reserve_out {
        return Err(AmmError::InsufficientLiquidity);
    }

    let denominator = full_product(reserve_out - amount_out, FEE_NUMERATOR);
    let amount_in = mul_div_wide(
        full_product(reserve_in, amount_out),
        U256::from(FEE_DENOMINATOR),
        denominator,
    )?;

    amount_in.checked_add(1).ok_or(AmmError::Overflow)
}

/// Amount of B equivalent to `amount_a` at the current reserve ratio (no fee)
pub fn quote(amount_a: u128, reserve_a: u128, reserve_b: u128) -> AmmResult<u128> {
    if amount_a == 0 {
        return Err(AmmError::InsufficientAmount(Side::A));
    }
    if reserve_a == 0 || reserve_b == 0 {
        return Err(AmmError::InsufficientLiquidity);
    }
    mul_div(amount_a, reserve_b, reserve_a)
}

/// Price of the base asset in units of the quote asset, scaled by 10^18
pub fn spot_price(reserve_base: u128, reserve_quote: u128) -> AmmResult<u128> {
    if reserve_base == 0 || reserve_quote == 0 {
        return Err(AmmError::InsufficientLiquidity);
    }
    narrow(full_product(reserve_quote, PRICE_SCALE) / U256::from(reserve_base))
}

/// Accepted exact-input swap against one pool
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapPlan {
    /// True when the input asset is the pool's lower asset
    pub low_in: bool,
    pub amount_in: u128,
    pub amount_out: u128,
}

/// Price an exact-input swap of `asset_in` and check the slippage bound
///
/// `asset_in` must be one of the pool's two assets.
pub fn plan_swap(
    pool: &Pool,
    asset_in: AssetId,
    amount_in: u128,
    min_out: u128,
) -> AmmResult<SwapPlan> {
    if !pool.initialized {
        return Err(AmmError::PoolNotFound);
    }
    let low_in = asset_in == pool.asset_low;
    let (reserve_in, reserve_out) = if low_in {
        (pool.reserve_low, pool.reserve_high)
    } else {
        (pool.reserve_high, pool.reserve_low)
    };

    let amount_out = get_amount_out(amount_in, reserve_in, reserve_out)?;
    if amount_out == 0 || amount_out < min_out {
        return Err(AmmError::InsufficientOutput { amount_out, min_out });
    }
    // Reject plans whose commit would overflow
    reserve_in.checked_add(amount_in).ok_or(AmmError::Overflow)?;

    debug!(
        pool = %pool.key,
        asset_in = %asset_in,
        amount_in,
        amount_out,
        reserve_in,
        reserve_out,
        "Swap planned"
    );
    Ok(SwapPlan {
        low_in,
        amount_in,
        amount_out,
    })
}

/// Apply an accepted swap to the reserves
pub(crate) fn apply_swap(pool: &mut Pool, plan: &SwapPlan) {
    if plan.low_in {
        pool.reserve_low += plan.amount_in;
        pool.reserve_high -= plan.amount_out;
    } else {
        pool.reserve_high += plan.amount_in;
        pool.reserve_low -= plan.amount_out;
    }
}
