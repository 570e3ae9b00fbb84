//! Widened intermediates for pool arithmetic
//!
//! Amounts and reserves are `u128`, but a product of two of them is not.
//! Products are formed in 256 or 512 bits and only the final quotient is
//! narrowed, so [`AmmError::Overflow`] means the result itself exceeds `u128`.

use crate::error::{AmmError, AmmResult};
pub use primitive_types::{U256, U512};

/// Exact product of two `u128` values
pub fn full_product(a: u128, b: u128) -> U256 {
    // (2^128 - 1)^2 < 2^256
    U256::from(a).overflowing_mul(U256::from(b)).0
}

/// Checked conversion back to `u128`
pub fn narrow(value: U256) -> AmmResult<u128> {
    if value > U256::from(u128::MAX) {
        return Err(AmmError::Overflow);
    }
    Ok(value.low_u128())
}

fn narrow_wide(value: U512) -> AmmResult<u128> {
    if value > U512::from(U256::from(u128::MAX)) {
        return Err(AmmError::Overflow);
    }
    Ok(value.low_u128())
}

/// `floor(a * b / denominator)` with a 256-bit product
pub fn mul_div(a: u128, b: u128, denominator: u128) -> AmmResult<u128> {
    if denominator == 0 {
        return Err(AmmError::InsufficientLiquidity);
    }
    narrow(full_product(a, b) / U256::from(denominator))
}

/// `floor(a * b / denominator)` for 256-bit operands with a 512-bit product
pub fn mul_div_wide(a: U256, b: U256, denominator: U256) -> AmmResult<u128> {
    if denominator.is_zero() {
        return Err(AmmError::InsufficientLiquidity);
    }
    narrow_wide(a.full_mul(b) / U512::from(denominator))
}
