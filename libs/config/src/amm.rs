//! Constant-product pool constants
//!
//! These are protocol constants, not tunables. Fee tiers are fixed and the
//! locked minimum liquidity is part of the first-deposit math, so neither is
//! exposed through [`crate::EngineConfig`].

/// Liquidity units permanently locked on pool creation (owned by no holder)
pub const MINIMUM_LIQUIDITY: u128 = 1_000;

/// Fee numerator applied to swap input (997/1000 = 0.3% fee)
pub const FEE_NUMERATOR: u128 = 997;

/// Fee denominator
pub const FEE_DENOMINATOR: u128 = 1_000;

/// Fixed-point scale for quoted prices (18 decimals)
pub const PRICE_SCALE: u128 = 1_000_000_000_000_000_000;

/// Number of assets in a swap path (single pool only)
pub const SWAP_PATH_LEN: usize = 2;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fee_is_thirty_bps() {
        assert_eq!((FEE_DENOMINATOR - FEE_NUMERATOR) * 10_000 / FEE_DENOMINATOR, 30);
    }

    #[test]
    fn test_price_scale_is_eighteen_decimals() {
        assert_eq!(PRICE_SCALE, 10u128.pow(18));
    }
}
