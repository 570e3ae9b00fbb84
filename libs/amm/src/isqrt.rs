//! Integer square root for geometric-mean liquidity seeding

use crate::wide::U256;

/// `floor(sqrt(y))` using Newton-Raphson iteration from `y / 2 + 1`
pub fn isqrt(y: u128) -> u128 {
    // the root of a u128 always fits in 64 bits
    isqrt_wide(U256::from(y)).low_u128()
}

/// [`isqrt`] over a 256-bit radicand, used for the product of two deposits
///
/// Iterates until the estimate stops decreasing. The first iterate is the
/// largest, so `y / x + x` cannot overflow anywhere in the `U256` range.
pub fn isqrt_wide(y: U256) -> U256 {
    let one = U256::one();
    let two = U256::from(2u8);
    if y > U256::from(3u8) {
        let mut z = y;
        let mut x = y / two + one;
        while x < z {
            z = x;
            x = (y / x + x) / two;
        }
        z
    } else if !y.is_zero() {
        one
    } else {
        U256::zero()
    }
}
