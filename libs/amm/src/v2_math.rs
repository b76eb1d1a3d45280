//! Constant-product AMM math with exact integer calculations
//!
//! All amounts are unsigned 256-bit integers and every division floors, so the
//! results are reproducible bit for bit by any other implementation of the same
//! formulas. The 0.3% pair fee is encoded as the 997/1000 multiplier.

use crate::error::{add, mul, AmmError, AmmResult};
use types::{Amount, U256};

/// Liquidity permanently locked in the burn sink by the first mint
pub const MINIMUM_LIQUIDITY: u64 = 1_000;

/// 2^112, the scale of the UQ112x112 price format
pub const Q112: Amount = U256([0, 1 << 48, 0, 0]);

/// 2^112 - 1, the largest reserve a pair may record
pub const MAX_UINT112: Amount = U256([u64::MAX, (1 << 48) - 1, 0, 0]);

/// Denominator for router platform and referral fees
pub const BASIS_POINTS: u64 = 10_000;

const FEE_NUMERATOR: u64 = 997;
const FEE_DENOMINATOR: u64 = 1_000;

/// Constant-product math functions
pub struct V2Math;

impl V2Math {
    /// Floor of the integer square root (Babylonian method)
    ///
    /// For `y > 3` starts at `x = y / 2 + 1` and iterates `x = (y / x + x) / 2`
    /// while the estimate keeps shrinking. `1..=3` map to 1 and 0 maps to 0.
    pub fn sqrt(y: Amount) -> Amount {
        if y > Amount::from(3u64) {
            let mut z = y;
            let mut x = y / 2u64 + 1u64;
            while x < z {
                z = x;
                x = (y / x + x) / 2u64;
            }
            z
        } else if !y.is_zero() {
            Amount::one()
        } else {
            Amount::zero()
        }
    }

    /// Equivalent amount of the other asset at the current reserve ratio
    pub fn quote(amount_a: Amount, reserve_a: Amount, reserve_b: Amount) -> AmmResult<Amount> {
        if amount_a.is_zero() {
            return Err(AmmError::InsufficientAmount);
        }
        if reserve_a.is_zero() || reserve_b.is_zero() {
            return Err(AmmError::InsufficientLiquidity);
        }
        Ok(mul(amount_a, reserve_b)? / reserve_a)
    }

    /// Maximum output for an exact input, after the 0.3% pair fee
    ///
    /// `amount_in * 997 * reserve_out / (reserve_in * 1000 + amount_in * 997)`
    pub fn get_amount_out(
        amount_in: Amount,
        reserve_in: Amount,
        reserve_out: Amount,
    ) -> AmmResult<Amount> {
        if amount_in.is_zero() {
            return Err(AmmError::InsufficientInputAmount);
        }
        if reserve_in.is_zero() || reserve_out.is_zero() {
            return Err(AmmError::InsufficientLiquidity);
        }
        let amount_in_with_fee = mul(amount_in, FEE_NUMERATOR.into())?;
        let numerator = mul(amount_in_with_fee, reserve_out)?;
        let denominator = add(mul(reserve_in, FEE_DENOMINATOR.into())?, amount_in_with_fee)?;
        Ok(numerator / denominator)
    }

    /// Minimum input for an exact output, rounded up by one unit
    ///
    /// `reserve_in * amount_out * 1000 / ((reserve_out - amount_out) * 997) + 1`
    pub fn get_amount_in(
        amount_out: Amount,
        reserve_in: Amount,
        reserve_out: Amount,
    ) -> AmmResult<Amount> {
        if amount_out.is_zero() {
            return Err(AmmError::InsufficientOutputAmount);
        }
        if reserve_in.is_zero() || reserve_out.is_zero() || amount_out >= reserve_out {
            return Err(AmmError::InsufficientLiquidity);
        }
        let numerator = mul(mul(reserve_in, amount_out)?, FEE_DENOMINATOR.into())?;
        let denominator = mul(reserve_out - amount_out, FEE_NUMERATOR.into())?;
        add(numerator / denominator, Amount::one())
    }

    /// Encode a 112-bit value as UQ112x112
    pub fn encode_uq112(y: Amount) -> Amount {
        // y < 2^112 for every recorded reserve, so the shift cannot overflow
        y << 112usize
    }

    /// Divide a UQ112x112 by a plain integer; `divisor` must be non-zero
    pub fn uqdiv(x: Amount, divisor: Amount) -> Amount {
        x / divisor
    }

    /// Platform fee on `amount` at `fee_bps` basis points
    pub fn bps_of(amount: Amount, fee_bps: u32) -> AmmResult<Amount> {
        Ok(mul(amount, fee_bps.into())? / Amount::from(BASIS_POINTS))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn amt(value: u64) -> Amount {
        Amount::from(value)
    }

    #[test]
    fn test_constants() {
        assert_eq!(Q112, Amount::one() << 112usize);
        assert_eq!(MAX_UINT112, (Amount::one() << 112usize) - Amount::one());
    }

    #[test]
    fn test_sqrt_small_values() {
        assert_eq!(V2Math::sqrt(amt(0)), amt(0));
        assert_eq!(V2Math::sqrt(amt(1)), amt(1));
        assert_eq!(V2Math::sqrt(amt(3)), amt(1));
        assert_eq!(V2Math::sqrt(amt(4)), amt(2));
        assert_eq!(V2Math::sqrt(amt(8)), amt(2));
        assert_eq!(V2Math::sqrt(amt(9)), amt(3));
    }

    #[test]
    fn test_sqrt_floors() {
        assert_eq!(V2Math::sqrt(amt(4_000_000)), amt(2_000));
        assert_eq!(V2Math::sqrt(amt(4_000_001)), amt(2_000));
        assert_eq!(V2Math::sqrt(amt(3_999_999)), amt(1_999));
        let big = MAX_UINT112 * MAX_UINT112;
        assert_eq!(V2Math::sqrt(big), MAX_UINT112);
    }

    #[test]
    fn test_amount_out() {
        assert_eq!(
            V2Math::get_amount_out(amt(100), amt(1_000), amt(1_000)).unwrap(),
            amt(90)
        );
        // 100 in, 1000:2000 reserves: 199_400_000 / 1_099_700
        assert_eq!(
            V2Math::get_amount_out(amt(100), amt(1_000), amt(2_000)).unwrap(),
            amt(181)
        );
    }

    #[test]
    fn test_amount_in_rounds_up() {
        // 1000 * 90 * 1000 / (910 * 997) = 99.19.. -> 99 + 1
        assert_eq!(
            V2Math::get_amount_in(amt(90), amt(1_000), amt(1_000)).unwrap(),
            amt(100)
        );
    }

    #[test]
    fn test_amount_in_requires_output_below_reserve() {
        assert_eq!(
            V2Math::get_amount_in(amt(1_000), amt(1_000), amt(1_000)),
            Err(AmmError::InsufficientLiquidity)
        );
    }

    #[test]
    fn test_zero_inputs_are_rejected() {
        assert_eq!(
            V2Math::get_amount_out(amt(0), amt(1), amt(1)),
            Err(AmmError::InsufficientInputAmount)
        );
        assert_eq!(
            V2Math::get_amount_out(amt(1), amt(0), amt(1)),
            Err(AmmError::InsufficientLiquidity)
        );
        assert_eq!(
            V2Math::get_amount_in(amt(0), amt(1), amt(1)),
            Err(AmmError::InsufficientOutputAmount)
        );
        assert_eq!(
            V2Math::quote(amt(0), amt(1), amt(1)),
            Err(AmmError::InsufficientAmount)
        );
        assert_eq!(
            V2Math::quote(amt(1), amt(0), amt(1)),
            Err(AmmError::InsufficientLiquidity)
        );
    }

    #[test]
    fn test_quote() {
        assert_eq!(V2Math::quote(amt(10), amt(100), amt(250)).unwrap(), amt(25));
        assert_eq!(V2Math::quote(amt(3), amt(2), amt(1)).unwrap(), amt(1));
    }

    #[test]
    fn test_overflow_is_an_error() {
        assert_eq!(
            V2Math::get_amount_out(Amount::MAX, amt(1), amt(1)),
            Err(AmmError::Overflow)
        );
    }

    #[test]
    fn test_uq112_price() {
        // price of 2 expressed as UQ112x112
        let price = V2Math::uqdiv(V2Math::encode_uq112(amt(2_000)), amt(1_000));
        assert_eq!(price, Q112 * 2u64);
    }

    #[test]
    fn test_bps_of() {
        assert_eq!(V2Math::bps_of(amt(10_000), 100).unwrap(), amt(100));
        assert_eq!(V2Math::bps_of(amt(199), 50).unwrap(), amt(0));
    }
}
