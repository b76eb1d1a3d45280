//! Token quantities
//!
//! Amounts are plain 256-bit unsigned integers. Reserves are further bounded to
//! 112 bits by the pair engine; the extra headroom keeps every intermediate
//! product of the constant-product formulas exact.

use crate::ValidationError;

pub use ethereum_types::U256;

/// Unsigned token quantity
pub type Amount = U256;

/// Parse a base-10 amount, rejecting signs, decimals and values above 2^256 - 1
pub fn parse_amount(input: &str) -> Result<Amount, ValidationError> {
    let trimmed = input.trim().replace('_', "");
    if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ValidationError::InvalidAmount {
            input: input.to_string(),
        });
    }
    Amount::from_dec_str(&trimmed).map_err(|_| ValidationError::InvalidAmount {
        input: input.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("1000").unwrap(), Amount::from(1000u64));
        assert_eq!(parse_amount("1_000_000").unwrap(), Amount::from(1_000_000u64));
        assert_eq!(parse_amount(" 42 ").unwrap(), Amount::from(42u64));
    }

    #[test]
    fn test_parse_amount_rejects_garbage() {
        for input in ["", "-1", "1.5", "0x10", "abc"] {
            assert!(
                matches!(parse_amount(input), Err(ValidationError::InvalidAmount { .. })),
                "accepted {input:?}"
            );
        }
    }

    #[test]
    fn test_parse_amount_overflow() {
        let too_big = format!("{}0", Amount::MAX);
        assert!(parse_amount(&too_big).is_err());
        assert_eq!(parse_amount(&Amount::MAX.to_string()).unwrap(), Amount::MAX);
    }
}
