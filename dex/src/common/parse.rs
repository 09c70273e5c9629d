//! Boundary parsing for values that arrive as strings: EVM addresses and
//! base-unit token amounts (decimal digits only, never floats).

use alloy::primitives::{Address, U256};
use std::str::FromStr;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("{field} is missing")]
    Missing { field: &'static str },

    #[error("{field} is not a valid 0x-prefixed 20-byte address")]
    InvalidAddress { field: &'static str },

    #[error("{field} must be a base-unit integer made of decimal digits")]
    InvalidAmount { field: &'static str },

    #[error("{field} does not fit in uint256")]
    AmountOverflow { field: &'static str },

    #[error("{field} must be > 0")]
    NonPositive { field: &'static str },
}

/// Accepts `0x` followed by exactly 40 hex digits, in any letter case.
pub fn parse_address(field: &'static str, raw: Option<&str>) -> Result<Address, ParseError> {
    let raw = raw.map(str::trim).filter(|s| !s.is_empty()).ok_or(ParseError::Missing { field })?;
    let hex_part = raw
        .strip_prefix("0x")
        .ok_or(ParseError::InvalidAddress { field })?;
    if hex_part.len() != 40 || !hex_part.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(ParseError::InvalidAddress { field });
    }
    Address::from_str(raw).map_err(|_| ParseError::InvalidAddress { field })
}

pub fn parse_base_units(field: &'static str, raw: Option<&str>) -> Result<U256, ParseError> {
    let raw = raw.map(str::trim).filter(|s| !s.is_empty()).ok_or(ParseError::Missing { field })?;
    if !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ParseError::InvalidAmount { field });
    }
    U256::from_str_radix(raw, 10).map_err(|_| ParseError::AmountOverflow { field })
}

/// Same as [`parse_base_units`] but zero is refused.
pub fn parse_positive_base_units(
    field: &'static str,
    raw: Option<&str>,
) -> Result<U256, ParseError> {
    let amount = parse_base_units(field, raw)?;
    if amount.is_zero() {
        return Err(ParseError::NonPositive { field });
    }
    Ok(amount)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_address_accepts_mixed_case() {
        let lower = parse_address("pool", Some("0xc02aaa39b223fe8d0a0e5c4f27ead9083c756cc2"));
        let mixed = parse_address("pool", Some("0xC02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2"));
        assert!(lower.is_ok());
        assert_eq!(lower, mixed);
    }

    #[test]
    fn test_parse_address_rejects_malformed() {
        assert_eq!(
            parse_address("pool", Some("c02aaa39b223fe8d0a0e5c4f27ead9083c756cc2")),
            Err(ParseError::InvalidAddress { field: "pool" })
        );
        assert_eq!(
            parse_address("pool", Some("0x1234")),
            Err(ParseError::InvalidAddress { field: "pool" })
        );
        assert_eq!(
            parse_address("pool", Some("0xZZ2aaa39b223fe8d0a0e5c4f27ead9083c756cc2")),
            Err(ParseError::InvalidAddress { field: "pool" })
        );
        assert_eq!(parse_address("pool", None), Err(ParseError::Missing { field: "pool" }));
        assert_eq!(parse_address("pool", Some("  ")), Err(ParseError::Missing { field: "pool" }));
    }

    #[test]
    fn test_parse_base_units() {
        assert_eq!(
            parse_base_units("amountIn", Some("1000000000000000000")).unwrap(),
            U256::from(1_000_000_000_000_000_000u128)
        );
        assert_eq!(parse_base_units("amountIn", Some("0")).unwrap(), U256::ZERO);
        assert_eq!(
            parse_base_units("amountIn", Some("1.5")),
            Err(ParseError::InvalidAmount { field: "amountIn" })
        );
        assert_eq!(
            parse_base_units("amountIn", Some("-1")),
            Err(ParseError::InvalidAmount { field: "amountIn" })
        );
        assert_eq!(
            parse_base_units("amountIn", Some("0x10")),
            Err(ParseError::InvalidAmount { field: "amountIn" })
        );
    }

    #[test]
    fn test_parse_base_units_overflow() {
        let too_big = format!("{}0", U256::MAX);
        assert_eq!(
            parse_base_units("amountIn", Some(&too_big)),
            Err(ParseError::AmountOverflow { field: "amountIn" })
        );
    }

    #[test]
    fn test_zero_amount_is_not_positive() {
        assert_eq!(
            parse_positive_base_units("amountIn", Some("0")),
            Err(ParseError::NonPositive { field: "amountIn" })
        );
        assert!(parse_positive_base_units("amountIn", Some("1")).is_ok());
    }
}
