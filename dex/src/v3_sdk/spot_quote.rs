//! Indicative quote from the pool's current mid price.
//!
//! This is the display estimate: `amountIn` is converted to `f64`, multiplied by
//! the mid price and the fee factor, then floored. It does not walk ticks and is
//! not the value used to protect funds; see `universal_router_sdk::swap_calldata`
//! for the exact-integer minimum.

use alloy::primitives::{Address, U256};
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use std::str::FromStr;

use super::uniswapv3_pool::{u256_to_f64, MidPrices, PoolState, SwapDirection};

pub const ZERO_LIQUIDITY_WARNING: &str = "pool has no liquidity, quote is indicative only";
pub const NO_PRICE_WARNING: &str = "pool price is zero, no meaningful output can be derived";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SpotQuoteError {
    #[error("amountIn must be > 0")]
    NonPositiveAmount,

    #[error("pool does not match (tokenIn, tokenOut); check the pair and fee tier")]
    PairMismatch,

    #[error("pool feePpm {0} is outside 0..=1000000")]
    InvalidFee(u32),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SpotQuote {
    pub direction: SwapDirection,
    pub amount_in: U256,
    pub amount_out: U256,
    pub mid_prices: MidPrices,
    pub warnings: Vec<String>,
}

impl SpotQuote {
    pub fn token_in_is_token0(&self) -> bool {
        self.direction == SwapDirection::ZeroForOne
    }
}

pub fn quote_spot(
    state: &PoolState,
    token_in: Address,
    token_out: Address,
    amount_in: U256,
) -> Result<SpotQuote, SpotQuoteError> {
    if amount_in.is_zero() {
        return Err(SpotQuoteError::NonPositiveAmount);
    }
    let direction = state
        .direction(token_in, token_out)
        .ok_or(SpotQuoteError::PairMismatch)?;
    if state.fee_ppm > 1_000_000 {
        return Err(SpotQuoteError::InvalidFee(state.fee_ppm));
    }

    let mid_prices = state.mid_prices();
    let fee_factor = 1.0 - f64::from(state.fee_ppm) / 1_000_000.0;
    let estimate = u256_to_f64(amount_in) * mid_prices.for_direction(direction) * fee_factor;

    let mut warnings = Vec::new();
    if state.liquidity == 0 {
        warnings.push(ZERO_LIQUIDITY_WARNING.to_string());
    }
    let amount_out = match floor_to_u256(estimate) {
        Some(amount) => amount,
        None => {
            warnings.push(NO_PRICE_WARNING.to_string());
            U256::ZERO
        }
    };

    Ok(SpotQuote {
        direction,
        amount_in,
        amount_out,
        mid_prices,
        warnings,
    })
}

/// `None` for NaN and infinities. Finite values beyond `U256::MAX` saturate.
fn floor_to_u256(value: f64) -> Option<U256> {
    if !value.is_finite() {
        return None;
    }
    if value <= 0.0 {
        return Some(U256::ZERO);
    }
    let digits = format!("{:.0}", value.floor());
    Some(U256::from_str(&digits).unwrap_or(U256::MAX))
}

/// Rounds a display price to 12 decimals. Non-finite or out-of-range values
/// are passed through unchanged.
pub fn round_display_price(price: f64) -> f64 {
    Decimal::from_f64(price)
        .map(|d| d.round_dp(12))
        .and_then(|d| d.to_f64())
        .unwrap_or(price)
}
