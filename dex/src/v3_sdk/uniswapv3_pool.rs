use std::sync::Arc;

use alloy::{
    primitives::{Address, U160, U256},
    providers::ProviderBuilder,
    sol,
};
use tracing::{debug, instrument};

use crate::core_sdk::currency::ERC20;

sol!(
    #[allow(missing_docs)]
    #[sol(rpc)]
    interface IUniswapV3Pool {
        function slot0() external view returns (
            uint160 sqrtPriceX96,
            int24 tick,
            uint16 observationIndex,
            uint16 observationCardinality,
            uint16 observationCardinalityNext,
            uint8 feeProtocol,
            bool unlocked
        );
        function liquidity() external view returns (uint128);
        function token0() external view returns (address);
        function token1() external view returns (address);
        function fee() external view returns (uint24);
    }
);

/// Snapshot of a V3 pool, fetched fresh for every request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolState {
    pub sqrt_price_x96: U160,
    pub tick: i32,
    pub liquidity: u128,
    /// Canonical pool ordering, `token0 < token1`.
    pub token0: Address,
    pub token1: Address,
    pub fee_ppm: u32,
}

/// Which way a caller-supplied pair runs against the pool's token ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwapDirection {
    /// tokenIn is token0.
    ZeroForOne,
    /// tokenIn is token1.
    OneForZero,
}

impl PoolState {
    /// `None` when `(token_in, token_out)` is neither `(token0, token1)` nor
    /// `(token1, token0)`. Address equality is byte-wise, so letter case of
    /// the original hex strings never matters.
    pub fn direction(&self, token_in: Address, token_out: Address) -> Option<SwapDirection> {
        if token_in == self.token0 && token_out == self.token1 {
            Some(SwapDirection::ZeroForOne)
        } else if token_in == self.token1 && token_out == self.token0 {
            Some(SwapDirection::OneForZero)
        } else {
            None
        }
    }

    pub fn mid_prices(&self) -> MidPrices {
        MidPrices::from_sqrt_price_x96(self.sqrt_price_x96)
    }
}

/// Spot prices derived from `sqrtPriceX96`. Floating point, indicative only.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MidPrices {
    pub token1_per_token0: f64,
    /// `f64::INFINITY` exactly when the forward price is zero.
    pub token0_per_token1: f64,
}

impl MidPrices {
    pub fn from_sqrt_price_x96(sqrt_price_x96: U160) -> Self {
        let ratio = u256_to_f64(U256::from(sqrt_price_x96)) / 2f64.powi(96);
        let price = ratio * ratio;
        let inverse = if price == 0.0 { f64::INFINITY } else { 1.0 / price };
        Self {
            token1_per_token0: price,
            token0_per_token1: inverse,
        }
    }

    pub fn for_direction(&self, direction: SwapDirection) -> f64 {
        match direction {
            SwapDirection::ZeroForOne => self.token1_per_token0,
            SwapDirection::OneForZero => self.token0_per_token1,
        }
    }
}

/// Nearest-float conversion through the decimal representation, which keeps
/// full precision for values wider than 128 bits.
pub fn u256_to_f64(value: U256) -> f64 {
    value.to_string().parse::<f64>().unwrap_or(f64::INFINITY)
}

#[derive(Debug, thiserror::Error)]
pub enum PoolReadError {
    #[error("RPC endpoint unavailable: {0}")]
    InvalidRpcUrl(String),

    #[error("pool {pool} unavailable: {reason}")]
    Unavailable { pool: Address, reason: String },

    #[error("decimals() failed on {token}: {reason}")]
    Decimals { token: Address, reason: String },
}

/// Reads slot0, liquidity, token0, token1 and fee concurrently. The first
/// failing call fails the whole snapshot.
#[instrument(skip(rpc_url))]
pub async fn fetch_pool_state(pool: Address, rpc_url: &str) -> Result<PoolState, PoolReadError> {
    let provider = ProviderBuilder::new()
        .on_builtin(rpc_url)
        .await
        .map_err(|e| PoolReadError::InvalidRpcUrl(e.to_string()))?;
    let client = Arc::new(provider);
    let contract = IUniswapV3Pool::new(pool, client);

    let unavailable = |reason: String| PoolReadError::Unavailable { pool, reason };

    let (slot0, liquidity, token0, token1, fee) = tokio::try_join!(
        async { contract.slot0().call().await },
        async { contract.liquidity().call().await },
        async { contract.token0().call().await },
        async { contract.token1().call().await },
        async { contract.fee().call().await },
    )
    .map_err(|e| unavailable(e.to_string()))?;

    let tick = i32::try_from(slot0.tick).map_err(|e| unavailable(e.to_string()))?;
    let fee_ppm = u32::try_from(fee._0).map_err(|e| unavailable(e.to_string()))?;

    let state = PoolState {
        sqrt_price_x96: slot0.sqrtPriceX96,
        tick,
        liquidity: liquidity._0,
        token0: token0._0,
        token1: token1._0,
        fee_ppm,
    };
    debug!(?state, "pool state fetched");
    Ok(state)
}

#[instrument(skip(rpc_url))]
pub async fn token_decimals(token: Address, rpc_url: &str) -> Result<u8, PoolReadError> {
    let provider = ProviderBuilder::new()
        .on_builtin(rpc_url)
        .await
        .map_err(|e| PoolReadError::InvalidRpcUrl(e.to_string()))?;
    let contract = ERC20::new(token, Arc::new(provider));
    let decimals = contract
        .decimals()
        .call()
        .await
        .map_err(|e| PoolReadError::Decimals {
            token,
            reason: e.to_string(),
        })?
        ._0;
    Ok(decimals)
}
