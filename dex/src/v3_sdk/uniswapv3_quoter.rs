use std::sync::Arc;

use alloy::sol;
use alloy::{
    primitives::{aliases::U24, Address, U160, U256},
    providers::ProviderBuilder,
};
use tracing::{debug, instrument};

// QuoterV2 simulates the swap through the pool and reverts with the result,
// so `call()` is an eth_call even though the function is not `view`.
sol!(
    #[allow(missing_docs)]
    #[sol(rpc)]
    interface IQuoterV2 {
        struct QuoteExactInputSingleParams {
            address tokenIn;
            address tokenOut;
            uint256 amountIn;
            uint24 fee;
            uint160 sqrtPriceLimitX96;
        }

        function quoteExactInputSingle(QuoteExactInputSingleParams memory params)
            external
            returns (
                uint256 amountOut,
                uint160 sqrtPriceX96After,
                uint32 initializedTicksCrossed,
                uint256 gasEstimate
            );
    }
);

#[derive(Debug, Clone)]
pub struct QuoteExactInputSingleParams {
    pub token_in: Address,
    pub token_out: Address,
    pub fee: u32,
    pub amount_in: U256,
    pub sqrt_price_limit_x96: U160,
}

impl From<QuoteExactInputSingleParams> for IQuoterV2::QuoteExactInputSingleParams {
    fn from(value: QuoteExactInputSingleParams) -> Self {
        Self {
            tokenIn: value.token_in,
            tokenOut: value.token_out,
            amountIn: value.amount_in,
            fee: U24::from(value.fee),
            sqrtPriceLimitX96: value.sqrt_price_limit_x96,
        }
    }
}

pub enum UniswapV3QuoterCommand {
    /// Output amount for an exact input through a single pool.
    QuoteExactInputSingle(QuoteExactInputSingleParams),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExactInputQuote {
    pub amount_out: U256,
    pub sqrt_price_x96_after: U160,
    pub initialized_ticks_crossed: u32,
    pub gas_estimate: U256,
}

#[derive(Debug)]
pub enum UniswapV3QuoterResult {
    QuoteExactInputSingle(ExactInputQuote),
}

#[derive(thiserror::Error, Debug)]
pub enum UniswapV3QuoterError {
    #[error("no QuoterV2 address configured")]
    NotConfigured,
    #[error("fee {0} is outside 0..=1000000")]
    WrongPoolFee(u32),
    #[error("RPC endpoint unavailable: {0}")]
    InvalidRpcUrl(String),
    #[error("quoteExactInputSingle failed: {0}")]
    CallFailed(String),
}

#[instrument(skip(command, rpc_url))]
pub async fn execute(
    command: UniswapV3QuoterCommand,
    quoter_address: Address,
    rpc_url: &str,
) -> Result<UniswapV3QuoterResult, UniswapV3QuoterError> {
    let provider = ProviderBuilder::new()
        .on_builtin(rpc_url)
        .await
        .map_err(|e| UniswapV3QuoterError::InvalidRpcUrl(e.to_string()))?;

    let client = Arc::new(provider);
    let contract = IQuoterV2::new(quoter_address, client);
    match command {
        UniswapV3QuoterCommand::QuoteExactInputSingle(params) => {
            if params.fee > 1_000_000 {
                return Err(UniswapV3QuoterError::WrongPoolFee(params.fee));
            }
            let call_res = contract
                .quoteExactInputSingle(params.into())
                .call()
                .await
                .map_err(|e| UniswapV3QuoterError::CallFailed(e.to_string()))?;
            let quote = ExactInputQuote {
                amount_out: call_res.amountOut,
                sqrt_price_x96_after: call_res.sqrtPriceX96After,
                initialized_ticks_crossed: call_res.initializedTicksCrossed,
                gas_estimate: call_res.gasEstimate,
            };
            debug!(?quote, "quoter answered");
            Ok(UniswapV3QuoterResult::QuoteExactInputSingle(quote))
        }
    }
}
