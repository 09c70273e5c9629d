use alloy::primitives::{Address, U160};
use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    Json,
};
use chrono::Utc;
use rwa_dex::common::parse::{parse_address, parse_positive_base_units};
use rwa_dex::core_sdk::currency::Erc20Token;
use rwa_dex::universal_router_sdk::swap_calldata::{build_swap_calldata, SwapCalldataParamsBuilder};
use rwa_dex::v3_sdk::spot_quote::{quote_spot, round_display_price};
use rwa_dex::v3_sdk::uniswapv3_quoter::QuoteExactInputSingleParams;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use super::{checksummed, hex_data};
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteSpotQuery {
    pub pool: Option<String>,
    pub token_in: Option<String>,
    pub token_out: Option<String>,
    pub amount_in: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteSpotResponse {
    pub ok: bool,
    pub pool: String,
    pub fee_ppm: u32,
    pub sqrt_price_x96: String,
    pub tick: i32,
    pub liquidity: String,
    pub token0: String,
    pub token1: String,
    pub token_in_is_token0: bool,
    pub decimals_in: u8,
    pub decimals_out: u8,
    pub amount_in: String,
    pub amount_out: String,
    /// `amountIn` scaled by `decimalsIn`.
    pub amount_in_readable: String,
    pub amount_out_readable: String,
    /// `null` when not finite.
    pub mid_price_token1_per_token0: Option<f64>,
    pub mid_price_token0_per_token1: Option<f64>,
    pub warnings: Vec<String>,
}

/// The request's `pool`, or the configured default when it names none.
fn resolve_pool(state: &AppState, raw: Option<&str>) -> Result<Address, ApiError> {
    match (raw, state.config.default_pool) {
        (None, Some(pool)) => Ok(pool),
        (raw, _) => Ok(parse_address("pool", raw)?),
    }
}

fn display_price(price: f64) -> Option<f64> {
    price.is_finite().then(|| round_display_price(price))
}

/// GET /dex/quote-spot
#[instrument(skip_all)]
pub async fn quote_spot_handler(
    State(state): State<AppState>,
    query: Result<Query<QuoteSpotQuery>, QueryRejection>,
) -> Result<Json<QuoteSpotResponse>, ApiError> {
    let Query(query) = query?;
    let pool = resolve_pool(&state, query.pool.as_deref())?;
    let token_in = parse_address("tokenIn", query.token_in.as_deref())?;
    let token_out = parse_address("tokenOut", query.token_out.as_deref())?;
    let amount_in = parse_positive_base_units("amountIn", query.amount_in.as_deref())?;

    let pool_state = state.gateway.pool_state(pool).await?;
    let quote = quote_spot(&pool_state, token_in, token_out, amount_in)?;
    let (decimals_in, decimals_out) = tokio::try_join!(
        state.gateway.token_decimals(token_in),
        state.gateway.token_decimals(token_out),
    )?;
    debug!(%pool, amount_out = %quote.amount_out, "spot quote");

    Ok(Json(QuoteSpotResponse {
        ok: true,
        pool: checksummed(pool),
        fee_ppm: pool_state.fee_ppm,
        sqrt_price_x96: pool_state.sqrt_price_x96.to_string(),
        tick: pool_state.tick,
        liquidity: pool_state.liquidity.to_string(),
        token0: checksummed(pool_state.token0),
        token1: checksummed(pool_state.token1),
        token_in_is_token0: quote.token_in_is_token0(),
        decimals_in,
        decimals_out,
        amount_in: quote.amount_in.to_string(),
        amount_out: quote.amount_out.to_string(),
        amount_in_readable: Erc20Token::to_readable_amount(quote.amount_in, decimals_in),
        amount_out_readable: Erc20Token::to_readable_amount(quote.amount_out, decimals_out),
        mid_price_token1_per_token0: display_price(quote.mid_prices.token1_per_token0),
        mid_price_token0_per_token1: display_price(quote.mid_prices.token0_per_token1),
        warnings: quote.warnings,
    }))
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteQuery {
    pub token_in: Option<String>,
    pub token_out: Option<String>,
    pub amount_in: Option<String>,
    pub fee: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteResponse {
    pub ok: bool,
    pub amount_out: String,
    pub sqrt_price_x96_after: String,
    pub initialized_ticks_crossed: u32,
    pub gas_estimate: String,
}

/// GET /dex/quote, simulated through QuoterV2.
#[instrument(skip_all)]
pub async fn quote_handler(
    State(state): State<AppState>,
    query: Result<Query<QuoteQuery>, QueryRejection>,
) -> Result<Json<QuoteResponse>, ApiError> {
    let Query(query) = query?;
    let token_in = parse_address("tokenIn", query.token_in.as_deref())?;
    let token_out = parse_address("tokenOut", query.token_out.as_deref())?;
    let amount_in = parse_positive_base_units("amountIn", query.amount_in.as_deref())?;
    let fee = match query.fee.as_deref().map(str::trim).filter(|f| !f.is_empty()) {
        Some(raw) => raw
            .parse::<u32>()
            .ok()
            .filter(|fee| *fee <= 1_000_000)
            .ok_or_else(|| {
                ApiError::BadRequest("fee must be an integer in 0..=1000000".to_string())
            })?,
        None => state.config.default_fee,
    };

    let quote = state
        .gateway
        .quote_exact_input_single(QuoteExactInputSingleParams {
            token_in,
            token_out,
            fee,
            amount_in,
            sqrt_price_limit_x96: U160::ZERO,
        })
        .await?;

    Ok(Json(QuoteResponse {
        ok: true,
        amount_out: quote.amount_out.to_string(),
        sqrt_price_x96_after: quote.sqrt_price_x96_after.to_string(),
        initialized_ticks_crossed: quote.initialized_ticks_crossed,
        gas_estimate: quote.gas_estimate.to_string(),
    }))
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapCalldataBody {
    pub sender: Option<String>,
    pub token_in: Option<String>,
    pub token_out: Option<String>,
    pub amount_in: Option<String>,
    pub pool: Option<String>,
    pub slippage_bps: Option<u32>,
    pub recipient: Option<String>,
    pub deadline_sec: Option<u64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApprovalResponse {
    pub to: String,
    pub data: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapCalldataResponse {
    pub ok: bool,
    pub router: String,
    pub chain_id: u64,
    pub to: String,
    pub data: String,
    pub value: String,
    pub deadline: String,
    pub fee_ppm: u32,
    pub recipient: String,
    pub amount_in: String,
    pub amount_out_estimate: String,
    pub amount_out_min: String,
    pub path: String,
    pub approval: ApprovalResponse,
}

/// POST /dex/swap-calldata
#[instrument(skip_all)]
pub async fn swap_calldata_handler(
    State(state): State<AppState>,
    body: Result<Json<SwapCalldataBody>, JsonRejection>,
) -> Result<Json<SwapCalldataResponse>, ApiError> {
    let Json(body) = body?;
    let sender = parse_address("sender", body.sender.as_deref())?;
    let token_in = parse_address("tokenIn", body.token_in.as_deref())?;
    let token_out = parse_address("tokenOut", body.token_out.as_deref())?;
    let pool = resolve_pool(&state, body.pool.as_deref())?;
    let amount_in = parse_positive_base_units("amountIn", body.amount_in.as_deref())?;
    let recipient = match body.recipient.as_deref() {
        Some(raw) => Some(parse_address("recipient", Some(raw))?),
        None => None,
    };

    let mut builder = SwapCalldataParamsBuilder::default();
    builder
        .sender(sender)
        .token_in(token_in)
        .token_out(token_out)
        .amount_in(amount_in)
        .recipient(recipient);
    if let Some(bps) = body.slippage_bps {
        builder.slippage_bps(bps);
    }
    if let Some(window) = body.deadline_sec {
        builder.deadline_window_secs(window);
    }
    let params = builder
        .build()
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;
    params.validate()?;

    let pool_state = state.gateway.pool_state(pool).await?;
    let now = u64::try_from(Utc::now().timestamp()).unwrap_or_default();
    let swap = build_swap_calldata(
        &pool_state,
        &params,
        state.config.universal_router,
        state.config.chain_id,
        now,
    )?;

    Ok(Json(SwapCalldataResponse {
        ok: true,
        router: checksummed(swap.router),
        chain_id: swap.chain_id.as_u64(),
        to: checksummed(swap.to),
        data: hex_data(&swap.data),
        value: swap.value.to_string(),
        deadline: swap.deadline.to_string(),
        fee_ppm: swap.fee_ppm,
        recipient: checksummed(swap.recipient),
        amount_in: swap.amount_in.to_string(),
        amount_out_estimate: swap.amount_out_estimate.to_string(),
        amount_out_min: swap.amount_out_min.to_string(),
        path: hex_data(&swap.path),
        approval: ApprovalResponse {
            to: checksummed(swap.approval.token),
            data: hex_data(&swap.approval.data),
        },
    }))
}
