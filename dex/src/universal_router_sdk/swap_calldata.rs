//! Unsigned universal-router transaction for a single-hop V3 exact-input swap.
//!
//! The minimum output is derived from `sqrtPriceX96` with integer arithmetic
//! only. Each step floors, in this order: price, pool fee, slippage.

use alloy::primitives::{Address, Uint, U256};
use alloy::primitives::ruint::UintTryFrom;
use derive_builder::Builder;
use tracing::debug;

use super::universal_router_commands::{encode_path, UniversalRouterError, V3SwapExactInParams};
use super::universal_router_execute::build_execute_calldata;
use crate::core_sdk::chain::ChainId;
use crate::core_sdk::currency::Erc20TokenBuilder;
use crate::v3_sdk::uniswapv3_pool::{PoolState, SwapDirection};

/// Wide enough for `uint256 * uint160^2` without truncation.
type U640 = Uint<640, 10>;

const FEE_DENOMINATOR: u64 = 1_000_000;
const BPS_DENOMINATOR: u64 = 10_000;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SwapCalldataError {
    #[error("amountIn must be > 0")]
    NonPositiveAmount,

    #[error("feePpm {0} is outside 0..=1000000")]
    InvalidFee(u32),

    #[error("slippageBps {0} is outside 0..=10000")]
    InvalidSlippage(u32),

    #[error("deadlineSec must be > 0")]
    InvalidDeadline,

    #[error("pool does not match (tokenIn, tokenOut)")]
    PairMismatch,

    #[error("amountOutMin <= 0, amount too small or pool inactive")]
    NonPositiveMinimum,

    #[error("amountOutMin does not fit in uint256")]
    Overflow,

    #[error("calldata encoding failed: {0}")]
    Encoding(String),
}

impl From<UniversalRouterError> for SwapCalldataError {
    fn from(value: UniversalRouterError) -> Self {
        Self::Encoding(value.to_string())
    }
}

#[derive(Debug, Clone, Builder)]
pub struct SwapCalldataParams {
    /// Wallet that signs the transaction and pays `token_in`.
    pub sender: Address,
    pub token_in: Address,
    pub token_out: Address,
    pub amount_in: U256,
    /// Defaults to `sender`.
    #[builder(default = "None")]
    pub recipient: Option<Address>,
    #[builder(default = "50")]
    pub slippage_bps: u32,
    /// Seconds from now until the router rejects the transaction.
    #[builder(default = "600")]
    pub deadline_window_secs: u64,
}

impl SwapCalldataParams {
    /// Checks that need no pool state.
    pub fn validate(&self) -> Result<(), SwapCalldataError> {
        if self.amount_in.is_zero() {
            return Err(SwapCalldataError::NonPositiveAmount);
        }
        if u64::from(self.slippage_bps) > BPS_DENOMINATOR {
            return Err(SwapCalldataError::InvalidSlippage(self.slippage_bps));
        }
        if self.deadline_window_secs == 0 {
            return Err(SwapCalldataError::InvalidDeadline);
        }
        Ok(())
    }
}

/// `approve(router, amountIn)` the wallet must send to `token` beforehand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApprovalCall {
    pub token: Address,
    pub data: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwapCalldata {
    pub to: Address,
    pub data: Vec<u8>,
    pub value: U256,
    pub direction: SwapDirection,
    pub recipient: Address,
    pub amount_in: U256,
    /// After the pool fee, before slippage.
    pub amount_out_estimate: U256,
    pub amount_out_min: U256,
    /// Absolute UNIX timestamp, identical to the one encoded in `data`.
    pub deadline: u64,
    pub path: Vec<u8>,
    pub fee_ppm: u32,
    pub chain_id: ChainId,
    pub router: Address,
    pub approval: ApprovalCall,
}

pub fn build_swap_calldata(
    state: &PoolState,
    params: &SwapCalldataParams,
    router: Address,
    chain_id: ChainId,
    now: u64,
) -> Result<SwapCalldata, SwapCalldataError> {
    params.validate()?;
    let deadline = now
        .checked_add(params.deadline_window_secs)
        .ok_or(SwapCalldataError::InvalidDeadline)?;

    let direction = state
        .direction(params.token_in, params.token_out)
        .ok_or(SwapCalldataError::PairMismatch)?;
    if u64::from(state.fee_ppm) > FEE_DENOMINATOR {
        return Err(SwapCalldataError::InvalidFee(state.fee_ppm));
    }

    let estimate = estimate_out(state, direction, params.amount_in);
    let after_fee = mul_div_down(
        estimate,
        FEE_DENOMINATOR - u64::from(state.fee_ppm),
        FEE_DENOMINATOR,
    );
    let min_out = mul_div_down(
        after_fee,
        BPS_DENOMINATOR - u64::from(params.slippage_bps),
        BPS_DENOMINATOR,
    );
    if min_out.is_zero() {
        return Err(SwapCalldataError::NonPositiveMinimum);
    }
    let amount_out_min = U256::uint_try_from(min_out).map_err(|_| SwapCalldataError::Overflow)?;
    let amount_out_estimate = U256::uint_try_from(after_fee).unwrap_or(U256::MAX);

    let path = encode_path(&[params.token_in, params.token_out], &[state.fee_ppm])?;
    let recipient = params.recipient.unwrap_or(params.sender);
    let swap = V3SwapExactInParams {
        recipient,
        amount_in: params.amount_in,
        min_amount_out: amount_out_min,
        path: path.clone(),
        payer_is_user: true,
    };
    let data = build_execute_calldata(vec![swap.as_command()], deadline);

    let approval = ApprovalCall {
        token: params.token_in,
        data: Erc20TokenBuilder::default()
            .chain_id(chain_id.as_u64())
            .address(params.token_in)
            .build()
            .map_err(|e| SwapCalldataError::Encoding(e.to_string()))?
            .approve_call_data(router, params.amount_in),
    };

    debug!(
        ?direction,
        %amount_out_estimate,
        %amount_out_min,
        deadline,
        "swap calldata built"
    );

    Ok(SwapCalldata {
        to: router,
        data,
        value: U256::ZERO,
        direction,
        recipient,
        amount_in: params.amount_in,
        amount_out_estimate,
        amount_out_min,
        deadline,
        path,
        fee_ppm: state.fee_ppm,
        chain_id,
        router,
        approval,
    })
}

/// `amountIn * sqrtP^2 / 2^192` for token0 in, `amountIn * 2^192 / sqrtP^2` for token1 in.
/// A zero price gives zero in both directions.
fn estimate_out(state: &PoolState, direction: SwapDirection, amount_in: U256) -> U640 {
    let sqrt_price = U640::from(state.sqrt_price_x96);
    let price_x192 = sqrt_price * sqrt_price;
    let q192 = U640::from(1u8) << 192;
    let amount_in = U640::from(amount_in);
    match direction {
        SwapDirection::ZeroForOne => amount_in * price_x192 / q192,
        SwapDirection::OneForZero if price_x192.is_zero() => U640::ZERO,
        SwapDirection::OneForZero => amount_in * q192 / price_x192,
    }
}

fn mul_div_down(value: U640, numerator: u64, denominator: u64) -> U640 {
    value * U640::from(numerator) / U640::from(denominator)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::universal_router_sdk::universal_router_commands::UniversalRouterCommand;
    use crate::universal_router_sdk::universal_router_execute::decode_execute_calldata;
    use crate::v3_sdk::uniswapv3_pool::tests::{pool_at_par, token_a, token_b, Q96};
    use alloy::hex;
    use alloy::primitives::U160;
    use std::str::FromStr;

    const NOW: u64 = 1_730_871_540;

    fn router() -> Address {
        Address::from_str("0x3fC91A3afd70395Cd496C647d5a6CC9D4B2b7FAD").unwrap()
    }

    fn sender() -> Address {
        Address::from_str("0x1000000000000000000000000000000000000001").unwrap()
    }

    fn params(token_in: Address, token_out: Address, amount_in: U256) -> SwapCalldataParamsBuilder {
        let mut builder = SwapCalldataParamsBuilder::default();
        builder
            .sender(sender())
            .token_in(token_in)
            .token_out(token_out)
            .amount_in(amount_in);
        builder
    }

    fn one_ether() -> U256 {
        U256::from(1_000_000_000_000_000_000u128)
    }

    fn build(
        state: &PoolState,
        params: &SwapCalldataParams,
    ) -> Result<SwapCalldata, SwapCalldataError> {
        build_swap_calldata(state, params, router(), ChainId::Sepolia, NOW)
    }

    #[test]
    fn test_par_pool_exact_minimum() {
        let p = params(token_a(), token_b(), one_ether()).build().unwrap();
        let swap = build(&pool_at_par(), &p).unwrap();
        assert_eq!(swap.amount_out_estimate, U256::from(997_000_000_000_000_000u128));
        assert_eq!(swap.amount_out_min, U256::from(992_015_000_000_000_000u128));
        assert_eq!(swap.to, router());
        assert_eq!(swap.router, router());
        assert_eq!(swap.value, U256::ZERO);
        assert_eq!(swap.deadline, NOW + 600);
        assert_eq!(swap.fee_ppm, 3000);
        assert_eq!(swap.chain_id, ChainId::Sepolia);
        assert_eq!(swap.recipient, sender());
        assert_eq!(
            hex::encode(&swap.path),
            "aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa000bb8bbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb"
        );
        assert_eq!(hex::encode(&swap.data[..4]), "3593564c");
    }

    #[test]
    fn test_both_directions_at_price_four() {
        let mut pool = pool_at_par();
        pool.sqrt_price_x96 = U160::from(Q96 * 2);

        let amount_in = U256::from(1_000_000u64);
        let forward = build(&pool, &params(token_a(), token_b(), amount_in).build().unwrap()).unwrap();
        assert_eq!(forward.direction, SwapDirection::ZeroForOne);
        assert_eq!(forward.amount_out_estimate, U256::from(3_988_000u64));
        assert_eq!(forward.amount_out_min, U256::from(3_968_060u64));

        let inverse = build(&pool, &params(token_b(), token_a(), amount_in).build().unwrap()).unwrap();
        assert_eq!(inverse.direction, SwapDirection::OneForZero);
        assert_eq!(inverse.amount_out_estimate, U256::from(249_250u64));
        assert_eq!(inverse.amount_out_min, U256::from(248_003u64));
        assert_eq!(
            hex::encode(&inverse.path),
            "bbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb000bb8aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa"
        );
    }

    #[test]
    fn test_calldata_decodes_to_the_same_swap() {
        let recipient = Address::from_str("0x2000000000000000000000000000000000000002").unwrap();
        let p = params(token_a(), token_b(), one_ether())
            .recipient(Some(recipient))
            .deadline_window_secs(60)
            .build()
            .unwrap();
        let swap = build(&pool_at_par(), &p).unwrap();
        let decoded = decode_execute_calldata(&swap.data).unwrap();
        assert_eq!(decoded.deadline, U256::from(swap.deadline));
        assert_eq!(swap.deadline, NOW + 60);
        let [UniversalRouterCommand::V3SwapExactIn(command)] = decoded.commands.as_slice() else {
            panic!("expected one V3_SWAP_EXACT_IN, got {:?}", decoded.commands);
        };
        assert_eq!(command.recipient, recipient);
        assert_eq!(command.amount_in, one_ether());
        assert_eq!(command.min_amount_out, swap.amount_out_min);
        assert_eq!(command.path, swap.path);
        assert!(command.payer_is_user);
    }

    #[test]
    fn test_deterministic_apart_from_deadline() {
        let p = params(token_a(), token_b(), one_ether()).build().unwrap();
        let first = build(&pool_at_par(), &p).unwrap();
        let second = build(&pool_at_par(), &p).unwrap();
        assert_eq!(first, second);

        let later =
            build_swap_calldata(&pool_at_par(), &p, router(), ChainId::Sepolia, NOW + 5).unwrap();
        assert_eq!(later.deadline, first.deadline + 5);
        assert_eq!(later.amount_out_min, first.amount_out_min);
        assert_ne!(later.data, first.data);
    }

    #[test]
    fn test_minimum_strictly_decreases_with_slippage() {
        let mut previous: Option<U256> = None;
        for bps in [0u32, 1, 50, 500, 5000, 9999] {
            let p = params(token_a(), token_b(), one_ether()).slippage_bps(bps).build().unwrap();
            let min = build(&pool_at_par(), &p).unwrap().amount_out_min;
            if let Some(prev) = previous {
                assert!(min < prev, "bps {bps}: {min} !< {prev}");
            }
            previous = Some(min);
        }
    }

    #[test]
    fn test_full_slippage_or_dust_gives_no_minimum() {
        let p = params(token_a(), token_b(), one_ether()).slippage_bps(10_000).build().unwrap();
        assert_eq!(build(&pool_at_par(), &p), Err(SwapCalldataError::NonPositiveMinimum));

        let p = params(token_a(), token_b(), U256::from(1u64)).build().unwrap();
        assert_eq!(build(&pool_at_par(), &p), Err(SwapCalldataError::NonPositiveMinimum));

        let mut dead_pool = pool_at_par();
        dead_pool.sqrt_price_x96 = U160::ZERO;
        for (token_in, token_out) in [(token_a(), token_b()), (token_b(), token_a())] {
            let p = params(token_in, token_out, one_ether()).build().unwrap();
            assert_eq!(build(&dead_pool, &p), Err(SwapCalldataError::NonPositiveMinimum));
        }
    }

    #[test]
    fn test_rejections() {
        let p = params(token_a(), Address::ZERO, one_ether()).build().unwrap();
        assert_eq!(build(&pool_at_par(), &p), Err(SwapCalldataError::PairMismatch));

        let p = params(token_a(), token_b(), U256::ZERO).build().unwrap();
        assert_eq!(build(&pool_at_par(), &p), Err(SwapCalldataError::NonPositiveAmount));

        let p = params(token_a(), token_b(), one_ether()).slippage_bps(10_001).build().unwrap();
        assert_eq!(build(&pool_at_par(), &p), Err(SwapCalldataError::InvalidSlippage(10_001)));

        let p = params(token_a(), token_b(), one_ether()).deadline_window_secs(0).build().unwrap();
        assert_eq!(build(&pool_at_par(), &p), Err(SwapCalldataError::InvalidDeadline));

        let mut pool = pool_at_par();
        pool.fee_ppm = 1_000_001;
        let p = params(token_a(), token_b(), one_ether()).build().unwrap();
        assert_eq!(build(&pool, &p), Err(SwapCalldataError::InvalidFee(1_000_001)));
    }

    #[test]
    fn test_wide_intermediates_do_not_truncate() {
        let mut pool = pool_at_par();
        pool.fee_ppm = 0;
        let p = params(token_a(), token_b(), U256::MAX).slippage_bps(0).build().unwrap();
        assert_eq!(build(&pool, &p).unwrap().amount_out_min, U256::MAX);

        pool.sqrt_price_x96 = U160::from(Q96 * 2);
        assert_eq!(build(&pool, &p), Err(SwapCalldataError::Overflow));
    }

    #[test]
    fn test_approval_targets_router() {
        let p = params(token_a(), token_b(), one_ether()).build().unwrap();
        let swap = build(&pool_at_par(), &p).unwrap();
        assert_eq!(swap.approval.token, token_a());
        assert_eq!(
            hex::encode(&swap.approval.data),
            "095ea7b30000000000000000000000003fc91a3afd70395cd496c647d5a6cc9d4b2b7fad0000000000000000000000000000000000000000000000000de0b6b3a7640000"
        );
    }
}
