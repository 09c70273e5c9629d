use alloy::primitives::{Address, U256};
use alloy::sol;
use alloy_sol_types::SolCall;
use derive_builder::Builder;
use tiny_keccak::{Hasher, Keccak};

// https://docs.uniswap.org/contracts/universal-router/technical-reference

#[derive(thiserror::Error, Debug)]
pub enum UniversalRouterError {
    #[error("unsupported command 0x{0:02x}")]
    UnknownCommand(u8),

    #[error("no decoder for command {0:?}")]
    UnsupportedDecode(CommandType),

    #[error("path needs n tokens and n-1 fees, got {tokens} tokens and {fees} fees")]
    PathLength { tokens: usize, fees: usize },

    #[error("fee {0} does not fit in uint24")]
    FeeOutOfRange(u32),

    #[error("calldata does not start with the execute selector")]
    WrongSelector,

    #[error("abi decode failed: {0}")]
    Decode(String),
}

/// Universal router command opcodes. The low 6 bits carry the command;
/// bit 7 is the "allow revert" flag and is never set by this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum CommandType {
    V3SwapExactIn = 0x00,
    V3SwapExactOut = 0x01,
    Sweep = 0x04,
    Transfer = 0x05,
    PayPortion = 0x06,
    V2SwapExactIn = 0x08,
    V2SwapExactOut = 0x09,
    Permit2Permit = 0x0a,
    WrapEth = 0x0b,
    UnwrapWeth = 0x0c,
}

impl CommandType {
    pub fn opcode(self) -> u8 {
        self as u8
    }
}

const COMMAND_TYPE_MASK: u8 = 0x3f;

impl TryFrom<u8> for CommandType {
    type Error = UniversalRouterError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value & COMMAND_TYPE_MASK {
            0x00 => Ok(Self::V3SwapExactIn),
            0x01 => Ok(Self::V3SwapExactOut),
            0x04 => Ok(Self::Sweep),
            0x05 => Ok(Self::Transfer),
            0x06 => Ok(Self::PayPortion),
            0x08 => Ok(Self::V2SwapExactIn),
            0x09 => Ok(Self::V2SwapExactOut),
            0x0a => Ok(Self::Permit2Permit),
            0x0b => Ok(Self::WrapEth),
            0x0c => Ok(Self::UnwrapWeth),
            _ => Err(UniversalRouterError::UnknownCommand(value)),
        }
    }
}

sol!(
    #[allow(missing_docs)]
    function v3SwapExactIn(
        address recipient,
        uint256 amountIn,
        uint256 amountOutMin,
        bytes calldata path,
        bool payerIsUser
    ) external returns (uint256 amountOut);
);

/// A command together with its ABI-encoded input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UniversalRouterCommand {
    V3SwapExactIn(V3SwapExactInParams),
}

impl UniversalRouterCommand {
    pub fn command_type(&self) -> CommandType {
        match self {
            Self::V3SwapExactIn(_) => CommandType::V3SwapExactIn,
        }
    }

    pub fn encode(&self) -> Vec<u8> {
        match self {
            Self::V3SwapExactIn(params) => params.encode(),
        }
    }

    /// Rebuilds a command from its opcode byte and input.
    pub fn decode(opcode: u8, input: &[u8]) -> Result<Self, UniversalRouterError> {
        match CommandType::try_from(opcode)? {
            CommandType::V3SwapExactIn => {
                Ok(Self::V3SwapExactIn(V3SwapExactInParams::decode(input)?))
            }
            other => Err(UniversalRouterError::UnsupportedDecode(other)),
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Builder)]
pub struct V3SwapExactInParams {
    /// The recipient of the output of the trade
    pub recipient: Address,
    /// The amount of input tokens for the trade
    pub amount_in: U256,
    /// The minimum amount of output tokens the user wants
    pub min_amount_out: U256,
    /// The UniswapV3 encoded path to trade along
    pub path: Vec<u8>,
    /// Whether the input tokens are pulled from msg.sender or already sit in the router
    #[builder(default = "true")]
    pub payer_is_user: bool,
}

impl V3SwapExactInParams {
    pub fn as_command(&self) -> UniversalRouterCommand {
        UniversalRouterCommand::V3SwapExactIn(self.clone())
    }

    /// ABI tuple `(address,uint256,uint256,bytes,bool)`, without a selector.
    pub fn encode(&self) -> Vec<u8> {
        let call = v3SwapExactInCall::new((
            self.recipient,
            self.amount_in,
            self.min_amount_out,
            self.path.clone().into(),
            self.payer_is_user,
        ));
        call.abi_encode()[4..].to_vec()
    }

    pub fn decode(data: &[u8]) -> Result<Self, UniversalRouterError> {
        let mut with_selector =
            method_selector(b"v3SwapExactIn(address,uint256,uint256,bytes,bool)").to_vec();
        with_selector.extend_from_slice(data);
        let decoded = v3SwapExactInCall::abi_decode(&with_selector, false)
            .map_err(|e| UniversalRouterError::Decode(e.to_string()))?;
        Ok(Self {
            recipient: decoded.recipient,
            amount_in: decoded.amountIn,
            min_amount_out: decoded.amountOutMin,
            path: decoded.path.to_vec(),
            payer_is_user: decoded.payerIsUser,
        })
    }
}

/// First four bytes of keccak-256 over a canonical function signature.
pub fn method_selector(signature: &[u8]) -> [u8; 4] {
    let mut hasher = Keccak::v256();
    hasher.update(signature);
    let mut result = [0u8; 32];
    hasher.finalize(&mut result);
    [result[0], result[1], result[2], result[3]]
}

/// Packs `token0 · fee0 · token1 · fee1 · ... · tokenN`, each fee as 3 big-endian bytes.
pub fn encode_path(path: &[Address], fees: &[u32]) -> Result<Vec<u8>, UniversalRouterError> {
    if path.len() < 2 || path.len() != fees.len() + 1 {
        return Err(UniversalRouterError::PathLength {
            tokens: path.len(),
            fees: fees.len(),
        });
    }
    let mut encoded = Vec::with_capacity(20 + fees.len() * 23);
    encoded.extend_from_slice(path[0].as_slice());
    for (i, fee) in fees.iter().enumerate() {
        if *fee > 0x00ff_ffff {
            return Err(UniversalRouterError::FeeOutOfRange(*fee));
        }
        encoded.extend_from_slice(&fee.to_be_bytes()[1..4]);
        encoded.extend_from_slice(path[i + 1].as_slice());
    }
    Ok(encoded)
}
