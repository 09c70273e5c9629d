use alloy::primitives::{Bytes, U256};
use alloy::sol;
use alloy_sol_types::SolCall;

use super::universal_router_commands::{
    method_selector, UniversalRouterCommand, UniversalRouterError,
};

sol!(
    #[allow(missing_docs)]
    function execute(bytes calldata commands, bytes[] calldata inputs, uint256 deadline)
        external
        payable;
);

/// `execute(bytes,bytes[],uint256)`: one opcode byte per command, one input per command.
pub fn build_execute_calldata(commands: Vec<UniversalRouterCommand>, deadline: u64) -> Vec<u8> {
    let opcodes: Vec<u8> = commands.iter().map(|c| c.command_type().opcode()).collect();
    let inputs: Vec<Bytes> = commands.iter().map(|c| Bytes::from(c.encode())).collect();
    executeCall::new((opcodes.into(), inputs, U256::from(deadline))).abi_encode()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedExecute {
    pub commands: Vec<UniversalRouterCommand>,
    pub deadline: U256,
}

/// Inverse of [`build_execute_calldata`] for the command kinds this crate encodes.
pub fn decode_execute_calldata(data: &[u8]) -> Result<DecodedExecute, UniversalRouterError> {
    if data.len() < 4 || data[..4] != method_selector(b"execute(bytes,bytes[],uint256)") {
        return Err(UniversalRouterError::WrongSelector);
    }
    let decoded = executeCall::abi_decode(data, false)
        .map_err(|e| UniversalRouterError::Decode(e.to_string()))?;
    if decoded.commands.len() != decoded.inputs.len() {
        return Err(UniversalRouterError::Decode(format!(
            "{} commands but {} inputs",
            decoded.commands.len(),
            decoded.inputs.len()
        )));
    }
    let commands = decoded
        .commands
        .iter()
        .zip(decoded.inputs.iter())
        .map(|(opcode, input)| UniversalRouterCommand::decode(*opcode, input))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(DecodedExecute {
        commands,
        deadline: decoded.deadline,
    })
}
