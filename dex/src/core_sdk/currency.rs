use alloy::{
    network::EthereumWallet,
    primitives::{utils::format_units, Address, TxHash, U256},
    providers::ProviderBuilder,
    signers::local::PrivateKeySigner,
    sol,
};
use alloy_sol_types::SolCall;
use derive_builder::Builder;
use std::sync::Arc;
use tracing::{info, instrument};

sol!(
    #[allow(missing_docs)]
    #[sol(rpc)]
    interface ERC20 {
        function decimals() external view returns (uint8);
        function approve(address _spender, uint256 _value) external returns (bool);
        function mint(address to, uint256 amount) external;
    }
);

#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("RPC endpoint unavailable: {0}")]
    InvalidRpcUrl(String),

    #[error("mint reverted or RPC unavailable: {0}")]
    Mint(String),

    #[error("not configured: {0}")]
    NotConfigured(&'static str),
}

#[derive(Debug, Clone, Builder)]
pub struct Erc20Token {
    #[builder(default = "11155111")]
    pub chain_id: u64,
    pub address: Address,
}

/// Outcome of a confirmed `mint` transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MintReceipt {
    pub token: Address,
    pub to: Address,
    pub amount: U256,
    pub tx_hash: TxHash,
    pub success: bool,
    pub gas_used: String,
}

impl Erc20Token {
    /// Human-readable amount, e.g. `1.500000` for `1500000` base units of a 6-decimals token.
    pub fn to_readable_amount(amount: U256, decimals: u8) -> String {
        format_units(amount, decimals).unwrap_or_else(|_| amount.to_string())
    }

    /// `approve(spender, amount)` calldata. The universal router pulls `tokenIn`
    /// from the caller, so the wallet has to send this first.
    pub fn approve_call_data(&self, spender: Address, amount: U256) -> Vec<u8> {
        ERC20::approveCall::abi_encode(&ERC20::approveCall {
            _spender: spender,
            _value: amount,
        })
    }

    /// Sends `mint(to, amount)` signed by `signer` and waits for the receipt.
    #[instrument(skip(self, signer, rpc_url), fields(token = %self.address))]
    pub async fn mint(
        &self,
        to: Address,
        amount: U256,
        signer: &PrivateKeySigner,
        rpc_url: &str,
    ) -> Result<MintReceipt, TokenError> {
        let wallet = EthereumWallet::from(signer.clone());
        let provider = ProviderBuilder::new()
            .with_recommended_fillers()
            .wallet(wallet)
            .on_builtin(rpc_url)
            .await
            .map_err(|e| TokenError::InvalidRpcUrl(e.to_string()))?;
        let contract = ERC20::new(self.address, Arc::new(provider));
        let receipt = contract
            .mint(to, amount)
            .send()
            .await
            .map_err(|e| TokenError::Mint(e.to_string()))?
            .get_receipt()
            .await
            .map_err(|e| TokenError::Mint(e.to_string()))?;
        info!(tx = %receipt.transaction_hash, success = receipt.status(), "mint confirmed");
        Ok(MintReceipt {
            token: self.address,
            to,
            amount,
            tx_hash: receipt.transaction_hash,
            success: receipt.status(),
            gas_used: receipt.gas_used.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::hex;
    use std::str::FromStr;

    #[test]
    fn test_erc20_token_builder_defaults() {
        let rwa = Erc20TokenBuilder::default()
            .address(Address::from_str("0x6894CDe390a3f51155ea41Ed24a33A4827d3063D").unwrap())
            .build()
            .unwrap();
        assert_eq!(rwa.chain_id, 11155111);
    }

    #[test]
    fn test_builder_requires_address() {
        assert!(Erc20TokenBuilder::default().chain_id(1).build().is_err());
    }

    #[test]
    fn test_readable_amount() {
        assert_eq!(
            Erc20Token::to_readable_amount(U256::from(1_500_000u64), 6),
            "1.500000"
        );
        assert_eq!(
            Erc20Token::to_readable_amount(U256::from(992015000000000000u64), 18),
            "0.992015000000000000"
        );
    }

    #[test]
    fn test_approve_call_data() {
        let meme = Erc20TokenBuilder::default()
            .address(Address::from_str("0x6894CDe390a3f51155ea41Ed24a33A4827d3063D").unwrap())
            .build()
            .unwrap();
        let permit2_address =
            Address::from_str("0x000000000022D473030F116dDEE9F6B43aC78BA3").unwrap();
        let approve_call_data = meme.approve_call_data(
            permit2_address,
            U256::from_str("32655382378191657965278").unwrap(),
        );
        assert_eq!(
            "095ea7b3000000000000000000000000000000000022d473030f116ddee9f6b43ac78ba30000000000000000000000000000000000000000000006ea4077a955987d16de",
            hex::encode(approve_call_data)
        );
    }

    #[test]
    fn test_mint_selector() {
        let data = ERC20::mintCall {
            to: Address::ZERO,
            amount: U256::from(1u64),
        }
        .abi_encode();
        // keccak("mint(address,uint256)")[..4]
        assert_eq!(hex::encode(&data[..4]), "40c10f19");
        assert_eq!(data.len(), 4 + 64);
    }
}
