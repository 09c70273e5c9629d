//! Everything the HTTP layer needs from the chain, behind one trait so the
//! handlers can run against an in-memory double.

use std::sync::Arc;

use alloy::primitives::{Address, TxHash, U256};
use async_trait::async_trait;

use crate::config::DexConfig;
use crate::core_sdk::currency::{Erc20TokenBuilder, MintReceipt, TokenError};
use crate::kyc_sdk::kyc_registry::{self, KycRegistryError, KycStatus};
use crate::v3_sdk::uniswapv3_pool::{self, PoolReadError, PoolState};
use crate::v3_sdk::uniswapv3_quoter::{
    self, ExactInputQuote, QuoteExactInputSingleParams, UniswapV3QuoterCommand,
    UniswapV3QuoterError, UniswapV3QuoterResult,
};

#[async_trait]
pub trait ChainGateway: Send + Sync {
    async fn pool_state(&self, pool: Address) -> Result<PoolState, PoolReadError>;

    async fn token_decimals(&self, token: Address) -> Result<u8, PoolReadError>;

    async fn quote_exact_input_single(
        &self,
        params: QuoteExactInputSingleParams,
    ) -> Result<ExactInputQuote, UniswapV3QuoterError>;

    /// Raw registry value, not narrowed to [`KycStatus`].
    async fn kyc_status(&self, user: Address) -> Result<u8, KycRegistryError>;

    async fn set_kyc_status(
        &self,
        user: Address,
        status: KycStatus,
    ) -> Result<TxHash, KycRegistryError>;

    /// Mints `amount` of `token` (or the configured RWA token) to `to`.
    async fn mint(
        &self,
        token: Option<Address>,
        to: Address,
        amount: U256,
    ) -> Result<MintReceipt, TokenError>;
}

/// Talks to a JSON-RPC node. Every call opens its own provider, nothing is
/// cached between requests.
#[derive(Debug, Clone)]
pub struct RpcGateway {
    config: Arc<DexConfig>,
}

impl RpcGateway {
    pub fn new(config: Arc<DexConfig>) -> Self {
        Self { config }
    }
}

#[async_trait]
impl ChainGateway for RpcGateway {
    async fn pool_state(&self, pool: Address) -> Result<PoolState, PoolReadError> {
        uniswapv3_pool::fetch_pool_state(pool, &self.config.rpc_url).await
    }

    async fn token_decimals(&self, token: Address) -> Result<u8, PoolReadError> {
        uniswapv3_pool::token_decimals(token, &self.config.rpc_url).await
    }

    async fn quote_exact_input_single(
        &self,
        params: QuoteExactInputSingleParams,
    ) -> Result<ExactInputQuote, UniswapV3QuoterError> {
        let quoter = self.config.quoter_v2.ok_or(UniswapV3QuoterError::NotConfigured)?;
        let command = UniswapV3QuoterCommand::QuoteExactInputSingle(params);
        match uniswapv3_quoter::execute(command, quoter, &self.config.rpc_url).await? {
            UniswapV3QuoterResult::QuoteExactInputSingle(quote) => Ok(quote),
        }
    }

    async fn kyc_status(&self, user: Address) -> Result<u8, KycRegistryError> {
        kyc_registry::get_status(self.config.kyc_registry, user, &self.config.rpc_url).await
    }

    async fn set_kyc_status(
        &self,
        user: Address,
        status: KycStatus,
    ) -> Result<TxHash, KycRegistryError> {
        let signer = self.config.admin_signer.as_ref().ok_or(KycRegistryError::NoSigner)?;
        kyc_registry::set_status(
            self.config.kyc_registry,
            user,
            status,
            signer,
            &self.config.rpc_url,
        )
        .await
    }

    async fn mint(
        &self,
        token: Option<Address>,
        to: Address,
        amount: U256,
    ) -> Result<MintReceipt, TokenError> {
        let signer = self
            .config
            .admin_signer
            .as_ref()
            .ok_or(TokenError::NotConfigured("no admin signing key"))?;
        let address = token
            .or(self.config.rwa_token)
            .ok_or(TokenError::NotConfigured("no token given and RWA_ERC20 unset"))?;
        let token = Erc20TokenBuilder::default()
            .chain_id(self.config.chain_id.as_u64())
            .address(address)
            .build()
            .map_err(|e| TokenError::Mint(e.to_string()))?;
        token.mint(to, amount, signer, &self.config.rpc_url).await
    }
}
