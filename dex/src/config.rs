//! Process configuration, read once at startup and shared by reference.
//!
//! Every contract address and secret the service needs lives here; request
//! handlers never read the environment themselves.

use alloy::primitives::Address;
use alloy::signers::local::PrivateKeySigner;
use std::str::FromStr;
use tracing::{info, warn};

use crate::core_sdk::chain::ChainId;

/// The 0.3% tier.
pub const DEFAULT_FEE_PPM: u32 = 3000;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing {0} in environment")]
    Missing(&'static str),

    #[error("{name} is not a valid address: {value}")]
    InvalidAddress { name: &'static str, value: String },

    #[error("{name} is not a valid number: {value}")]
    InvalidNumber { name: &'static str, value: String },

    #[error("CHAIN_ID {0} is not supported")]
    UnsupportedChain(u64),

    #[error("DEFAULT_FEE {0} is outside 0..=1000000")]
    InvalidFee(u32),

    #[error("PRIVATE_KEY is not a valid secp256k1 key")]
    InvalidPrivateKey,
}

#[derive(Debug, Clone)]
pub struct DexConfig {
    pub rpc_url: String,
    pub chain_id: ChainId,
    pub kyc_registry: Address,
    pub universal_router: Address,
    pub quoter_v2: Option<Address>,
    pub rwa_token: Option<Address>,
    /// Used when a request names no pool.
    pub default_pool: Option<Address>,
    /// Fee tier used by the on-chain quoter when the caller gives none.
    pub default_fee: u32,
    /// Write capability. `None` means the deployment is read-only.
    pub admin_signer: Option<PrivateKeySigner>,
    pub admin_api_key: Option<String>,
}

impl DexConfig {
    /// Loads `.env` (if present) and then reads the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let rpc_url = get("RPC_URL")
            .or_else(|| get("ALCHEMY_RPC_URL"))
            .ok_or(ConfigError::Missing("RPC_URL"))?;

        let chain_id = match get("CHAIN_ID") {
            Some(raw) => {
                let id = raw
                    .parse::<u64>()
                    .map_err(|_| ConfigError::InvalidNumber { name: "CHAIN_ID", value: raw })?;
                ChainId::try_from(id).map_err(|_| ConfigError::UnsupportedChain(id))?
            }
            None => ChainId::Sepolia,
        };

        let default_fee = match get("DEFAULT_FEE").or_else(|| get("FEE")) {
            Some(raw) => raw
                .parse::<u32>()
                .map_err(|_| ConfigError::InvalidNumber { name: "DEFAULT_FEE", value: raw })?,
            None => DEFAULT_FEE_PPM,
        };
        if default_fee > 1_000_000 {
            return Err(ConfigError::InvalidFee(default_fee));
        }

        let admin_signer = match get("PRIVATE_KEY") {
            Some(raw) => Some(
                PrivateKeySigner::from_str(&raw).map_err(|_| ConfigError::InvalidPrivateKey)?,
            ),
            None => None,
        };

        let config = Self {
            rpc_url,
            chain_id,
            kyc_registry: required_address(&get, "KYC_REGISTRY")?,
            universal_router: required_address(&get, "UNIVERSAL_ROUTER")?,
            quoter_v2: optional_address(&get, "QUOTER_V2")?,
            rwa_token: optional_address(&get, "RWA_ERC20")?,
            default_pool: optional_address(&get, "POOL")?,
            default_fee,
            admin_signer,
            admin_api_key: get("ADMIN_API_KEY"),
        };

        match &config.admin_signer {
            Some(signer) => info!(admin = %signer.address(), "write path enabled"),
            None => warn!("PRIVATE_KEY not set, KYC writes and mints are disabled"),
        }
        if config.admin_api_key.is_none() {
            warn!("ADMIN_API_KEY not set, every admin request will be rejected");
        }
        Ok(config)
    }

    pub fn has_signer(&self) -> bool {
        self.admin_signer.is_some()
    }
}

fn optional_address<G>(get: &G, name: &'static str) -> Result<Option<Address>, ConfigError>
where
    G: Fn(&str) -> Option<String>,
{
    get(name)
        .map(|value| {
            Address::from_str(&value).map_err(|_| ConfigError::InvalidAddress { name, value })
        })
        .transpose()
}

fn required_address<G>(get: &G, name: &'static str) -> Result<Address, ConfigError>
where
    G: Fn(&str) -> Option<String>,
{
    optional_address(get, name)?.ok_or(ConfigError::Missing(name))
}
