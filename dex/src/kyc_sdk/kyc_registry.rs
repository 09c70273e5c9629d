use std::sync::Arc;

use alloy::{
    network::EthereumWallet,
    primitives::{Address, TxHash},
    providers::ProviderBuilder,
    signers::local::PrivateKeySigner,
    sol,
};
use serde::Serialize;
use tracing::{info, instrument};

sol!(
    #[allow(missing_docs)]
    #[sol(rpc)]
    interface IKycRegistry {
        function getStatus(address user) external view returns (uint8);
        function setStatus(address user, uint8 status) external;
    }
);

/// On-chain KYC flag. The registry stores a raw `uint8`; reads keep the raw
/// value, writes only accept these three.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(into = "u8")]
#[repr(u8)]
pub enum KycStatus {
    None = 0,
    Whitelisted = 1,
    Blacklisted = 2,
}

impl From<KycStatus> for u8 {
    fn from(value: KycStatus) -> Self {
        value as u8
    }
}

impl TryFrom<u8> for KycStatus {
    type Error = KycRegistryError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::None),
            1 => Ok(Self::Whitelisted),
            2 => Ok(Self::Blacklisted),
            other => Err(KycRegistryError::InvalidStatus(u64::from(other))),
        }
    }
}

impl TryFrom<u64> for KycStatus {
    type Error = KycRegistryError;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        u8::try_from(value)
            .map_err(|_| KycRegistryError::InvalidStatus(value))
            .and_then(KycStatus::try_from)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum KycRegistryError {
    #[error("status must be 0 (none), 1 (whitelisted) or 2 (blacklisted), got {0}")]
    InvalidStatus(u64),

    #[error("RPC endpoint unavailable: {0}")]
    InvalidRpcUrl(String),

    #[error("getStatus failed: {0}")]
    Read(String),

    #[error("setStatus failed: {0}")]
    Write(String),

    #[error("not configured: no admin signing key")]
    NoSigner,
}

#[instrument(skip(rpc_url))]
pub async fn get_status(
    registry: Address,
    user: Address,
    rpc_url: &str,
) -> Result<u8, KycRegistryError> {
    let provider = ProviderBuilder::new()
        .on_builtin(rpc_url)
        .await
        .map_err(|e| KycRegistryError::InvalidRpcUrl(e.to_string()))?;
    let contract = IKycRegistry::new(registry, Arc::new(provider));
    let status = contract
        .getStatus(user)
        .call()
        .await
        .map_err(|e| KycRegistryError::Read(e.to_string()))?
        ._0;
    Ok(status)
}

/// Sends `setStatus(user, status)` and returns once the node accepted the
/// transaction. Inclusion is not awaited.
#[instrument(skip(signer, rpc_url), fields(admin = %signer.address()))]
pub async fn set_status(
    registry: Address,
    user: Address,
    status: KycStatus,
    signer: &PrivateKeySigner,
    rpc_url: &str,
) -> Result<TxHash, KycRegistryError> {
    let wallet = EthereumWallet::from(signer.clone());
    let provider = ProviderBuilder::new()
        .with_recommended_fillers()
        .wallet(wallet)
        .on_builtin(rpc_url)
        .await
        .map_err(|e| KycRegistryError::InvalidRpcUrl(e.to_string()))?;
    let contract = IKycRegistry::new(registry, Arc::new(provider));
    let pending = contract
        .setStatus(user, u8::from(status))
        .send()
        .await
        .map_err(|e| KycRegistryError::Write(e.to_string()))?;
    let tx_hash = *pending.tx_hash();
    info!(%user, ?status, %tx_hash, "kyc status submitted");
    Ok(tx_hash)
}
