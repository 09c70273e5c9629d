use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "u64")]
pub enum ChainId {
    Mainnet = 1,
    Sepolia = 11155111,
    Holesky = 17000,
    Optimism = 10,
    OptimismSepolia = 11155420,
    ArbitrumOne = 42161,
    ArbitrumSepolia = 421614,
    Polygon = 137,
    Base = 8453,
    BaseSepolia = 84532,
    Bnb = 56,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("unsupported chain id {0}")]
pub struct UnsupportedChain(pub u64);

impl ChainId {
    pub fn as_u64(self) -> u64 {
        self as u64
    }
}

impl From<ChainId> for u64 {
    fn from(chain_id: ChainId) -> Self {
        chain_id.as_u64()
    }
}

impl TryFrom<u64> for ChainId {
    type Error = UnsupportedChain;

    fn try_from(chain_id: u64) -> Result<Self, Self::Error> {
        match chain_id {
            1 => Ok(Self::Mainnet),
            11155111 => Ok(Self::Sepolia),
            17000 => Ok(Self::Holesky),
            10 => Ok(Self::Optimism),
            11155420 => Ok(Self::OptimismSepolia),
            42161 => Ok(Self::ArbitrumOne),
            421614 => Ok(Self::ArbitrumSepolia),
            137 => Ok(Self::Polygon),
            8453 => Ok(Self::Base),
            84532 => Ok(Self::BaseSepolia),
            56 => Ok(Self::Bnb),
            other => Err(UnsupportedChain(other)),
        }
    }
}
