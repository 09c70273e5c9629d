use std::sync::Arc;

use rwa_dex::config::DexConfig;
use rwa_dex::gateway::{ChainGateway, RpcGateway};

/// Shared by every handler. Built once at startup.
#[derive(Clone)]
pub struct AppState {
    pub gateway: Arc<dyn ChainGateway>,
    pub config: Arc<DexConfig>,
}

impl AppState {
    /// State backed by the JSON-RPC node in `config`.
    pub fn new(config: DexConfig) -> Self {
        let config = Arc::new(config);
        Self {
            gateway: Arc::new(RpcGateway::new(config.clone())),
            config,
        }
    }

    pub fn with_gateway(gateway: Arc<dyn ChainGateway>, config: Arc<DexConfig>) -> Self {
        Self { gateway, config }
    }
}
