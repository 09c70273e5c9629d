use clap::Parser;
use dotenv::dotenv;
use rwa_dex::config::DexConfig;
use rwa_server::{ApiServer, AppState, ServerConfig};
use tracing_subscriber::EnvFilter;

/// RWA DEX backend: KYC registry, Uniswap V3 quotes and swap calldata.
#[derive(Debug, Parser)]
#[command(name = "rwa-server", version, about)]
struct Cli {
    /// Interface to bind.
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    #[arg(long, env = "PORT", default_value_t = 4000)]
    port: u16,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = DexConfig::from_env()?;
    let server = ApiServer::new(
        ServerConfig {
            host: cli.host,
            port: cli.port,
        },
        AppState::new(config),
    );
    server.run().await
}
