//! Gateway binary entry point.

mod cli;

use base_gateway::GatewayConfig;
use clap::Parser;
use cli::Cli;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    let cli = Cli::parse();
    let config = GatewayConfig::try_from(cli)?;

    base_gateway::run(config).await
}
