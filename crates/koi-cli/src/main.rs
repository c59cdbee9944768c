use anyhow::Result;
use clap::Parser;
use tracing::debug;

use koi_cli::{cli::Cli, commands, logging};
use koi_client::KoiClient;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(logging::level_for(&cli));

    let config = commands::resolve_config(&cli).await?;
    let client = KoiClient::from_config(&config);

    debug!("Executing {:?}", cli.command);
    commands::execute(&client, cli.command).await
}
