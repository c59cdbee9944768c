//! Execute parsed CLI commands against the daemon

use anyhow::{Context, Result};
use koi_client::{CommandInvoker, KoiClient, KoiConfig, LocalInfo};
use tracing::debug;

use crate::cli::{Cli, Commands};

/// Resolve client settings: settings file first, then command-line overrides
pub async fn resolve_config(cli: &Cli) -> Result<KoiConfig> {
    let mut config = KoiConfig::load(cli.settings.as_deref())
        .await
        .context("Failed to load client settings")?;

    if let Some(binary) = &cli.binary {
        config.binary = binary.clone();
    }
    if !cli.config_files.is_empty() {
        config.config_search_paths = cli.config_files.clone();
    }
    if let Some(timeout) = cli.timeout {
        config.timeout_secs = timeout;
    }
    if cli.host.is_some() {
        config.host = cli.host.clone();
    }
    if cli.port.is_some() {
        config.port = cli.port;
    }

    config.validate().context("Invalid client settings")?;
    debug!("Using koi binary {}", config.binary.display());
    Ok(config)
}

fn print_text(text: &str) {
    if !text.is_empty() {
        println!("{}", text);
    }
}

fn print_local(info: &LocalInfo) {
    for (key, value) in info.entries() {
        println!("{}: {}", key, value);
    }
}

/// Run one command and print its result to stdout
pub async fn execute<I: CommandInvoker>(client: &KoiClient<I>, command: Commands) -> Result<()> {
    match command {
        Commands::Status { json } => {
            if json {
                let snapshot = client.status().await?;
                println!("{}", serde_json::to_string_pretty(&snapshot)?);
            } else {
                let report = client.status_report().await?;
                if report.is_empty() {
                    eprintln!("No cluster status available.");
                } else {
                    print!("{}", report);
                }
            }
        }
        Commands::Local { json } => {
            if json {
                let routed = client.local_routed().await?;
                println!("{}", serde_json::to_string_pretty(&routed)?);
            } else {
                print_local(&client.local().await?);
            }
        }
        Commands::LocalUuid => println!("{}", client.local_uuid().await?),
        Commands::Node { node, json } => {
            let info = client
                .node_status(&node)
                .await
                .with_context(|| format!("Failed to query node '{}'", node))?;
            if json {
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                print_local(&info);
            }
        }
        Commands::Tree => print_text(&client.tree().await?),
        Commands::Promote { node } => print_text(&client.promote(&node).await?),
        Commands::Demote => print_text(&client.demote().await?),
        Commands::Elect => print_text(&client.elect().await?),
        Commands::Recover { node } => print_text(&client.recover(node.as_deref()).await?),
        Commands::Failures => print_text(&client.failures().await?),
        Commands::Start { node } => print_text(&client.start(node.as_deref()).await?),
        Commands::Stop { node } => print_text(&client.stop(node.as_deref()).await?),
        Commands::Maintenance { value } => {
            print_text(&client.maintenance_value(&value).await?)
        }
        Commands::Reconfigure { node } => {
            print_text(&client.reconfigure(node.as_deref()).await?)
        }
    }
    Ok(())
}
