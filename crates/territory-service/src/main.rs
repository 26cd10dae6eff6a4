use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use territory_service::commands::{self, EntityArgs};
use territory_service::config::ServiceConfig;
use territory_service::lifecycle::{setup_tracing, TerritorySystem};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "territory-service")]
#[command(about = "Sales territory lookup API and JSON entity tools")]
struct Cli {
    /// Enable verbose debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the lookup API
    Serve(ServiceConfig),
    /// Create, read, update, or delete entities in a local JSON file
    Entity(EntityArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_tracing(cli.verbose);

    match cli.command {
        Command::Serve(config) => serve(config).await,
        Command::Entity(args) => {
            let output = commands::execute(&args).await?;
            println!("{}", serde_json::to_string_pretty(&output)?);
            Ok(())
        }
    }
}

async fn serve(config: ServiceConfig) -> Result<()> {
    info!(
        container = %config.container,
        remote = config.connection_string.is_some(),
        "Territory service starting..."
    );
    let system = TerritorySystem::from_config(&config)
        .await
        .context("failed to start territory API")?;

    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for ctrl-c")?;
    info!("Received ctrl-c");

    system.shutdown().await?;
    Ok(())
}
