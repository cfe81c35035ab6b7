use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use fleetctl::{
    commands::device::{self, DeviceArgs},
    config::Settings,
};

#[derive(Parser)]
#[command(name = "fleetctl")]
#[command(about = "Fleet device management CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show info about a single device.
    Device(DeviceArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let settings = Settings::load()?;
    tracing::debug!(
        "[CLI][CONFIG] api_url={} dashboard_url={} v13={} token={}",
        settings.api_url,
        settings.dashboard_url,
        settings.v13,
        settings.api_token.is_some()
    );

    match cli.command {
        Commands::Device(args) => {
            device::run(args, &settings).await?;
        }
    }

    Ok(())
}
