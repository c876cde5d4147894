/// Tonearm Daemon - headless player controlled from the terminal
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tokio::io::BufReader;
use tonearm_daemon::{daemon, Daemon, DaemonConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "tonearm-daemon")]
#[command(about = "Tonearm headless music player", long_about = None)]
struct Cli {
    /// Configuration file path (default: ./tonearm.toml if present)
    #[arg(short, long, global = true, env = "TONEARM_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Restore the saved queue and accept commands on stdin
    Serve,
    /// Print the saved queue
    ShowQueue,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tonearm_daemon=info,tonearm_playback=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = DaemonConfig::load(cli.config.as_deref())?;
    config.validate()?;

    match cli.command {
        Commands::Serve => serve(config).await?,
        Commands::ShowQueue => daemon::show_queue(&config).await?,
    }

    Ok(())
}

async fn serve(config: DaemonConfig) -> anyhow::Result<()> {
    tracing::info!("Starting Tonearm");
    tracing::info!("Library: {}", config.library.manifest.display());
    tracing::info!("Storage: {:?} at {}", config.storage.backend, config.storage.path.display());

    let daemon = Daemon::start(&config).await?;
    println!("Type `help` for commands");

    let stdin = BufReader::new(tokio::io::stdin());
    daemon::run_console(daemon, stdin).await?;

    tracing::info!("Tonearm stopped");
    Ok(())
}
