//! Spyglass command-line interface.

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "spyglass")]
#[command(about = "OSINT lookups across public data sources")]
#[command(version)]
struct Cli {
    /// Emit machine-readable JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan a target or a field:"value" query
    Scan {
        /// Target value or structured query,
        /// e.g. user@example.com or 'bssid:"AA:BB:CC:DD:EE:FF" ssid:"CafeNet"'
        query: String,

        /// Suppress progress output on stderr
        #[arg(short, long)]
        quiet: bool,
    },

    /// List registered lookup modules
    Modules {
        /// Only modules handling this target type (e.g. email, ip, wifi)
        #[arg(short = 't', long = "type")]
        target_type: Option<String>,
    },

    /// Show API key requirements and which keys are set
    Keys,

    /// Print the configuration file path
    ConfigPath,
}

/// Initialize tracing subscriber for logging.
///
/// Logs go to stderr so JSON output on stdout stays parseable.
fn init_tracing() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn,spyglass=info"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();

    match cli.command {
        Commands::Scan { query, quiet } => commands::scan::run(&query, cli.json, quiet).await,
        Commands::Modules { target_type } => {
            commands::modules::run(target_type.as_deref(), cli.json)
        }
        Commands::Keys => commands::keys::run(cli.json),
        Commands::ConfigPath => commands::config::run(),
    }
}
