//! Photon - REST bridge for the Luma Dream Machine video-generation API.
//!
//! Main entry point for the Photon CLI.

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;

use commands::{auth, start, usage};

// ─────────────────────────────────────────────────────────────────────────────
// CLI Structure
// ─────────────────────────────────────────────────────────────────────────────

/// Photon - REST bridge for the Luma Dream Machine video-generation API
#[derive(Parser)]
#[command(name = "photon")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the façade server
    Start(start::StartArgs),

    /// Print the vendor subscription usage
    Usage(usage::UsageArgs),

    /// Session/token management
    Auth(auth::AuthArgs),
}

// ─────────────────────────────────────────────────────────────────────────────
// Main
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        "photon=debug,photon_client=debug,photon_session=debug,photon_store=debug,photon_server=debug,info"
    } else {
        "photon=info,photon_client=info,photon_session=info,photon_store=info,photon_server=info,warn"
    };

    tracing_subscriber::fmt()
        .with_target(true)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .init();

    match cli.command {
        Commands::Start(args) => start::run(args).await,
        Commands::Usage(args) => usage::run(args).await,
        Commands::Auth(args) => auth::run(args).await,
    }
}
