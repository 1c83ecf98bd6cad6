//! Start command - launches the façade server.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use photon_server::{AppState, Server, ServerConfig};
use photon_store::GenerationStore;

use super::VendorArgs;

/// Arguments for the start command.
#[derive(Args, Debug)]
pub struct StartArgs {
    #[command(flatten)]
    pub vendor: VendorArgs,

    /// Address to bind to
    #[arg(short, long)]
    pub bind: Option<String>,

    /// Port to listen on (overrides the port in --bind)
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Path to the generation cache database
    #[arg(long, default_value = "generations.db")]
    pub db: PathBuf,
}

/// Run the start command.
pub async fn run(args: StartArgs) -> Result<()> {
    let mut bind_address: SocketAddr = match &args.bind {
        Some(bind) => bind.parse().context("invalid --bind address")?,
        None => ServerConfig::default().bind_address,
    };
    if let Some(port) = args.port {
        bind_address.set_port(port);
    }

    let client = args.vendor.build_client()?;
    let store = GenerationStore::open(&args.db).context("failed to open generation store")?;

    let config = ServerConfig::default().with_bind_address(bind_address);
    let state = AppState::new(client, store, config);

    Server::from_state(state).run().await?;
    Ok(())
}
