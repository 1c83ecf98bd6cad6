//! Auth command - session/token management.

use anyhow::Result;
use clap::{Args, Subcommand};

use super::VendorArgs;

/// Arguments for the auth command.
#[derive(Args, Debug)]
pub struct AuthArgs {
    #[command(subcommand)]
    pub command: AuthCommands,
}

#[derive(Subcommand, Debug)]
pub enum AuthCommands {
    /// Probe whether the vendor accepts the current session
    Check {
        #[command(flatten)]
        vendor: VendorArgs,
    },
}

/// Run the auth command.
pub async fn run(args: AuthArgs) -> Result<()> {
    match args.command {
        AuthCommands::Check { vendor } => {
            let client = vendor.build_client()?;
            if client.is_logged_in().await? {
                println!("Logged in");
            } else {
                println!("Not logged in");
                std::process::exit(1);
            }
            Ok(())
        }
    }
}
