//! Usage command - prints the vendor subscription usage.

use anyhow::Result;
use clap::Args;

use super::VendorArgs;

/// Arguments for the usage command.
#[derive(Args, Debug)]
pub struct UsageArgs {
    #[command(flatten)]
    pub vendor: VendorArgs,
}

/// Run the usage command.
pub async fn run(args: UsageArgs) -> Result<()> {
    let client = args.vendor.build_client()?;
    let usage = client.usage().await?;
    println!("{}", serde_json::to_string_pretty(&usage)?);
    Ok(())
}
