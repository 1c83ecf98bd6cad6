//! Command implementations.

pub mod auth;
pub mod start;
pub mod usage;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;
use tracing::{info, warn};
use url::Url;

use photon_client::{LumaClient, DEFAULT_API_BASE};
use photon_session::SessionManager;

/// Arguments shared by every command that talks to the vendor.
#[derive(Args, Debug)]
pub struct VendorArgs {
    /// Vendor API base URL
    #[arg(long, env = "LUMA_API_BASE")]
    pub api_base: Option<String>,

    /// Profile directory holding the persisted cookie file
    #[arg(long, default_value = "./storage/profile/0")]
    pub profile_dir: PathBuf,

    /// File of newline-separated bootstrap access tokens
    #[arg(long, default_value = "tokens.txt")]
    pub tokens_file: PathBuf,
}

impl VendorArgs {
    /// Build the vendor client: session from the profile directory,
    /// bootstrap tokens appended as access-token cookies.
    pub fn build_client(&self) -> Result<LumaClient> {
        let session = Arc::new(
            SessionManager::with_profile_dir(&self.profile_dir)
                .context("failed to open profile directory")?,
        );

        let api_base = self
            .api_base
            .clone()
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string());
        let domain = Url::parse(&api_base)
            .context("invalid vendor API base URL")?
            .host_str()
            .context("vendor API base URL has no host")?
            .to_string();

        if self.tokens_file.exists() {
            let tokens = std::fs::read_to_string(&self.tokens_file)
                .context("failed to read tokens file")?;
            let mut count = 0;
            for token in tokens.lines().map(str::trim).filter(|t| !t.is_empty()) {
                session.add_access_token(token, &domain);
                count += 1;
            }
            info!(count, file = %self.tokens_file.display(), "Loaded bootstrap tokens");
        } else {
            warn!(file = %self.tokens_file.display(), "No tokens file, relying on persisted cookies");
        }

        let client = LumaClient::builder()
            .base_url(api_base)
            .session(session)
            .build()?;
        Ok(client)
    }
}
