//! Issue-key command - creates one API key from the command line

use anyhow::Context;
use tracing::warn;

use crate::config::AppConfig;
use crate::infrastructure::api_key::KeyStoreType;
use crate::infrastructure::logging;

/// Issue a key against the configured store and print it to stdout
pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("Failed to load configuration")?;
    logging::init_logging(&config.logging);

    if config.key_store.backend.parse::<KeyStoreType>()? == KeyStoreType::InMemory {
        warn!("Key store is in-memory; the issued key will not outlive this process");
    }

    let issuer = crate::create_key_issuer(&config).await?;
    let api_key = issuer.issue().await.context("Failed to issue API key")?;

    println!("{}", api_key.key());

    Ok(())
}
