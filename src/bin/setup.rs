use std::path::Path;

use anyhow::{Context, Result};
use deal_sheet::config::DEFAULT_ENV_FILE;
use deal_sheet::credentials::{prompt_api_key, save_api_key};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let key = prompt_api_key().context("Failed to read API key")?;
    save_api_key(Path::new(DEFAULT_ENV_FILE), &key).context("Failed to store API key")?;

    Ok(())
}
