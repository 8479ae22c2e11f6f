use anyhow::{Context, Result};
use deal_sheet::{Config, pipeline};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,deal_sheet=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!(url = %config.deal_list_url, currency = %config.target_currency, "Configuration loaded");

    pipeline::run(&config).await.context("Deal sheet run failed")?;

    Ok(())
}
