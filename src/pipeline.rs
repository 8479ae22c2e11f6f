use std::path::PathBuf;

use chrono::Local;
use thiserror::Error;

use crate::config::Config;
use crate::deal_scraper::{ScraperError, extract_fragments, fetch_deal_page};
use crate::exchange_rate::{CurrencyApiClient, ExchangeRate, RateError};
use crate::pairing::{GameRecord, PairingError, pair_fragments};
use crate::report::{ReportError, write_report};

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Exchange rate unavailable: {0}")]
    Rate(#[from] RateError),
    #[error("Scraping failed: {0}")]
    Scrape(#[from] ScraperError),
    #[error("Malformed deal list: {0}")]
    Pairing(#[from] PairingError),
    #[error("Report failed: {0}")]
    Report(#[from] ReportError),
}

/// Fetch the rate, scrape the deal list, price every game and write today's
/// report. Returns the path of the written file.
pub async fn run(config: &Config) -> Result<PathBuf, PipelineError> {
    let rates = CurrencyApiClient::with_base_url(config.api_key.clone(), config.rates_url.clone());

    // Nothing is priced until the rate is known
    let rate = rates
        .latest(&config.target_currency, config.base_currency.as_deref())
        .await?;

    let html = fetch_deal_page(&config.deal_list_url, &config.user_agent).await?;
    let games = build_records(&html, rate)?;
    tracing::info!(count = games.len(), "Games priced");

    let path = write_report(&games, &config.reports_dir, Local::now().date_naive())?;
    Ok(path)
}

/// Extract and price every listing of a downloaded deal page.
pub fn build_records(html: &str, rate: ExchangeRate) -> Result<Vec<GameRecord>, PipelineError> {
    let fragments = extract_fragments(html)?;
    Ok(pair_fragments(&fragments, rate)?)
}
