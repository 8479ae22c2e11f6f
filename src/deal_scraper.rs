use reqwest::header::USER_AGENT;
use scraper::{ElementRef, Html, Selector};
use thiserror::Error;

/// One cell per fragment; cells alternate between a game name and its price block.
const CELL_SELECTOR: &str = ".box-body.comparison-table-entry .col-xs-12.col-lg-6";
const NAME_SELECTOR: &str = "a";
const PRICE_SELECTOR: &str = "span";

#[derive(Debug, Error)]
pub enum ScraperError {
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
    #[error("HTTP {status} from {url}")]
    HttpStatus { status: u16, url: String },
    #[error("Parse error: {0}")]
    ParseError(String),
    #[error("No content found")]
    EmptyContent,
}

pub async fn fetch_deal_page(url: &str, user_agent: &str) -> Result<String, ScraperError> {
    if url.is_empty() {
        return Err(ScraperError::InvalidUrl("URL cannot be empty".to_string()));
    }

    tracing::info!(url, "Fetching deal list");

    let response = reqwest::Client::new()
        .get(url)
        .header(USER_AGENT, user_agent)
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        return Err(ScraperError::HttpStatus {
            status: status.as_u16(),
            url: url.to_string(),
        });
    }

    let html = response.text().await?;
    if html.trim().is_empty() {
        return Err(ScraperError::EmptyContent);
    }

    tracing::debug!(bytes = html.len(), "Deal list downloaded");
    Ok(html)
}

/// Text fragments of the deal table in document order.
///
/// Even positions carry the trimmed link text (the game name), odd positions
/// the concatenated span text (the price block).
pub fn extract_fragments(html: &str) -> Result<Vec<String>, ScraperError> {
    let document = Html::parse_document(html);

    let cell_selector = selector(CELL_SELECTOR)?;
    let name_selector = selector(NAME_SELECTOR)?;
    let price_selector = selector(PRICE_SELECTOR)?;

    let fragments: Vec<String> = document
        .select(&cell_selector)
        .enumerate()
        .map(|(i, cell)| {
            if i % 2 == 0 {
                descendant_text(cell, &name_selector).trim().to_string()
            } else {
                descendant_text(cell, &price_selector)
            }
        })
        .collect();

    tracing::debug!(count = fragments.len(), "Extracted fragments");
    Ok(fragments)
}

fn selector(css: &str) -> Result<Selector, ScraperError> {
    Selector::parse(css).map_err(|e| ScraperError::ParseError(e.to_string()))
}

fn descendant_text(cell: ElementRef<'_>, selector: &Selector) -> String {
    cell.select(selector)
        .flat_map(|el| el.text())
        .collect::<String>()
}
